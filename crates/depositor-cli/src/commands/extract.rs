//! Module for the "extract" functionality: previewing deposit metadata.

use super::*;

/// Function for the [`Commands::Extract`] in the CLI.
///
/// Prints the metadata as pretty JSON on stdout and nothing else, so the
/// output can be redirected into a file.
pub fn extract(_cli: &Cli, iso_file: &Path, strict_contacts: bool) -> Result<()> {
  let policy =
    if strict_contacts { MissingContactPolicy::Fail } else { MissingContactPolicy::Omit };
  debug!("Extracting metadata from {} with {:?}", iso_file.display(), policy);

  let xml = read_record(iso_file)?;
  let document = Document::parse(&xml)?;
  let metadata = MetadataAssembler::new().with_missing_contact_policy(policy).assemble(&document)?;

  println!("{}", serde_json::to_string_pretty(&metadata)?);
  Ok(())
}
