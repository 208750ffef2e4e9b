//! Module for the "upload" functionality: the full deposit workflow.

use super::*;

/// Function for the [`Commands::Upload`] in the CLI.
///
/// Creates a deposit (or resumes one), uploads every file of the folder,
/// attaches metadata when an ISO record is given, and publishes on request.
pub async fn upload(cli: &Cli, options: &UploadOptions) -> Result<()> {
  let mut config = cli.load_config()?;
  if options.sandbox {
    config = config.with_server(Server::Sandbox);
  }
  let token = config.token()?;
  println!(
    "{} Depositing into {}",
    style(INFO_PREFIX).cyan(),
    style(config.server.base_url()).yellow()
  );

  let files = collect_upload_files(&options.folder)?;
  println!(
    "{} Files to upload in {}:",
    style(INFO_PREFIX).cyan(),
    style(options.folder.display()).yellow()
  );
  for (index, file) in files.iter().enumerate() {
    let branch = if index + 1 == files.len() { TREE_LEAF } else { TREE_BRANCH };
    println!("{} {}", style(branch).dim(), file.name);
  }

  let metadata = match &options.iso_file {
    Some(iso_file) => {
      let xml = read_record(iso_file)?;
      let document = Document::parse(&xml)?;
      let metadata = MetadataAssembler::new().assemble(&document)?;
      println!(
        "{} Metadata:\n{}",
        style(INFO_PREFIX).cyan(),
        serde_json::to_string_pretty(&metadata)?
      );
      Some(metadata)
    },
    None => None,
  };

  let client = ZenodoClient::new(config.server.base_url(), token);

  let state = match &options.resume_file {
    Some(resume_file) => {
      let state = ResumeState::load(resume_file)?;
      println!(
        "{} Resuming deposit {} from {}",
        style(INFO_PREFIX).cyan(),
        style(state.dataset_id).yellow(),
        style(resume_file.display()).yellow()
      );
      state
    },
    None => {
      let state = ResumeState::from(client.create_deposition().await?);
      let resume_file = state.save(&config.resume_dir)?;
      println!(
        "{} Created deposit {}, resume file: {}",
        style(SUCCESS_PREFIX).green(),
        style(state.dataset_id).yellow(),
        style(resume_file.display()).yellow()
      );
      state
    },
  };

  for file in &files {
    let uploaded = client.upload_file(&state.bucket_url, &file.name, &file.path).await?;
    println!(
      "{} {}: checksum={}, size={}",
      style(SUCCESS_PREFIX).green(),
      file.name,
      uploaded.checksum,
      uploaded.size
    );
  }

  if let Some(metadata) = &metadata {
    client.update_metadata(state.dataset_id, metadata).await?;
    println!("{} Metadata attached", style(SUCCESS_PREFIX).green());
  }

  if options.publish {
    if !cli.accept_defaults
      && !dialoguer::Confirm::new()
        .with_prompt(format!(
          "{} Publish deposit {}? Published deposits cannot be deleted",
          style(WARNING_PREFIX).yellow(),
          state.dataset_id
        ))
        .default(false)
        .wait_for_newline(true)
        .interact()?
    {
      println!("{} Publishing skipped, the deposit stays a draft", style(WARNING_PREFIX).yellow());
      return Ok(());
    }
    client.publish(state.dataset_id).await?;
    println!("{} Deposit {} published", style(SUCCESS_PREFIX).green(), state.dataset_id);
  }

  println!("{} Done", style(SUCCESS_PREFIX).green());
  Ok(())
}
