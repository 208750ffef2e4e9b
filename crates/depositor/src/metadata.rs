//! Zenodo deposit metadata and its assembly from an ISO record.
//!
//! [`DepositMetadata`] mirrors the `metadata` object of Zenodo's deposit API.
//! Optional fields are left out of the serialized JSON entirely when they
//! have no value, with the exception of `title` and `description`, which are
//! always present and serialize as `null` when the record has none.
//!
//! [`MetadataAssembler`] performs the remapping in a single pass over a
//! parsed [`Document`]:
//!
//! ```no_run
//! use depositor::{
//!   metadata::MetadataAssembler,
//!   xml::{read_record, Document},
//! };
//!
//! # fn main() -> depositor::error::Result<()> {
//! let xml = read_record("record.xml")?;
//! let document = Document::parse(&xml)?;
//! let metadata = MetadataAssembler::new().assemble(&document)?;
//! println!("{}", serde_json::to_string_pretty(&metadata)?);
//! # Ok(())
//! # }
//! ```

use chrono::Local;

use super::*;
use crate::iso::*;

/// Zenodo upload type of every deposit created from an ISO record.
pub const UPLOAD_TYPE: &str = "dataset";

/// License attached to every deposit.
pub const LICENSE: &str = "cc-by-4.0";

/// Landing-page prefixes that identify a DOI.
const DOI_PREFIXES: [&str; 2] = ["http://doi.org/", "https://doi.org/"];

/// Resource-type marker keyword, never a content keyword.
const DATASET_KEYWORD: &str = "Dataset";

/// Zenodo shows a single location best, so only the first point is kept.
const TRUNCATE_POINTS: bool = true;

/// A creator or contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  /// Name, in `Last, First` form where it could be normalized
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:             Option<String>,
  /// Organisation the person belongs to
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub affiliation:      Option<String>,
  /// Contributor type, never set for creators
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub contributor_type: Option<ContributorType>,
  /// ORCID iD without the resolver prefix
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub orcid:            Option<String>,
}

/// A point location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
  /// Latitude in decimal degrees
  pub lat:   f64,
  /// Longitude in decimal degrees
  pub lon:   f64,
  /// Place label
  pub place: String,
}

/// Kind of a [`DateRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateType {
  /// Period over which the data is valid
  Valid,
}

/// A date interval with calendar dates at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  /// First day of the range, `YYYY-MM-DD`
  pub start:      String,
  /// Last day of the range, `YYYY-MM-DD`
  pub end:        String,
  /// Range kind
  #[serde(rename = "type")]
  pub range_type: DateType,
}

/// The `metadata` object of a Zenodo deposit.
///
/// Construct it through the builder methods, starting from
/// [`DepositMetadata::new`], or let [`MetadataAssembler`] derive it from an
/// ISO record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositMetadata {
  /// Dataset title
  pub title:            Option<String>,
  /// Dataset abstract
  pub description:      Option<String>,
  /// Authors of the dataset
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub creators:         Vec<Person>,
  /// Zenodo upload type
  pub upload_type:      String,
  /// License identifier
  pub license:          String,
  /// DOI already registered for the dataset
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub doi:              Option<String>,
  /// Publication date, `YYYY-MM-DD`
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub publication_date: Option<String>,
  /// Support and metadata contacts
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub contributors:     Vec<Person>,
  /// Point locations
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub locations:        Vec<Location>,
  /// Validity periods
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub dates:            Vec<DateRange>,
  /// HTML notes describing extents that have no structured equivalent
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes:            Option<String>,
  /// Content keywords
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub keywords:         Vec<String>,
}

impl Default for DepositMetadata {
  fn default() -> Self {
    Self {
      title:            None,
      description:      None,
      creators:         Vec::new(),
      upload_type:      UPLOAD_TYPE.to_string(),
      license:          LICENSE.to_string(),
      doi:              None,
      publication_date: None,
      contributors:     Vec::new(),
      locations:        Vec::new(),
      dates:            Vec::new(),
      notes:            None,
      keywords:         Vec::new(),
    }
  }
}

impl DepositMetadata {
  /// Creates an empty record carrying only the fixed upload type and license.
  pub fn new() -> Self { Self::default() }

  /// Sets the title.
  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = Some(title.into());
    self
  }

  /// Sets the description.
  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Replaces the creators.
  pub fn with_creators(mut self, creators: Vec<Person>) -> Self {
    self.creators = creators;
    self
  }

  /// Sets the DOI.
  pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
    self.doi = Some(doi.into());
    self
  }

  /// Sets the publication date.
  ///
  /// # Arguments
  ///
  /// * `date` - Calendar date, any time component is dropped
  pub fn with_publication_date(mut self, date: &str) -> Self {
    self.publication_date = Some(truncate_to_date(date).to_string());
    self
  }

  /// Adds a contributor.
  pub fn with_contributor(mut self, contributor: Person) -> Self {
    self.contributors.push(contributor);
    self
  }

  /// Replaces the locations.
  pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
    self.locations = locations;
    self
  }

  /// Replaces the date ranges.
  pub fn with_dates(mut self, dates: Vec<DateRange>) -> Self {
    self.dates = dates;
    self
  }

  /// Sets the notes. Empty text leaves the notes unset.
  pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
    let notes = notes.into();
    self.notes = (!notes.is_empty()).then_some(notes);
    self
  }

  /// Replaces the keywords.
  pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
    self.keywords = keywords;
    self
  }
}

/// What to do when the support or metadata contact is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingContactPolicy {
  /// Log a warning and leave the contact out
  #[default]
  Omit,
  /// Abort assembly with [`DepositorError::MissingContact`]
  Fail,
}

/// Remaps a parsed ISO 19139 record into [`DepositMetadata`].
#[derive(Debug, Clone, Default)]
pub struct MetadataAssembler {
  /// Handling of absent forced-role contacts
  missing_contact_policy: MissingContactPolicy,
}

impl MetadataAssembler {
  /// Creates an assembler that omits missing contacts.
  pub fn new() -> Self { Self::default() }

  /// Sets how missing support or metadata contacts are handled.
  pub fn with_missing_contact_policy(mut self, policy: MissingContactPolicy) -> Self {
    self.missing_contact_policy = policy;
    self
  }

  /// Assembles the deposit metadata, resolving open-ended periods against the
  /// local clock.
  pub fn assemble(&self, document: &Document) -> Result<DepositMetadata> {
    self.assemble_at(document, Local::now().naive_local())
  }

  /// Assembles the deposit metadata as of `now`.
  ///
  /// # Arguments
  ///
  /// * `document` - Parsed ISO 19139 record
  /// * `now` - Time substituted for temporal extents that end `now`
  ///
  /// # Errors
  ///
  /// Returns [`DepositorError::MissingContact`] when a forced-role contact is
  /// absent under [`MissingContactPolicy::Fail`]. Absent optional fields are
  /// never an error.
  pub fn assemble_at(&self, document: &Document, now: NaiveDateTime) -> Result<DepositMetadata> {
    match document.text(DocumentField::FileIdentifier.path()) {
      Some(id) => info!("Assembling deposit metadata for {id}"),
      None => info!("Assembling deposit metadata for unidentified record"),
    }

    let mut metadata = DepositMetadata::new();
    metadata.title = document.text(DocumentField::Title.path());
    metadata.description = document.text(DocumentField::Abstract.path());
    if metadata.title.is_none() {
      warn!("Record has no title");
    }

    let creators: Vec<Person> =
      find_contacts_by_role(document, DocumentField::CitedContact, AUTHOR_ROLE)
        .iter()
        .map(|contact| project_to_person(contact, AUTHOR_ROLE))
        .collect();
    debug!("Found {} creators", creators.len());
    metadata = metadata.with_creators(creators);

    if let Some(doi) = document.text(DocumentField::LandingPage.path()).and_then(doi_from_landing_page)
    {
      debug!("Landing page is a DOI: {doi}");
      metadata = metadata.with_doi(doi);
    }

    if let Some(date) = document
      .text(DocumentField::PublicationDate.path())
      .or_else(|| document.text(DocumentField::PublicationDateTime.path()))
    {
      metadata = metadata.with_publication_date(&date);
    }

    for (field, forced) in [
      (DocumentField::SupportContact, ContributorType::ContactPerson),
      (DocumentField::MetadataContact, ContributorType::RelatedPerson),
    ] {
      if let Some(contact) = self.forced_contact(document, field, forced)? {
        metadata = metadata.with_contributor(contact);
      }
    }

    let (mut points, geographic_notes) = simplify_geographic_extents(document);
    if TRUNCATE_POINTS && points.len() > 1 {
      debug!("Keeping the first of {} points", points.len());
      points.truncate(1);
    }
    let (ranges, temporal_notes) = simplify_temporal_extents(document, now);
    let resolution_notes = simplify_spatial_resolutions(document);

    let keywords: Vec<String> = document
      .texts(DocumentField::Keyword.path())
      .into_iter()
      .filter(|keyword| !keyword.eq_ignore_ascii_case(DATASET_KEYWORD))
      .collect();

    let metadata = metadata
      .with_locations(points)
      .with_dates(ranges)
      .with_notes(geographic_notes + &temporal_notes + &resolution_notes)
      .with_keywords(keywords);
    trace!("Assembled metadata: {metadata:?}");
    Ok(metadata)
  }

  /// Looks up a forced-role contact and applies the missing-contact policy.
  fn forced_contact(
    &self,
    document: &Document,
    field: DocumentField,
    forced: ContributorType,
  ) -> Result<Option<Person>> {
    match first_match_with_forced_role(document, field, POINT_OF_CONTACT_ROLE, forced) {
      Some(person) => Ok(Some(person)),
      None => match self.missing_contact_policy {
        MissingContactPolicy::Omit => {
          warn!("No {POINT_OF_CONTACT_ROLE} found for {field:?}, omitting {forced:?} contributor");
          Ok(None)
        },
        MissingContactPolicy::Fail =>
          Err(DepositorError::MissingContact(format!("{POINT_OF_CONTACT_ROLE} ({field:?})"))),
      },
    }
  }
}

/// The landing page itself when it is a DOI link.
fn doi_from_landing_page(landing_page: String) -> Option<String> {
  DOI_PREFIXES.iter().any(|prefix| landing_page.starts_with(prefix)).then_some(landing_page)
}

/// Reads an ISO record from disk and assembles its deposit metadata.
pub fn extract_metadata(path: impl AsRef<Path>) -> Result<DepositMetadata> {
  let xml = read_record(path)?;
  MetadataAssembler::new().assemble(&Document::parse(&xml)?)
}
