//! Where each piece of metadata lives inside an ISO 19139 record.
//!
//! Fields come in two tiers. [`DocumentField`] paths are absolute and locate
//! a node (or node-set) from the record root. [`ContactField`] paths are
//! relative and locate sub-fields below a node returned by a document field,
//! such as the name inside a responsible party or the edges of a bounding box.
//!
//! Both tiers are closed enums, so every field the assembler asks for is known
//! at compile time.

use super::*;

/// Common prefix of everything below the data identification section.
macro_rules! identification {
  ($rest:literal) => {
    concat!("/gmd:MD_Metadata/gmd:identificationInfo/gmd:MD_DataIdentification/", $rest)
  };
}

/// Declares a field enum together with its path table and a list of every
/// variant, so the three can never drift apart.
macro_rules! field_table {
  (
    $(#[$meta:meta])*
    $vis:vis enum $name:ident {
      $(
        $(#[$variant_meta:meta])*
        $variant:ident => $path:expr,
      )+
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    $vis enum $name {
      $(
        $(#[$variant_meta])*
        $variant,
      )+
    }

    impl $name {
      /// Every field, in declaration order.
      pub const ALL: &'static [Self] = &[$(Self::$variant),+];

      /// Path expression for this field.
      pub fn path(self) -> &'static str {
        match self {
          $(Self::$variant => $path,)+
        }
      }
    }
  };
}

field_table! {
  /// Document-level fields, located from the record root.
  pub enum DocumentField {
    /// Record identifier, used to label log output
    FileIdentifier => "/gmd:MD_Metadata/gmd:fileIdentifier/gco:CharacterString",
    /// Citation title
    Title => identification!("gmd:citation/gmd:CI_Citation/gmd:title/gco:CharacterString"),
    /// Dataset abstract
    Abstract => identification!("gmd:abstract/gco:CharacterString"),
    /// Landing page URI, which may be a DOI link
    LandingPage => "/gmd:MD_Metadata/gmd:dataSetURI/gco:CharacterString",
    /// Citation date given as a plain date
    PublicationDate =>
      identification!("gmd:citation/gmd:CI_Citation/gmd:date/gmd:CI_Date/gmd:date/gco:Date"),
    /// Citation date given with a time component
    PublicationDateTime =>
      identification!("gmd:citation/gmd:CI_Citation/gmd:date/gmd:CI_Date/gmd:date/gco:DateTime"),
    /// Responsible parties cited for the resource
    CitedContact => identification!(
      "gmd:citation/gmd:CI_Citation/gmd:citedResponsibleParty/gmd:CI_ResponsibleParty"
    ),
    /// Points of contact for the resource itself
    SupportContact => identification!("gmd:pointOfContact/gmd:CI_ResponsibleParty"),
    /// Points of contact for the metadata record
    MetadataContact => "/gmd:MD_Metadata/gmd:contact/gmd:CI_ResponsibleParty",
    /// Geographic bounding boxes
    GeographicExtent => identification!(
      "gmd:extent/gmd:EX_Extent/gmd:geographicElement/gmd:EX_GeographicBoundingBox"
    ),
    /// Temporal extents, each wrapping a `gml:TimePeriod`
    TemporalExtent => identification!(
      "gmd:extent/gmd:EX_Extent/gmd:temporalElement/gmd:EX_TemporalExtent/gmd:extent"
    ),
    /// Spatial resolution distances
    SpatialResolution =>
      identification!("gmd:spatialResolution/gmd:MD_Resolution/gmd:distance/gco:Distance"),
    /// Descriptive keywords
    Keyword =>
      identification!("gmd:descriptiveKeywords/gmd:MD_Keywords/gmd:keyword/gco:CharacterString"),
  }
}

field_table! {
  /// Element-relative fields, located from a node found through a [`DocumentField`].
  pub enum ContactField {
    /// Plain individual name
    IndividualName => "gmd:individualName/gco:CharacterString",
    /// Individual name carried by an identifier-bearing anchor
    IndividualNameAnchor => "gmd:individualName/gmx:Anchor",
    /// Organisation of the party
    OrganisationName => "gmd:organisationName/gco:CharacterString",
    /// Role code element, whose `codeListValue` holds the role
    RoleCode => "gmd:role/gmd:CI_RoleCode",
    /// Western edge of a bounding box
    WestBound => "gmd:westBoundLongitude/gco:Decimal",
    /// Eastern edge of a bounding box
    EastBound => "gmd:eastBoundLongitude/gco:Decimal",
    /// Southern edge of a bounding box
    SouthBound => "gmd:southBoundLatitude/gco:Decimal",
    /// Northern edge of a bounding box
    NorthBound => "gmd:northBoundLatitude/gco:Decimal",
    /// Start of a temporal extent
    ExtentBegin => "gml:TimePeriod/gml:beginPosition",
    /// End of a temporal extent
    ExtentEnd => "gml:TimePeriod/gml:endPosition",
  }
}

/// Contributor types understood by Zenodo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributorType {
  /// Person to contact about the dataset
  ContactPerson,
  /// Person who collected the data
  DataCollector,
  /// Person responsible for maintaining the data
  DataManager,
  /// Organisation distributing the data
  Distributor,
  /// Producer of the dataset
  Producer,
  /// Leader of the project the data belongs to
  ProjectLeader,
  /// Person related to the dataset in some other capacity
  RelatedPerson,
  /// Holder of the rights to the data
  RightsHolder,
  /// Any role without a closer match
  Other,
}

/// ISO 19139 `CI_RoleCode` values and their Zenodo contributor type.
///
/// `author` has no contributor type because authors become creators.
pub const ROLE_CODES: &[(&str, Option<ContributorType>)] = &[
  ("author", None),
  ("resourceProvider", Some(ContributorType::Distributor)),
  ("custodian", Some(ContributorType::DataManager)),
  ("owner", Some(ContributorType::RightsHolder)),
  ("user", Some(ContributorType::Other)),
  ("distributor", Some(ContributorType::Distributor)),
  ("originator", Some(ContributorType::DataCollector)),
  ("pointOfContact", Some(ContributorType::ContactPerson)),
  ("principalInvestigator", Some(ContributorType::ProjectLeader)),
  ("processor", Some(ContributorType::Other)),
  ("publisher", Some(ContributorType::Producer)),
];

impl ContributorType {
  /// Translates an ISO role code.
  ///
  /// Returns `None` for `author`; codes outside the vocabulary map to [`Self::Other`].
  pub fn from_role_code(code: &str) -> Option<Self> {
    match ROLE_CODES.iter().find(|(iso, _)| *iso == code) {
      Some((_, target)) => *target,
      None => Some(Self::Other),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn test_every_field_has_its_own_path() {
    let document_paths: HashSet<_> = DocumentField::ALL.iter().map(|field| field.path()).collect();
    assert_eq!(document_paths.len(), DocumentField::ALL.len());
    assert!(DocumentField::ALL.contains(&DocumentField::Keyword));

    let contact_paths: HashSet<_> = ContactField::ALL.iter().map(|field| field.path()).collect();
    assert_eq!(contact_paths.len(), ContactField::ALL.len());
    assert!(ContactField::ALL.contains(&ContactField::ExtentEnd));
  }

  #[test]
  fn test_document_paths_are_absolute_and_bound() {
    for &field in DocumentField::ALL {
      let path = field.path();
      assert!(path.starts_with("/gmd:MD_Metadata/"), "{field:?} is not absolute: {path}");
      for step in path.trim_start_matches('/').split('/') {
        let (prefix, _) = step.split_once(':').expect("every step is prefixed");
        xml::namespace_uri(prefix);
      }
    }
  }

  #[test]
  fn test_contact_paths_are_relative_and_bound() {
    for &field in ContactField::ALL {
      let path = field.path();
      assert!(!path.starts_with('/'), "{field:?} is not relative: {path}");
      for step in path.split('/') {
        let (prefix, _) = step.split_once(':').expect("every step is prefixed");
        xml::namespace_uri(prefix);
      }
    }
  }

  #[test]
  fn test_role_code_translation() {
    assert_eq!(ContributorType::from_role_code("author"), None);
    assert_eq!(
      ContributorType::from_role_code("pointOfContact"),
      Some(ContributorType::ContactPerson)
    );
    assert_eq!(
      ContributorType::from_role_code("principalInvestigator"),
      Some(ContributorType::ProjectLeader)
    );
    assert_eq!(ContributorType::from_role_code("collaborator"), Some(ContributorType::Other));
  }

  #[test]
  fn test_contributor_type_serializes_to_zenodo_label() {
    let json = serde_json::to_string(&ContributorType::RelatedPerson).unwrap();
    assert_eq!(json, "\"RelatedPerson\"");
  }
}
