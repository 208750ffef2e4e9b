//! Responsible-party extraction.
//!
//! Contacts in an ISO record are `gmd:CI_ResponsibleParty` elements tagged
//! with a `gmd:CI_RoleCode`. Zenodo wants flat people instead, so contacts are
//! first filtered by role and then projected into [`Person`] values.

use super::*;

lazy_static! {
  /// `First Last`
  static ref FIRST_LAST: Regex = Regex::new(r"^(\S+)\s+(\S+)$").unwrap();
  /// `First M. Last`
  static ref FIRST_INITIAL_LAST: Regex = Regex::new(r"^(\S+)\s+(\S\.)\s+(\S+)$").unwrap();
}

/// Role code marking the creators of a dataset.
pub const AUTHOR_ROLE: &str = "author";

/// Role code shared by the support and metadata contacts.
pub const POINT_OF_CONTACT_ROLE: &str = "pointOfContact";

/// Contacts under `field` whose role code equals `role`, in document order.
///
/// The comparison is exact and case-sensitive against the first role code of
/// each contact.
pub fn find_contacts_by_role<'a, 'input>(
  document: &'a Document<'input>,
  field: DocumentField,
  role: &str,
) -> Vec<Node<'a, 'input>> {
  document
    .select(field.path())
    .into_iter()
    .filter(|contact| role_code(contact).is_some_and(|code| code == role))
    .collect()
}

/// The coded value of a contact's role, falling back to the element text.
fn role_code<'a>(contact: &Node<'a, '_>) -> Option<&'a str> {
  let code = contact.first(ContactField::RoleCode.path())?;
  code.attribute("codeListValue").filter(|value| !value.trim().is_empty()).or_else(|| code.value())
}

/// Projects a responsible party into a [`Person`].
///
/// Authors never carry a contributor type, every other role is translated
/// through [`ROLE_CODES`]. Sub-fields missing from the contact are left out.
pub fn project_to_person(contact: &Node, role: &str) -> Person {
  let anchor = contact.first(ContactField::IndividualNameAnchor.path());

  let name = contact
    .text(ContactField::IndividualName.path())
    .or_else(|| anchor.and_then(|anchor| anchor.value()).map(str::to_string))
    .map(|name| normalize_name(&name));

  let orcid = anchor.and_then(|anchor| anchor.attribute("xlink:href")).and_then(orcid_from_url);

  let affiliation = contact.text(ContactField::OrganisationName.path());

  let contributor_type = if role == AUTHOR_ROLE {
    None
  } else {
    role_code(contact).and_then(ContributorType::from_role_code)
  };

  Person { name, affiliation, contributor_type, orcid }
}

/// The first contact matching `role`, with its contributor type overwritten.
///
/// Returns `None` when no contact under `field` has that role.
pub fn first_match_with_forced_role(
  document: &Document,
  field: DocumentField,
  role: &str,
  forced: ContributorType,
) -> Option<Person> {
  let contact = find_contacts_by_role(document, field, role).into_iter().next()?;
  let mut person = project_to_person(&contact, role);
  person.contributor_type = Some(forced);
  Some(person)
}

/// Rewrites `First Last` and `First M. Last` into `Last, First` form.
///
/// Names that already contain a comma, or that have any other shape
/// (single words, particles, suffixes, four or more words), are returned
/// unchanged.
pub fn normalize_name(name: &str) -> String {
  let trimmed = name.trim();
  if trimmed.contains(',') {
    return trimmed.to_string();
  }
  if let Some(caps) = FIRST_LAST.captures(trimmed) {
    return format!("{}, {}", &caps[2], &caps[1]);
  }
  if let Some(caps) = FIRST_INITIAL_LAST.captures(trimmed) {
    return format!("{}, {} {}", &caps[3], &caps[1], &caps[2]);
  }
  trimmed.to_string()
}

/// Last path segment of an identifier link, e.g. an ORCID iD.
fn orcid_from_url(url: &str) -> Option<String> {
  url.trim().trim_end_matches('/').rsplit('/').next().filter(|id| !id.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
  use super::*;

  const CONTACTS: &str = include_str!("../../tests/data/contacts.xml");

  #[test]
  fn test_normalize_name() {
    assert_eq!(normalize_name("John Doe"), "Doe, John");
    assert_eq!(normalize_name("Jane L. Plain"), "Plain, Jane L.");
    assert_eq!(normalize_name("Doe, John"), "Doe, John");
    assert_eq!(normalize_name("Madonna"), "Madonna");
    assert_eq!(normalize_name("A B C D"), "A B C D");
    // Middle token must be a single initial
    assert_eq!(normalize_name("Maria de Souza"), "Maria de Souza");
    assert_eq!(normalize_name("  John   Doe "), "Doe, John");
  }

  #[test]
  fn test_orcid_from_url() {
    assert_eq!(
      orcid_from_url("https://orcid.org/0000-0002-1825-0097").as_deref(),
      Some("0000-0002-1825-0097")
    );
    assert_eq!(
      orcid_from_url("https://orcid.org/0000-0002-1825-0097/").as_deref(),
      Some("0000-0002-1825-0097")
    );
    assert_eq!(orcid_from_url(""), None);
  }

  #[test]
  fn test_find_contacts_by_role_preserves_order() {
    let document = Document::parse(CONTACTS).unwrap();
    let authors = find_contacts_by_role(&document, DocumentField::CitedContact, AUTHOR_ROLE);
    let names: Vec<_> = authors
      .iter()
      .map(|contact| contact.text(ContactField::IndividualName.path()).unwrap_or_default())
      .collect();
    assert_eq!(names, vec!["John Doe", ""]);

    // Exact, case-sensitive match only
    assert!(find_contacts_by_role(&document, DocumentField::CitedContact, "Author").is_empty());
  }

  #[test]
  fn test_author_projection_has_no_type() {
    let document = Document::parse(CONTACTS).unwrap();
    let people: Vec<_> = find_contacts_by_role(&document, DocumentField::CitedContact, AUTHOR_ROLE)
      .iter()
      .map(|contact| project_to_person(contact, AUTHOR_ROLE))
      .collect();

    assert_eq!(people[0], Person {
      name:             Some("Doe, John".to_string()),
      affiliation:      Some("University of Somewhere".to_string()),
      contributor_type: None,
      orcid:            None,
    });

    // Anchor-only name with ORCID link, no organisation
    assert_eq!(people[1], Person {
      name:             Some("Plain, Jane L.".to_string()),
      affiliation:      None,
      contributor_type: None,
      orcid:            Some("0000-0002-1825-0097".to_string()),
    });

    let json = serde_json::to_value(&people[1]).unwrap();
    assert!(json.get("type").is_none());
    assert!(json.get("affiliation").is_none());
  }

  #[test]
  fn test_other_roles_are_translated() {
    let document = Document::parse(CONTACTS).unwrap();
    let investigators =
      find_contacts_by_role(&document, DocumentField::CitedContact, "principalInvestigator");
    assert_eq!(investigators.len(), 1);
    let person = project_to_person(&investigators[0], "principalInvestigator");
    assert_eq!(person.contributor_type, Some(ContributorType::ProjectLeader));
    assert_eq!(person.name.as_deref(), Some("Public, Jane Q."));
  }

  #[test]
  fn test_forced_role_on_same_contact() {
    let document = Document::parse(CONTACTS).unwrap();
    let support = first_match_with_forced_role(
      &document,
      DocumentField::SupportContact,
      POINT_OF_CONTACT_ROLE,
      ContributorType::ContactPerson,
    )
    .unwrap();
    let related = first_match_with_forced_role(
      &document,
      DocumentField::SupportContact,
      POINT_OF_CONTACT_ROLE,
      ContributorType::RelatedPerson,
    )
    .unwrap();

    assert_eq!(support.name, related.name);
    assert_eq!(support.contributor_type, Some(ContributorType::ContactPerson));
    assert_eq!(related.contributor_type, Some(ContributorType::RelatedPerson));
  }

  #[test]
  fn test_forced_role_without_match() {
    let document = Document::parse(CONTACTS).unwrap();
    let missing = first_match_with_forced_role(
      &document,
      DocumentField::MetadataContact,
      POINT_OF_CONTACT_ROLE,
      ContributorType::RelatedPerson,
    );
    assert!(missing.is_none());
  }
}
