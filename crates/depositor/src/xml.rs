//! Namespace-aware path queries over a parsed XML record.
//!
//! ISO 19139 records are deeply nested and heavily namespaced, and the
//! remapping rules need to query them from the root as well as relative to
//! individual contact or extent elements. Parsing is left to [`roxmltree`],
//! which resolves every element and attribute name to a namespace URI and a
//! local name, so the prefixes chosen by whoever wrote the file do not matter.
//!
//! Path expressions are `/`-separated `prefix:local` steps, bound through
//! [`ISO_NAMESPACES`]. A leading `/` anchors the path at the root element.
//!
//! # Examples
//!
//! ```
//! use depositor::xml::Document;
//!
//! let document = Document::parse(
//!   r#"<gmd:MD_Metadata xmlns:gmd="http://www.isotc211.org/2005/gmd"
//!                       xmlns:gco="http://www.isotc211.org/2005/gco">
//!        <gmd:fileIdentifier><gco:CharacterString>abc</gco:CharacterString></gmd:fileIdentifier>
//!      </gmd:MD_Metadata>"#,
//! )?;
//!
//! let id = document.text("/gmd:MD_Metadata/gmd:fileIdentifier/gco:CharacterString");
//! assert_eq!(id.as_deref(), Some("abc"));
//! # Ok::<(), depositor::error::DepositorError>(())
//! ```

use roxmltree::ParsingOptions;

use super::*;

/// Namespace prefixes usable in path expressions.
pub const ISO_NAMESPACES: &[(&str, &str)] = &[
  ("gmd", "http://www.isotc211.org/2005/gmd"),
  ("gco", "http://www.isotc211.org/2005/gco"),
  ("gml", "http://www.opengis.net/gml"),
  ("gmx", "http://www.isotc211.org/2005/gmx"),
  ("xlink", "http://www.w3.org/1999/xlink"),
];

/// Namespace URIs treated as equivalent to one of [`ISO_NAMESPACES`].
///
/// Records written against GML 3.2 use a versioned URI for the same elements.
const NAMESPACE_ALIASES: &[(&str, &str)] =
  &[("http://www.opengis.net/gml/3.2", "http://www.opengis.net/gml")];

/// Looks up the namespace URI bound to `prefix`.
///
/// # Panics
///
/// Path expressions are static, so an unbound prefix is a programming error.
pub fn namespace_uri(prefix: &str) -> &'static str {
  ISO_NAMESPACES
    .iter()
    .find(|(bound, _)| *bound == prefix)
    .map(|(_, uri)| *uri)
    .unwrap_or_else(|| panic!("unbound namespace prefix `{prefix}` in path expression"))
}

/// Folds aliased namespace URIs onto their canonical form.
fn canonical_namespace(uri: &str) -> &str {
  NAMESPACE_ALIASES.iter().find(|(alias, _)| *alias == uri).map_or(uri, |(_, canonical)| *canonical)
}

/// One `prefix:local` (or bare `local`) step of a path expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step<'p> {
  /// Namespace URI bound to the prefix, `None` for a bare name
  namespace: Option<&'static str>,
  /// Local part of the name
  local:     &'p str,
}

impl<'p> Step<'p> {
  /// Parses a step, resolving its prefix through [`ISO_NAMESPACES`].
  fn parse(step: &'p str) -> Self {
    match step.split_once(':') {
      Some((prefix, local)) => Self { namespace: Some(namespace_uri(prefix)), local },
      None => Self { namespace: None, local: step },
    }
  }

  /// Whether a resolved `(namespace, local)` name matches this step.
  fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
    self.local == local && self.namespace == namespace.map(canonical_namespace)
  }
}

/// Reads an XML record from disk.
///
/// The returned text is what [`Document::parse`] borrows from.
pub fn read_record(path: impl AsRef<Path>) -> Result<String> {
  let path = path.as_ref();
  debug!("Reading XML document from {}", path.display());
  Ok(std::fs::read_to_string(path)?)
}

/// A parsed XML document borrowing from its source text.
#[derive(Debug)]
pub struct Document<'input> {
  /// Parsed tree
  tree: roxmltree::Document<'input>,
}

/// A borrowed handle to one element of a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a, 'input> {
  /// Underlying tree node, always an element
  node: roxmltree::Node<'a, 'input>,
}

impl<'input> Document<'input> {
  /// Parses an XML string into a document tree.
  ///
  /// A leading byte order mark is ignored and document type declarations are
  /// accepted.
  ///
  /// # Errors
  ///
  /// Returns [`DepositorError::EmptyDocument`] when no element is present and
  /// [`DepositorError::Xml`] for any other malformed markup.
  pub fn parse(xml: &'input str) -> Result<Self> {
    let options = ParsingOptions { allow_dtd: true, ..ParsingOptions::default() };
    let tree = roxmltree::Document::parse_with_options(xml.trim_start_matches('\u{feff}'), options)
      .map_err(|e| match e {
        roxmltree::Error::NoRootNode => DepositorError::EmptyDocument,
        e => DepositorError::Xml(e),
      })?;
    trace!("Parsed XML document with {} nodes", tree.descendants().count());
    Ok(Self { tree })
  }

  /// The root element.
  pub fn root(&self) -> Node<'_, 'input> { Node { node: self.tree.root_element() } }

  /// All elements matching `path`, queried from the root.
  pub fn select(&self, path: &str) -> Vec<Node<'_, 'input>> { self.root().select(path) }

  /// The first element matching `path`, queried from the root.
  pub fn first(&self, path: &str) -> Option<Node<'_, 'input>> { self.root().first(path) }

  /// Text of the first element matching `path`, queried from the root.
  pub fn text(&self, path: &str) -> Option<String> { self.root().text(path) }

  /// Non-empty texts of every element matching `path`, queried from the root.
  pub fn texts(&self, path: &str) -> Vec<String> { self.root().texts(path) }
}

impl<'a, 'input> Node<'a, 'input> {
  /// Whether this element's resolved name matches `step`.
  fn is(&self, step: &Step) -> bool {
    let name = self.node.tag_name();
    step.matches(name.namespace(), name.name())
  }

  /// Child elements in document order.
  fn children(&self) -> impl Iterator<Item = Node<'a, 'input>> {
    self.node.children().filter(roxmltree::Node::is_element).map(|node| Node { node })
  }

  /// Trimmed character data of this element, `None` when empty.
  pub fn value(&self) -> Option<&'a str> {
    self.node.text().map(str::trim).filter(|text| !text.is_empty())
  }

  /// Value of the attribute named `prefix:local` (or bare `local`).
  pub fn attribute(&self, name: &str) -> Option<&'a str> {
    let wanted = Step::parse(name);
    self
      .node
      .attributes()
      .find(|attribute| wanted.matches(attribute.namespace(), attribute.name()))
      .map(|attribute| attribute.value())
  }

  /// All elements matching `path`.
  ///
  /// Relative paths start from this node's children, absolute paths from the
  /// document root regardless of which node they are issued on.
  pub fn select(&self, path: &str) -> Vec<Node<'a, 'input>> {
    let (absolute, steps) = match path.strip_prefix('/') {
      Some(rest) => (true, rest),
      None => (false, path),
    };
    let mut steps = steps.split('/').filter(|step| !step.is_empty()).map(Step::parse);

    let mut current = if absolute {
      let root = Node { node: self.node.document().root_element() };
      match steps.next() {
        Some(first) if root.is(&first) => vec![root],
        Some(_) => return Vec::new(),
        None => vec![root],
      }
    } else {
      vec![*self]
    };

    for step in steps {
      current = current.iter().flat_map(Node::children).filter(|child| child.is(&step)).collect();
      if current.is_empty() {
        break;
      }
    }
    current
  }

  /// The first element matching `path`.
  pub fn first(&self, path: &str) -> Option<Node<'a, 'input>> { self.select(path).into_iter().next() }

  /// Text of the first element matching `path`.
  ///
  /// Empty or whitespace-only text counts as absent.
  pub fn text(&self, path: &str) -> Option<String> {
    self.first(path).and_then(|node| node.value()).map(str::to_string)
  }

  /// Non-empty texts of every element matching `path`, in document order.
  pub fn texts(&self, path: &str) -> Vec<String> {
    self.select(path).iter().filter_map(Node::value).map(str::to_string).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const RECORD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<iso:MD_Metadata xmlns:iso="http://www.isotc211.org/2005/gmd"
                 xmlns:c="http://www.isotc211.org/2005/gco"
                 xmlns:xl="http://www.w3.org/1999/xlink">
  <iso:contact>
    <iso:CI_ResponsibleParty>
      <iso:individualName><c:CharacterString>Jane Doe</c:CharacterString></iso:individualName>
      <iso:role><iso:CI_RoleCode codeList="x" codeListValue="pointOfContact"/></iso:role>
    </iso:CI_ResponsibleParty>
  </iso:contact>
  <iso:contact>
    <iso:CI_ResponsibleParty>
      <iso:individualName><c:CharacterString>  </c:CharacterString></iso:individualName>
      <iso:onlineResource xl:href="https://example.org/a &amp; b"/>
    </iso:CI_ResponsibleParty>
  </iso:contact>
  <iso:abstract><c:CharacterString><![CDATA[5 < 6]]></c:CharacterString></iso:abstract>
</iso:MD_Metadata>"#;

  #[test]
  fn test_prefixes_are_resolved_by_namespace() {
    let document = Document::parse(RECORD).unwrap();
    let parties = document.select("/gmd:MD_Metadata/gmd:contact/gmd:CI_ResponsibleParty");
    assert_eq!(parties.len(), 2);
    // The same local name in another namespace does not match
    assert!(document.select("/gmx:MD_Metadata").is_empty());
  }

  #[test]
  fn test_relative_queries_from_node() {
    let document = Document::parse(RECORD).unwrap();
    let parties = document.select("/gmd:MD_Metadata/gmd:contact/gmd:CI_ResponsibleParty");

    assert_eq!(
      parties[0].text("gmd:individualName/gco:CharacterString").as_deref(),
      Some("Jane Doe")
    );
    // Whitespace-only text is absent
    assert_eq!(parties[1].text("gmd:individualName/gco:CharacterString"), None);

    let role = parties[0].first("gmd:role/gmd:CI_RoleCode").unwrap();
    assert_eq!(role.attribute("codeListValue"), Some("pointOfContact"));
    assert_eq!(role.value(), None);
  }

  #[test]
  fn test_absolute_query_from_child_uses_root() {
    let document = Document::parse(RECORD).unwrap();
    let party = document.first("/gmd:MD_Metadata/gmd:contact/gmd:CI_ResponsibleParty").unwrap();
    assert_eq!(party.select("/gmd:MD_Metadata/gmd:contact").len(), 2);
    assert!(party.select("/gmd:contact").is_empty());
  }

  #[test]
  fn test_attributes_and_escapes() {
    let document = Document::parse(RECORD).unwrap();
    let link = document
      .first("/gmd:MD_Metadata/gmd:contact/gmd:CI_ResponsibleParty/gmd:onlineResource")
      .unwrap();
    assert_eq!(link.attribute("xlink:href"), Some("https://example.org/a & b"));
    assert_eq!(link.attribute("href"), None);
    assert_eq!(document.text("/gmd:MD_Metadata/gmd:abstract/gco:CharacterString").unwrap(), "5 < 6");
  }

  #[test]
  fn test_texts_skips_empty_values() {
    let document = Document::parse(RECORD).unwrap();
    let names = document.texts(
      "/gmd:MD_Metadata/gmd:contact/gmd:CI_ResponsibleParty/gmd:individualName/gco:CharacterString",
    );
    assert_eq!(names, vec!["Jane Doe".to_string()]);
  }

  #[test]
  fn test_gml_32_namespace_is_folded() {
    let document = Document::parse(
      r#"<gml:TimePeriod xmlns:gml="http://www.opengis.net/gml/3.2">
           <gml:beginPosition>2020-01-01</gml:beginPosition>
         </gml:TimePeriod>"#,
    )
    .unwrap();
    assert_eq!(document.text("/gml:TimePeriod/gml:beginPosition").as_deref(), Some("2020-01-01"));
  }

  #[test]
  fn test_byte_order_mark_and_character_references() {
    let document = Document::parse(
      "\u{feff}<gco:CharacterString xmlns:gco=\"http://www.isotc211.org/2005/gco\">A &amp; B \
       &#233;t&#xE9; C</gco:CharacterString>",
    )
    .unwrap();
    assert_eq!(document.text("/gco:CharacterString").as_deref(), Some("A & B été C"));
  }

  #[test]
  fn test_malformed_and_empty_documents() {
    assert!(matches!(Document::parse("<a><b></a>"), Err(DepositorError::Xml(_))));
    assert!(matches!(Document::parse("   "), Err(DepositorError::EmptyDocument)));
  }

  #[test]
  fn test_read_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("record.xml");
    std::fs::write(&path, RECORD).unwrap();

    let xml = read_record(&path).unwrap();
    let document = Document::parse(&xml).unwrap();
    assert_eq!(document.select("/gmd:MD_Metadata/gmd:contact").len(), 2);
    assert!(matches!(read_record(dir.path().join("missing.xml")), Err(DepositorError::Io(_))));
  }

  #[test]
  #[should_panic(expected = "unbound namespace prefix")]
  fn test_unbound_prefix_panics() {
    let document = Document::parse(RECORD).unwrap();
    document.select("/srv:MD_Metadata");
  }
}
