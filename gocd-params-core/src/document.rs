//! Config document loading and XML navigation helpers.
//!
//! Subtrees can be written back out as markup with [`serialize_node`], which
//! works from the parsed values so character references come out decoded.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Edge, Node, NodeType, ParsingOptions};
use tracing::debug;

use crate::error::{IoResultExt, ParamsError, ParamsResult};

/// Root element of a GoCD config document.
pub const CRUISE_TAG: &str = "cruise";

/// Reads the whole config file into memory.
pub fn read_config(path: &Path) -> ParamsResult<String> {
    fs::read_to_string(path).with_path(path)
}

/// Parsed GoCD configuration document.
pub struct ConfigDocument<'input> {
    path: PathBuf,
    tree: Document<'input>,
}

impl<'input> ConfigDocument<'input> {
    /// Parse `source` as XML. `path` is only used for diagnostics.
    ///
    /// DTDs are accepted and nothing is validated against the GoCD schema.
    pub fn parse(path: impl Into<PathBuf>, source: &'input str) -> ParamsResult<Self> {
        let path = path.into();
        let mut options = ParsingOptions::default();
        options.allow_dtd = true;

        let tree = Document::parse_with_options(source, options).map_err(|e| {
            let pos = e.pos();
            ParamsError::parse_at(&path, e.to_string(), pos.row as usize, pos.col as usize)
        })?;

        debug!(path = %path.display(), nodes = tree.descendants().count(), "parsed config document");
        Ok(Self { path, tree })
    }

    /// Path the document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `<cruise>` element: the root element, or the first descendant
    /// with that name when the document wraps it.
    pub fn cruise(&self) -> ParamsResult<Node<'_, 'input>> {
        let root = self.tree.root_element();
        if root.tag_name().name() == CRUISE_TAG {
            return Ok(root);
        }
        descendants_named(root, CRUISE_TAG)
            .next()
            .ok_or_else(|| ParamsError::missing_element(CRUISE_TAG))
    }
}

/// Direct child elements of `node`, skipping text, comments and PIs.
pub fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

/// Descendant elements of `node` (not `node` itself) with exactly this tag,
/// in document order.
pub fn descendants_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants()
        .skip(1)
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

/// Concatenated text of every text node below `node`.
pub fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Writes `node` and its subtree back out as markup.
///
/// Attribute values and text are emitted from their parsed form, so `&#35;`
/// becomes `#` and `&amp;` round-trips as `&amp;`. Comments are kept and
/// line breaks inside text survive. Childless elements are self-closed.
pub fn serialize_node(node: Node<'_, '_>) -> String {
    let mut out = String::new();

    for edge in node.traverse() {
        match edge {
            Edge::Open(n) => match n.node_type() {
                NodeType::Element => {
                    out.push('<');
                    out.push_str(n.tag_name().name());
                    for attr in n.attributes() {
                        out.push(' ');
                        out.push_str(attr.name());
                        out.push_str("=\"");
                        escape_into(&mut out, attr.value(), true);
                        out.push('"');
                    }
                    out.push_str(if n.has_children() { ">" } else { "/>" });
                }
                NodeType::Text => escape_into(&mut out, n.text().unwrap_or_default(), false),
                NodeType::Comment => {
                    out.push_str("<!--");
                    out.push_str(n.text().unwrap_or_default());
                    out.push_str("-->");
                }
                NodeType::PI => {
                    if let Some(pi) = n.pi() {
                        out.push_str("<?");
                        out.push_str(pi.target);
                        if let Some(value) = pi.value {
                            out.push(' ');
                            out.push_str(value);
                        }
                        out.push_str("?>");
                    }
                }
                NodeType::Root => {}
            },
            Edge::Close(n) => {
                if n.is_element() && n.has_children() {
                    out.push_str("</");
                    out.push_str(n.tag_name().name());
                    out.push('>');
                }
            }
        }
    }

    out
}

fn escape_into(out: &mut String, value: &str, in_attribute: bool) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<cruise schemaVersion="139">
  <pipelines group="build">
    <pipeline name="compile">
      <params>
        <param name="VERSION">1.0</param>
      </params>
    </pipeline>
  </pipelines>
</cruise>"#;

    #[test]
    fn test_parse_and_locate_cruise() {
        let doc = ConfigDocument::parse("cruise-config.xml", SAMPLE).unwrap();
        let cruise = doc.cruise().unwrap();
        assert_eq!(cruise.attribute("schemaVersion"), Some("139"));
        assert_eq!(doc.path(), Path::new("cruise-config.xml"));
    }

    #[test]
    fn test_wrapped_cruise_is_found() {
        let xml = r#"<backup><cruise><pipelines group="g"/></cruise></backup>"#;
        let doc = ConfigDocument::parse("wrapped.xml", xml).unwrap();
        assert_eq!(doc.cruise().unwrap().tag_name().name(), "cruise");
    }

    #[test]
    fn test_missing_cruise() {
        let doc = ConfigDocument::parse("other.xml", "<server><pipelines/></server>").unwrap();
        let err = doc.cruise().unwrap_err();
        assert!(matches!(err, ParamsError::MissingElement { ref element } if element == "cruise"));
    }

    #[test]
    fn test_malformed_xml_has_location() {
        let err = ConfigDocument::parse("broken.xml", "<cruise>\n  <pipelines>\n</cruise>")
            .err()
            .unwrap();
        match err {
            ParamsError::Parse { path, line, .. } => {
                assert_eq!(path, PathBuf::from("broken.xml"));
                assert!(line.is_some());
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_serialize_node_element_text() {
        let doc = ConfigDocument::parse("cruise-config.xml", SAMPLE).unwrap();
        let param = descendants_named(doc.cruise().unwrap(), "param").next().unwrap();
        assert_eq!(serialize_node(param), r#"<param name="VERSION">1.0</param>"#);
    }

    #[test]
    fn test_serialize_node_decodes_references() {
        let xml = r#"<tasks><exec args="&#35;{A} &quot;x&quot;"><!-- keep --><arg>a &amp;&#x23;{B}</arg><runif status="any"/></exec></tasks>"#;
        let doc = ConfigDocument::parse("cruise-config.xml", xml).unwrap();
        let exec = descendants_named(doc.tree.root_element(), "exec").next().unwrap();
        assert_eq!(
            serialize_node(exec),
            r##"<exec args="#{A} &quot;x&quot;"><!-- keep --><arg>a &amp;#{B}</arg><runif status="any"/></exec>"##
        );
    }

    #[test]
    fn test_serialize_node_keeps_line_breaks() {
        let doc = ConfigDocument::parse("cruise-config.xml", "<exec>\n  <arg>x</arg>\n</exec>").unwrap();
        let text = serialize_node(doc.tree.root_element());
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_text_content_and_children() {
        let doc = ConfigDocument::parse("cruise-config.xml", SAMPLE).unwrap();
        let cruise = doc.cruise().unwrap();
        let groups: Vec<_> = child_elements(cruise).collect();
        assert_eq!(groups.len(), 1);
        let param = descendants_named(cruise, "param").next().unwrap();
        assert_eq!(text_content(param), "1.0");
    }

    #[test]
    fn test_read_config_missing_file() {
        let err = read_config(Path::new("/definitely/not/here/cruise-config.xml")).unwrap_err();
        assert!(matches!(err, ParamsError::Io { .. }));
    }
}
