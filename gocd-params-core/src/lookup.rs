//! Template and pipeline lookup tables.
//!
//! Both tables are built once from the `<cruise>` element and only read
//! afterwards. Pipeline definitions are recognised with a substring match on
//! the tag name (see [`tag_name_contains`]), so any element whose tag
//! contains "pipeline" counts as one, not only `<pipeline>` itself.

use std::collections::HashMap;

use roxmltree::Node;
use tracing::{debug, warn};

use crate::document::{child_elements, descendants_named, ConfigDocument};
use crate::error::ParamsResult;

/// Substring every pipeline-definition tag must contain.
pub const PIPELINE_TAG_FRAGMENT: &str = "pipeline";

/// Builds the composite lookup key for a pipeline.
///
/// This is the only way keys are formed; lookups must go through it too.
pub fn pipeline_key(group: &str, name: &str) -> String {
    format!("{}_{}", group, name)
}

/// True if `node` is an element whose local tag name contains `needle`.
///
/// Deliberately loose: `<pipeline>`, `<pipelineTemplate>` and
/// `<notapipeline>` all match "pipeline".
pub fn tag_name_contains(node: Node<'_, '_>, needle: &str) -> bool {
    node.is_element() && node.tag_name().name().contains(needle)
}

/// Direct children of `container` that look like pipeline definitions.
fn pipeline_children<'a, 'input: 'a>(
    container: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    child_elements(container).filter(|n| tag_name_contains(*n, PIPELINE_TAG_FRAGMENT))
}

/// Template name → `<pipeline>` subtree under `<templates>`.
#[derive(Debug, Default)]
pub struct TemplateMap<'a, 'input> {
    entries: HashMap<String, Node<'a, 'input>>,
}

impl<'a, 'input> TemplateMap<'a, 'input> {
    /// Look up a template by name.
    pub fn get(&self, name: &str) -> Option<Node<'a, 'input>> {
        self.entries.get(name).copied()
    }

}

/// Composite key (`group_name`) → pipeline subtree.
#[derive(Debug, Default)]
pub struct PipelineMap<'a, 'input> {
    entries: HashMap<String, Node<'a, 'input>>,
}

impl<'a, 'input> PipelineMap<'a, 'input> {
    /// Look up a pipeline by composite key.
    pub fn get(&self, key: &str) -> Option<Node<'a, 'input>> {
        self.entries.get(key).copied()
    }

    /// All composite keys, sorted. Used for not-found diagnostics.
    pub fn known_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Builds the template map from the first `<templates>` block.
///
/// A document without templates yields an empty map.
pub fn build_template_map<'a, 'input>(
    doc: &'a ConfigDocument<'input>,
) -> ParamsResult<TemplateMap<'a, 'input>> {
    let cruise = doc.cruise()?;
    let mut map = TemplateMap::default();

    let Some(templates) = descendants_named(cruise, "templates").next() else {
        debug!("no <templates> block in config");
        return Ok(map);
    };

    for template in pipeline_children(templates) {
        match template.attribute("name") {
            Some(name) => {
                map.entries.insert(name.to_string(), template);
            }
            None => warn!(
                tag = template.tag_name().name(),
                "template definition without a name attribute, skipping"
            ),
        }
    }

    debug!(count = map.entries.len(), "built template map");
    Ok(map)
}

/// Builds the pipeline map from every `<pipelines group="...">` block.
///
/// `<pipelines>` elements without a `group` attribute are ignored.
pub fn build_pipeline_map<'a, 'input>(
    doc: &'a ConfigDocument<'input>,
) -> ParamsResult<PipelineMap<'a, 'input>> {
    let cruise = doc.cruise()?;
    let mut map = PipelineMap::default();

    for group_node in descendants_named(cruise, "pipelines") {
        let Some(group) = group_node.attribute("group") else {
            continue;
        };

        for pipeline in pipeline_children(group_node) {
            match pipeline.attribute("name") {
                Some(name) => {
                    map.entries.insert(pipeline_key(group, name), pipeline);
                }
                None => warn!(
                    group = group,
                    tag = pipeline.tag_name().name(),
                    "pipeline definition without a name attribute, skipping"
                ),
            }
        }
    }

    debug!(count = map.entries.len(), "built pipeline map");
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"<cruise>
  <pipelines group="build">
    <pipeline name="compile" template="compile-template"/>
    <pipeline name="package"/>
    <authorization/>
  </pipelines>
  <pipelines group="deploy">
    <pipeline name="compile"/>
  </pipelines>
  <pipelines>
    <pipeline name="orphan"/>
  </pipelines>
  <templates>
    <pipeline name="compile-template"/>
    <pipeline name="release-template"/>
  </templates>
</cruise>"#;

    fn parse(xml: &str) -> ConfigDocument<'_> {
        ConfigDocument::parse("cruise-config.xml", xml).unwrap()
    }

    #[test]
    fn test_pipeline_key() {
        assert_eq!(pipeline_key("build", "compile"), "build_compile");
        assert_eq!(pipeline_key("a_b", "c"), "a_b_c");
    }

    #[test]
    fn test_tag_name_contains_is_substring_match() {
        let doc = parse(
            r#"<cruise><pipeline/><pipelineTemplate/><notapipeline/><stage/><Pipeline/></cruise>"#,
        );
        let matched: Vec<&str> = child_elements(doc.cruise().unwrap())
            .filter(|n| tag_name_contains(*n, PIPELINE_TAG_FRAGMENT))
            .map(|n| n.tag_name().name())
            .collect();
        assert_eq!(matched, vec!["pipeline", "pipelineTemplate", "notapipeline"]);
    }

    #[test]
    fn test_build_pipeline_map() {
        let doc = parse(CONFIG);
        let map = build_pipeline_map(&doc).unwrap();

        assert_eq!(
            map.known_keys(),
            vec!["build_compile", "build_package", "deploy_compile"]
        );
        assert!(map.get("orphan").is_none());
        assert!(map.get("_orphan").is_none());
    }

    #[test]
    fn test_lookup_requires_exact_group() {
        let doc = parse(CONFIG);
        let map = build_pipeline_map(&doc).unwrap();

        let build = map.get(&pipeline_key("build", "compile")).unwrap();
        assert_eq!(build.attribute("template"), Some("compile-template"));

        let deploy = map.get(&pipeline_key("deploy", "compile")).unwrap();
        assert!(deploy.attribute("template").is_none());

        assert!(map.get(&pipeline_key("test", "compile")).is_none());
        assert!(map.get("compile").is_none());
    }

    #[test]
    fn test_build_template_map() {
        let doc = parse(CONFIG);
        let map = build_template_map(&doc).unwrap();
        let mut names: Vec<&String> = map.entries.keys().collect();
        names.sort();
        assert_eq!(names, vec!["compile-template", "release-template"]);
        assert!(map.get("compile-template").is_some());
    }

    #[test]
    fn test_missing_templates_block_is_empty() {
        let doc = parse(r#"<cruise><pipelines group="g"><pipeline name="p"/></pipelines></cruise>"#);
        let map = build_template_map(&doc).unwrap();
        assert!(map.entries.is_empty());
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let doc = parse(
            r#"<cruise>
  <pipelines group="g"><pipeline name="p" label="first"/></pipelines>
  <pipelines group="g"><pipeline name="p" label="second"/></pipelines>
  <templates>
    <pipeline name="t" label="first"/>
    <pipeline name="t" label="second"/>
  </templates>
</cruise>"#,
        );
        let pipelines = build_pipeline_map(&doc).unwrap();
        let templates = build_template_map(&doc).unwrap();

        assert_eq!(pipelines.known_keys(), vec!["g_p"]);
        assert_eq!(pipelines.get("g_p").unwrap().attribute("label"), Some("second"));
        assert_eq!(templates.entries.len(), 1);
        assert_eq!(templates.get("t").unwrap().attribute("label"), Some("second"));
    }

    #[test]
    fn test_unnamed_pipeline_is_skipped() {
        let doc = parse(r#"<cruise><pipelines group="g"><pipeline/><pipeline name="p"/></pipelines></cruise>"#);
        let map = build_pipeline_map(&doc).unwrap();
        assert_eq!(map.known_keys(), vec!["g_p"]);
    }

    #[test]
    fn test_substring_tag_is_recorded_as_pipeline() {
        let doc = parse(
            r#"<cruise><pipelines group="g"><pipelineRef name="odd"/><pipeline name="p"/></pipelines></cruise>"#,
        );
        let map = build_pipeline_map(&doc).unwrap();
        assert_eq!(map.known_keys(), vec!["g_odd", "g_p"]);
    }
}
