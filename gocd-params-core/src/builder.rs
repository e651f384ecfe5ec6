//! Builder pattern API for parameter inspection.
//!
//! ```rust,ignore
//! use gocd_params_core::prelude::*;
//!
//! let inspection = ParamInspector::new("build", "compile")
//!     .ignore_params(["GO_DEPENDENCY_LABEL"])
//!     .inspect_file("cruise-config.xml")?;
//!
//! println!("Unused: {:?}", inspection.unused());
//! ```

use std::path::Path;

use tracing::info;

use crate::document::{read_config, ConfigDocument};
use crate::error::ParamsResult;
use crate::graph::ParamGraph;
use crate::lookup::{build_pipeline_map, build_template_map, pipeline_key};
use crate::params::parameters_of;
use crate::report::{Inspection, PipelineReport};
use crate::resolve::{stages_of, Resolution};
use crate::usage::{tasks_of, used_parameter_names};

/// Builder for inspecting one pipeline's parameters.
#[derive(Debug, Clone)]
pub struct ParamInspector {
    /// Pipeline group name
    group: String,

    /// Pipeline name within the group
    name: String,

    /// Parameter names never reported as unused
    ignored: Vec<String>,
}

impl ParamInspector {
    /// Create an inspector for `group`/`name`.
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            ignored: Vec::new(),
        }
    }

    /// Add parameter names to leave out of the unused report.
    pub fn ignore_params(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored.extend(names.into_iter().map(Into::into));
        self
    }

    /// Composite key this inspector looks up.
    pub fn key(&self) -> String {
        pipeline_key(&self.group, &self.name)
    }

    /// Read and parse `path`, then inspect it.
    pub fn inspect_file(&self, path: impl AsRef<Path>) -> ParamsResult<Inspection> {
        let path = path.as_ref();
        let source = read_config(path)?;
        let doc = ConfigDocument::parse(path, &source)?;
        self.inspect(&doc)
    }

    /// Run the inspection against an already parsed document.
    pub fn inspect(&self, doc: &ConfigDocument<'_>) -> ParamsResult<Inspection> {
        let templates = build_template_map(doc)?;
        let pipelines = build_pipeline_map(doc)?;
        let key = self.key();

        let stages = match stages_of(&pipelines, &templates, &key)? {
            Resolution::Found(stages) => stages,
            Resolution::NotFound { key, known_keys } => {
                info!(key = %key, known = known_keys.len(), "pipeline not found");
                return Ok(Inspection::NotFound {
                    group: self.group.clone(),
                    name: self.name.clone(),
                    key,
                    known_keys,
                });
            }
        };

        let declared = parameters_of(&pipelines, &key)?;
        let used = used_parameter_names(&tasks_of(&stages));
        let analysis = ParamGraph::new(declared.clone(), used)
            .with_ignored(self.ignored.iter().cloned())
            .analyze();

        let template = pipelines
            .get(&key)
            .and_then(|p| p.attribute("template"))
            .map(str::to_string);

        info!(
            key = %key,
            declared = analysis.stats.declared_count,
            unused = analysis.stats.unused_count,
            "inspected pipeline"
        );

        Ok(Inspection::Found(PipelineReport {
            group: self.group.clone(),
            name: self.name.clone(),
            key,
            template,
            declared,
            analysis,
        }))
    }
}

/// Inspect `group`/`name` in `doc` with no ignore list.
pub fn inspect_pipeline(
    doc: &ConfigDocument<'_>,
    group: &str,
    name: &str,
) -> ParamsResult<Inspection> {
    ParamInspector::new(group, name).inspect(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParamsError;

    const CONFIG: &str = r##"<cruise>
  <pipelines group="build">
    <pipeline name="compile">
      <params>
        <param name="VERSION">1</param>
        <param name="BRANCH">main</param>
        <param name="LEGACY">x</param>
      </params>
      <stage name="s">
        <jobs><job name="j"><tasks>
          <exec command="make" args="#{VERSION}" />
        </tasks></job></jobs>
      </stage>
    </pipeline>
    <pipeline name="no-params">
      <stage name="s"/>
    </pipeline>
  </pipelines>
</cruise>"##;

    #[test]
    fn test_inspect_found() {
        let doc = ConfigDocument::parse("cruise-config.xml", CONFIG).unwrap();
        let inspection = inspect_pipeline(&doc, "build", "compile").unwrap();

        let Inspection::Found(report) = inspection else {
            panic!("Expected Found");
        };
        assert_eq!(report.key, "build_compile");
        assert!(report.template.is_none());
        let unused: Vec<_> = report.unused().iter().map(String::as_str).collect();
        assert_eq!(unused, vec!["BRANCH", "LEGACY"]);
    }

    #[test]
    fn test_inspect_with_ignored() {
        let doc = ConfigDocument::parse("cruise-config.xml", CONFIG).unwrap();
        let inspection = ParamInspector::new("build", "compile")
            .ignore_params(["LEGACY"])
            .inspect(&doc)
            .unwrap();

        let unused: Vec<_> = inspection.unused().into_iter().collect();
        assert_eq!(unused, vec!["BRANCH".to_string()]);
    }

    #[test]
    fn test_inspect_not_found_does_not_fail() {
        let doc = ConfigDocument::parse("cruise-config.xml", CONFIG).unwrap();
        let inspection = inspect_pipeline(&doc, "deploy", "compile").unwrap();

        assert!(!inspection.is_found());
        assert!(inspection.unused().is_empty());
        match inspection {
            Inspection::NotFound { key, known_keys, .. } => {
                assert_eq!(key, "deploy_compile");
                assert_eq!(known_keys, vec!["build_compile", "build_no-params"]);
            }
            Inspection::Found(_) => unreachable!(),
        }
    }

    #[test]
    fn test_inspect_missing_params_propagates() {
        let doc = ConfigDocument::parse("cruise-config.xml", CONFIG).unwrap();
        let err = inspect_pipeline(&doc, "build", "no-params").unwrap_err();
        assert!(matches!(err, ParamsError::MissingParams { .. }));
    }

    #[test]
    fn test_key() {
        assert_eq!(ParamInspector::new("build", "compile").key(), "build_compile");
    }
}
