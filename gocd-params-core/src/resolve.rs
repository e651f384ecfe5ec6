//! Pipeline → stage resolution, with one hop through templates.

use roxmltree::Node;
use tracing::debug;

use crate::document::descendants_named;
use crate::error::{ParamsError, ParamsResult};
use crate::lookup::{PipelineMap, TemplateMap};

/// Outcome of resolving a composite key to its stages.
#[derive(Debug)]
pub enum Resolution<'a, 'input> {
    /// The pipeline exists; its `<stage>` elements in document order.
    Found(Vec<Node<'a, 'input>>),
    /// No pipeline under this key.
    NotFound {
        key: String,
        /// Every key the pipeline map does hold, sorted.
        known_keys: Vec<String>,
    },
}

impl<'a, 'input> Resolution<'a, 'input> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Stages if found, `None` otherwise.
    pub fn stages(&self) -> Option<&[Node<'a, 'input>]> {
        match self {
            Self::Found(stages) => Some(stages.as_slice()),
            Self::NotFound { .. } => None,
        }
    }
}

/// Resolves the stages of the pipeline stored under `key`.
///
/// A pipeline with a `template` attribute takes its stages from that
/// template; nested template references are not followed. A template name
/// missing from `templates` is an error, not a not-found result.
pub fn stages_of<'a, 'input>(
    pipelines: &PipelineMap<'a, 'input>,
    templates: &TemplateMap<'a, 'input>,
    key: &str,
) -> ParamsResult<Resolution<'a, 'input>> {
    let Some(pipeline) = pipelines.get(key) else {
        return Ok(Resolution::NotFound {
            key: key.to_string(),
            known_keys: pipelines.known_keys(),
        });
    };

    let source = match pipeline.attribute("template") {
        Some(template_name) => {
            debug!(pipeline = key, template = template_name, "resolving stages through template");
            templates
                .get(template_name)
                .ok_or_else(|| ParamsError::template_not_found(key, template_name))?
        }
        None => pipeline,
    };

    let stages: Vec<_> = descendants_named(source, "stage").collect();
    debug!(pipeline = key, stages = stages.len(), "resolved stages");
    Ok(Resolution::Found(stages))
}
