//! Declared parameter extraction from a pipeline's `<params>` block.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::document::{descendants_named, text_content};
use crate::error::{ParamsError, ParamsResult};
use crate::lookup::PipelineMap;

/// Parameter name → declared value, for one pipeline.
pub type ParameterSet = BTreeMap<String, String>;

/// Reads the parameters declared by the pipeline stored under `key`.
///
/// The pipeline must exist and must declare a `<params>` block; both are
/// preconditions the caller is expected to have checked, and violating
/// either is reported as an error rather than an empty set.
pub fn parameters_of(pipelines: &PipelineMap<'_, '_>, key: &str) -> ParamsResult<ParameterSet> {
    let pipeline = pipelines
        .get(key)
        .ok_or_else(|| ParamsError::PipelineNotFound {
            key: key.to_string(),
            known_keys: pipelines.known_keys(),
        })?;

    let params = descendants_named(pipeline, "params")
        .next()
        .ok_or_else(|| ParamsError::missing_params(key))?;

    let mut declared = ParameterSet::new();
    for param in descendants_named(params, "param") {
        match param.attribute("name") {
            Some(name) => {
                declared.insert(name.to_string(), text_content(param));
            }
            None => warn!(pipeline = key, "<param> without a name attribute, skipping"),
        }
    }

    debug!(pipeline = key, count = declared.len(), "read declared parameters");
    Ok(declared)
}
