//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use gocd_params_core::prelude::*;
//! ```

pub use crate::builder::{inspect_pipeline, ParamInspector};
pub use crate::config::{load_config, ParamsConfig};
pub use crate::document::{read_config, ConfigDocument};
pub use crate::error::{ParamsError, ParamsResult};
pub use crate::graph::{ParamAnalysisResult, ParamGraph};
pub use crate::lookup::{build_pipeline_map, build_template_map, pipeline_key};
pub use crate::report::{Inspection, PipelineReport};
pub use crate::resolve::{stages_of, Resolution};
