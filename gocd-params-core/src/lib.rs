//! gocd-params-core: unused pipeline parameter detection for GoCD configs
//!
//! Loads a `cruise-config.xml`, resolves one pipeline (directly or through
//! its template), scans that pipeline's tasks for `#{name}` references and
//! reports the declared parameters nothing refers to.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gocd_params_core::prelude::*;
//!
//! let inspection = ParamInspector::new("build", "compile")
//!     .inspect_file("cruise-config.xml")?;
//!
//! for name in inspection.unused() {
//!     println!("Unused parameter: {}", name);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`document`]: XML loading and navigation helpers
//! - [`lookup`]: template and pipeline lookup tables
//! - [`resolve`]: pipeline → stages, through templates
//! - [`params`]: declared parameters of a pipeline
//! - [`usage`]: `#{name}` references inside tasks
//! - [`graph`]: declared vs used comparison
//! - [`report`]: plain text and JSON output
//! - [`builder`]: fluent API tying the above together
//! - [`error`]: typed error handling

pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod logging;
pub mod lookup;
pub mod params;
pub mod prelude;
pub mod report;
pub mod resolve;
pub mod usage;

// Error types
pub use error::{IoResultExt, ParamsError, ParamsResult};

// Builder API
pub use builder::{inspect_pipeline, ParamInspector};

// Configuration
pub use config::{load_config, load_config_file, OutputConfig, ParamsConfig, CONFIG_FILE_NAME};

// Document loading
pub use document::{read_config, serialize_node, ConfigDocument};

// Lookup tables
pub use lookup::{
    build_pipeline_map, build_template_map, pipeline_key, tag_name_contains, PipelineMap,
    TemplateMap,
};

// Resolution and extraction
pub use params::{parameters_of, ParameterSet};
pub use resolve::{stages_of, Resolution};
pub use usage::{references_in_line, tasks_of, used_parameter_names, UsedKeySet};

// Analysis
pub use graph::{ParamAnalysisResult, ParamGraph, ParamStats};

// Logging
pub use logging::{init_structured_logging, log_error, log_event, log_info, log_warn};

// Reporting
pub use report::{
    format_param_set, print_json, print_not_found, print_plain, render_not_found, render_plain,
    Inspection, PipelineReport,
};
