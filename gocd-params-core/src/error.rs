//! Typed error handling for gocd-params.
//!
//! Only a missing pipeline is an expected condition, and the resolver reports
//! that through [`crate::resolve::Resolution::NotFound`] rather than through
//! this type. Everything here is a hard stop for the inspection.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gocd-params operations.
#[derive(Error, Debug)]
pub enum ParamsError {
    /// I/O error when reading the config document or settings file
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The config document is not well-formed XML
    #[error("Parse error in {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// A structural element the inspection cannot start without
    #[error("Missing <{element}> element")]
    MissingElement { element: String },

    /// Composite key absent from the pipeline map
    #[error("Pipeline {key} not found")]
    PipelineNotFound { key: String, known_keys: Vec<String> },

    /// A pipeline references a template that is not defined
    #[error("Pipeline {pipeline} references unknown template {template}")]
    TemplateNotFound { pipeline: String, template: String },

    /// A pipeline has no <params> block
    #[error("Pipeline {pipeline} has no <params> block")]
    MissingParams { pipeline: String },

    /// Settings file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl ParamsError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error with line/column info.
    pub fn parse_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a missing-element error.
    pub fn missing_element(element: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.into(),
        }
    }

    /// Create a template-not-found error.
    pub fn template_not_found(pipeline: impl Into<String>, template: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            pipeline: pipeline.into(),
            template: template.into(),
        }
    }

    /// Create a missing-params error.
    pub fn missing_params(pipeline: impl Into<String>) -> Self {
        Self::MissingParams {
            pipeline: pipeline.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Parse { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for gocd-params results.
pub type ParamsResult<T> = Result<T, ParamsError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> ParamsResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> ParamsResult<T> {
        self.map_err(|e| ParamsError::io(path, e))
    }
}
