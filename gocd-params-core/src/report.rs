//! Output formatting - plaintext and JSON.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde::Serialize;
use serde_json::json;

use crate::graph::ParamAnalysisResult;
use crate::params::ParameterSet;

/// Everything learned about one pipeline's parameters.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub group: String,
    pub name: String,
    /// Composite lookup key
    pub key: String,
    /// Template the stages came from, if any
    pub template: Option<String>,
    pub declared: ParameterSet,
    pub analysis: ParamAnalysisResult,
}

impl PipelineReport {
    pub fn unused(&self) -> &BTreeSet<String> {
        &self.analysis.unused
    }
}

/// Outcome of inspecting one group/name pair.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Inspection {
    Found(PipelineReport),
    NotFound {
        group: String,
        name: String,
        key: String,
        known_keys: Vec<String>,
    },
}

impl Inspection {
    /// Unused parameters; empty when the pipeline was not found.
    pub fn unused(&self) -> BTreeSet<String> {
        match self {
            Self::Found(report) => report.unused().clone(),
            Self::NotFound { .. } => BTreeSet::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Renders a name set as `{"A", "B"}`, or `{}` when empty.
pub fn format_param_set(names: &BTreeSet<String>) -> String {
    format!("{:?}", names)
}

/// The two diagnostic lines for a key missing from the pipeline map.
pub fn render_not_found(key: &str, known_keys: &[String]) -> String {
    format!(
        "[ERROR] Pipeline {} not found\nList of available pipeline names {:?}\n",
        key, known_keys
    )
}

/// Prints the not-found diagnostic to stdout.
pub fn print_not_found(key: &str, known_keys: &[String]) {
    print!("{}", render_not_found(key, known_keys));
}

/// The summary block: group/name header, unused count and the unused set.
fn render_summary(group: &str, name: &str, unused: &BTreeSet<String>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pipeline group: {}, name: {}", group, name);
    let _ = writeln!(out, "# of unused parameters {}", unused.len());
    let _ = writeln!(out, "{}", format_param_set(unused));
    out
}

/// Plain text rendering of an inspection.
///
/// A missing pipeline is reported with the list of known keys and then
/// summarised as zero unused parameters.
pub fn render_plain(inspection: &Inspection) -> String {
    match inspection {
        Inspection::Found(report) => render_summary(&report.group, &report.name, report.unused()),
        Inspection::NotFound {
            group,
            name,
            key,
            known_keys,
        } => {
            let mut out = render_not_found(key, known_keys);
            out.push_str(&render_summary(group, name, &BTreeSet::new()));
            out
        }
    }
}

/// Prints an inspection in plain text format.
pub fn print_plain(inspection: &Inspection) {
    match inspection {
        Inspection::Found(report) => {
            print!("{}", render_summary(&report.group, &report.name, report.unused()))
        }
        Inspection::NotFound {
            group,
            name,
            key,
            known_keys,
        } => {
            print_not_found(key, known_keys);
            print!("{}", render_summary(group, name, &BTreeSet::new()));
        }
    }
}

/// Prints an inspection in JSON format.
///
/// Falls back to the bare unused list if serialization fails.
pub fn print_json(inspection: &Inspection) {
    match serde_json::to_string_pretty(inspection) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{}", json!({ "unused": inspection.unused() }));
        }
    }
}
