//! Declared-vs-used comparison and unused parameter detection.
//!
//! Performance characteristics:
//! - Build: O(|P| + |U|) where P = declared parameters, U = used names
//! - Detection: O(|P|) single pass

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::params::ParameterSet;
use crate::usage::UsedKeySet;

/// Statistics about one pipeline's parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParamStats {
    pub declared_count: usize,
    pub used_count: usize,
    pub unused_count: usize,
    /// Names referenced by tasks but not declared by the pipeline
    pub undeclared_count: usize,
    /// Unused names suppressed by the ignore list
    pub ignored_count: usize,
}

/// Result of parameter analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParamAnalysisResult {
    /// Declared names never referenced, sorted
    pub unused: BTreeSet<String>,
    /// Referenced names the pipeline does not declare, sorted
    pub undeclared: BTreeSet<String>,
    pub stats: ParamStats,
}

/// Graph for comparing declared parameters with referenced ones.
#[derive(Debug, Default)]
pub struct ParamGraph {
    declared: ParameterSet,
    used: HashSet<String>,
    ignored: HashSet<String>,
}

impl ParamGraph {
    /// Create a graph from the declared set and the scanned usages.
    pub fn new(declared: ParameterSet, usage: UsedKeySet) -> Self {
        Self {
            declared,
            used: usage.used_params,
            ignored: HashSet::new(),
        }
    }

    /// Names that are never reported as unused.
    pub fn with_ignored(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored.extend(names.into_iter().map(Into::into));
        self
    }

    fn is_param_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Declared names minus used names, before the ignore list is applied.
    pub fn find_unused(&self) -> BTreeSet<String> {
        self.declared
            .keys()
            .filter(|name| !self.is_param_used(name))
            .cloned()
            .collect()
    }

    /// Used names minus declared names.
    pub fn find_undeclared(&self) -> BTreeSet<String> {
        self.used
            .iter()
            .filter(|name| !self.declared.contains_key(*name))
            .cloned()
            .collect()
    }

    /// Perform complete analysis and return structured result.
    pub fn analyze(&self) -> ParamAnalysisResult {
        let all_unused = self.find_unused();
        let before = all_unused.len();
        let unused: BTreeSet<String> = all_unused
            .into_iter()
            .filter(|name| !self.ignored.contains(name))
            .collect();
        let undeclared = self.find_undeclared();

        let stats = ParamStats {
            declared_count: self.declared.len(),
            used_count: self.used.len(),
            unused_count: unused.len(),
            undeclared_count: undeclared.len(),
            ignored_count: before - unused.len(),
        };

        ParamAnalysisResult {
            unused,
            undeclared,
            stats,
        }
    }
}
