//! Parameter reference detection inside task definitions.
//!
//! References are found by scanning each task's serialized XML line by line
//! for `#{name}` tokens, so a reference counts wherever it appears: in an
//! attribute value, an `<arg>` body, a nested `<runif>`, anywhere. The
//! serialization is rebuilt from the parsed tree, so `&#35;{name}` counts too.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use roxmltree::Node;
use tracing::debug;

use crate::document::{child_elements, descendants_named, serialize_node};

/// Names referenced by `#{...}` tokens in a pipeline's tasks.
#[derive(Debug, Clone, Default)]
pub struct UsedKeySet {
    /// Set of referenced parameter names, as written
    pub used_params: HashSet<String>,
}

impl UsedKeySet {
    pub fn contains(&self, name: &str) -> bool {
        self.used_params.contains(name)
    }

    pub fn len(&self) -> usize {
        self.used_params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used_params.is_empty()
    }
}

/// Cached `#{word}` matcher. Word characters are ASCII only.
fn param_reference_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)#\{((?-u:\w)+)\}").expect("Hardcoded regex pattern is valid")
    })
}

/// Every task element below the given stages, in document order.
///
/// Tasks are the direct child elements of each `<tasks>` container found
/// anywhere inside a stage (usually under `<jobs><job>`).
pub fn tasks_of<'a, 'input>(stages: &[Node<'a, 'input>]) -> Vec<Node<'a, 'input>> {
    let mut tasks = Vec::new();
    for stage in stages {
        for container in descendants_named(*stage, "tasks") {
            tasks.extend(child_elements(container));
        }
    }
    tasks
}

/// Parameter names referenced in a single line of text.
pub fn references_in_line(line: &str) -> impl Iterator<Item = &str> {
    param_reference_regex()
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Collects every `#{name}` reference across the serialized tasks.
pub fn used_parameter_names(tasks: &[Node<'_, '_>]) -> UsedKeySet {
    let mut used = HashSet::with_capacity(32);

    for task in tasks {
        for line in serialize_node(*task).lines() {
            used.extend(references_in_line(line).map(str::to_string));
        }
    }

    debug!(tasks = tasks.len(), used = used.len(), "scanned tasks for parameter references");
    UsedKeySet { used_params: used }
}
