//! Per-workload variable records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `workload name -> variable name -> definition`.
pub type WorkloadVariables = IndexMap<String, IndexMap<String, WorkloadVariable>>;

/// `workload name -> variable name -> definition`.
pub type EnvironmentVariables = IndexMap<String, IndexMap<String, EnvironmentVariable>>;

/// An experiment variable with its default and optional value set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadVariable {
    pub default: String,
    pub description: String,
    /// Whether the expansion engine may substitute placeholders inside the value.
    #[serde(default = "default_expandable")]
    pub expandable: bool,
    /// Suggested values; absent unless the definition listed some.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

fn default_expandable() -> bool {
    true
}

/// An environment variable exported to a workload's experiments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub value: String,
    pub description: String,
    #[serde(default)]
    pub action: EnvironmentAction,
}

/// How an environment variable is applied. Definitions only ever `set`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentAction {
    #[default]
    Set,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_omitted_when_absent() {
        let variable = WorkloadVariable {
            default: "1".into(),
            description: "d".into(),
            expandable: true,
            values: None,
        };
        let encoded = serde_json::to_value(&variable).expect("serialize variable");
        assert!(encoded.get("values").is_none(), "unexpected values: {encoded}");
    }

    #[test]
    fn environment_action_serializes_as_set() {
        let variable = EnvironmentVariable {
            value: "4".into(),
            description: "threads".into(),
            action: EnvironmentAction::Set,
        };
        let encoded = serde_json::to_value(&variable).expect("serialize env var");
        assert_eq!(encoded["action"], "set");
    }
}
