//! Workload, executable, and input records plus the aggregate model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{EnvironmentVariables, PhaseGraph, WorkloadVariables};

/// The complete state produced by composing an application definition.
///
/// A freshly constructed model is empty in all six containers; the
/// composition pass populates it one builder step at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationModel {
    /// Named scenarios keyed by workload name.
    #[serde(default)]
    pub workloads: IndexMap<String, Workload>,
    /// Command templates keyed by executable name.
    #[serde(default)]
    pub executables: IndexMap<String, Executable>,
    /// Input file descriptions keyed by input name.
    #[serde(default)]
    pub inputs: IndexMap<String, InputFile>,
    /// Per-workload experiment variables.
    #[serde(default)]
    pub workload_variables: WorkloadVariables,
    /// Per-workload environment variables.
    #[serde(default)]
    pub environment_variables: EnvironmentVariables,
    /// Phase dependency graph keyed by pipeline.
    #[serde(default)]
    pub phase_definitions: PhaseGraph,
}

impl ApplicationModel {
    /// Returns `true` when no directive has written into any container.
    pub fn is_empty(&self) -> bool {
        self.workloads.is_empty()
            && self.executables.is_empty()
            && self.inputs.is_empty()
            && self.workload_variables.is_empty()
            && self.environment_variables.is_empty()
            && self.phase_definitions.is_empty()
    }
}

/// A named scenario combining executables and inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    pub name: String,
    /// Executable names in execution order. Never empty once composed.
    pub executables: Vec<String>,
    /// Input names, possibly empty.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Free-form tags used for filtering.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A command template together with how it should be launched.
///
/// `template` is opaque here; `{placeholder}` tokens are resolved by the
/// expansion engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executable {
    pub name: String,
    pub template: String,
    #[serde(default)]
    pub use_mpi: bool,
    #[serde(default = "default_redirect")]
    pub redirect: String,
    #[serde(default)]
    pub output_capture: OutputCapture,
    /// Variables scoped to this executable only.
    #[serde(default)]
    pub variables: IndexMap<String, String>,
}

/// Default redirect target for executable output.
pub fn default_redirect() -> String {
    "{log_file}".to_string()
}

/// Which process streams an executable's redirect captures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputCapture {
    Stdout,
    Stderr,
    All,
    #[default]
    Default,
}

impl OutputCapture {
    /// Canonical upper-case spelling, as used in definition documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputCapture::Stdout => "STDOUT",
            OutputCapture::Stderr => "STDERR",
            OutputCapture::All => "ALL",
            OutputCapture::Default => "DEFAULT",
        }
    }
}

impl std::fmt::Display for OutputCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an input can be fetched from and how it is unpacked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub name: String,
    pub url: String,
    pub description: String,
    #[serde(default = "default_target_dir")]
    pub target_dir: String,
    #[serde(default)]
    pub sha256: Option<String>,
    /// Extension to assume when the URL does not carry one.
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default = "default_expand")]
    pub expand: bool,
}

/// Default directory an input is expanded into.
pub fn default_target_dir() -> String {
    "{input_name}".to_string()
}

fn default_expand() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_empty() {
        let model = ApplicationModel::default();
        assert!(model.is_empty());
    }

    #[test]
    fn output_capture_uses_uppercase_names() {
        let encoded = serde_json::to_string(&OutputCapture::Stderr).expect("serialize capture");
        assert_eq!(encoded, "\"STDERR\"");

        let decoded: OutputCapture = serde_json::from_str("\"ALL\"").expect("deserialize capture");
        assert_eq!(decoded, OutputCapture::All);
        assert_eq!(OutputCapture::default().to_string(), "DEFAULT");
    }

    #[test]
    fn input_file_fills_documented_defaults() {
        let yaml = r#"
name: water
url: https://example.com/water.tar.gz
description: Water benchmark
"#;
        let input: InputFile = serde_yaml::from_str(yaml).expect("parse input");
        assert_eq!(input.target_dir, "{input_name}");
        assert!(input.expand);
        assert!(input.sha256.is_none());
        assert!(input.extension.is_none());
    }
}
