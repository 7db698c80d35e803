//! Application definition documents.
//!
//! A document describes one application class: its name, bases, pipelines,
//! and the directive calls it makes, in order. Files may hold a single
//! document or several under an `applications` key. Unknown fields are
//! rejected at load time.
//!
//! ```yaml
//! application: babelstream
//! inherits: [spack-application]
//! directives:
//!   - executable:
//!       name: execute
//!       template: "{exec_name} --arraysize {array_size}"
//!       output_capture: ALL
//!   - workload:
//!       name: standard
//!       executable: execute
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::directives::Directive;

/// One application class as authored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationDocument {
    pub application: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Base applications in linearization order.
    #[serde(default)]
    pub inherits: Vec<String>,
    /// Pipelines `register_phase` accepts. Absent means inherit or default.
    #[serde(default)]
    pub pipelines: Option<Vec<String>>,
    /// Directive calls in order, each written as a single-key mapping
    /// such as `- workload: {...}`.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub directives: Vec<Directive>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MultiApplicationDocument {
    applications: Vec<ApplicationDocument>,
}

/// Parses YAML or JSON text holding one or more application documents.
pub fn parse_application_str(content: &str) -> Result<Vec<ApplicationDocument>> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).context("document is not valid YAML or JSON")?;

    let Some(mapping) = value.as_mapping() else {
        bail!("expected an application document or an 'applications' list at the top level");
    };

    if mapping.contains_key("applications") {
        let document: MultiApplicationDocument =
            serde_yaml::from_str(content).context("invalid multi-application document")?;
        return Ok(document.applications);
    }

    let document: ApplicationDocument = serde_yaml::from_str(content).context("invalid application document")?;
    Ok(vec![document])
}

/// Reads and parses an application definition file.
pub fn parse_application_file(file_path: impl AsRef<Path>) -> Result<Vec<ApplicationDocument>> {
    let file_path = file_path.as_ref();
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read application file: {}", file_path.display()))?;
    parse_application_str(&content).with_context(|| format!("Failed to parse application file: {}", file_path.display()))
}
