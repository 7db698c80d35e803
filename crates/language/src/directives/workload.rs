//! `workload`, `executable`, and `input_file`.

use indexmap::IndexMap;
use ramble_types::{
    Executable, InputFile, OutputCapture, Workload,
    model::{default_redirect, default_target_dir},
};
use serde::{Deserialize, Serialize};

use super::scalar_string_map;
use crate::{
    definitions::{NameList, merge_definitions, require_definition},
    step::{BuilderStep, DirectiveCategory},
};

/// Arguments of the `workload` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadArgs {
    pub name: String,
    #[serde(default)]
    pub executable: Option<String>,
    #[serde(default)]
    pub executables: Option<NameList>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub inputs: Option<NameList>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl WorkloadArgs {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            executable: None,
            executables: None,
            input: None,
            inputs: None,
            tags: Vec::new(),
        }
    }

    pub fn executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    pub fn executables(mut self, executables: impl Into<NameList>) -> Self {
        self.executables = Some(executables.into());
        self
    }

    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn inputs(mut self, inputs: impl Into<NameList>) -> Self {
        self.inputs = Some(inputs.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Adds a workload, replacing any earlier workload of the same name.
///
/// Exactly one of `executable` or `executables` is required; inputs are
/// optional and default to none.
pub fn workload(args: WorkloadArgs) -> BuilderStep {
    BuilderStep::new(DirectiveCategory::Workloads, "workload", move |application| {
        let executables = require_definition(
            args.executable.as_deref(),
            args.executables.as_ref(),
            "executable",
            "executables",
            "workload",
        )?;
        let inputs = merge_definitions(args.input.as_deref(), args.inputs.as_ref());

        application.model_mut().workloads.insert(
            args.name.clone(),
            Workload {
                name: args.name.clone(),
                executables,
                inputs,
                tags: args.tags.clone(),
            },
        );
        Ok(())
    })
}

/// A command template written as one string or as a list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandTemplate {
    Line(String),
    Lines(Vec<String>),
}

impl CommandTemplate {
    /// The template as a single string; lines are joined with newlines.
    pub fn render(&self) -> String {
        match self {
            CommandTemplate::Line(line) => line.clone(),
            CommandTemplate::Lines(lines) => lines.join("\n"),
        }
    }
}

impl From<&str> for CommandTemplate {
    fn from(line: &str) -> Self {
        CommandTemplate::Line(line.to_string())
    }
}

impl From<String> for CommandTemplate {
    fn from(line: String) -> Self {
        CommandTemplate::Line(line)
    }
}

impl From<Vec<&str>> for CommandTemplate {
    fn from(lines: Vec<&str>) -> Self {
        CommandTemplate::Lines(lines.into_iter().map(str::to_string).collect())
    }
}

/// Arguments of the `executable` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutableArgs {
    pub name: String,
    pub template: CommandTemplate,
    #[serde(default)]
    pub use_mpi: bool,
    #[serde(default, deserialize_with = "scalar_string_map")]
    pub variables: IndexMap<String, String>,
    #[serde(default = "default_redirect")]
    pub redirect: String,
    #[serde(default)]
    pub output_capture: OutputCapture,
}

impl ExecutableArgs {
    pub fn new(name: impl Into<String>, template: impl Into<CommandTemplate>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            use_mpi: false,
            variables: IndexMap::new(),
            redirect: default_redirect(),
            output_capture: OutputCapture::Default,
        }
    }

    pub fn use_mpi(mut self, use_mpi: bool) -> Self {
        self.use_mpi = use_mpi;
        self
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = redirect.into();
        self
    }

    pub fn output_capture(mut self, output_capture: OutputCapture) -> Self {
        self.output_capture = output_capture;
        self
    }
}

/// Adds an executable verbatim. Placeholders in the template are not
/// inspected here.
pub fn executable(args: ExecutableArgs) -> BuilderStep {
    BuilderStep::new(DirectiveCategory::Executables, "executable", move |application| {
        application.model_mut().executables.insert(
            args.name.clone(),
            Executable {
                name: args.name.clone(),
                template: args.template.render(),
                use_mpi: args.use_mpi,
                redirect: args.redirect.clone(),
                output_capture: args.output_capture,
                variables: args.variables.clone(),
            },
        );
        Ok(())
    })
}

/// Arguments of the `input_file` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputFileArgs {
    pub name: String,
    pub url: String,
    pub description: String,
    #[serde(default = "default_target_dir")]
    pub target_dir: String,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default = "default_expand")]
    pub expand: bool,
}

fn default_expand() -> bool {
    true
}

impl InputFileArgs {
    pub fn new(name: impl Into<String>, url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: description.into(),
            target_dir: default_target_dir(),
            sha256: None,
            extension: None,
            expand: true,
        }
    }

    pub fn target_dir(mut self, target_dir: impl Into<String>) -> Self {
        self.target_dir = target_dir.into();
        self
    }

    pub fn sha256(mut self, sha256: impl Into<String>) -> Self {
        self.sha256 = Some(sha256.into());
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }
}

/// Adds an input file description. Nothing is fetched.
pub fn input_file(args: InputFileArgs) -> BuilderStep {
    BuilderStep::new(DirectiveCategory::Inputs, "input_file", move |application| {
        application.model_mut().inputs.insert(
            args.name.clone(),
            InputFile {
                name: args.name.clone(),
                url: args.url.clone(),
                description: args.description.clone(),
                target_dir: args.target_dir.clone(),
                sha256: args.sha256.clone(),
                extension: args.extension.clone(),
                expand: args.expand,
            },
        );
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApplicationClass, error::Violation};

    #[test]
    fn later_workload_replaces_earlier_one() {
        let class = ApplicationClass::builder("app")
            .directive(workload(WorkloadArgs::new("w").executables(["e1", "e2"])))
            .directive(workload(WorkloadArgs::new("w").executable("e3")))
            .build();

        let application = class.instantiate().expect("compose");
        assert_eq!(application.model().workloads["w"].executables, vec!["e3"]);
    }

    #[test]
    fn workload_without_executables_fails() {
        let class = ApplicationClass::builder("app")
            .directive(workload(WorkloadArgs::new("w")))
            .build();

        let error = class.instantiate().expect_err("missing executables");
        assert_eq!(error.directive, "workload");
        assert_eq!(error.application.as_deref(), Some("app"));
        assert!(matches!(error.violation, Violation::MissingDefinition { .. }));
    }

    #[test]
    fn workload_with_empty_executable_name_fails() {
        let class = ApplicationClass::builder("app")
            .directive(workload(WorkloadArgs::new("w").executable("")))
            .build();

        let error = class.instantiate().expect_err("empty executable name");
        assert!(matches!(error.violation, Violation::MissingDefinition { .. }));
    }

    #[test]
    fn workload_merges_inputs_and_keeps_tags() {
        let class = ApplicationClass::builder("app")
            .directive(workload(
                WorkloadArgs::new("water")
                    .executable("run")
                    .input("water_bare")
                    .inputs(["water_bare", "topology"])
                    .tags(["md", "small"]),
            ))
            .build();

        let application = class.instantiate().expect("compose");
        let workload = &application.model().workloads["water"];
        assert_eq!(workload.inputs, vec!["water_bare", "topology"]);
        assert_eq!(workload.tags, vec!["md", "small"]);
    }

    #[test]
    fn workload_without_inputs_has_empty_inputs() {
        let class = ApplicationClass::builder("app")
            .directive(workload(WorkloadArgs::new("w").executable("e")))
            .build();

        let application = class.instantiate().expect("compose");
        assert_eq!(application.model().workloads["w"].name, "w");
        assert!(application.model().workloads["w"].inputs.is_empty());
        assert!(application.model().workloads["w"].tags.is_empty());
    }

    #[test]
    fn executable_is_stored_verbatim_with_defaults() {
        let class = ApplicationClass::builder("app")
            .directive(executable(ExecutableArgs::new("run", "{exec_name} --size {unresolved")))
            .build();

        let application = class.instantiate().expect("compose");
        let run = &application.model().executables["run"];
        assert_eq!(run.template, "{exec_name} --size {unresolved");
        assert!(!run.use_mpi);
        assert_eq!(run.redirect, "{log_file}");
        assert_eq!(run.output_capture, OutputCapture::Default);
        assert!(run.variables.is_empty());
    }

    #[test]
    fn executable_keeps_overrides_and_joins_template_lines() {
        let class = ApplicationClass::builder("app")
            .directive(executable(
                ExecutableArgs::new("get_bin", vec!["mkdir -p {bin_dir}", "cp {src} {bin_dir}"])
                    .use_mpi(true)
                    .redirect("{experiment_run_dir}/copy.log")
                    .output_capture(OutputCapture::Stderr)
                    .variable("n_ranks", "1"),
            ))
            .build();

        let application = class.instantiate().expect("compose");
        let get_bin = &application.model().executables["get_bin"];
        assert_eq!(get_bin.template, "mkdir -p {bin_dir}\ncp {src} {bin_dir}");
        assert!(get_bin.use_mpi);
        assert_eq!(get_bin.redirect, "{experiment_run_dir}/copy.log");
        assert_eq!(get_bin.output_capture, OutputCapture::Stderr);
        assert_eq!(get_bin.variables.get("n_ranks").map(String::as_str), Some("1"));
    }

    #[test]
    fn input_file_is_stored_with_defaults() {
        let class = ApplicationClass::builder("app")
            .directive(input_file(InputFileArgs::new(
                "water_bare",
                "https://example.com/water_bare.tar.gz",
                "Water without hydrogen bonds",
            )))
            .directive(input_file(
                InputFileArgs::new("raw", "https://example.com/raw", "Raw data")
                    .sha256("abc123")
                    .extension("tar.gz")
                    .target_dir("{workload_input_dir}")
                    .expand(false),
            ))
            .build();

        let application = class.instantiate().expect("compose");
        let water = &application.model().inputs["water_bare"];
        assert_eq!(water.target_dir, "{input_name}");
        assert!(water.expand);
        assert!(water.sha256.is_none());

        let raw = &application.model().inputs["raw"];
        assert_eq!(raw.sha256.as_deref(), Some("abc123"));
        assert_eq!(raw.extension.as_deref(), Some("tar.gz"));
        assert_eq!(raw.target_dir, "{workload_input_dir}");
        assert!(!raw.expand);
    }
}
