//! `workload_variable` and `environment_variable`.
//!
//! Both fan a single definition out to every named workload. Each workload
//! gets its own copy, so later overrides for one workload leave the others
//! untouched.

use ramble_types::{EnvironmentAction, EnvironmentVariable, WorkloadVariable};
use serde::{Deserialize, Serialize};

use super::{scalar_string, scalar_string_list};
use crate::{
    definitions::{NameList, require_definition},
    step::{BuilderStep, DirectiveCategory},
};

/// Arguments of the `workload_variable` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadVariableArgs {
    pub name: String,
    #[serde(deserialize_with = "scalar_string")]
    pub default: String,
    pub description: String,
    #[serde(default)]
    pub workload: Option<String>,
    #[serde(default)]
    pub workloads: Option<NameList>,
    #[serde(default, deserialize_with = "scalar_string_list")]
    pub values: Option<Vec<String>>,
    #[serde(default = "default_expandable")]
    pub expandable: bool,
}

fn default_expandable() -> bool {
    true
}

impl WorkloadVariableArgs {
    pub fn new(name: impl Into<String>, default: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            description: description.into(),
            workload: None,
            workloads: None,
            values: None,
            expandable: true,
        }
    }

    pub fn workload(mut self, workload: impl Into<String>) -> Self {
        self.workload = Some(workload.into());
        self
    }

    pub fn workloads(mut self, workloads: impl Into<NameList>) -> Self {
        self.workloads = Some(workloads.into());
        self
    }

    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn expandable(mut self, expandable: bool) -> Self {
        self.expandable = expandable;
        self
    }
}

/// Defines an experiment variable for each listed workload.
///
/// `values` is recorded only when it lists at least one value.
pub fn workload_variable(args: WorkloadVariableArgs) -> BuilderStep {
    BuilderStep::new(DirectiveCategory::WorkloadVariables, "workload_variable", move |application| {
        let workloads = require_definition(
            args.workload.as_deref(),
            args.workloads.as_ref(),
            "workload",
            "workloads",
            "workload_variable",
        )?;

        let values = args.values.clone().filter(|values| !values.is_empty());
        let variables = &mut application.model_mut().workload_variables;
        for workload_name in workloads {
            variables.entry(workload_name).or_default().insert(
                args.name.clone(),
                WorkloadVariable {
                    default: args.default.clone(),
                    description: args.description.clone(),
                    expandable: args.expandable,
                    values: values.clone(),
                },
            );
        }
        Ok(())
    })
}

/// Arguments of the `environment_variable` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentVariableArgs {
    pub name: String,
    #[serde(deserialize_with = "scalar_string")]
    pub value: String,
    pub description: String,
    #[serde(default)]
    pub workload: Option<String>,
    #[serde(default)]
    pub workloads: Option<NameList>,
}

impl EnvironmentVariableArgs {
    pub fn new(name: impl Into<String>, value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: description.into(),
            workload: None,
            workloads: None,
        }
    }

    pub fn workload(mut self, workload: impl Into<String>) -> Self {
        self.workload = Some(workload.into());
        self
    }

    pub fn workloads(mut self, workloads: impl Into<NameList>) -> Self {
        self.workloads = Some(workloads.into());
        self
    }
}

/// Defines an environment variable, always applied with `set`, for each
/// listed workload.
pub fn environment_variable(args: EnvironmentVariableArgs) -> BuilderStep {
    BuilderStep::new(DirectiveCategory::EnvironmentVariables, "environment_variable", move |application| {
        let workloads = require_definition(
            args.workload.as_deref(),
            args.workloads.as_ref(),
            "workload",
            "workloads",
            "environment_variable",
        )?;

        let variables = &mut application.model_mut().environment_variables;
        for workload_name in workloads {
            variables.entry(workload_name).or_default().insert(
                args.name.clone(),
                EnvironmentVariable {
                    value: args.value.clone(),
                    description: args.description.clone(),
                    action: EnvironmentAction::Set,
                },
            );
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApplicationClass, error::Violation};

    #[test]
    fn workload_variable_fans_out_identical_copies() {
        let class = ApplicationClass::builder("app")
            .directive(workload_variable(WorkloadVariableArgs::new("v", "1", "d").workloads(["w1", "w2"])))
            .build();

        let application = class.instantiate().expect("compose");
        let variables = &application.model().workload_variables;
        let expected = WorkloadVariable {
            default: "1".into(),
            description: "d".into(),
            expandable: true,
            values: None,
        };
        assert_eq!(variables["w1"]["v"], expected);
        assert_eq!(variables["w2"]["v"], expected);
    }

    #[test]
    fn workload_variable_records_values_only_when_present() {
        let class = ApplicationClass::builder("app")
            .directive(workload_variable(
                WorkloadVariableArgs::new("precision", "double", "Floating point precision")
                    .workload("w")
                    .values(["float", "double"])
                    .expandable(false),
            ))
            .directive(workload_variable(
                WorkloadVariableArgs::new("size", "1024", "Array size")
                    .workload("w")
                    .values(Vec::<String>::new()),
            ))
            .build();

        let application = class.instantiate().expect("compose");
        let variables = &application.model().workload_variables["w"];
        assert_eq!(variables["precision"].values, Some(vec!["float".to_string(), "double".to_string()]));
        assert!(!variables["precision"].expandable);
        assert_eq!(variables["size"].values, None);
    }

    #[test]
    fn workload_variable_overrides_only_named_workload() {
        let class = ApplicationClass::builder("app")
            .directive(workload_variable(WorkloadVariableArgs::new("n", "1", "count").workloads(["a", "b"])))
            .directive(workload_variable(WorkloadVariableArgs::new("n", "2", "count").workload("b")))
            .build();

        let application = class.instantiate().expect("compose");
        let variables = &application.model().workload_variables;
        assert_eq!(variables["a"]["n"].default, "1");
        assert_eq!(variables["b"]["n"].default, "2");
    }

    #[test]
    fn workload_variable_requires_a_workload() {
        let class = ApplicationClass::builder("app")
            .directive(workload_variable(WorkloadVariableArgs::new("v", "1", "d")))
            .build();

        let error = class.instantiate().expect_err("missing workloads");
        assert_eq!(error.directive, "workload_variable");
        assert!(matches!(error.violation, Violation::MissingDefinition { .. }));
    }

    #[test]
    fn environment_variable_always_sets() {
        let class = ApplicationClass::builder("app")
            .directive(environment_variable(
                EnvironmentVariableArgs::new("OMP_NUM_THREADS", "{n_threads}", "OpenMP threads").workloads(["a", "b"]),
            ))
            .build();

        let application = class.instantiate().expect("compose");
        for workload_name in ["a", "b"] {
            let variable = &application.model().environment_variables[workload_name]["OMP_NUM_THREADS"];
            assert_eq!(variable.value, "{n_threads}");
            assert_eq!(variable.action, EnvironmentAction::Set);
        }
    }

    #[test]
    fn environment_variable_rejects_both_forms() {
        let class = ApplicationClass::builder("app")
            .directive(environment_variable(
                EnvironmentVariableArgs::new("X", "1", "x").workload("a").workloads(["b"]),
            ))
            .build();

        let error = class.instantiate().expect_err("both forms");
        assert!(matches!(error.violation, Violation::ConflictingDefinition { .. }));
    }
}
