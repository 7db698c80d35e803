//! Argument-shape helpers shared by directives that accept a singular or
//! plural form of the same list of names.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{DirectiveError, Violation};

/// One or more names. A bare string is a one-element list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameList {
    One(String),
    Many(Vec<String>),
}

impl NameList {
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        match self {
            NameList::One(name) => std::slice::from_ref(name).iter(),
            NameList::Many(names) => names.iter(),
        }
    }
}

impl From<&str> for NameList {
    fn from(name: &str) -> Self {
        NameList::One(name.to_string())
    }
}

impl From<String> for NameList {
    fn from(name: String) -> Self {
        NameList::One(name)
    }
}

impl From<Vec<String>> for NameList {
    fn from(names: Vec<String>) -> Self {
        NameList::Many(names)
    }
}

impl From<Vec<&str>> for NameList {
    fn from(names: Vec<&str>) -> Self {
        NameList::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for NameList {
    fn from(names: [&str; N]) -> Self {
        NameList::Many(names.iter().map(|name| name.to_string()).collect())
    }
}

/// Resolves a required singular/plural pair into an ordered list of names.
///
/// Exactly one of `singular` and `plural` must be supplied and the result
/// must be non-empty. An empty singular name counts as not supplied.
/// Duplicates and empty names are dropped, keeping the first occurrence.
pub fn require_definition(
    singular: Option<&str>,
    plural: Option<&NameList>,
    singular_label: &str,
    plural_label: &str,
    caller_label: &str,
) -> Result<Vec<String>, DirectiveError> {
    let singular = singular.filter(|name| !name.is_empty());
    match (singular, plural) {
        (None, None) => Err(DirectiveError::new(
            caller_label,
            Violation::MissingDefinition {
                singular: singular_label.to_string(),
                plural: plural_label.to_string(),
            },
        )),
        (Some(_), Some(_)) => Err(DirectiveError::new(
            caller_label,
            Violation::ConflictingDefinition {
                singular: singular_label.to_string(),
                plural: plural_label.to_string(),
            },
        )),
        _ => {
            let names = merge_definitions(singular, plural);
            if names.is_empty() {
                return Err(DirectiveError::new(
                    caller_label,
                    Violation::EmptyDefinition {
                        plural: plural_label.to_string(),
                    },
                ));
            }
            Ok(names)
        }
    }
}

/// Ordered union of an optional singular name and an optional list of names.
///
/// The singular name comes first. Empty names are skipped. Never fails; an
/// absent pair is empty.
pub fn merge_definitions(singular: Option<&str>, plural: Option<&NameList>) -> Vec<String> {
    let mut names: IndexSet<String> = IndexSet::new();
    if let Some(name) = singular {
        names.insert(name.to_string());
    }
    if let Some(list) = plural {
        names.extend(list.iter().cloned());
    }
    names.into_iter().filter(|name| !name.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn require(singular: Option<&str>, plural: Option<NameList>) -> Result<Vec<String>, DirectiveError> {
        require_definition(singular, plural.as_ref(), "executable", "executables", "workload")
    }

    #[test]
    fn singular_resolves_to_one_element() {
        assert_eq!(require(Some("e1"), None).expect("singular"), vec!["e1"]);
    }

    #[test]
    fn bare_string_plural_counts_as_one_element() {
        assert_eq!(require(None, Some("e1".into())).expect("bare plural"), vec!["e1"]);
    }

    #[test]
    fn plural_is_deduplicated_in_order() {
        let names = require(None, Some(["b", "a", "b", "c", "a"].into())).expect("plural");
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn neither_form_is_rejected() {
        let error = require(None, None).expect_err("neither given");
        assert!(matches!(error.violation, Violation::MissingDefinition { .. }));
        assert_eq!(error.directive, "workload");
    }

    #[test]
    fn both_forms_are_rejected() {
        let error = require(Some("e1"), Some(["e2"].into())).expect_err("both given");
        assert!(matches!(error.violation, Violation::ConflictingDefinition { .. }));
    }

    #[test]
    fn empty_plural_is_rejected() {
        let error = require(None, Some(NameList::Many(Vec::new()))).expect_err("empty plural");
        assert!(matches!(error.violation, Violation::EmptyDefinition { .. }));
        assert!(error.to_string().contains("workload"), "message: {error}");
    }

    #[test]
    fn empty_singular_counts_as_missing() {
        let error = require(Some(""), None).expect_err("empty singular");
        assert!(matches!(error.violation, Violation::MissingDefinition { .. }));
    }

    #[test]
    fn empty_singular_does_not_conflict_with_plural() {
        assert_eq!(require(Some(""), Some(["e1"].into())).expect("plural only"), vec!["e1"]);
    }

    #[test]
    fn plural_of_only_empty_names_is_rejected() {
        let error = require(None, Some("".into())).expect_err("empty name");
        assert!(matches!(error.violation, Violation::EmptyDefinition { .. }));

        let names = require(None, Some(["e1", "", "e2"].into())).expect("plural with blank");
        assert_eq!(names, vec!["e1", "e2"]);
    }

    #[test]
    fn merge_puts_singular_first_and_drops_duplicates() {
        let plural: NameList = ["b", "a"].into();
        assert_eq!(merge_definitions(Some("a"), Some(&plural)), vec!["a", "b"]);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert!(merge_definitions(None, None).is_empty());
    }

    #[test]
    fn name_list_deserializes_from_string_or_sequence() {
        let one: NameList = serde_yaml::from_str("e1").expect("string");
        let many: NameList = serde_yaml::from_str("[e1, e2]").expect("sequence");
        assert_eq!(one, NameList::One("e1".into()));
        assert_eq!(many.iter().count(), 2);
    }
}
