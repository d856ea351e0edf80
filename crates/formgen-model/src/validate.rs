//! Model validation.
//!
//! The generators themselves never reject a structurally valid model, so
//! the checks that matter live here where the builder (or the CLI `check`
//! command) can run them up front. Zero-entry arrays are hard errors;
//! duplicate field names are warnings because the generators deliberately
//! keep last-write-wins semantics for them.

use std::collections::HashSet;

use thiserror::Error;

use crate::{FormArray, FormItem, FormModel};

/// How severe a model issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Generation would produce misleading output.
    Error,
    /// Generation works but the result is probably not what was meant.
    Warning,
}

/// A problem found in a form model.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelIssue {
    #[error("array \"{array}\" has no entries; the builder must seed at least one")]
    EmptyArray { array: String },

    #[error("entry \"{entry}\" of array \"{array}\" does not match the template field names")]
    EntryShapeMismatch { array: String, entry: String },

    #[error("field name \"{name}\" appears more than once in {scope}; later fields overwrite earlier ones")]
    DuplicateName { name: String, scope: String },
}

impl ModelIssue {
    pub fn severity(&self) -> Severity {
        match self {
            ModelIssue::EmptyArray { .. } | ModelIssue::EntryShapeMismatch { .. } => {
                Severity::Error
            }
            ModelIssue::DuplicateName { .. } => Severity::Warning,
        }
    }
}

/// Checks a model and returns every issue found.
pub fn validate(model: &FormModel) -> Vec<ModelIssue> {
    let mut issues = vec![];

    match model {
        FormModel::Single(items) => {
            check_scope(items, "the form", &mut issues);
        }
        FormModel::Stepped(steps) => {
            for step in steps {
                check_scope(&step.step_fields, &format!("step \"{}\"", step.id), &mut issues);
            }
        }
    }

    issues
}

/// Returns true if none of the issues are errors.
pub fn is_generatable(issues: &[ModelIssue]) -> bool {
    issues.iter().all(|i| i.severity() != Severity::Error)
}

fn check_scope(items: &[FormItem], scope: &str, issues: &mut Vec<ModelIssue>) {
    let mut seen = HashSet::new();

    for item in items {
        match item {
            FormItem::Element(element) => {
                for field in element.fields() {
                    if field.is_presentational() {
                        continue;
                    }
                    if !seen.insert(field.name.clone()) {
                        issues.push(ModelIssue::DuplicateName {
                            name: field.name.clone(),
                            scope: scope.to_string(),
                        });
                    }
                }
            }
            FormItem::Array(array) => {
                if !seen.insert(array.name.clone()) {
                    issues.push(ModelIssue::DuplicateName {
                        name: array.name.clone(),
                        scope: scope.to_string(),
                    });
                }
                check_array(array, issues);
            }
        }
    }
}

fn check_array(array: &FormArray, issues: &mut Vec<ModelIssue>) {
    if array.entries.is_empty() {
        issues.push(ModelIssue::EmptyArray {
            array: array.name.clone(),
        });
    }

    let template: HashSet<&str> = array.template_names().into_iter().collect();
    for entry in &array.entries {
        let names: HashSet<&str> = entry
            .fields
            .iter()
            .flat_map(|e| e.fields())
            .map(|f| f.name.as_str())
            .collect();
        if names != template {
            issues.push(ModelIssue::EntryShapeMismatch {
                array: array.name.clone(),
                entry: entry.id.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArrayEntry, FieldDescriptor, FieldKind, FormElement, FormStep};

    fn field(id: &str, name: &str) -> FieldDescriptor {
        FieldDescriptor::new(id, name, FieldKind::Input)
    }

    fn item(id: &str, name: &str) -> FormItem {
        FormItem::Element(FormElement::Field(field(id, name)))
    }

    #[test]
    fn clean_model_has_no_issues() {
        let model = FormModel::Single(vec![item("f1", "name"), item("f2", "email")]);
        assert!(validate(&model).is_empty());
    }

    #[test]
    fn empty_array_is_an_error() {
        let model = FormModel::Single(vec![FormItem::Array(FormArray {
            id: "a1".to_string(),
            name: "users".to_string(),
            label: None,
            array_field: vec![FormElement::Field(field("t1", "name"))],
            entries: vec![],
        })]);

        let issues = validate(&model);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), Severity::Error);
        assert!(!is_generatable(&issues));
    }

    #[test]
    fn entry_shape_mismatch_is_an_error() {
        let model = FormModel::Single(vec![FormItem::Array(FormArray {
            id: "a1".to_string(),
            name: "users".to_string(),
            label: None,
            array_field: vec![FormElement::Field(field("t1", "name"))],
            entries: vec![ArrayEntry {
                id: "e1".to_string(),
                fields: vec![FormElement::Field(field("e1f", "username"))],
            }],
        })]);

        let issues = validate(&model);
        assert!(matches!(
            &issues[0],
            ModelIssue::EntryShapeMismatch { array, entry } if array == "users" && entry == "e1"
        ));
    }

    #[test]
    fn duplicate_names_are_warnings() {
        let model = FormModel::Single(vec![item("f1", "name"), item("f2", "name")]);

        let issues = validate(&model);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), Severity::Warning);
        assert!(is_generatable(&issues));
    }

    #[test]
    fn duplicates_scoped_per_step() {
        let model = FormModel::Stepped(vec![
            FormStep {
                id: "s1".to_string(),
                step_fields: vec![item("f1", "name")],
            },
            FormStep {
                id: "s2".to_string(),
                step_fields: vec![item("f2", "name")],
            },
        ]);

        // Same name on different steps is fine.
        assert!(validate(&model).is_empty());
    }

    #[test]
    fn presentational_fields_never_collide() {
        let mut sep1 = field("f1", "divider");
        sep1.kind = FieldKind::Separator;
        let mut sep2 = field("f2", "divider");
        sep2.kind = FieldKind::Separator;
        let model = FormModel::Single(vec![
            FormItem::Element(FormElement::Field(sep1)),
            FormItem::Element(FormElement::Field(sep2)),
        ]);
        assert!(validate(&model).is_empty());
    }
}
