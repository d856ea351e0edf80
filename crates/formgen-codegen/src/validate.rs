//! Runtime validation against the constraint IR.
//!
//! The IR is the source of truth for a form's validation rules; the
//! schema targets lower it to source text and this module lowers it to a
//! runtime check over JSON values. The two lowerings carry the same
//! messages, which is what the round-trip tests pin down.

use formgen_model::FieldPath;
use serde_json::Value;

use crate::ir::{
    max_message, min_message, FieldRule, RuleSpec, TextFormat, MULTI_SELECT_MESSAGE,
    REQUIRED_MESSAGE, SELECT_MESSAGE, TEXTAREA_MIN_MESSAGE,
};

/// One failed check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub path: FieldPath,
    pub message: String,
}

impl ValidationIssue {
    fn at(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

/// Validates a JSON value object against a rule set. The value is the
/// shape `derive_defaults` produces: one key per field.
pub fn validate_value(rules: &[FieldRule], value: &Value) -> Vec<ValidationIssue> {
    let mut issues = vec![];
    for rule in rules {
        let field_value = value.get(&rule.name);
        check_rule(rule, field_value, FieldPath::root(&rule.name), &mut issues);
    }
    issues
}

fn check_rule(
    rule: &FieldRule,
    value: Option<&Value>,
    path: FieldPath,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        if rule.required {
            issues.push(ValidationIssue::at(path, REQUIRED_MESSAGE));
        }
        return;
    };

    match &rule.spec {
        RuleSpec::Text { format } => check_text(rule, *format, value, path, issues),
        RuleSpec::Textarea => {
            let Some(s) = value.as_str() else {
                issues.push(ValidationIssue::at(path, "Expected a string"));
                return;
            };
            if rule.required {
                if s.is_empty() {
                    issues.push(ValidationIssue::at(path, REQUIRED_MESSAGE));
                } else if s.chars().count() < 10 {
                    issues.push(ValidationIssue::at(path, TEXTAREA_MIN_MESSAGE));
                }
            }
        }
        RuleSpec::Bool { must_be_true } => match value.as_bool() {
            Some(b) => {
                if *must_be_true && !b {
                    issues.push(ValidationIssue::at(path, REQUIRED_MESSAGE));
                }
            }
            None => issues.push(ValidationIssue::at(path, "Expected a boolean")),
        },
        RuleSpec::Choice => match value.as_str() {
            Some(s) if s.is_empty() => issues.push(ValidationIssue::at(path, SELECT_MESSAGE)),
            Some(_) => {}
            None => issues.push(ValidationIssue::at(path, "Expected a string")),
        },
        RuleSpec::StringList => match value.as_array() {
            Some(items) => {
                if items.is_empty() {
                    issues.push(ValidationIssue::at(path, MULTI_SELECT_MESSAGE));
                } else if items.iter().any(|i| !i.is_string()) {
                    issues.push(ValidationIssue::at(path, "Expected an array of strings"));
                }
            }
            None => issues.push(ValidationIssue::at(path, "Expected an array")),
        },
        RuleSpec::Number { min, max } => {
            let Some(n) = coerce_number(value) else {
                issues.push(ValidationIssue::at(path, "Expected a number"));
                return;
            };
            if let Some(min) = min {
                if n < *min {
                    issues.push(ValidationIssue::at(path.clone(), min_message(*min)));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    issues.push(ValidationIssue::at(path, max_message(*max)));
                }
            }
        }
        RuleSpec::Date => {
            // Coerced date: a nonempty string or a numeric timestamp.
            let ok = matches!(value.as_str(), Some(s) if !s.is_empty()) || value.is_number();
            if !ok {
                issues.push(ValidationIssue::at(path, "Expected a date"));
            }
        }
        RuleSpec::Entries(inner) => match value.as_array() {
            Some(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    for inner_rule in inner {
                        let entry_path = FieldPath::root(&rule.name)
                            .index(index)
                            .key(&inner_rule.name);
                        check_rule(inner_rule, entry.get(&inner_rule.name), entry_path, issues);
                    }
                }
            }
            None => issues.push(ValidationIssue::at(path, "Expected an array")),
        },
        RuleSpec::Unknown => {}
    }
}

fn check_text(
    rule: &FieldRule,
    format: TextFormat,
    value: &Value,
    path: FieldPath,
    issues: &mut Vec<ValidationIssue>,
) {
    match format {
        TextFormat::Number => {
            if coerce_number(value).is_none() {
                issues.push(ValidationIssue::at(path, "Expected a number"));
            }
        }
        TextFormat::Email => match value.as_str() {
            Some(s) if looks_like_email(s) => {}
            Some(_) => issues.push(ValidationIssue::at(path, "Invalid email address")),
            None => issues.push(ValidationIssue::at(path, "Expected a string")),
        },
        TextFormat::Plain => match value.as_str() {
            Some(s) => {
                if rule.required && s.is_empty() {
                    issues.push(ValidationIssue::at(path, REQUIRED_MESSAGE));
                }
            }
            None => issues.push(ValidationIssue::at(path, "Expected a string")),
        },
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// Deliberately loose; the generated schema owns the authoritative check.
fn looks_like_email(s: &str) -> bool {
    let Some(at) = s.find('@') else { return false };
    at > 0 && s[at + 1..].contains('.') && !s.ends_with('.')
}
