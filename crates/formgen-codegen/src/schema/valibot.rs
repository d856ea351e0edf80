//! Valibot schema target.

use crate::ir::{
    max_message, min_message, FieldRule, RuleSpec, TextFormat, MULTI_SELECT_MESSAGE,
    REQUIRED_MESSAGE, SELECT_MESSAGE, TEXTAREA_MIN_MESSAGE,
};
use crate::SchemaLibrary;

use super::{entries_block, SchemaTarget};

/// Emits Valibot (v1, pipe syntax) schema source.
pub struct ValibotTarget;

impl SchemaTarget for ValibotTarget {
    fn library(&self) -> SchemaLibrary {
        SchemaLibrary::Valibot
    }

    fn import_line(&self) -> &'static str {
        "import * as v from \"valibot\";"
    }

    fn render_rule(&self, rule: &FieldRule, indent: usize) -> String {
        let inner = match &rule.spec {
            RuleSpec::Text { format } => match format {
                TextFormat::Plain => {
                    if rule.required {
                        format!("v.pipe(v.string(), v.minLength(1, \"{REQUIRED_MESSAGE}\"))")
                    } else {
                        "v.string()".to_string()
                    }
                }
                TextFormat::Email => "v.pipe(v.string(), v.email())".to_string(),
                TextFormat::Number => {
                    "v.pipe(v.unknown(), v.transform(Number), v.number())".to_string()
                }
            },
            RuleSpec::Textarea => {
                if rule.required {
                    format!(
                        "v.pipe(v.string(), v.minLength(1, \"{REQUIRED_MESSAGE}\"), v.minLength(10, \"{TEXTAREA_MIN_MESSAGE}\"))"
                    )
                } else {
                    "v.string()".to_string()
                }
            }
            RuleSpec::Bool { must_be_true } => {
                if *must_be_true {
                    format!(
                        "v.pipe(v.boolean(), v.check((value) => value === true, \"{REQUIRED_MESSAGE}\"))"
                    )
                } else {
                    "v.boolean()".to_string()
                }
            }
            RuleSpec::Choice => {
                format!("v.pipe(v.string(), v.minLength(1, \"{SELECT_MESSAGE}\"))")
            }
            RuleSpec::StringList => {
                format!("v.pipe(v.array(v.string()), v.minLength(1, \"{MULTI_SELECT_MESSAGE}\"))")
            }
            RuleSpec::Number { min, max } => {
                let mut checks = String::new();
                if let Some(min) = min {
                    checks.push_str(&format!(
                        ", v.minValue({}, \"{}\")",
                        crate::defaults::format_number(*min),
                        min_message(*min)
                    ));
                }
                if let Some(max) = max {
                    checks.push_str(&format!(
                        ", v.maxValue({}, \"{}\")",
                        crate::defaults::format_number(*max),
                        max_message(*max)
                    ));
                }
                format!("v.pipe(v.unknown(), v.transform(Number), v.number(){checks})")
            }
            RuleSpec::Date => {
                "v.pipe(v.unknown(), v.transform((input) => new Date(input)), v.date())"
                    .to_string()
            }
            RuleSpec::Entries(inner) => {
                format!("v.array({})", self.object_expr(inner, indent))
            }
            RuleSpec::Unknown => "v.string()".to_string(),
        };

        if rule.is_optional() {
            format!("v.optional({inner})")
        } else {
            inner
        }
    }

    fn object_expr(&self, rules: &[FieldRule], indent: usize) -> String {
        if rules.is_empty() {
            return "v.object({})".to_string();
        }
        let pad = "  ".repeat(indent);
        format!(
            "v.object({{\n{}{}}})",
            entries_block(self, rules, indent),
            pad
        )
    }

    fn infer_decl(&self) -> String {
        "export type FormSchema = v.InferOutput<typeof formSchema>;\n".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::field_rule;
    use formgen_model::{FieldDescriptor, FieldKind};

    fn rule_for(kind: FieldKind, required: bool) -> FieldRule {
        let mut field = FieldDescriptor::new("id", "f", kind);
        field.required = required;
        field_rule(&field)
    }

    #[test]
    fn optional_wraps_with_v_optional() {
        let source = ValibotTarget.render_rule(&rule_for(FieldKind::Input, false), 0);
        assert_eq!(source, "v.optional(v.string())");
    }

    #[test]
    fn required_input_pipes_min_length() {
        let source = ValibotTarget.render_rule(&rule_for(FieldKind::Input, true), 0);
        assert_eq!(
            source,
            "v.pipe(v.string(), v.minLength(1, \"This field is required\"))"
        );
    }

    #[test]
    fn required_textarea_has_both_floors() {
        let source = ValibotTarget.render_rule(&rule_for(FieldKind::Textarea, true), 0);
        assert!(source.contains("v.minLength(1,"));
        assert!(source.contains("v.minLength(10, \"Minimum 10 characters\")"));
    }

    #[test]
    fn slider_bounds_become_value_checks() {
        let mut slider = FieldDescriptor::new("id", "volume", FieldKind::Slider);
        slider.min = Some(0.0);
        slider.max = Some(100.0);
        slider.required = true;

        let source = ValibotTarget.render_rule(&field_rule(&slider), 0);
        assert!(source.contains("v.minValue(0, \"Must be at least 0\")"));
        assert!(source.contains("v.maxValue(100, \"Must be at most 100\")"));
    }

    #[test]
    fn required_checkbox_checks_truthy() {
        let source = ValibotTarget.render_rule(&rule_for(FieldKind::Checkbox, true), 0);
        assert!(source.contains("v.check((value) => value === true"));
    }
}
