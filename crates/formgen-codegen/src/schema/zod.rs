//! Zod schema target.

use crate::ir::{
    max_message, min_message, FieldRule, RuleSpec, TextFormat, MULTI_SELECT_MESSAGE,
    REQUIRED_MESSAGE, SELECT_MESSAGE, TEXTAREA_MIN_MESSAGE,
};
use crate::SchemaLibrary;

use super::{entries_block, SchemaTarget};

/// Emits Zod (v4) schema source.
pub struct ZodTarget;

impl SchemaTarget for ZodTarget {
    fn library(&self) -> SchemaLibrary {
        SchemaLibrary::Zod
    }

    fn import_line(&self) -> &'static str {
        "import { z } from \"zod\";"
    }

    fn render_rule(&self, rule: &FieldRule, indent: usize) -> String {
        let mut out = match &rule.spec {
            RuleSpec::Text { format } => match format {
                TextFormat::Plain => {
                    if rule.required {
                        format!("z.string().min(1, {{ message: \"{REQUIRED_MESSAGE}\" }})")
                    } else {
                        "z.string()".to_string()
                    }
                }
                TextFormat::Email => "z.email()".to_string(),
                TextFormat::Number => "z.coerce.number()".to_string(),
            },
            RuleSpec::Textarea => {
                if rule.required {
                    format!(
                        "z.string().min(1, {{ message: \"{REQUIRED_MESSAGE}\" }}).min(10, {{ message: \"{TEXTAREA_MIN_MESSAGE}\" }})"
                    )
                } else {
                    "z.string()".to_string()
                }
            }
            RuleSpec::Bool { must_be_true } => {
                if *must_be_true {
                    format!(
                        "z.boolean().refine((value) => value === true, {{ message: \"{REQUIRED_MESSAGE}\" }})"
                    )
                } else {
                    "z.boolean()".to_string()
                }
            }
            RuleSpec::Choice => {
                format!("z.string().min(1, {{ message: \"{SELECT_MESSAGE}\" }})")
            }
            RuleSpec::StringList => {
                format!("z.array(z.string()).nonempty({{ message: \"{MULTI_SELECT_MESSAGE}\" }})")
            }
            RuleSpec::Number { min, max } => {
                let mut expr = "z.coerce.number()".to_string();
                if let Some(min) = min {
                    expr.push_str(&format!(
                        ".min({}, {{ message: \"{}\" }})",
                        crate::defaults::format_number(*min),
                        min_message(*min)
                    ));
                }
                if let Some(max) = max {
                    expr.push_str(&format!(
                        ".max({}, {{ message: \"{}\" }})",
                        crate::defaults::format_number(*max),
                        max_message(*max)
                    ));
                }
                expr
            }
            RuleSpec::Date => "z.coerce.date()".to_string(),
            RuleSpec::Entries(inner) => {
                format!("z.array({})", self.object_expr(inner, indent))
            }
            RuleSpec::Unknown => "z.string()".to_string(),
        };

        if rule.is_optional() {
            out.push_str(".optional()");
        }
        out
    }

    fn object_expr(&self, rules: &[FieldRule], indent: usize) -> String {
        if rules.is_empty() {
            return "z.object({})".to_string();
        }
        let pad = "  ".repeat(indent);
        format!(
            "z.object({{\n{}{}}})",
            entries_block(self, rules, indent),
            pad
        )
    }

    fn infer_decl(&self) -> String {
        "export type FormSchema = z.infer<typeof formSchema>;\n".to_string()
    }
}
