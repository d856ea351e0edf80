//! ArkType schema target.
//!
//! ArkType definitions are mostly string expressions inside a `type({})`
//! call, and the optional marker lives on the object key (`"name?"`)
//! rather than on the value. `render_key` is overridden accordingly.

use crate::ir::{FieldRule, RuleSpec, TextFormat};
use crate::SchemaLibrary;

use super::{entries_block, SchemaTarget};

/// Emits ArkType (v2) schema source.
pub struct ArktypeTarget;

impl SchemaTarget for ArktypeTarget {
    fn library(&self) -> SchemaLibrary {
        SchemaLibrary::Arktype
    }

    fn import_line(&self) -> &'static str {
        "import { type } from \"arktype\";"
    }

    fn render_key(&self, rule: &FieldRule) -> String {
        if rule.is_optional() {
            format!("\"{}?\"", rule.name)
        } else {
            super::quote_key(&rule.name)
        }
    }

    fn render_rule(&self, rule: &FieldRule, indent: usize) -> String {
        match &rule.spec {
            RuleSpec::Text { format } => match format {
                TextFormat::Plain => {
                    if rule.required {
                        "\"string > 0\"".to_string()
                    } else {
                        "\"string\"".to_string()
                    }
                }
                TextFormat::Email => "\"string.email\"".to_string(),
                TextFormat::Number => "\"string.numeric.parse\"".to_string(),
            },
            RuleSpec::Textarea => {
                if rule.required {
                    "\"string >= 10\"".to_string()
                } else {
                    "\"string\"".to_string()
                }
            }
            RuleSpec::Bool { must_be_true } => {
                if *must_be_true {
                    "type(\"boolean\").narrow((value, ctx) => value === true || ctx.mustBe(\"checked\"))"
                        .to_string()
                } else {
                    "\"boolean\"".to_string()
                }
            }
            RuleSpec::Choice => "\"string > 0\"".to_string(),
            RuleSpec::StringList => "\"string[] > 0\"".to_string(),
            RuleSpec::Number { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!(
                    "\"{} <= number <= {}\"",
                    crate::defaults::format_number(*min),
                    crate::defaults::format_number(*max)
                ),
                (Some(min), None) => {
                    format!("\"number >= {}\"", crate::defaults::format_number(*min))
                }
                (None, Some(max)) => {
                    format!("\"number <= {}\"", crate::defaults::format_number(*max))
                }
                (None, None) => "\"number\"".to_string(),
            },
            RuleSpec::Date => "\"string.date.parse\"".to_string(),
            RuleSpec::Entries(inner) => {
                format!("{}.array()", self.object_expr(inner, indent))
            }
            RuleSpec::Unknown => "\"string\"".to_string(),
        }
    }

    fn object_expr(&self, rules: &[FieldRule], indent: usize) -> String {
        if rules.is_empty() {
            return "type({})".to_string();
        }
        let pad = "  ".repeat(indent);
        format!("type({{\n{}{}}})", entries_block(self, rules, indent), pad)
    }

    fn infer_decl(&self) -> String {
        "export type FormSchema = typeof formSchema.infer;\n".to_string()
    }
}
