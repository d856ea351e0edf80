//! Schema source generation.
//!
//! One [`SchemaTarget`] per supported validation library. Targets only
//! translate the constraint IR into syntax; the per-kind constraint logic
//! itself lives in [`crate::ir`] so the three libraries cannot drift.

use crate::ir::FieldRule;
use crate::SchemaLibrary;

mod arktype;
mod valibot;
mod zod;

pub use arktype::ArktypeTarget;
pub use valibot::ValibotTarget;
pub use zod::ZodTarget;

/// Export name of the whole-form schema in the generated module.
pub const SCHEMA_EXPORT: &str = "formSchema";

/// A schema library the generator can emit source for.
pub trait SchemaTarget: Send + Sync {
    fn library(&self) -> SchemaLibrary;

    /// The library's base import statement.
    fn import_line(&self) -> &'static str;

    /// The value expression for one rule, optional wrapping included
    /// where the library wraps values. `indent` is the nesting depth of
    /// the surrounding object literal.
    fn render_rule(&self, rule: &FieldRule, indent: usize) -> String;

    /// The key text for one rule. Arktype overrides this: its optional
    /// marker lives on the key, not the value.
    fn render_key(&self, rule: &FieldRule) -> String {
        quote_key(&rule.name)
    }

    /// An object schema expression over a rule set.
    fn object_expr(&self, rules: &[FieldRule], indent: usize) -> String;

    /// One exported schema declaration.
    fn schema_decl(&self, export_name: &str, rules: &[FieldRule]) -> String {
        format!(
            "export const {} = {};\n",
            export_name,
            self.object_expr(rules, 0)
        )
    }

    /// The inferred-type export for the whole-form schema.
    fn infer_decl(&self) -> String;

    /// A complete, standalone, importable schema module.
    fn schema_module(&self, rules: &[FieldRule]) -> String {
        format!(
            "// Generated by formgen. Do not edit by hand.\n\n{}\n\n{}\n{}",
            self.import_line(),
            self.schema_decl(SCHEMA_EXPORT, rules),
            self.infer_decl(),
        )
    }
}

/// Returns the target for a schema library.
pub fn target_for(library: SchemaLibrary) -> Box<dyn SchemaTarget> {
    match library {
        SchemaLibrary::Zod => Box::new(ZodTarget),
        SchemaLibrary::Valibot => Box::new(ValibotTarget),
        SchemaLibrary::Arktype => Box::new(ArktypeTarget),
    }
}

/// Renders the `key: value,` lines of an object literal.
pub(crate) fn entries_block(target: &dyn SchemaTarget, rules: &[FieldRule], indent: usize) -> String {
    let pad = "  ".repeat(indent + 1);
    let mut out = String::new();
    for rule in rules {
        out.push_str(&pad);
        out.push_str(&target.render_key(rule));
        out.push_str(": ");
        out.push_str(&target.render_rule(rule, indent + 1));
        out.push_str(",\n");
    }
    out
}

pub(crate) fn quote_key(key: &str) -> String {
    let mut chars = key.chars();
    let bare = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if bare {
        key.to_string()
    } else {
        format!("\"{key}\"")
    }
}
