//! Single-step form component emitter.

use formgen_model::{FieldKind, FormModel};

use crate::defaults::derive_model_defaults;
use crate::imports::{resolve_imports, resolver_name};
use crate::pass::GenerationContext;
use crate::GenerateOptions;

use super::render::{array_hook_decl, arrays_of, render_items};

pub(super) const FORM_FILE: &str = "form.tsx";

pub(super) fn emit(model: &FormModel, options: &GenerateOptions, ctx: &mut GenerationContext) {
    let items = model.items();
    let has_password = model
        .descriptors()
        .iter()
        .any(|f| f.kind == FieldKind::Password);

    for import in resolve_imports(&items, options.schema_library, false) {
        ctx.add_import(FORM_FILE, import);
    }
    if has_password {
        ctx.add_import(FORM_FILE, "import * as React from \"react\";");
    }
    if options.focus_on_error {
        ctx.add_import(
            FORM_FILE,
            "import type { FieldErrors } from \"react-hook-form\";",
        );
    }

    let defaults = derive_model_defaults(model);
    let resolver = resolver_name(options.schema_library);

    let mut out = String::new();
    out.push_str("\"use client\";\n\n");
    out.push_str("export function GeneratedForm() {\n");
    if has_password {
        out.push_str("  const [showPassword, setShowPassword] = React.useState(false);\n\n");
    }
    out.push_str("  const form = useForm<FormSchema>({\n");
    out.push_str(&format!("    resolver: {resolver}(formSchema),\n"));
    out.push_str(&format!(
        "    defaultValues: {},\n",
        defaults.to_source_indented(2)
    ));
    out.push_str("  });\n\n");

    for array in arrays_of(&items) {
        out.push_str("  ");
        out.push_str(&array_hook_decl(array));
        out.push('\n');
    }
    if model.has_array() {
        out.push('\n');
    }

    out.push_str("  function onSubmit(values: FormSchema) {\n");
    out.push_str("    toast(JSON.stringify(values, null, 2));\n");
    out.push_str("  }\n\n");

    if options.focus_on_error {
        out.push_str(&invalid_handler());
    }

    let submit_args = if options.focus_on_error {
        "onSubmit, onInvalid"
    } else {
        "onSubmit"
    };

    out.push_str("  return (\n");
    out.push_str("    <Form {...form}>\n");
    out.push_str(&format!(
        "      <form onSubmit={{form.handleSubmit({submit_args})}} className=\"space-y-6\">\n"
    ));
    out.push_str(&render_items(&items, 4));
    out.push_str("        <Button type=\"submit\">Submit</Button>\n");
    out.push_str("      </form>\n");
    out.push_str("    </Form>\n");
    out.push_str("  );\n");
    out.push_str("}\n");

    ctx.set_file(FORM_FILE, out);
}

/// The invalid-submit handler. Error state is keyed by field name, not
/// render order, so this deliberately drops to a DOM query to find the
/// first invalid control in visual order.
pub(super) fn invalid_handler() -> String {
    let mut out = String::new();
    out.push_str("  function onInvalid(errors: FieldErrors<FormSchema>) {\n");
    out.push_str("    const controls = Array.from(\n");
    out.push_str("      document.querySelectorAll<HTMLElement>(\"[name]\")\n");
    out.push_str("    );\n");
    out.push_str("    const first = controls.find((control) => {\n");
    out.push_str("      const name = control.getAttribute(\"name\");\n");
    out.push_str("      return name !== null && name in errors;\n");
    out.push_str("    });\n");
    out.push_str("    first?.focus();\n");
    out.push_str("  }\n\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::GenerationContext;
    use formgen_model::{FieldDescriptor, FormElement, FormItem};

    #[test]
    fn password_field_pulls_react_state() {
        let model = FormModel::Single(vec![FormItem::Element(FormElement::Field(
            FieldDescriptor::new("f1", "secret", FieldKind::Password),
        ))]);

        let mut ctx = GenerationContext::new();
        emit(&model, &GenerateOptions::default(), &mut ctx);

        let form = ctx.get_file(FORM_FILE).unwrap();
        assert!(form.contains("const [showPassword, setShowPassword]"));
        assert!(ctx
            .get_imports(FORM_FILE)
            .unwrap()
            .iter()
            .any(|i| i.contains("* as React")));
    }

    #[test]
    fn array_hooks_declared_after_form() {
        let model: FormModel = serde_json::from_str(
            r#"[{
                "id": "a1",
                "name": "users",
                "arrayField": [{"id": "t1", "name": "name", "fieldType": "Input"}],
                "entries": [{"id": "e1", "fields": [{"id": "e1f", "name": "name", "fieldType": "Input"}]}]
            }]"#,
        )
        .unwrap();

        let mut ctx = GenerationContext::new();
        emit(&model, &GenerateOptions::default(), &mut ctx);

        let form = ctx.get_file(FORM_FILE).unwrap();
        let use_form = form.find("const form = useForm").unwrap();
        let hook = form.find("useFieldArray").unwrap();
        assert!(hook > use_form);
        assert!(form.contains("users: [{"));
    }
}
