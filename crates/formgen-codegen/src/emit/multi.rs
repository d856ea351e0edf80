//! Multi-step form emitter: one field-group component per step plus a
//! stepper component wiring next/previous/submit transitions.

use formgen_model::{FieldKind, FormItem, FormModel};

use crate::defaults::derive_model_defaults;
use crate::imports::{kind_imports, resolver_import, resolver_name};
use crate::pass::GenerationContext;
use crate::schema::target_for;
use crate::GenerateOptions;

use super::render::{array_hook_decl, arrays_of, render_items};
use super::single::{invalid_handler, FORM_FILE};

pub(super) fn emit(model: &FormModel, options: &GenerateOptions, ctx: &mut GenerationContext) {
    let steps = model.step_slices();

    for (index, step_items) in steps.iter().enumerate() {
        emit_step(index, step_items, ctx);
    }
    emit_stepper(model, options, ctx);
}

fn step_file(index: usize) -> String {
    format!("step-{}.tsx", index + 1)
}

fn step_component(index: usize) -> String {
    format!("Step{}Fields", index + 1)
}

fn emit_step(index: usize, items: &[FormItem], ctx: &mut GenerationContext) {
    let file = step_file(index);
    let refs: Vec<&FormItem> = items.iter().collect();
    let arrays = arrays_of(&refs);
    let has_password = refs
        .iter()
        .flat_map(|i| i.descriptors())
        .any(|f| f.kind == FieldKind::Password);

    ctx.add_import(&file, "import type { UseFormReturn } from \"react-hook-form\";");
    ctx.add_import(&file, "import type { FormSchema } from \"./schema\";");
    ctx.add_import(
        &file,
        "import { FieldGroup } from \"@/components/ui/field-group\";",
    );
    ctx.add_import(
        &file,
        "import { Form, FormControl, FormDescription, FormField, FormItem, FormLabel, FormMessage } from \"@/components/ui/form\";",
    );
    ctx.add_import(&file, "import { Button } from \"@/components/ui/button\";");
    if !arrays.is_empty() {
        ctx.add_import(&file, "import { useFieldArray } from \"react-hook-form\";");
        ctx.add_import(&file, "import { Plus, Trash2 } from \"lucide-react\";");
    }
    if has_password {
        ctx.add_import(&file, "import * as React from \"react\";");
    }
    for item in &refs {
        for field in item.descriptors() {
            for import in kind_imports(&field.kind) {
                ctx.add_import(&file, import);
            }
        }
    }

    let mut out = String::new();
    out.push_str("\"use client\";\n\n");
    out.push_str(&format!(
        "export function {}({{ form }}: {{ form: UseFormReturn<FormSchema> }}) {{\n",
        step_component(index)
    ));
    if has_password {
        out.push_str("  const [showPassword, setShowPassword] = React.useState(false);\n\n");
    }
    for array in &arrays {
        out.push_str("  ");
        out.push_str(&array_hook_decl(array));
        out.push('\n');
    }
    if !arrays.is_empty() {
        out.push('\n');
    }
    out.push_str("  return (\n");
    out.push_str("    <FieldGroup className=\"space-y-6\">\n");
    out.push_str(&render_items(&refs, 3));
    out.push_str("    </FieldGroup>\n");
    out.push_str("  );\n");
    out.push_str("}\n");

    ctx.set_file(file, out);
}

fn emit_stepper(model: &FormModel, options: &GenerateOptions, ctx: &mut GenerationContext) {
    let steps = model.step_slices();
    let last = steps.len().saturating_sub(1);
    let resolver = resolver_name(options.schema_library);

    ctx.add_import(FORM_FILE, "import * as React from \"react\";");
    ctx.add_import(FORM_FILE, "import { useForm } from \"react-hook-form\";");
    ctx.add_import(FORM_FILE, resolver_import(options.schema_library));
    ctx.add_import(
        FORM_FILE,
        target_for(options.schema_library).import_line(),
    );
    ctx.add_import(
        FORM_FILE,
        "import { formSchema, stepSchemas, type FormSchema } from \"./schema\";",
    );
    ctx.add_import(FORM_FILE, "import type { StepSchemas } from \"./schema\";");
    ctx.add_import(FORM_FILE, "import { toast } from \"sonner\";");
    ctx.add_import(FORM_FILE, "import { Button } from \"@/components/ui/button\";");
    ctx.add_import(FORM_FILE, "import { Form } from \"@/components/ui/form\";");
    if options.focus_on_error {
        ctx.add_import(
            FORM_FILE,
            "import type { FieldErrors } from \"react-hook-form\";",
        );
    }
    for index in 0..steps.len() {
        ctx.add_import(
            FORM_FILE,
            format!(
                "import {{ {} }} from \"./step-{}\";",
                step_component(index),
                index + 1
            ),
        );
    }

    let defaults = derive_model_defaults(model);

    let mut out = String::new();
    out.push_str("\"use client\";\n\n");

    // One key list per step, aligned with the stepSchemas tuple so a
    // step/schema mismatch fails to typecheck.
    out.push_str(
        "const stepFields: { [Index in keyof StepSchemas]: (keyof FormSchema)[] } = [\n",
    );
    for step_items in &steps {
        let keys: Vec<String> = step_items
            .iter()
            .filter_map(|i| i.value_key())
            .map(|k| format!("\"{k}\""))
            .collect();
        out.push_str(&format!("  [{}],\n", keys.join(", ")));
    }
    out.push_str("];\n\n");

    out.push_str("export function GeneratedForm() {\n");
    out.push_str("  const [step, setStep] = React.useState(0);\n\n");
    out.push_str("  const form = useForm<FormSchema>({\n");
    out.push_str(&format!("    resolver: {resolver}(formSchema),\n"));
    out.push_str(&format!(
        "    defaultValues: {},\n",
        defaults.to_source_indented(2)
    ));
    out.push_str("  });\n\n");

    out.push_str("  async function next() {\n");
    out.push_str("    const valid = await form.trigger(stepFields[step]);\n");
    out.push_str("    if (valid) {\n");
    out.push_str("      setStep((current) => current + 1);\n");
    out.push_str("    }\n");
    out.push_str("  }\n\n");

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
    for index in 0..steps.len() {
        out.push_str(&format!(
            "        {{step === {index} && <{} form={{form}} />}}\n",
            step_component(index)
        ));
    }
    out.push_str("        <div className=\"flex justify-between\">\n");
    out.push_str(
        "          <Button type=\"button\" variant=\"outline\" disabled={step === 0} onClick={() => setStep((current) => current - 1)}>\n",
    );
    out.push_str("            Previous\n");
    out.push_str("          </Button>\n");
    out.push_str(&format!("          {{step < {last} ? (\n"));
    out.push_str("            <Button type=\"button\" onClick={next}>\n");
    out.push_str("              Next\n");
    out.push_str("            </Button>\n");
    out.push_str("          ) : (\n");
    out.push_str("            <Button type=\"submit\">Submit</Button>\n");
    out.push_str("          )}\n");
    out.push_str("        </div>\n");
    out.push_str("      </form>\n");
    out.push_str("    </Form>\n");
    out.push_str("  );\n");
    out.push_str("}\n");

    ctx.set_file(FORM_FILE, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_model::{FieldDescriptor, FormElement, FormStep};

    fn step(id: &str, names: &[&str]) -> FormStep {
        FormStep {
            id: id.to_string(),
            step_fields: names
                .iter()
                .map(|n| {
                    FormItem::Element(FormElement::Field(FieldDescriptor::new(
                        format!("id-{n}"),
                        *n,
                        FieldKind::Input,
                    )))
                })
                .collect(),
        }
    }

    #[test]
    fn step_field_lists_follow_step_order() {
        let model = FormModel::Stepped(vec![step("s1", &["name"]), step("s2", &["email", "phone"])]);
        let mut ctx = GenerationContext::new();
        emit(&model, &GenerateOptions::default(), &mut ctx);

        let form = ctx.get_file(FORM_FILE).unwrap();
        assert!(form.contains("[\"name\"],"));
        assert!(form.contains("[\"email\", \"phone\"],"));
        assert!(form.contains("{step === 0 && <Step1Fields form={form} />}"));
        assert!(form.contains("{step < 1 ? ("));
    }

    #[test]
    fn each_step_gets_its_own_file() {
        let model = FormModel::Stepped(vec![step("s1", &["a"]), step("s2", &["b"])]);
        let mut ctx = GenerationContext::new();
        emit(&model, &GenerateOptions::default(), &mut ctx);

        assert!(ctx.has_file("step-1.tsx"));
        assert!(ctx.has_file("step-2.tsx"));
        let step2 = ctx.get_file("step-2.tsx").unwrap();
        assert!(step2.contains("export function Step2Fields"));
        assert!(step2.contains("name=\"b\""));
    }
}
