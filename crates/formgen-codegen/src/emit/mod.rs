//! Form code emission.
//!
//! Two passes: the schema pass writes the standalone schema module, the
//! component pass writes the form component(s) and registers their
//! imports on the context. The component pass depends on the schema pass
//! so it can read which library was emitted.

mod multi;
mod render;
mod single;

pub use render::{
    array_hook_decl, array_hook_ident, entry_field_name, render_array, render_element,
    render_field, render_items, FieldName,
};

use formgen_model::FormModel;

use crate::ir;
use crate::pass::{GenerationContext, Pass};
use crate::schema::target_for;
use crate::{CodegenError, GenerateOptions};

/// Emits `schema.ts`: the whole-form schema plus, for multi-step forms,
/// the step-sliced schema list.
pub struct SchemaModulePass {
    options: GenerateOptions,
}

impl SchemaModulePass {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }
}

impl Pass for SchemaModulePass {
    fn name(&self) -> &'static str {
        "schema-module"
    }

    fn run(&self, model: &FormModel, ctx: &mut GenerationContext) -> Result<(), CodegenError> {
        let target = target_for(self.options.schema_library);
        let rules = ir::lower_model(model);
        let mut module = target.schema_module(&rules);

        if model.is_multi_step() {
            // Step slicing: one independent object schema per step, each
            // holding exactly its own step's top-level keys.
            module.push('\n');
            module.push_str("export const stepSchemas = [\n");
            for step in ir::step_rules(model) {
                module.push_str(&format!("  {},\n", target.object_expr(&step, 1)));
            }
            module.push_str("] as const;\n");
            module.push('\n');
            module.push_str("export type StepSchemas = typeof stepSchemas;\n");
        }

        ctx.set_file("schema.ts", module);
        ctx.set_metadata("schema:library", self.options.schema_library.to_string());
        Ok(())
    }
}

/// Emits the form component: one file for single-step forms, a stepper
/// plus one field-group component per step for multi-step forms.
pub struct FormComponentPass {
    options: GenerateOptions,
}

impl FormComponentPass {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }
}

impl Pass for FormComponentPass {
    fn name(&self) -> &'static str {
        "form-component"
    }

    fn depends_on(&self) -> &[&'static str] {
        &["schema-module"]
    }

    fn run(&self, model: &FormModel, ctx: &mut GenerationContext) -> Result<(), CodegenError> {
        if model.is_multi_step() {
            multi::emit(model, &self.options, ctx);
        } else {
            single::emit(model, &self.options, ctx);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{generate_form_code, GenerateOptions, SchemaLibrary};
    use formgen_model::{
        ArrayEntry, FieldDescriptor, FieldKind, FormArray, FormElement, FormItem, FormModel,
        FormStep,
    };

    fn field(name: &str, kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor::new(format!("id-{name}"), name, kind)
    }

    fn item(descriptor: FieldDescriptor) -> FormItem {
        FormItem::Element(FormElement::Field(descriptor))
    }

    #[test]
    fn single_step_emits_schema_and_component() {
        let mut email = field("email", FieldKind::Input);
        email.variant = Some("email".to_string());
        email.required = true;
        let model = FormModel::Single(vec![item(email)]);

        let files = generate_form_code(&model, &GenerateOptions::default()).unwrap();
        let schema = files.get("schema.ts").unwrap();
        assert!(schema.contains("z.email()"));
        assert!(!schema.contains("email: z.email().optional()"));
        assert!(schema.contains("export const formSchema"));

        let form = files.get("form.tsx").unwrap();
        assert!(form.contains("\"use client\""));
        assert!(form.contains("useForm<FormSchema>"));
        assert!(form.contains("zodResolver(formSchema)"));
        assert!(form.contains("defaultValues"));
        assert!(form.contains("email: \"\""));
        assert!(form.contains("<Button type=\"submit\">Submit</Button>"));
        // Imports were injected after the directive.
        assert!(form.contains("import { z } from \"zod\";"));
    }

    #[test]
    fn focus_on_error_toggles_invalid_handler() {
        let model = FormModel::Single(vec![item(field("name", FieldKind::Input))]);

        let with = generate_form_code(&model, &GenerateOptions::default()).unwrap();
        let form = with.get("form.tsx").unwrap();
        assert!(form.contains("function onInvalid"));
        assert!(form.contains("handleSubmit(onSubmit, onInvalid)"));
        assert!(form.contains("querySelectorAll"));

        let options = GenerateOptions {
            focus_on_error: false,
            ..GenerateOptions::default()
        };
        let without = generate_form_code(&model, &options).unwrap();
        let form = without.get("form.tsx").unwrap();
        assert!(!form.contains("onInvalid"));
    }

    #[test]
    fn multi_step_emits_sliced_schemas_and_step_components() {
        let mut email = field("email", FieldKind::Input);
        email.variant = Some("email".to_string());
        let model = FormModel::Stepped(vec![
            FormStep {
                id: "s1".to_string(),
                step_fields: vec![item(field("name", FieldKind::Input))],
            },
            FormStep {
                id: "s2".to_string(),
                step_fields: vec![item(email)],
            },
        ]);

        let files = generate_form_code(&model, &GenerateOptions::default()).unwrap();

        let schema = files.get("schema.ts").unwrap();
        assert!(schema.contains("export const stepSchemas"));
        // Each step fragment contains exactly its own key.
        let fragments: Vec<&str> = schema
            .split("z.object({")
            .skip(2) // whole-form schema comes first
            .collect();
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].contains("name:") && !fragments[0].contains("email:"));
        assert!(fragments[1].contains("email:") && !fragments[1].contains("name:"));

        let form = files.get("form.tsx").unwrap();
        assert!(form.contains("Step1Fields"));
        assert!(form.contains("Step2Fields"));
        assert!(form.contains("form.trigger(stepFields[step])"));
        assert!(form.contains("Previous"));

        let step1 = files.get("step-1.tsx").unwrap();
        assert!(step1.contains("export function Step1Fields"));
        assert!(step1.contains("name=\"name\""));
        assert!(step1.contains("<FieldGroup"));
        assert!(!step1.contains("email"));
    }

    #[test]
    fn array_inside_step_renders_repeating_block() {
        let mut name = field("name", FieldKind::Input);
        name.required = true;
        let template = vec![FormElement::Field(name)];
        let model = FormModel::Stepped(vec![FormStep {
            id: "s1".to_string(),
            step_fields: vec![FormItem::Array(FormArray {
                id: "a1".to_string(),
                name: "users".to_string(),
                label: None,
                array_field: template.clone(),
                entries: vec![ArrayEntry {
                    id: "e1".to_string(),
                    fields: template,
                }],
            })],
        }]);

        let files = generate_form_code(&model, &GenerateOptions::default()).unwrap();
        let step = files.get("step-1.tsx").unwrap();
        assert!(step.contains("useFieldArray({ control: form.control, name: \"users\" })"));
        assert!(step.contains("name={`users[${index}].name`}"));
    }

    #[test]
    fn unrecognized_kind_never_fails_emission() {
        let model = FormModel::Single(vec![item(field(
            "sig",
            FieldKind::Other("Signature".to_string()),
        ))]);

        let files = generate_form_code(&model, &GenerateOptions::default()).unwrap();
        let form = files.get("form.tsx").unwrap();
        assert!(form.contains("<Signature {...field} />"));
        assert!(form.contains("import { Signature } from \"@/components/ui/signature\";"));

        let schema = files.get("schema.ts").unwrap();
        assert!(schema.contains("sig: z.string()"));
    }

    #[test]
    fn valibot_and_arktype_wire_their_resolvers() {
        let model = FormModel::Single(vec![item(field("name", FieldKind::Input))]);

        for (library, marker) in [
            (SchemaLibrary::Valibot, "valibotResolver(formSchema)"),
            (SchemaLibrary::Arktype, "arktypeResolver(formSchema)"),
        ] {
            let options = GenerateOptions {
                schema_library: library,
                ..GenerateOptions::default()
            };
            let files = generate_form_code(&model, &options).unwrap();
            let form = files.get("form.tsx").unwrap();
            assert!(form.contains(marker), "{form}");
        }
    }
}
