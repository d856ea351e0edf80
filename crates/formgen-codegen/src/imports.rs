//! Import resolution for generated components.
//!
//! Deterministic set semantics: the same model always yields the same
//! sorted import set, duplicates collapse. The table is keyed by field
//! kind; kinds with no entry fall back to a generic component import
//! named after the kind.

use std::collections::BTreeSet;

use formgen_model::{FieldKind, FormItem, FormModel};

use crate::schema::target_for;
use crate::SchemaLibrary;

/// Computes the import set for a whole model.
pub fn resolve_model_imports(
    model: &FormModel,
    library: SchemaLibrary,
) -> BTreeSet<String> {
    resolve_imports(&model.items(), library, model.is_multi_step())
}

/// Computes the deduplicated import set for a list of items.
pub fn resolve_imports(
    items: &[&FormItem],
    library: SchemaLibrary,
    multi_step: bool,
) -> BTreeSet<String> {
    let mut imports = BTreeSet::new();

    // Always present: schema library, generated schema module, toast,
    // hook-form wiring and the base form scaffolding.
    imports.insert(target_for(library).import_line().to_string());
    imports.insert(resolver_import(library).to_string());
    imports.insert("import { formSchema, type FormSchema } from \"./schema\";".to_string());
    imports.insert("import { toast } from \"sonner\";".to_string());
    imports.insert("import { useForm } from \"react-hook-form\";".to_string());
    imports.insert("import { Button } from \"@/components/ui/button\";".to_string());
    imports.insert(
        "import { Form, FormControl, FormDescription, FormField, FormItem, FormLabel, FormMessage } from \"@/components/ui/form\";"
            .to_string(),
    );

    if multi_step {
        imports.insert("import type { StepSchemas } from \"./schema\";".to_string());
        imports.insert(
            "import { FieldGroup } from \"@/components/ui/field-group\";".to_string(),
        );
    }

    for item in items {
        if let FormItem::Array(_) = item {
            imports.insert("import { useFieldArray } from \"react-hook-form\";".to_string());
            imports.insert("import { Plus, Trash2 } from \"lucide-react\";".to_string());
        }
        for field in item.descriptors() {
            for import in kind_imports(&field.kind) {
                imports.insert(import);
            }
        }
    }

    imports
}

/// The hook-form resolver import for a schema library.
pub fn resolver_import(library: SchemaLibrary) -> &'static str {
    match library {
        SchemaLibrary::Zod => {
            "import { zodResolver } from \"@hookform/resolvers/zod\";"
        }
        SchemaLibrary::Valibot => {
            "import { valibotResolver } from \"@hookform/resolvers/valibot\";"
        }
        SchemaLibrary::Arktype => {
            "import { arktypeResolver } from \"@hookform/resolvers/arktype\";"
        }
    }
}

/// The resolver function name paired with [`resolver_import`].
pub fn resolver_name(library: SchemaLibrary) -> &'static str {
    match library {
        SchemaLibrary::Zod => "zodResolver",
        SchemaLibrary::Valibot => "valibotResolver",
        SchemaLibrary::Arktype => "arktypeResolver",
    }
}

pub(crate) fn kind_imports(kind: &FieldKind) -> Vec<String> {
    let fixed: &[&str] = match kind {
        FieldKind::Input => &["import { Input } from \"@/components/ui/input\";"],
        FieldKind::Password => &[
            "import { InputGroup, InputGroupAddon, InputGroupButton, InputGroupInput } from \"@/components/ui/input-group\";",
            "import { Eye, EyeOff } from \"lucide-react\";",
        ],
        FieldKind::Otp => &[
            "import { InputOTP, InputOTPGroup, InputOTPSeparator, InputOTPSlot } from \"@/components/ui/input-otp\";",
        ],
        FieldKind::Textarea => &["import { Textarea } from \"@/components/ui/textarea\";"],
        FieldKind::Checkbox => &["import { Checkbox } from \"@/components/ui/checkbox\";"],
        FieldKind::RadioGroup => &[
            "import { RadioGroup, RadioGroupItem } from \"@/components/ui/radio-group\";",
        ],
        FieldKind::ToggleGroup => &[
            "import { ToggleGroup, ToggleGroupItem } from \"@/components/ui/toggle-group\";",
        ],
        FieldKind::Switch => &["import { Switch } from \"@/components/ui/switch\";"],
        FieldKind::Slider => &["import { Slider } from \"@/components/ui/slider\";"],
        FieldKind::Select => &[
            "import { Select, SelectContent, SelectItem, SelectTrigger, SelectValue } from \"@/components/ui/select\";",
        ],
        FieldKind::MultiSelect => &[
            "import { MultiSelect, MultiSelectContent, MultiSelectItem, MultiSelectTrigger, MultiSelectValue } from \"@/components/ui/multi-select\";",
        ],
        FieldKind::DatePicker => &[
            "import { Calendar } from \"@/components/ui/calendar\";",
            "import { Popover, PopoverContent, PopoverTrigger } from \"@/components/ui/popover\";",
            "import { format } from \"date-fns\";",
            "import { CalendarIcon } from \"lucide-react\";",
        ],
        FieldKind::Separator => &["import { Separator } from \"@/components/ui/separator\";"],
        FieldKind::Text => &[],
        FieldKind::Other(name) => {
            // Generic fallback: `{Kind}` component keyed by lower-cased kind.
            return vec![format!(
                "import {{ {} }} from \"@/components/ui/{}\";",
                name,
                name.to_lowercase()
            )];
        }
    };
    fixed.iter().map(|s| s.to_string()).collect()
}
