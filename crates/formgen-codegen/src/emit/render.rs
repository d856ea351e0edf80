//! Per-field JSX rendering, shared by the single-step and multi-step
//! emitters.

use formgen_model::{
    FieldDescriptor, FieldKind, FieldPath, FormArray, FormElement, FormItem, InputMode,
    ToggleMode,
};

use crate::defaults::derive_entry_defaults;

/// How a rendered field resolves its runtime name.
#[derive(Debug, Clone, Copy)]
pub enum FieldName<'a> {
    /// A top-level field: `name="email"`.
    Static(&'a str),
    /// A field inside an array entry: `` name={`users[${index}].email`} ``.
    Entry { array: &'a str, field: &'a str },
}

impl FieldName<'_> {
    /// The JSX `name` attribute. The entry form must match
    /// [`FieldPath::entry_field`] canonicalization exactly; that is what
    /// the runtime array binding expects.
    pub fn attr(&self) -> String {
        match self {
            FieldName::Static(name) => format!("name=\"{name}\""),
            FieldName::Entry { array, field } => {
                format!("name={{`{array}[${{index}}].{field}`}}")
            }
        }
    }
}

/// Renders the JSX for one field-array entry name at a concrete index;
/// exists so tests can pin the template to the canonical path format.
pub fn entry_field_name(array: &str, index: usize, field: &str) -> String {
    FieldPath::entry_field(array, index, field).to_string()
}

fn push(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(text);
    out.push('\n');
}

/// Renders a list of items at the given depth.
pub fn render_items(items: &[&FormItem], depth: usize) -> String {
    let mut out = String::new();
    for item in items {
        match item {
            FormItem::Element(element) => out.push_str(&render_element(element, depth)),
            FormItem::Array(array) => out.push_str(&render_array(array, depth)),
        }
    }
    out
}

/// Renders a single element; inline rows get a flex wrapper.
pub fn render_element(element: &FormElement, depth: usize) -> String {
    match element {
        FormElement::Field(field) => render_field(field, FieldName::Static(&field.name), depth),
        FormElement::Row(fields) => {
            let mut out = String::new();
            push(&mut out, depth, "<div className=\"flex w-full gap-4\">");
            for field in fields {
                out.push_str(&render_field(
                    field,
                    FieldName::Static(&field.name),
                    depth + 1,
                ));
            }
            push(&mut out, depth, "</div>");
            out
        }
    }
}

/// The `useFieldArray` hook variable for an array.
pub fn array_hook_ident(array: &FormArray) -> String {
    let sanitized: String = array
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{sanitized}FieldArray")
}

/// The hook declaration line for an array.
pub fn array_hook_decl(array: &FormArray) -> String {
    format!(
        "const {} = useFieldArray({{ control: form.control, name: \"{}\" }});",
        array_hook_ident(array),
        array.name
    )
}

/// All arrays reachable from an item list, in order.
pub fn arrays_of<'a>(items: &[&'a FormItem]) -> Vec<&'a FormArray> {
    items
        .iter()
        .filter_map(|i| match i {
            FormItem::Array(a) => Some(a),
            _ => None,
        })
        .collect()
}

/// Renders a repeatable array block: mapped entries plus push/remove
/// controls. The remove button disables at one entry.
pub fn render_array(array: &FormArray, depth: usize) -> String {
    let hook = array_hook_ident(array);
    let entry_defaults = derive_entry_defaults(&array.array_field).to_inline_source();
    let mut out = String::new();

    if let Some(label) = &array.label {
        push(
            &mut out,
            depth,
            &format!("<h3 className=\"text-sm font-medium\">{label}</h3>"),
        );
    }
    push(
        &mut out,
        depth,
        &format!("{{{hook}.fields.map((entry, index) => ("),
    );
    push(
        &mut out,
        depth + 1,
        "<div key={entry.id} className=\"space-y-4 rounded-md border p-4\">",
    );
    for element in &array.array_field {
        for field in element.fields() {
            out.push_str(&render_field(
                field,
                FieldName::Entry {
                    array: &array.name,
                    field: &field.name,
                },
                depth + 2,
            ));
        }
    }
    push(&mut out, depth + 1, "</div>");
    push(&mut out, depth, "))}");

    push(&mut out, depth, "<div className=\"flex gap-2\">");
    push(
        &mut out,
        depth + 1,
        &format!(
            "<Button type=\"button\" variant=\"outline\" size=\"sm\" onClick={{() => {hook}.append({entry_defaults})}}>"
        ),
    );
    push(&mut out, depth + 2, "<Plus /> Add");
    push(&mut out, depth + 1, "</Button>");
    push(
        &mut out,
        depth + 1,
        &format!(
            "<Button type=\"button\" variant=\"outline\" size=\"sm\" disabled={{{hook}.fields.length <= 1}} onClick={{() => {hook}.remove({hook}.fields.length - 1)}}>"
        ),
    );
    push(&mut out, depth + 2, "<Trash2 /> Remove");
    push(&mut out, depth + 1, "</Button>");
    push(&mut out, depth, "</div>");

    out
}

/// Renders one field. Presentational kinds render without a `FormField`
/// wrapper; checkbox and switch use the side-by-side label skeleton.
pub fn render_field(field: &FieldDescriptor, name: FieldName<'_>, depth: usize) -> String {
    match &field.kind {
        FieldKind::Text => {
            let mut out = String::new();
            push(&mut out, depth, "<div className=\"space-y-1\">");
            if let Some(label) = &field.label {
                push(
                    &mut out,
                    depth + 1,
                    &format!("<h3 className=\"text-base font-medium\">{label}</h3>"),
                );
            }
            if let Some(description) = &field.description {
                push(
                    &mut out,
                    depth + 1,
                    &format!("<p className=\"text-sm text-muted-foreground\">{description}</p>"),
                );
            }
            push(&mut out, depth, "</div>");
            out
        }
        FieldKind::Separator => {
            let mut out = String::new();
            push(&mut out, depth, "<Separator />");
            out
        }
        FieldKind::Checkbox | FieldKind::Switch => render_inline_field(field, name, depth),
        _ => render_stacked_field(field, name, depth),
    }
}

/// The standard skeleton: label above, control, description, message.
fn render_stacked_field(field: &FieldDescriptor, name: FieldName<'_>, depth: usize) -> String {
    let mut out = String::new();
    push(&mut out, depth, "<FormField");
    push(&mut out, depth + 1, "control={form.control}");
    push(&mut out, depth + 1, &name.attr());
    push(&mut out, depth + 1, "render={({ field }) => (");
    push(&mut out, depth + 2, "<FormItem>");
    push(
        &mut out,
        depth + 3,
        &format!("<FormLabel>{}</FormLabel>", field.display_label()),
    );

    // Choice widgets own the FormControl placement; the rest wrap the
    // control directly.
    match &field.kind {
        FieldKind::Select => out.push_str(&render_select(field, depth + 3)),
        FieldKind::MultiSelect => out.push_str(&render_multi_select(field, depth + 3)),
        FieldKind::DatePicker => out.push_str(&render_date_picker(field, depth + 3)),
        _ => {
            push(&mut out, depth + 3, "<FormControl>");
            out.push_str(&render_control(field, depth + 4));
            push(&mut out, depth + 3, "</FormControl>");
        }
    }

    if let Some(description) = &field.description {
        push(
            &mut out,
            depth + 3,
            &format!("<FormDescription>{description}</FormDescription>"),
        );
    }
    push(&mut out, depth + 3, "<FormMessage />");
    push(&mut out, depth + 2, "</FormItem>");
    push(&mut out, depth + 1, ")}");
    push(&mut out, depth, "/>");
    out
}

/// Checkbox/switch skeleton: control first, label beside it.
fn render_inline_field(field: &FieldDescriptor, name: FieldName<'_>, depth: usize) -> String {
    let control = match field.kind {
        FieldKind::Switch => {
            "<Switch checked={field.value} onCheckedChange={field.onChange} />"
        }
        _ => "<Checkbox checked={field.value} onCheckedChange={field.onChange} />",
    };

    let mut out = String::new();
    push(&mut out, depth, "<FormField");
    push(&mut out, depth + 1, "control={form.control}");
    push(&mut out, depth + 1, &name.attr());
    push(&mut out, depth + 1, "render={({ field }) => (");
    push(
        &mut out,
        depth + 2,
        "<FormItem className=\"flex flex-row items-start gap-3 space-y-0\">",
    );
    push(&mut out, depth + 3, "<FormControl>");
    push(&mut out, depth + 4, control);
    push(&mut out, depth + 3, "</FormControl>");
    push(&mut out, depth + 3, "<div className=\"space-y-1 leading-none\">");
    push(
        &mut out,
        depth + 4,
        &format!("<FormLabel>{}</FormLabel>", field.display_label()),
    );
    if let Some(description) = &field.description {
        push(
            &mut out,
            depth + 4,
            &format!("<FormDescription>{description}</FormDescription>"),
        );
    }
    push(&mut out, depth + 4, "<FormMessage />");
    push(&mut out, depth + 3, "</div>");
    push(&mut out, depth + 2, "</FormItem>");
    push(&mut out, depth + 1, ")}");
    push(&mut out, depth, "/>");
    out
}

fn placeholder_attr(field: &FieldDescriptor) -> String {
    field
        .placeholder
        .as_ref()
        .map(|p| format!(" placeholder=\"{p}\""))
        .unwrap_or_default()
}

fn render_control(field: &FieldDescriptor, depth: usize) -> String {
    let mut out = String::new();
    match &field.kind {
        FieldKind::Input => {
            let type_attr = match field.input_mode() {
                InputMode::Email => " type=\"email\"",
                InputMode::Number => " type=\"number\"",
                InputMode::Text => "",
            };
            push(
                &mut out,
                depth,
                &format!("<Input{}{} {{...field}} />", placeholder_attr(field), type_attr),
            );
        }
        FieldKind::Password => {
            push(&mut out, depth, "<InputGroup>");
            push(
                &mut out,
                depth + 1,
                &format!(
                    "<InputGroupInput type={{showPassword ? \"text\" : \"password\"}}{} {{...field}} />",
                    placeholder_attr(field)
                ),
            );
            push(&mut out, depth + 1, "<InputGroupAddon align=\"inline-end\">");
            push(
                &mut out,
                depth + 2,
                "<InputGroupButton size=\"icon-xs\" onClick={() => setShowPassword((current) => !current)}>",
            );
            push(&mut out, depth + 3, "{showPassword ? <EyeOff /> : <Eye />}");
            push(&mut out, depth + 2, "</InputGroupButton>");
            push(&mut out, depth + 1, "</InputGroupAddon>");
            push(&mut out, depth, "</InputGroup>");
        }
        FieldKind::Otp => {
            push(&mut out, depth, "<InputOTP maxLength={6} {...field}>");
            push(&mut out, depth + 1, "<InputOTPGroup>");
            for slot in 0..3 {
                push(&mut out, depth + 2, &format!("<InputOTPSlot index={{{slot}}} />"));
            }
            push(&mut out, depth + 1, "</InputOTPGroup>");
            push(&mut out, depth + 1, "<InputOTPSeparator />");
            push(&mut out, depth + 1, "<InputOTPGroup>");
            for slot in 3..6 {
                push(&mut out, depth + 2, &format!("<InputOTPSlot index={{{slot}}} />"));
            }
            push(&mut out, depth + 1, "</InputOTPGroup>");
            push(&mut out, depth, "</InputOTP>");
        }
        FieldKind::Textarea => {
            push(
                &mut out,
                depth,
                &format!(
                    "<Textarea{} className=\"resize-none\" {{...field}} />",
                    placeholder_attr(field)
                ),
            );
        }
        FieldKind::RadioGroup => {
            push(
                &mut out,
                depth,
                "<RadioGroup onValueChange={field.onChange} defaultValue={field.value} className=\"flex flex-col gap-2\">",
            );
            for option in &field.options {
                push(
                    &mut out,
                    depth + 1,
                    "<FormItem className=\"flex items-center gap-3 space-y-0\">",
                );
                push(&mut out, depth + 2, "<FormControl>");
                push(
                    &mut out,
                    depth + 3,
                    &format!("<RadioGroupItem value=\"{}\" />", option.value),
                );
                push(&mut out, depth + 2, "</FormControl>");
                push(
                    &mut out,
                    depth + 2,
                    &format!("<FormLabel className=\"font-normal\">{}</FormLabel>", option.label),
                );
                push(&mut out, depth + 1, "</FormItem>");
            }
            push(&mut out, depth, "</RadioGroup>");
        }
        FieldKind::ToggleGroup => {
            let mode = match field.toggle_mode() {
                ToggleMode::Multiple => "multiple",
                ToggleMode::Single => "single",
            };
            push(
                &mut out,
                depth,
                &format!(
                    "<ToggleGroup type=\"{mode}\" variant=\"outline\" onValueChange={{field.onChange}} defaultValue={{field.value}}>"
                ),
            );
            for option in &field.options {
                push(
                    &mut out,
                    depth + 1,
                    &format!(
                        "<ToggleGroupItem value=\"{}\">{}</ToggleGroupItem>",
                        option.value, option.label
                    ),
                );
            }
            push(&mut out, depth, "</ToggleGroup>");
        }
        FieldKind::Slider => {
            let min = field.min.unwrap_or(0.0);
            let max = field.max.unwrap_or(100.0);
            let step = field.step.unwrap_or(1.0);
            push(
                &mut out,
                depth,
                &format!(
                    "<Slider min={{{}}} max={{{}}} step={{{}}} value={{[field.value]}} onValueChange={{(values) => field.onChange(values[0])}} />",
                    crate::defaults::format_number(min),
                    crate::defaults::format_number(max),
                    crate::defaults::format_number(step)
                ),
            );
        }
        FieldKind::Other(kind) => {
            // Generic fallback component, matching the generic import.
            push(&mut out, depth, &format!("<{kind} {{...field}} />"));
        }
        // Handled by dedicated renderers or skeletons.
        _ => {}
    }
    out
}

fn render_select(field: &FieldDescriptor, depth: usize) -> String {
    let placeholder = field.placeholder.as_deref().unwrap_or("Select an option");
    let mut out = String::new();
    push(
        &mut out,
        depth,
        "<Select onValueChange={field.onChange} defaultValue={field.value}>",
    );
    push(&mut out, depth + 1, "<FormControl>");
    push(&mut out, depth + 2, "<SelectTrigger className=\"w-full\">");
    push(
        &mut out,
        depth + 3,
        &format!("<SelectValue placeholder=\"{placeholder}\" />"),
    );
    push(&mut out, depth + 2, "</SelectTrigger>");
    push(&mut out, depth + 1, "</FormControl>");
    push(&mut out, depth + 1, "<SelectContent>");
    for option in &field.options {
        push(
            &mut out,
            depth + 2,
            &format!("<SelectItem value=\"{}\">{}</SelectItem>", option.value, option.label),
        );
    }
    push(&mut out, depth + 1, "</SelectContent>");
    push(&mut out, depth, "</Select>");
    out
}

fn render_multi_select(field: &FieldDescriptor, depth: usize) -> String {
    let placeholder = field.placeholder.as_deref().unwrap_or("Select options");
    let mut out = String::new();
    push(
        &mut out,
        depth,
        "<MultiSelect values={field.value} onValuesChange={field.onChange}>",
    );
    push(&mut out, depth + 1, "<FormControl>");
    push(&mut out, depth + 2, "<MultiSelectTrigger className=\"w-full\">");
    push(
        &mut out,
        depth + 3,
        &format!("<MultiSelectValue placeholder=\"{placeholder}\" />"),
    );
    push(&mut out, depth + 2, "</MultiSelectTrigger>");
    push(&mut out, depth + 1, "</FormControl>");
    push(&mut out, depth + 1, "<MultiSelectContent>");
    for option in &field.options {
        push(
            &mut out,
            depth + 2,
            &format!(
                "<MultiSelectItem value=\"{}\">{}</MultiSelectItem>",
                option.value, option.label
            ),
        );
    }
    push(&mut out, depth + 1, "</MultiSelectContent>");
    push(&mut out, depth, "</MultiSelect>");
    out
}

fn render_date_picker(field: &FieldDescriptor, depth: usize) -> String {
    let placeholder = field.placeholder.as_deref().unwrap_or("Pick a date");
    let mut out = String::new();
    push(&mut out, depth, "<Popover>");
    push(&mut out, depth + 1, "<PopoverTrigger asChild>");
    push(&mut out, depth + 2, "<FormControl>");
    push(
        &mut out,
        depth + 3,
        "<Button variant=\"outline\" className=\"w-full justify-start font-normal\">",
    );
    push(
        &mut out,
        depth + 4,
        &format!("{{field.value ? format(field.value, \"PPP\") : <span>{placeholder}</span>}}"),
    );
    push(
        &mut out,
        depth + 4,
        "<CalendarIcon className=\"ml-auto h-4 w-4 opacity-50\" />",
    );
    push(&mut out, depth + 3, "</Button>");
    push(&mut out, depth + 2, "</FormControl>");
    push(&mut out, depth + 1, "</PopoverTrigger>");
    push(
        &mut out,
        depth + 1,
        "<PopoverContent className=\"w-auto p-0\" align=\"start\">",
    );
    push(
        &mut out,
        depth + 2,
        "<Calendar mode=\"single\" selected={field.value} onSelect={field.onChange} />",
    );
    push(&mut out, depth + 1, "</PopoverContent>");
    push(&mut out, depth, "</Popover>");
    out
}
