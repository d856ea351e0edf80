//! Core data model for formgen form definitions.
//!
//! The builder UI exchanges form definitions as JSON; this crate is the
//! typed boundary for that data. The generation core treats a [`FormModel`]
//! as an immutable snapshot; nothing here mutates a model after
//! deserialization.

use serde::{Deserialize, Serialize};

pub mod path;
pub mod validate;

pub use path::{FieldPath, PathSegment};
pub use validate::{is_generatable, validate, ModelIssue, Severity};

/// Field kinds supported by the builder.
///
/// Unrecognized kinds round-trip through [`FieldKind::Other`] so the
/// generators can fall back to the generic path without losing the
/// original discriminator string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Input,
    Password,
    Otp,
    Textarea,
    Checkbox,
    RadioGroup,
    ToggleGroup,
    Switch,
    Slider,
    Select,
    MultiSelect,
    DatePicker,
    Text,
    Separator,
    Other(String),
}

impl FieldKind {
    /// Returns the wire/discriminator string for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Input => "Input",
            FieldKind::Password => "Password",
            FieldKind::Otp => "OTP",
            FieldKind::Textarea => "Textarea",
            FieldKind::Checkbox => "Checkbox",
            FieldKind::RadioGroup => "RadioGroup",
            FieldKind::ToggleGroup => "ToggleGroup",
            FieldKind::Switch => "Switch",
            FieldKind::Slider => "Slider",
            FieldKind::Select => "Select",
            FieldKind::MultiSelect => "MultiSelect",
            FieldKind::DatePicker => "DatePicker",
            FieldKind::Text => "Text",
            FieldKind::Separator => "Separator",
            FieldKind::Other(name) => name,
        }
    }

    /// Returns true for purely presentational kinds that never carry a
    /// value, a default, or a schema entry.
    pub fn is_presentational(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Separator)
    }

    /// Returns true for kinds that offer a fixed set of choices.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            FieldKind::RadioGroup | FieldKind::ToggleGroup | FieldKind::Select | FieldKind::MultiSelect
        )
    }
}

impl From<String> for FieldKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Input" => FieldKind::Input,
            "Password" => FieldKind::Password,
            "OTP" => FieldKind::Otp,
            "Textarea" => FieldKind::Textarea,
            "Checkbox" => FieldKind::Checkbox,
            "RadioGroup" => FieldKind::RadioGroup,
            "ToggleGroup" => FieldKind::ToggleGroup,
            "Switch" => FieldKind::Switch,
            "Slider" => FieldKind::Slider,
            "Select" => FieldKind::Select,
            "MultiSelect" => FieldKind::MultiSelect,
            "DatePicker" => FieldKind::DatePicker,
            "Text" => FieldKind::Text,
            "Separator" => FieldKind::Separator,
            _ => FieldKind::Other(s),
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Input mode for text inputs (the `type` attribute of an `Input` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Text,
    Email,
    Number,
}

/// Selection mode for toggle groups (the `type` attribute of a
/// `ToggleGroup` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleMode {
    Single,
    Multiple,
}

/// A selectable option for choice fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A single form field as produced by the builder UI.
///
/// The `variant` attribute is shared wire real estate: for `Input` fields
/// it holds the input mode (`"email"`, `"number"`), for `ToggleGroup`
/// fields the selection mode (`"single"`, `"multiple"`). Use
/// [`FieldDescriptor::input_mode`] and [`FieldDescriptor::toggle_mode`]
/// for typed access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "fieldType")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Marks non-input presentational elements.
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl FieldDescriptor {
    /// Creates a descriptor with the attributes every kind shares.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            label: None,
            description: None,
            placeholder: None,
            required: false,
            is_static: false,
            options: vec![],
            min: None,
            max: None,
            step: None,
            variant: None,
        }
    }

    /// Returns true if this field never receives a default value or a
    /// schema entry.
    pub fn is_presentational(&self) -> bool {
        self.is_static || self.kind.is_presentational()
    }

    /// The input mode for `Input` fields. Unrecognized modes fall back to
    /// plain text.
    pub fn input_mode(&self) -> InputMode {
        match self.variant.as_deref() {
            Some("email") => InputMode::Email,
            Some("number") => InputMode::Number,
            _ => InputMode::Text,
        }
    }

    /// The selection mode for `ToggleGroup` fields. Defaults to single.
    pub fn toggle_mode(&self) -> ToggleMode {
        match self.variant.as_deref() {
            Some("multiple") => ToggleMode::Multiple,
            _ => ToggleMode::Single,
        }
    }

    /// Value of the first option, if any.
    pub fn first_option_value(&self) -> Option<&str> {
        self.options.first().map(|o| o.value.as_str())
    }

    /// The label shown above the field, falling back to the field name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A form element: a single field or an inline row of fields sharing one
/// visual line. The row form has no identity of its own, only positional
/// grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormElement {
    Field(FieldDescriptor),
    Row(Vec<FieldDescriptor>),
}

impl FormElement {
    /// All descriptors in this element, in render order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        match self {
            FormElement::Field(f) => std::slice::from_ref(f),
            FormElement::Row(fields) => fields,
        }
    }
}

/// One materialized repetition of a [`FormArray`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayEntry {
    pub id: String,
    pub fields: Vec<FormElement>,
}

/// A repeatable group of fields. `array_field` is the template defining
/// one entry's shape; `entries` are the repetitions currently added in
/// the builder. Entry fields must be name-compatible with the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormArray {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub array_field: Vec<FormElement>,
    #[serde(default)]
    pub entries: Vec<ArrayEntry>,
}

impl FormArray {
    /// Field names of the template, in order.
    pub fn template_names(&self) -> Vec<&str> {
        self.array_field
            .iter()
            .flat_map(|e| e.fields())
            .map(|f| f.name.as_str())
            .collect()
    }
}

/// A top-level item of a step or single-step form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormItem {
    Array(FormArray),
    Element(FormElement),
}

impl FormItem {
    /// All field descriptors reachable from this item, template fields
    /// included for arrays.
    pub fn descriptors(&self) -> Vec<&FieldDescriptor> {
        match self {
            FormItem::Element(e) => e.fields().iter().collect(),
            FormItem::Array(a) => a.array_field.iter().flat_map(|e| e.fields()).collect(),
        }
    }

    /// The runtime value key this item contributes, if any.
    pub fn value_key(&self) -> Option<&str> {
        match self {
            FormItem::Array(a) => Some(a.name.as_str()),
            FormItem::Element(FormElement::Field(f)) if !f.is_presentational() => {
                Some(f.name.as_str())
            }
            _ => None,
        }
    }
}

/// One page of a multi-step form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStep {
    pub id: String,
    pub step_fields: Vec<FormItem>,
}

/// A whole form: either a flat list of items or a list of steps. The two
/// representations are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormModel {
    Stepped(Vec<FormStep>),
    Single(Vec<FormItem>),
}

impl FormModel {
    pub fn is_multi_step(&self) -> bool {
        matches!(self, FormModel::Stepped(_))
    }

    /// Items of every step (or the flat list), flattened in form order.
    pub fn items(&self) -> Vec<&FormItem> {
        match self {
            FormModel::Single(items) => items.iter().collect(),
            FormModel::Stepped(steps) => {
                steps.iter().flat_map(|s| s.step_fields.iter()).collect()
            }
        }
    }

    /// Per-step item slices; a single-step form yields one slice.
    pub fn step_slices(&self) -> Vec<&[FormItem]> {
        match self {
            FormModel::Single(items) => vec![items.as_slice()],
            FormModel::Stepped(steps) => steps.iter().map(|s| s.step_fields.as_slice()).collect(),
        }
    }

    /// Every field descriptor in the form, arrays' template fields
    /// included. Used by the import resolver.
    pub fn descriptors(&self) -> Vec<&FieldDescriptor> {
        self.items().iter().flat_map(|i| i.descriptors()).collect()
    }

    /// Returns true if any item anywhere in the form is a [`FormArray`].
    pub fn has_array(&self) -> bool {
        self.items()
            .iter()
            .any(|i| matches!(i, FormItem::Array(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_kind_round_trips_unknown_strings() {
        let kind = FieldKind::from("Signature".to_string());
        assert_eq!(kind, FieldKind::Other("Signature".to_string()));
        assert_eq!(kind.as_str(), "Signature");
        assert_eq!(String::from(kind), "Signature");
    }

    #[test]
    fn field_kind_known_strings() {
        assert_eq!(FieldKind::from("OTP".to_string()), FieldKind::Otp);
        assert_eq!(FieldKind::DatePicker.as_str(), "DatePicker");
    }

    #[test]
    fn deserialize_field() {
        let json = r#"{
            "id": "f1",
            "name": "email",
            "fieldType": "Input",
            "type": "email",
            "required": true
        }"#;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(field.kind, FieldKind::Input);
        assert_eq!(field.input_mode(), InputMode::Email);
        assert!(field.required);
        assert!(!field.is_static);
    }

    #[test]
    fn deserialize_untagged_items() {
        let json = r#"[
            {"id": "f1", "name": "name", "fieldType": "Input"},
            [
                {"id": "f2", "name": "first", "fieldType": "Input"},
                {"id": "f3", "name": "last", "fieldType": "Input"}
            ],
            {
                "id": "a1",
                "name": "users",
                "arrayField": [{"id": "t1", "name": "user", "fieldType": "Input"}],
                "entries": [{"id": "e1", "fields": [{"id": "e1f", "name": "user", "fieldType": "Input"}]}]
            }
        ]"#;
        let items: Vec<FormItem> = serde_json::from_str(json).unwrap();
        assert!(matches!(&items[0], FormItem::Element(FormElement::Field(_))));
        assert!(matches!(&items[1], FormItem::Element(FormElement::Row(r)) if r.len() == 2));
        assert!(matches!(&items[2], FormItem::Array(a) if a.name == "users"));
    }

    #[test]
    fn deserialize_stepped_model() {
        let json = r#"[
            {"id": "s1", "stepFields": [{"id": "f1", "name": "name", "fieldType": "Input"}]},
            {"id": "s2", "stepFields": [{"id": "f2", "name": "email", "fieldType": "Input", "type": "email"}]}
        ]"#;
        let model: FormModel = serde_json::from_str(json).unwrap();
        assert!(model.is_multi_step());
        assert_eq!(model.step_slices().len(), 2);
        assert_eq!(model.descriptors().len(), 2);
    }

    #[test]
    fn deserialize_flat_model() {
        let json = r#"[{"id": "f1", "name": "name", "fieldType": "Input"}]"#;
        let model: FormModel = serde_json::from_str(json).unwrap();
        assert!(!model.is_multi_step());
        assert_eq!(model.step_slices().len(), 1);
    }

    #[test]
    fn presentational_fields() {
        let mut field = FieldDescriptor::new("f1", "title", FieldKind::Text);
        assert!(field.is_presentational());

        field = FieldDescriptor::new("f2", "name", FieldKind::Input);
        assert!(!field.is_presentational());
        field.is_static = true;
        assert!(field.is_presentational());
    }

    #[test]
    fn toggle_mode_defaults_to_single() {
        let mut field = FieldDescriptor::new("f1", "size", FieldKind::ToggleGroup);
        assert_eq!(field.toggle_mode(), ToggleMode::Single);
        field.variant = Some("multiple".to_string());
        assert_eq!(field.toggle_mode(), ToggleMode::Multiple);
    }

    #[test]
    fn value_keys_skip_presentational() {
        let items = vec![
            FormItem::Element(FormElement::Field(FieldDescriptor::new(
                "f1",
                "name",
                FieldKind::Input,
            ))),
            FormItem::Element(FormElement::Field(FieldDescriptor::new(
                "f2",
                "divider",
                FieldKind::Separator,
            ))),
        ];
        let keys: Vec<_> = items.iter().filter_map(|i| i.value_key()).collect();
        assert_eq!(keys, vec!["name"]);
    }
}
