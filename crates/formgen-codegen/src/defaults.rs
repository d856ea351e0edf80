//! Default-value derivation.
//!
//! Computes the initial value for every non-presentational field and
//! renders it two ways: as a runtime JSON value and as a JavaScript
//! object literal for embedding in generated source. The two forms agree
//! value-for-value.

use formgen_model::{FieldDescriptor, FieldKind, FormElement, FormItem, FormModel, ToggleMode};

/// A derived default value.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Str(String),
    Bool(bool),
    Num(f64),
    List(Vec<DefaultValue>),
    Object(DefaultMap),
}

impl DefaultValue {
    /// Renders this value as a JavaScript literal.
    pub fn to_source(&self) -> String {
        self.render(0)
    }

    fn render(&self, indent: usize) -> String {
        match self {
            DefaultValue::Str(s) => format!("\"{}\"", escape_js_string(s)),
            DefaultValue::Bool(b) => b.to_string(),
            DefaultValue::Num(n) => format_number(*n),
            DefaultValue::List(items) => {
                if items.is_empty() {
                    "[]".to_string()
                } else {
                    let inner: Vec<String> = items.iter().map(|v| v.render(indent)).collect();
                    format!("[{}]", inner.join(", "))
                }
            }
            DefaultValue::Object(map) => map.render(indent),
        }
    }

    /// The runtime form of this value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DefaultValue::Str(s) => serde_json::Value::String(s.clone()),
            DefaultValue::Bool(b) => serde_json::Value::Bool(*b),
            DefaultValue::Num(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            DefaultValue::List(items) => {
                serde_json::Value::Array(items.iter().map(|v| v.to_json()).collect())
            }
            DefaultValue::Object(map) => map.to_json(),
        }
    }
}

/// An insertion-ordered map of field name to default value.
///
/// A repeated name overwrites in place (last write wins), matching the
/// behavior of the schema generators for colliding field names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefaultMap {
    entries: Vec<(String, DefaultValue)>,
}

impl DefaultMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: DefaultValue) {
        let name = name.into();
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| *k == name) {
            existing.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&DefaultValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DefaultValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders this map as a JavaScript object literal, one key per line.
    pub fn to_source(&self) -> String {
        self.render(0)
    }

    /// Renders this map at a nesting depth, for embedding into generated
    /// source at that indentation.
    pub fn to_source_indented(&self, indent: usize) -> String {
        self.render(indent)
    }

    /// Renders this map as a single-line object literal, for embedding in
    /// expression position (e.g. a field-array `append` call).
    pub fn to_inline_source(&self) -> String {
        if self.entries.is_empty() {
            return "{}".to_string();
        }
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(name, value)| format!("{}: {}", quote_key(name), value.render(0)))
            .collect();
        format!("{{ {} }}", parts.join(", "))
    }

    fn render(&self, indent: usize) -> String {
        if self.entries.is_empty() {
            return "{}".to_string();
        }
        let pad = "  ".repeat(indent + 1);
        let close_pad = "  ".repeat(indent);
        let mut out = String::from("{\n");
        for (name, value) in &self.entries {
            out.push_str(&pad);
            out.push_str(&quote_key(name));
            out.push_str(": ");
            out.push_str(&value.render(indent + 1));
            out.push_str(",\n");
        }
        out.push_str(&close_pad);
        out.push('}');
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.entries {
            map.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }
}

/// Derives the default values for a whole model. Multi-step forms share
/// one flat value object across steps.
pub fn derive_model_defaults(model: &FormModel) -> DefaultMap {
    let mut map = DefaultMap::new();
    for slice in model.step_slices() {
        merge_items(slice, &mut map);
    }
    map
}

/// Derives the default values for a list of top-level items.
pub fn derive_defaults(items: &[FormItem]) -> DefaultMap {
    let mut map = DefaultMap::new();
    merge_items(items, &mut map);
    map
}

/// Derives the default value object for one array entry's shape.
pub fn derive_entry_defaults(elements: &[FormElement]) -> DefaultMap {
    let mut map = DefaultMap::new();
    for element in elements {
        for field in element.fields() {
            merge_field(field, &mut map);
        }
    }
    map
}

fn merge_items(items: &[FormItem], map: &mut DefaultMap) {
    for item in items {
        match item {
            FormItem::Element(element) => {
                for field in element.fields() {
                    merge_field(field, map);
                }
            }
            FormItem::Array(array) => {
                // Exactly one seeded entry, derived from the template.
                let entry = derive_entry_defaults(&array.array_field);
                map.insert(
                    array.name.clone(),
                    DefaultValue::List(vec![DefaultValue::Object(entry)]),
                );
            }
        }
    }
}

fn merge_field(field: &FieldDescriptor, map: &mut DefaultMap) {
    if field.is_presentational() {
        return;
    }
    map.insert(field.name.clone(), field_default(field));
}

/// The default value for a single field, per kind.
pub fn field_default(field: &FieldDescriptor) -> DefaultValue {
    match &field.kind {
        FieldKind::Input
        | FieldKind::Password
        | FieldKind::Otp
        | FieldKind::Textarea
        | FieldKind::DatePicker => DefaultValue::Str(String::new()),

        FieldKind::Checkbox | FieldKind::Switch => DefaultValue::Bool(false),

        FieldKind::RadioGroup | FieldKind::Select => DefaultValue::Str(
            field.first_option_value().unwrap_or_default().to_string(),
        ),

        FieldKind::ToggleGroup => match field.toggle_mode() {
            ToggleMode::Multiple => DefaultValue::List(vec![]),
            ToggleMode::Single => DefaultValue::Str(
                field.first_option_value().unwrap_or_default().to_string(),
            ),
        },

        FieldKind::MultiSelect => DefaultValue::List(vec![]),

        FieldKind::Slider => DefaultValue::Num(field.min.unwrap_or(0.0)),

        // Presentational kinds are filtered out before this point; the
        // string fallback covers unrecognized kinds.
        FieldKind::Text | FieldKind::Separator | FieldKind::Other(_) => {
            DefaultValue::Str(String::new())
        }
    }
}

/// Quotes an object key when it is not a bare JavaScript identifier.
fn quote_key(key: &str) -> String {
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
        format!("\"{}\"", escape_js_string(key))
    }
}

fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats a number the way JavaScript prints it (no trailing `.0`).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_model::{ArrayEntry, ChoiceOption, FormArray};

    fn field(name: &str, kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor::new(format!("id-{name}"), name, kind)
    }

    fn item(descriptor: FieldDescriptor) -> FormItem {
        FormItem::Element(FormElement::Field(descriptor))
    }

    #[test]
    fn text_like_defaults_to_empty_string() {
        for kind in [
            FieldKind::Input,
            FieldKind::Password,
            FieldKind::Otp,
            FieldKind::Textarea,
            FieldKind::DatePicker,
        ] {
            assert_eq!(
                field_default(&field("f", kind)),
                DefaultValue::Str(String::new())
            );
        }
    }

    #[test]
    fn boolean_like_defaults_to_false() {
        assert_eq!(
            field_default(&field("f", FieldKind::Checkbox)),
            DefaultValue::Bool(false)
        );
        assert_eq!(
            field_default(&field("f", FieldKind::Switch)),
            DefaultValue::Bool(false)
        );
    }

    #[test]
    fn single_choice_takes_first_option() {
        let mut select = field("color", FieldKind::Select);
        select.options = vec![
            ChoiceOption::new("red", "Red"),
            ChoiceOption::new("blue", "Blue"),
        ];
        assert_eq!(
            field_default(&select),
            DefaultValue::Str("red".to_string())
        );

        let empty = field("color", FieldKind::RadioGroup);
        assert_eq!(field_default(&empty), DefaultValue::Str(String::new()));
    }

    #[test]
    fn toggle_group_mode_selects_default_shape() {
        let mut toggle = field("size", FieldKind::ToggleGroup);
        toggle.options = vec![ChoiceOption::new("s", "Small")];
        assert_eq!(field_default(&toggle), DefaultValue::Str("s".to_string()));

        toggle.variant = Some("multiple".to_string());
        assert_eq!(field_default(&toggle), DefaultValue::List(vec![]));
    }

    #[test]
    fn slider_defaults_to_min_or_zero() {
        let mut slider = field("volume", FieldKind::Slider);
        assert_eq!(field_default(&slider), DefaultValue::Num(0.0));
        slider.min = Some(10.0);
        assert_eq!(field_default(&slider), DefaultValue::Num(10.0));
    }

    #[test]
    fn unknown_kind_falls_back_to_empty_string() {
        let unknown = field("sig", FieldKind::Other("Signature".to_string()));
        assert_eq!(field_default(&unknown), DefaultValue::Str(String::new()));
    }

    #[test]
    fn keys_match_non_static_field_names() {
        let mut heading = field("heading", FieldKind::Text);
        heading.is_static = true;

        let items = vec![
            item(field("name", FieldKind::Input)),
            item(heading),
            FormItem::Element(FormElement::Row(vec![
                field("first", FieldKind::Input),
                field("last", FieldKind::Input),
            ])),
            item(field("divider", FieldKind::Separator)),
        ];

        let defaults = derive_defaults(&items);
        let keys: Vec<_> = defaults.keys().collect();
        assert_eq!(keys, vec!["name", "first", "last"]);
    }

    #[test]
    fn array_seeds_exactly_one_entry() {
        let template = vec![FormElement::Field(field("name", FieldKind::Input))];
        let items = vec![FormItem::Array(FormArray {
            id: "a1".to_string(),
            name: "users".to_string(),
            label: None,
            array_field: template.clone(),
            entries: vec![ArrayEntry {
                id: "e1".to_string(),
                fields: template.clone(),
            }],
        })];

        let defaults = derive_defaults(&items);
        let DefaultValue::List(entries) = defaults.get("users").unwrap() else {
            panic!("expected a list default for the array");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0],
            DefaultValue::Object(derive_entry_defaults(&template))
        );
    }

    #[test]
    fn repeated_names_overwrite_in_place() {
        let mut slider = field("value", FieldKind::Slider);
        slider.min = Some(5.0);
        let items = vec![item(field("value", FieldKind::Input)), item(slider)];

        let defaults = derive_defaults(&items);
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults.get("value"), Some(&DefaultValue::Num(5.0)));
    }

    #[test]
    fn source_and_runtime_forms_agree() {
        let mut entry = DefaultMap::new();
        entry.insert("name", DefaultValue::Str(String::new()));
        let mut map = DefaultMap::new();
        map.insert("email", DefaultValue::Str(String::new()));
        map.insert("volume", DefaultValue::Num(0.0));
        map.insert("tags", DefaultValue::List(vec![]));
        map.insert(
            "users",
            DefaultValue::List(vec![DefaultValue::Object(entry)]),
        );

        let source = map.to_source();
        assert!(source.contains("email: \"\""));
        assert!(source.contains("volume: 0"));
        assert!(source.contains("tags: []"));
        assert!(source.contains("users: [{"));

        // Parsing the literal as JSON (keys quoted) equals the runtime form.
        let json = map.to_json();
        assert_eq!(json["email"], "");
        assert_eq!(json["volume"], 0.0);
        assert_eq!(json["users"][0]["name"], "");
    }

    #[test]
    fn awkward_keys_are_quoted() {
        let mut map = DefaultMap::new();
        map.insert("first-name", DefaultValue::Str(String::new()));
        map.insert("2fa", DefaultValue::Str(String::new()));
        map.insert("full name", DefaultValue::Str(String::new()));
        map.insert("plain", DefaultValue::Str(String::new()));

        let source = map.to_source();
        assert!(source.contains("\"first-name\":"));
        assert!(source.contains("\"2fa\":"));
        assert!(source.contains("\"full name\":"));
        assert!(source.contains("\n  plain:"));
    }

    #[test]
    fn inline_source_is_single_line() {
        let mut map = DefaultMap::new();
        map.insert("name", DefaultValue::Str(String::new()));
        map.insert("age", DefaultValue::Num(0.0));
        assert_eq!(map.to_inline_source(), "{ name: \"\", age: 0 }");
        assert_eq!(DefaultMap::new().to_inline_source(), "{}");
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
