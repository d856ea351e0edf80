//! Library-agnostic constraint IR.
//!
//! Every field lowers to exactly one [`FieldRule`]. The three schema
//! targets translate rules into their own syntax and the runtime
//! validator interprets them directly, so the per-kind constraint logic
//! lives in one place and cannot drift between targets.

use formgen_model::{FieldDescriptor, FieldKind, FormElement, FormItem, FormModel, ToggleMode};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const TEXTAREA_MIN_MESSAGE: &str = "Minimum 10 characters";
pub const SELECT_MESSAGE: &str = "Please select an item";
pub const MULTI_SELECT_MESSAGE: &str = "Please select at least one item";

/// Message for a numeric lower bound.
pub fn min_message(bound: f64) -> String {
    format!("Must be at least {}", crate::defaults::format_number(bound))
}

/// Message for a numeric upper bound.
pub fn max_message(bound: f64) -> String {
    format!("Must be at most {}", crate::defaults::format_number(bound))
}

/// Format refinement for text inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Email,
    /// Coerced to a number at validation time.
    Number,
}

/// The constraint carried by one field.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSpec {
    /// Text input. Required plain text gains a min-length-1 check.
    Text { format: TextFormat },
    /// Textarea: required means nonempty AND at least 10 characters.
    /// Intentionally stricter than plain inputs.
    Textarea,
    /// Boolean. `must_be_true` is set for required checkboxes.
    Bool { must_be_true: bool },
    /// Single choice (select, radio, single toggle): nonempty selection.
    Choice,
    /// Multiple choice (multi toggle, multi-select): nonempty string array.
    StringList,
    /// Coerced number with optional bounds (slider).
    Number { min: Option<f64>, max: Option<f64> },
    /// Coerced date.
    Date,
    /// Repeatable entries; required/optional applies to the leaf rules,
    /// never to the array itself.
    Entries(Vec<FieldRule>),
    /// Unrecognized field kind; bare string, accepts anything sensible.
    Unknown,
}

/// One field's validation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub name: String,
    pub required: bool,
    pub spec: RuleSpec,
}

impl FieldRule {
    /// A field is wrapped as optional unless `required` is true. Entry
    /// lists are never wrapped.
    pub fn is_optional(&self) -> bool {
        !self.required && !matches!(self.spec, RuleSpec::Entries(_))
    }
}

/// Lowers a whole model into rules, steps flattened in form order.
pub fn lower_model(model: &FormModel) -> Vec<FieldRule> {
    let mut rules = vec![];
    for slice in model.step_slices() {
        merge_items(slice, &mut rules);
    }
    rules
}

/// Lowers a list of top-level items.
pub fn lower(items: &[FormItem]) -> Vec<FieldRule> {
    let mut rules = vec![];
    merge_items(items, &mut rules);
    rules
}

/// Lowers one array entry's template shape.
pub fn lower_elements(elements: &[FormElement]) -> Vec<FieldRule> {
    let mut rules = vec![];
    for element in elements {
        for field in element.fields() {
            merge_field(field, &mut rules);
        }
    }
    rules
}

/// Per-step rule sets, for step-schema slicing.
pub fn step_rules(model: &FormModel) -> Vec<Vec<FieldRule>> {
    model.step_slices().iter().map(|s| lower(s)).collect()
}

fn merge_items(items: &[FormItem], rules: &mut Vec<FieldRule>) {
    for item in items {
        match item {
            FormItem::Element(element) => {
                for field in element.fields() {
                    merge_field(field, rules);
                }
            }
            FormItem::Array(array) => {
                let rule = FieldRule {
                    name: array.name.clone(),
                    required: false,
                    spec: RuleSpec::Entries(lower_elements(&array.array_field)),
                };
                upsert(rules, rule);
            }
        }
    }
}

fn merge_field(field: &FieldDescriptor, rules: &mut Vec<FieldRule>) {
    if field.is_presentational() {
        return;
    }
    upsert(rules, field_rule(field));
}

// Last write wins for colliding names, matching the defaults map.
fn upsert(rules: &mut Vec<FieldRule>, rule: FieldRule) {
    if let Some(existing) = rules.iter_mut().find(|r| r.name == rule.name) {
        *existing = rule;
    } else {
        rules.push(rule);
    }
}

/// The rule for a single field, per kind.
pub fn field_rule(field: &FieldDescriptor) -> FieldRule {
    let spec = match &field.kind {
        FieldKind::Input => RuleSpec::Text {
            format: match field.input_mode() {
                formgen_model::InputMode::Email => TextFormat::Email,
                formgen_model::InputMode::Number => TextFormat::Number,
                formgen_model::InputMode::Text => TextFormat::Plain,
            },
        },
        FieldKind::Password | FieldKind::Otp => RuleSpec::Text {
            format: TextFormat::Plain,
        },
        FieldKind::Textarea => RuleSpec::Textarea,
        FieldKind::Checkbox => RuleSpec::Bool {
            must_be_true: field.required,
        },
        FieldKind::Switch => RuleSpec::Bool { must_be_true: false },
        FieldKind::RadioGroup | FieldKind::Select => RuleSpec::Choice,
        FieldKind::ToggleGroup => match field.toggle_mode() {
            ToggleMode::Multiple => RuleSpec::StringList,
            ToggleMode::Single => RuleSpec::Choice,
        },
        FieldKind::MultiSelect => RuleSpec::StringList,
        FieldKind::Slider => RuleSpec::Number {
            min: field.min,
            max: field.max,
        },
        FieldKind::DatePicker => RuleSpec::Date,
        FieldKind::Text | FieldKind::Separator | FieldKind::Other(_) => RuleSpec::Unknown,
    };

    FieldRule {
        name: field.name.clone(),
        required: field.required,
        spec,
    }
}
