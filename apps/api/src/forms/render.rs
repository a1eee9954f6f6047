//! Field renderer dispatch — maps field definitions to serializable control
//! descriptors the careers frontend can draw without knowing storage details.
//!
//! Rendering is presentation only: `required` is a visual marker here,
//! enforcement lives in `validation`. The dispatch is an exhaustive match
//! over `FieldType`, so a new field kind fails compilation until every
//! consumer handles it.

use serde::{Deserialize, Serialize};

use crate::forms::options::normalize_options;
use crate::forms::schema::{FieldType, FieldValue, FormField, SkillSelection};
use crate::forms::steps::split_steps;

/// Visual row count for textarea controls.
const TEXTAREA_ROWS: u8 = 4;

/// Semantic input-type hint for single-line inputs. Not format-validated
/// here; the hint only selects the browser keyboard/widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputHint {
    Text,
    Email,
    Tel,
    Url,
    Number,
    Password,
    Date,
}

/// The editable control a field renders to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    Input {
        hint: InputHint,
    },
    Textarea {
        rows: u8,
    },
    /// Single choice; `options` always starts with an empty placeholder
    /// sentinel.
    Select {
        options: Vec<String>,
    },
    Radio {
        options: Vec<String>,
    },
    /// Multi-select; the value is the full selected array.
    Checkbox {
        options: Vec<String>,
    },
    /// Free-text tag picker with type-ahead suggestions.
    Tags {
        suggestions: Vec<String>,
    },
    /// Tag picker plus a per-tag rating sub-control. An unset rating is
    /// distinct from "rated `rating_min`" and counts as incomplete.
    Skills {
        suggestions: Vec<String>,
        rating_min: u8,
        rating_max: u8,
    },
    /// File-selection affordance; upload goes through the uploads endpoint,
    /// the selected value is an opaque file reference.
    FilePicker,
}

/// One rendered field: control descriptor plus layout and current value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedControl {
    /// ValueMap key for this field.
    pub field_id: String,
    pub label: String,
    pub required: bool,
    /// 12-column grid span derived from the field's width hint.
    pub col_span: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub control: Control,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
}

/// Maps a width percentage hint to a 12-column span. Unknown or absent
/// hints take the full row.
pub fn col_span(field_width: Option<i32>) -> u8 {
    match field_width {
        Some(25) => 3,
        Some(33) => 4,
        Some(50) => 6,
        Some(66) => 8,
        Some(75) => 9,
        _ => 12,
    }
}

/// Renders one field to its control descriptor, echoing the current value.
/// Page breaks render to nothing; the splitter has already removed them
/// from any step this function sees.
pub fn render_field(field: &FormField, value: Option<&FieldValue>) -> Option<RenderedControl> {
    let control = match field.field_type {
        FieldType::Text => Control::Input {
            hint: InputHint::Text,
        },
        FieldType::Email => Control::Input {
            hint: InputHint::Email,
        },
        FieldType::Phone => Control::Input {
            hint: InputHint::Tel,
        },
        FieldType::Url => Control::Input {
            hint: InputHint::Url,
        },
        FieldType::Number => Control::Input {
            hint: InputHint::Number,
        },
        FieldType::Password => Control::Input {
            hint: InputHint::Password,
        },
        FieldType::Date => Control::Input {
            hint: InputHint::Date,
        },
        FieldType::Textarea => Control::Textarea {
            rows: TEXTAREA_ROWS,
        },
        FieldType::Select | FieldType::CountryCode => {
            let mut options = vec![String::new()];
            options.extend(normalize_options(field.options.as_deref()));
            Control::Select { options }
        }
        FieldType::Radio => Control::Radio {
            options: normalize_options(field.options.as_deref()),
        },
        FieldType::Checkbox => Control::Checkbox {
            options: normalize_options(field.options.as_deref()),
        },
        FieldType::Tags => Control::Tags {
            suggestions: normalize_options(field.options.as_deref()),
        },
        FieldType::Skills => Control::Skills {
            suggestions: normalize_options(field.options.as_deref()),
            rating_min: SkillSelection::RATING_MIN,
            rating_max: SkillSelection::RATING_MAX,
        },
        FieldType::File => Control::FilePicker,
        FieldType::PageBreak => return None,
    };

    Some(RenderedControl {
        field_id: field.identifier(),
        label: field.label.clone(),
        required: field.is_required,
        col_span: col_span(field.field_width),
        placeholder: field.placeholder.clone(),
        control,
        value: value.cloned(),
    })
}

/// Renders every step of a form: split at page breaks, then one descriptor
/// per remaining field with its current value from `values`.
pub fn render_steps(
    fields: &[FormField],
    values: &std::collections::HashMap<String, FieldValue>,
) -> Vec<Vec<RenderedControl>> {
    split_steps(fields)
        .iter()
        .map(|step| {
            step.iter()
                .filter_map(|field| render_field(field, values.get(&field.identifier())))
                .collect()
        })
        .collect()
}
