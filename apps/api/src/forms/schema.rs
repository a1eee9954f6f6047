//! Form schema — field definitions as stored by the admin form builder.
//!
//! The pipeline treats forms as read-only input: admin CRUD lives elsewhere.
//! Field definitions arrive from Postgres rows and are converted into the
//! domain types here before any splitting, rendering, or validation runs.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::models::form::{FormFieldRow, FormRow};

/// Closed set of field kinds the form builder can produce.
///
/// Adding a variant is a compiler-enforced checklist: every `match` over
/// `FieldType` in this crate is exhaustive. Unknown strings coming out of
/// storage are mapped to `Text` at the decode boundary (`FieldType::parse`),
/// so legacy or forward-version data degrades to a plain text input instead
/// of failing the whole form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Tags,
    Skills,
    File,
    Date,
    Number,
    Url,
    Password,
    CountryCode,
    PageBreak,
}

impl FieldType {
    /// Decodes the storage representation. Accepts both the legacy
    /// SCREAMING_SNAKE encoding and the snake_case one; `TEL` is an alias
    /// for `PHONE`. Anything unrecognized degrades to `Text`.
    pub fn parse(raw: &str) -> FieldType {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "phone" | "tel" => FieldType::Phone,
            "textarea" => FieldType::Textarea,
            "select" => FieldType::Select,
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            "tags" => FieldType::Tags,
            "skills" => FieldType::Skills,
            "file" => FieldType::File,
            "date" => FieldType::Date,
            "number" => FieldType::Number,
            "url" => FieldType::Url,
            "password" => FieldType::Password,
            "country_code" => FieldType::CountryCode,
            "page_break" => FieldType::PageBreak,
            other => {
                warn!("Unknown field type {other:?}, treating as text");
                FieldType::Text
            }
        }
    }

    pub fn is_page_break(&self) -> bool {
        matches!(self, FieldType::PageBreak)
    }
}

/// One input definition inside a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub id: Uuid,
    /// Logical key used by the client when submitting values. Absent on
    /// older forms; `identifier()` falls back to the row id.
    pub field_name: Option<String>,
    pub field_type: FieldType,
    pub label: String,
    pub placeholder: Option<String>,
    /// Serialized option list for choice controls. JSON array or
    /// comma-separated, see `options::normalize_options`.
    pub options: Option<String>,
    pub is_required: bool,
    /// Unique within a form; defines rendering and splitting sequence.
    pub order: i32,
    /// Layout hint as a percentage (25/33/50/66/75/100).
    pub field_width: Option<i32>,
}

impl FormField {
    pub fn from_row(row: FormFieldRow) -> FormField {
        FormField {
            id: row.id,
            field_name: row.field_name,
            field_type: FieldType::parse(&row.field_type),
            label: row.label,
            placeholder: row.placeholder,
            options: row.options,
            is_required: row.is_required,
            order: row.field_order,
            field_width: row.field_width,
        }
    }

    /// Key under which this field's value is stored in a session's ValueMap.
    pub fn identifier(&self) -> String {
        match &self.field_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self.id.to_string(),
        }
    }
}

/// Named, ordered collection of field definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub fields: Vec<FormField>,
}

impl Form {
    /// Assembles the domain form from its rows, sorting fields by `order`.
    pub fn from_rows(form: FormRow, field_rows: Vec<FormFieldRow>) -> Form {
        let mut fields: Vec<FormField> = field_rows.into_iter().map(FormField::from_row).collect();
        fields.sort_by_key(|f| f.order);
        Form {
            id: form.id,
            name: form.name,
            description: form.description,
            is_default: form.is_default,
            fields,
        }
    }
}

/// One selected skill inside a skills control. `rating: None` is the unset
/// state and is distinct from "rated 1"; out-of-range ratings are treated
/// as unset rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSelection {
    pub name: String,
    pub rating: Option<u8>,
}

impl SkillSelection {
    pub const RATING_MIN: u8 = 1;
    pub const RATING_MAX: u8 = 5;

    /// The effective rating: `None` when unset or outside 1–5.
    pub fn effective_rating(&self) -> Option<u8> {
        self.rating
            .filter(|r| (Self::RATING_MIN..=Self::RATING_MAX).contains(r))
    }
}

/// Reference to an already-uploaded file. The pipeline never touches bytes;
/// upload happens before submission via the uploads endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub file_name: String,
    pub original_name: String,
    pub path: String,
}

/// Runtime value of one field. Untagged: the wire shape alone identifies
/// the variant (string, string array, skill-selection array, file record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Many(Vec<String>),
    Skills(Vec<SkillSelection>),
    File(FileRef),
}

impl FieldValue {
    /// Empty means: whitespace-only string or empty array. A file reference
    /// is never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Many(items) => items.is_empty(),
            FieldValue::Skills(selections) => selections.is_empty(),
            FieldValue::File(_) => false,
        }
    }
}
