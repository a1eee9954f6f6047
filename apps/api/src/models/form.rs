use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FormRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FormFieldRow {
    pub id: Uuid,
    pub form_id: Uuid,
    pub field_name: Option<String>,
    /// Stored as text; decoded by `FieldType::parse` with a text fallback.
    pub field_type: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub options: Option<String>,
    pub is_required: bool,
    pub field_order: i32,
    pub field_width: Option<i32>,
}
