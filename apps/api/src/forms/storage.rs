//! Read-only form storage queries. The admin form builder owns writes;
//! this pipeline only ever reads.

use sqlx::PgPool;
use uuid::Uuid;

use crate::forms::schema::Form;
use crate::models::form::{FormFieldRow, FormRow};

/// Loads a form with its fields, ordered by `field_order`.
pub async fn get_form(pool: &PgPool, form_id: Uuid) -> Result<Option<Form>, sqlx::Error> {
    let row: Option<FormRow> = sqlx::query_as("SELECT * FROM forms WHERE id = $1")
        .bind(form_id)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let fields = load_fields(pool, form_id).await?;
    Ok(Some(Form::from_rows(row, fields)))
}

/// Loads the default form, if one is configured. At most one default is
/// expected per deployment; ties break on most recently created.
pub async fn get_default_form(pool: &PgPool) -> Result<Option<Form>, sqlx::Error> {
    let row: Option<FormRow> = sqlx::query_as(
        "SELECT * FROM forms WHERE is_default = TRUE ORDER BY created_at DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let fields = load_fields(pool, row.id).await?;
    Ok(Some(Form::from_rows(row, fields)))
}

pub async fn list_forms(pool: &PgPool) -> Result<Vec<FormRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM forms ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

async fn load_fields(pool: &PgPool, form_id: Uuid) -> Result<Vec<FormFieldRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM form_fields WHERE form_id = $1 ORDER BY field_order ASC",
    )
    .bind(form_id)
    .fetch_all(pool)
    .await
}
