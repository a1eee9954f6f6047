use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRow;
use crate::state::AppState;

/// GET /api/v1/jobs
/// Published postings only; drafts never leave the admin surface.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs: Vec<JobRow> = sqlx::query_as(
        "SELECT * FROM jobs WHERE is_published = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job: Option<JobRow> =
        sqlx::query_as("SELECT * FROM jobs WHERE id = $1 AND is_published = TRUE")
            .bind(id)
            .fetch_optional(&state.db)
            .await?;
    job.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}
