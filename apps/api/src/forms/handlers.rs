use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::forms::render::{render_field, render_steps, RenderedControl};
use crate::forms::schema::{FieldValue, Form};
use crate::forms::session::{FormSession, SessionError, SessionStatus, SessionStore};
use crate::forms::storage;
use crate::forms::submission::to_labeled_submission;
use crate::forwarder::{SubmissionForwarder, SubmissionPayload};
use crate::models::form::FormRow;
use crate::models::job::JobRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub job_id: Uuid,
    /// Falls back to the deployment's default form when absent.
    pub form_id: Option<Uuid>,
    pub initial_step: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SetValueRequest {
    pub value: FieldValue,
}

/// Step-split render plan for a form, values not yet attached.
#[derive(Debug, Serialize)]
pub struct RenderPlan {
    pub form_id: Uuid,
    pub name: String,
    pub steps: Vec<Vec<RenderedControl>>,
    /// Set when the form has no renderable fields; the frontend shows this
    /// instead of an empty stepper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Snapshot of a session the frontend renders after every interaction.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub job_id: Uuid,
    pub form_id: Uuid,
    pub form_name: String,
    pub step_index: usize,
    pub step_count: usize,
    pub status: SessionStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub values: std::collections::HashMap<String, FieldValue>,
    /// Controls of the current step only.
    pub controls: Vec<RenderedControl>,
}

impl SessionView {
    fn from_session(session: &FormSession) -> SessionView {
        let controls = session
            .current_step()
            .iter()
            .filter_map(|field| render_field(field, session.values.get(&field.identifier())))
            .collect();
        SessionView {
            session_id: session.id,
            job_id: session.job_id,
            form_id: session.form.id,
            form_name: session.form.name.clone(),
            step_index: session.step_index,
            step_count: session.step_count(),
            status: session.status,
            created_at: session.created_at,
            error: session.error.clone(),
            values: session.values.clone(),
            controls,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitReceipt {
    pub session_id: Uuid,
    pub job_id: Uuid,
    pub form_id: Uuid,
    pub status: SessionStatus,
}

/// GET /api/v1/forms
pub async fn handle_list_forms(
    State(state): State<AppState>,
) -> Result<Json<Vec<FormRow>>, AppError> {
    Ok(Json(storage::list_forms(&state.db).await?))
}

/// GET /api/v1/forms/:id
pub async fn handle_get_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Form>, AppError> {
    let form = storage::get_form(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Form {id} not found")))?;
    Ok(Json(form))
}

/// GET /api/v1/forms/:id/render
pub async fn handle_render_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RenderPlan>, AppError> {
    let form = storage::get_form(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Form {id} not found")))?;
    Ok(Json(render_plan(&form)))
}

fn render_plan(form: &Form) -> RenderPlan {
    let steps = render_steps(&form.fields, &std::collections::HashMap::new());
    let message = if steps.is_empty() {
        Some("No fields configured for this form".to_string())
    } else {
        None
    };
    RenderPlan {
        form_id: form.id,
        name: form.name.clone(),
        steps,
        message,
    }
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let job: Option<JobRow> =
        sqlx::query_as("SELECT * FROM jobs WHERE id = $1 AND is_published = TRUE")
            .bind(req.job_id)
            .fetch_optional(&state.db)
            .await?;
    let job = job.ok_or_else(|| AppError::NotFound(format!("Job {} not found", req.job_id)))?;

    let form = match req.form_id {
        Some(form_id) => storage::get_form(&state.db, form_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Form {form_id} not found")))?,
        None => storage::get_default_form(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("No default form configured".to_string()))?,
    };

    let session = FormSession::new(job.id, form, req.initial_step);
    let view = SessionView::from_session(&session);
    info!(
        "Opened session {} for job {} on form {}",
        session.id, job.id, session.form.id
    );
    state.sessions.insert(session);
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .with(id, SessionView::from_session)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// PUT /api/v1/sessions/:id/values/:field
pub async fn handle_set_value(
    State(state): State<AppState>,
    Path((id, field)): Path<(Uuid, String)>,
    Json(req): Json<SetValueRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_mut(id, |session| {
            session
                .set_value(&field, req.value)
                .map(|_| SessionView::from_session(session))
        })
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))??;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/next
pub async fn handle_next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_mut(id, |session| {
            session.next().map(|_| SessionView::from_session(session))
        })
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))??;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/prev
pub async fn handle_prev(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_mut(id, |session| {
            session.prev().map(|_| SessionView::from_session(session))
        })
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))??;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/submit
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitReceipt>, AppError> {
    let receipt = perform_submit(&state.sessions, state.forwarder.as_ref(), id).await?;
    Ok(Json(receipt))
}

/// Final submit: transition the session under the lock, forward without it,
/// then settle the outcome. The session leaves the store only on success;
/// a failed forward returns it to the last editable step with values
/// intact.
pub async fn perform_submit(
    sessions: &SessionStore,
    forwarder: &dyn SubmissionForwarder,
    session_id: Uuid,
) -> Result<SubmitReceipt, AppError> {
    let payload = sessions
        .with_mut(session_id, |session| {
            session.begin_submit()?;
            let labeled = to_labeled_submission(&session.values, &session.form.fields);
            Ok::<_, SessionError>(SubmissionPayload {
                job_id: session.job_id,
                form_id: session.form.id,
                form_data: labeled.form_data,
                candidate_name: labeled.candidate_name,
                candidate_email: labeled.candidate_email,
                candidate_phone: labeled.candidate_phone,
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))??;

    match forwarder.forward(&payload).await {
        Ok(()) => {
            let _ = sessions.with_mut(session_id, FormSession::complete_submit);
            let receipt = SubmitReceipt {
                session_id,
                job_id: payload.job_id,
                form_id: payload.form_id,
                status: SessionStatus::Submitted,
            };
            // Terminal: the confirmation receipt replaces the session.
            sessions.remove(session_id);
            info!(
                "Submitted application for job {} via session {}",
                payload.job_id, session_id
            );
            Ok(receipt)
        }
        Err(e) => {
            let message = e.to_string();
            let _ = sessions.with_mut(session_id, |session| session.fail_submit(message.clone()));
            Err(AppError::Forward(message))
        }
    }
}
