pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::forms::handlers as form_handlers;
use crate::jobs::handlers as job_handlers;
use crate::state::AppState;
use crate::uploads;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public careers surface
        .route("/api/v1/jobs", get(job_handlers::handle_list_jobs))
        .route("/api/v1/jobs/:id", get(job_handlers::handle_get_job))
        // Form definitions (read-only)
        .route("/api/v1/forms", get(form_handlers::handle_list_forms))
        .route("/api/v1/forms/:id", get(form_handlers::handle_get_form))
        .route(
            "/api/v1/forms/:id/render",
            get(form_handlers::handle_render_form),
        )
        // File uploads (stored before submit; sessions hold the reference)
        .route("/api/v1/uploads", post(uploads::handle_upload))
        // Application sessions
        .route(
            "/api/v1/sessions",
            post(form_handlers::handle_create_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(form_handlers::handle_get_session),
        )
        .route(
            "/api/v1/sessions/:id/values/:field",
            put(form_handlers::handle_set_value),
        )
        .route("/api/v1/sessions/:id/next", post(form_handlers::handle_next))
        .route("/api/v1/sessions/:id/prev", post(form_handlers::handle_prev))
        .route(
            "/api/v1/sessions/:id/submit",
            post(form_handlers::handle_submit),
        )
        .with_state(state)
}
