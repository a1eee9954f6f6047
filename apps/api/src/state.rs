use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::forms::session::SessionStore;
use crate::forwarder::SubmissionForwarder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Pluggable submission forwarder. Default: HttpForwarder against the
    /// configured endpoint; tests swap in a recording double.
    pub forwarder: Arc<dyn SubmissionForwarder>,
    /// Process-local form sessions; one entry per in-flight application.
    pub sessions: SessionStore,
}
