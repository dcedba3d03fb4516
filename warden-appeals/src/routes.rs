use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::auth::require_bearer;
use crate::record::AppealRecord;

/// Where accepted appeals go.
pub trait AppealSink {
    fn submit(&self, appeal: &AppealRecord) -> impl Future<Output = anyhow::Result<()>> + Send;
}

pub struct AppealState<S> {
    token: Arc<str>,
    sink: Arc<S>,
}

impl<S> AppealState<S> {
    pub fn new(token: impl Into<Arc<str>>, sink: S) -> Self {
        Self {
            token: token.into(),
            sink: Arc::new(sink),
        }
    }
}

impl<S> Clone for AppealState<S> {
    fn clone(&self) -> Self {
        Self {
            token: Arc::clone(&self.token),
            sink: Arc::clone(&self.sink),
        }
    }
}

pub fn router<S>(state: AppealState<S>) -> Router
where
    S: AppealSink + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/appeals", post(submit_appeal::<S>))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.token),
            require_bearer,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve the appeal routes until the listener fails.
pub async fn serve<S>(addr: SocketAddr, state: AppealState<S>) -> anyhow::Result<()>
where
    S: AppealSink + Send + Sync + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "appeal intake listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn submit_appeal<S>(
    State(state): State<AppealState<S>>,
    payload: Result<Json<AppealRecord>, JsonRejection>,
) -> StatusCode
where
    S: AppealSink + Send + Sync + 'static,
{
    let Json(appeal) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(%rejection, "malformed appeal body");
            return StatusCode::BAD_REQUEST;
        }
    };

    let appeal = match appeal.normalized() {
        Ok(appeal) => appeal,
        Err(rejection) => {
            warn!(%rejection, "appeal rejected");
            return StatusCode::BAD_REQUEST;
        }
    };

    match state.sink.submit(&appeal).await {
        Ok(()) => {
            info!(user_id = %appeal.user_id, "appeal received");
            StatusCode::CREATED
        }
        Err(source) => {
            error!(?source, user_id = %appeal.user_id, "failed to surface appeal");
            StatusCode::BAD_GATEWAY
        }
    }
}
