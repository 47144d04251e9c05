//! HTTP surface for the quiz pipeline

use std::{any::Any, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    llm::{quiz::QuizGenerator, transcriber::TranscriptionService},
    yt::MediaFetcher,
    QuizPipeline,
};

pub struct AppState<F, T, G>
where
    F: MediaFetcher + Send + Sync + 'static,
    T: TranscriptionService + 'static,
    G: QuizGenerator + 'static,
{
    pub pipeline: Arc<QuizPipeline<F, T, G>>,
    /// Cancelled on shutdown; every in-flight job polls a child of this token
    pub shutdown: CancellationToken,
}

impl<F, T, G> Clone for AppState<F, T, G>
where
    F: MediaFetcher + Send + Sync + 'static,
    T: TranscriptionService + 'static,
    G: QuizGenerator + 'static,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            shutdown: self.shutdown.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuizRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizData {
    pub quiz: String,
}

/// Response envelope: `{success, data}` or `{success, error}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

pub fn create_router<F, T, G>(state: AppState<F, T, G>) -> Router
where
    F: MediaFetcher + Send + Sync + 'static,
    T: TranscriptionService + 'static,
    G: QuizGenerator + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/generate-quiz", post(generate_quiz_handler::<F, T, G>))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tracing::instrument(skip_all)]
pub async fn generate_quiz_handler<F, T, G>(
    State(state): State<AppState<F, T, G>>,
    payload: Result<Json<GenerateQuizRequest>, JsonRejection>,
) -> Response
where
    F: MediaFetcher + Send + Sync + 'static,
    T: TranscriptionService + 'static,
    G: QuizGenerator + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::error!(error = %rejection, "Unreadable request body");
            return internal_error();
        }
    };

    let Some(url) = request.url.filter(|u| !u.trim().is_empty()) else {
        return Json(ApiResponse::<QuizData>::error("No URL provided")).into_response();
    };

    tracing::info!(%url, "Processing URL");
    let cancel = state.shutdown.child_token();

    match state.pipeline.run_with_cancel(url.trim(), &cancel).await {
        Ok(quiz) => Json(ApiResponse::success(QuizData { quiz })).into_response(),
        Err(e) => Json(ApiResponse::<QuizData>::error(e.to_string())).into_response(),
    }
}

/// Panics become a generic 500; the detail only goes to the log
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Request handler panicked");

    internal_error()
}

/// Generic 500 envelope; no failure detail reaches the caller
fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<QuizData>::error("Internal server error")),
    )
        .into_response()
}
