use crate::state::AppState;
use crate::upload::{self, UploadError};
use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use inference::Detection;
use serde::Serialize;
use std::path::Path;
use tower_http::cors::CorsLayer;

const MODEL_NOT_LOADED_MESSAGE: &str = "Model is not loaded. Check server logs for details.";
const NO_OBJECTS_MESSAGE: &str = "No objects detected";

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// One element of the `detections` array: either a detection record, or the
/// single informational message the wire format uses for the no-objects,
/// model-unavailable and error cases.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DetectionEntry {
    Object {
        class: String,
        confidence: f32,
        #[serde(rename = "box")]
        bbox: [f32; 4],
    },
    Message {
        message: String,
    },
}

impl DetectionEntry {
    fn message(text: impl Into<String>) -> Self {
        Self::Message {
            message: text.into(),
        }
    }
}

impl From<Detection> for DetectionEntry {
    fn from(detection: Detection) -> Self {
        Self::Object {
            class: detection.class,
            confidence: detection.confidence,
            bbox: detection.bbox,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Accepted {
        filename: String,
        detections: Vec<DetectionEntry>,
    },
    Rejected {
        error: String,
    },
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// Validate -> store -> detect -> respond, single pass.
///
/// Validation failures keep the legacy 200 framing with an `error` body; a
/// storage failure is the one server-side error surfaced as a 500.
async fn upload_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let stored = match upload::accept(&mut multipart, &state.upload_dir).await {
        Ok(stored) => stored,
        Err(err @ UploadError::Storage(_)) => {
            tracing::error!(error = %err, "Failed to persist upload");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UploadResponse::Rejected {
                    error: err.to_string(),
                }),
            )
                .into_response();
        }
        Err(err) => {
            return Json(UploadResponse::Rejected {
                error: err.to_string(),
            })
            .into_response();
        }
    };

    let detections = run_detection(&state, &stored.path).await;

    Json(UploadResponse::Accepted {
        filename: stored.filename,
        detections,
    })
    .into_response()
}

/// Map the detection outcome onto the wire format.
///
/// Every outcome keeps the success envelope; an absent model, an empty
/// result and an adapter failure are all reported as a single message
/// record, distinguished only by text.
async fn run_detection(state: &AppState, image_path: &Path) -> Vec<DetectionEntry> {
    let Some(detector) = state.detector.clone() else {
        return vec![DetectionEntry::message(MODEL_NOT_LOADED_MESSAGE)];
    };

    let path = image_path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || detector.detect(&path)).await;

    match result {
        Ok(Ok(detections)) if detections.is_empty() => {
            vec![DetectionEntry::message(NO_OBJECTS_MESSAGE)]
        }
        Ok(Ok(detections)) => detections.into_iter().map(DetectionEntry::from).collect(),
        Ok(Err(error)) => {
            tracing::error!(error = %error, "Prediction failed");
            vec![DetectionEntry::message(format!(
                "Error during prediction: {error}"
            ))]
        }
        Err(join_error) => {
            tracing::error!(error = %join_error, "Prediction task panicked");
            vec![DetectionEntry::message(format!(
                "Error during prediction: {join_error}"
            ))]
        }
    }
}
