use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::desk::{DeskError, EvaluationDesk};
use super::domain::ScoreLevel;
use super::evidence::Point;
use super::export::ExportError;
use super::filter::SelectionField;
use super::scoring::ScoreChange;
use super::session::{LockOutcome, SessionError, LOCK_WARNING};
use super::store::{ArtifactStore, ArtifactStoreError};
use super::views;

/// Router builder exposing the evaluation session over HTTP.
pub fn evaluation_router<S>(desk: Arc<EvaluationDesk<S>>) -> Router
where
    S: ArtifactStore + 'static,
{
    Router::new()
        .route("/api/v1/rubric", get(rubric_handler))
        .route("/api/v1/session", get(session_handler::<S>))
        .route("/api/v1/session/login", post(login_handler::<S>))
        .route("/api/v1/session/logout", post(logout_handler::<S>))
        .route("/api/v1/session/selection", post(selection_handler::<S>))
        .route("/api/v1/session/scores", put(score_handler::<S>))
        .route("/api/v1/session/lock", post(lock_handler::<S>))
        .route("/api/v1/session/evidence/photo", post(photo_handler::<S>))
        .route(
            "/api/v1/session/evidence/signature",
            post(signature_handler::<S>).delete(clear_signature_handler::<S>),
        )
        .route("/api/v1/session/finalize", post(finalize_handler::<S>))
        .route("/api/v1/exports/:file_name", get(download_handler::<S>))
        .with_state(desk)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login_id: String,
    pub secret: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub field: SelectionField,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub worker: String,
    pub competency: String,
    pub score: i64,
}

#[derive(Debug, Deserialize)]
pub struct LockRequest {
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Deserialize)]
pub struct PhotoRequest {
    pub data_url: String,
}

#[derive(Debug, Deserialize)]
pub struct SignatureRequest {
    pub strokes: Vec<Vec<Point>>,
}

#[derive(Debug, Deserialize)]
pub struct FinalizeRequest {
    pub full_name: String,
}

pub(crate) async fn rubric_handler() -> Response {
    (StatusCode::OK, Json(views::rubric())).into_response()
}

pub(crate) async fn session_handler<S>(State(desk): State<Arc<EvaluationDesk<S>>>) -> Response
where
    S: ArtifactStore + 'static,
{
    match desk.view() {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn login_handler<S>(
    State(desk): State<Arc<EvaluationDesk<S>>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: ArtifactStore + 'static,
{
    match desk.login(&request.login_id, &request.secret) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn logout_handler<S>(State(desk): State<Arc<EvaluationDesk<S>>>) -> Response
where
    S: ArtifactStore + 'static,
{
    match desk.logout() {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn selection_handler<S>(
    State(desk): State<Arc<EvaluationDesk<S>>>,
    Json(request): Json<SelectionRequest>,
) -> Response
where
    S: ArtifactStore + 'static,
{
    let value = request.value.filter(|value| !value.trim().is_empty());
    match desk.select(request.field, value) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<S>(
    State(desk): State<Arc<EvaluationDesk<S>>>,
    Json(request): Json<ScoreRequest>,
) -> Response
where
    S: ArtifactStore + 'static,
{
    let level = match ScoreLevel::try_from(request.score) {
        Ok(level) => level,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match desk.set_score(&request.worker, &request.competency, level) {
        Ok((change, view)) => {
            let payload = json!({
                "recorded": matches!(change, ScoreChange::Recorded { .. }),
                "session": view,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn lock_handler<S>(
    State(desk): State<Arc<EvaluationDesk<S>>>,
    Json(request): Json<LockRequest>,
) -> Response
where
    S: ArtifactStore + 'static,
{
    match desk.lock(request.confirmed) {
        Ok((LockOutcome::Locked, view)) => (StatusCode::OK, Json(view)).into_response(),
        Ok((LockOutcome::Declined, _)) => {
            let payload = json!({
                "error": "confirmation required",
                "warning": LOCK_WARNING,
            });
            (StatusCode::PRECONDITION_REQUIRED, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn photo_handler<S>(
    State(desk): State<Arc<EvaluationDesk<S>>>,
    Json(request): Json<PhotoRequest>,
) -> Response
where
    S: ArtifactStore + 'static,
{
    match desk.capture_photo(&request.data_url) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn signature_handler<S>(
    State(desk): State<Arc<EvaluationDesk<S>>>,
    Json(request): Json<SignatureRequest>,
) -> Response
where
    S: ArtifactStore + 'static,
{
    match desk.add_signature_strokes(request.strokes) {
        Ok(strokes) => (StatusCode::OK, Json(json!({ "strokes": strokes }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn clear_signature_handler<S>(
    State(desk): State<Arc<EvaluationDesk<S>>>,
) -> Response
where
    S: ArtifactStore + 'static,
{
    match desk.clear_signature() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn finalize_handler<S>(
    State(desk): State<Arc<EvaluationDesk<S>>>,
    Json(request): Json<FinalizeRequest>,
) -> Response
where
    S: ArtifactStore + 'static,
{
    match desk.finalize(&request.full_name) {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn download_handler<S>(
    State(desk): State<Arc<EvaluationDesk<S>>>,
    Path(file_name): Path<String>,
) -> Response
where
    S: ArtifactStore + 'static,
{
    match desk.download(&file_name) {
        Ok(Some(artifact)) => {
            let disposition = content_disposition(&artifact.file_name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, artifact.content_type.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                artifact.bytes,
            )
                .into_response()
        }
        Ok(None) => {
            let payload = json!({ "error": format!("export '{file_name}' not found") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// ASCII fallback plus the exact UTF-8 name.
fn content_disposition(file_name: &str) -> String {
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii_file_name(file_name),
        urlencoding::encode(file_name)
    )
}

fn ascii_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|ch| match ch {
            '"' => '_',
            ch if ch.is_ascii_graphic() || ch == ' ' => ch,
            _ => '_',
        })
        .collect()
}

pub(crate) fn status_for(err: &DeskError) -> StatusCode {
    match err {
        DeskError::Session(session) => match session {
            SessionError::NotAuthenticated | SessionError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            SessionError::UnknownOption { .. } | SessionError::UnknownCell { .. } => {
                StatusCode::BAD_REQUEST
            }
            SessionError::AlreadyAuthenticated
            | SessionError::Locked
            | SessionError::NothingToEvaluate
            | SessionError::Incomplete(_)
            | SessionError::NotAwaitingEvidence => StatusCode::CONFLICT,
            SessionError::Evidence(_) | SessionError::Export(ExportError::Evidence(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            SessionError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
        DeskError::Evidence(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DeskError::Store(ArtifactStoreError::InvalidName(_)) => StatusCode::BAD_REQUEST,
        DeskError::Store(_) | DeskError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_response(err: DeskError) -> Response {
    let status = status_for(&err);
    let payload = match &err {
        DeskError::Session(SessionError::Incomplete(report)) => json!({
            "error": err.to_string(),
            "expected": report.expected,
            "missing": report.missing,
        }),
        _ => json!({ "error": err.to_string() }),
    };
    (status, Json(payload)).into_response()
}
