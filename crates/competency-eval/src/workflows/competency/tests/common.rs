use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use tower::ServiceExt;

use crate::workflows::competency::evidence::tests::tiny_png;
use crate::workflows::competency::{
    evaluation_router, ArtifactStore, ArtifactStoreError, Directory, EvaluationDesk,
    EvaluationSession, ExportArtifact, ImageHandle, ScoreLevel,
};

pub(super) const FURNACES: &str = "Hornos eléctricos";
pub(super) const OPERATOR: &str = "OPERADOR DE HORNO";
pub(super) const VALDEZ: &str = "JUAN VALDEZ";
pub(super) const PICAPIEDRA: &str = "PEDRO PICAPIEDRA";

#[derive(Default)]
pub(super) struct MemoryStore {
    artifacts: Mutex<HashMap<String, ExportArtifact>>,
}

impl ArtifactStore for MemoryStore {
    fn put(&self, artifact: &ExportArtifact) -> Result<(), ArtifactStoreError> {
        self.artifacts
            .lock()
            .expect("store mutex")
            .insert(artifact.file_name.clone(), artifact.clone());
        Ok(())
    }

    fn fetch(&self, file_name: &str) -> Result<Option<ExportArtifact>, ArtifactStoreError> {
        Ok(self
            .artifacts
            .lock()
            .expect("store mutex")
            .get(file_name)
            .cloned())
    }
}

pub(super) fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid timestamp")
}

pub(super) fn session() -> EvaluationSession {
    EvaluationSession::new(Arc::new(Directory::standard()))
}

pub(super) fn signed_in() -> EvaluationSession {
    let mut session = session();
    session
        .login("marlon@empresa.com", "123")
        .expect("seeded evaluator");
    session
}

/// Scores every cell in the current grouping, with the two furnace operators
/// at fixed levels.
pub(super) fn score_everything(session: &mut EvaluationSession) {
    let cells: Vec<(String, String)> = session
        .role_groups()
        .cells()
        .map(|(_, worker, competency)| (worker.to_string(), competency.to_string()))
        .collect();
    for (worker, competency) in cells {
        let level = match worker.as_str() {
            VALDEZ => ScoreLevel::Proficient,
            PICAPIEDRA => ScoreLevel::Learning,
            _ => ScoreLevel::Developing,
        };
        session
            .set_score(&worker, &competency, level)
            .expect("cell in grouping");
    }
}

pub(super) fn photo() -> ImageHandle {
    tiny_png()
}

pub(super) fn desk() -> Arc<EvaluationDesk<MemoryStore>> {
    Arc::new(
        EvaluationDesk::new(
            Arc::new(Directory::standard()),
            Arc::new(MemoryStore::default()),
        )
        .with_clock(fixed_clock),
    )
}

pub(super) fn router() -> Router {
    evaluation_router(desk())
}

pub(super) async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).expect("json body")))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };
    router.clone().oneshot(request).await.expect("router response")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
