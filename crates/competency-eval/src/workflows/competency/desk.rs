use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use super::directory::Directory;
use super::domain::ScoreLevel;
use super::evidence::{EvidenceError, ImageHandle, Point, SignatureSurface, StillCamera, StrokePad};
use super::export::ExportArtifact;
use super::filter::SelectionField;
use super::scoring::ScoreChange;
use super::session::{
    EvaluationSession, LockConfirmation, LockOutcome, SessionError, SessionPhase,
};
use super::store::{validate_file_name, ArtifactLink, ArtifactStore, ArtifactStoreError};
use super::views::SessionView;

/// Single-evaluator workstation: one session, one signature pad and the
/// store that receives finalized exports.
pub struct EvaluationDesk<S> {
    state: Mutex<DeskState>,
    store: Arc<S>,
    clock: fn() -> NaiveDateTime,
}

struct DeskState {
    session: EvaluationSession,
    pad: StrokePad,
}

pub const FINALIZE_NOTICE: &str =
    "Evaluation finalized. The workbook and the summary document are ready for download.";

/// Links to the two files produced by a finalized evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizeReceipt {
    pub notice: &'static str,
    pub workbook: ArtifactLink,
    pub document: ArtifactLink,
    pub result_rows: usize,
    pub document_pages: usize,
    pub session: SessionView,
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

impl<S> EvaluationDesk<S>
where
    S: ArtifactStore + 'static,
{
    pub fn new(directory: Arc<Directory>, store: Arc<S>) -> Self {
        Self {
            state: Mutex::new(DeskState {
                session: EvaluationSession::new(directory),
                pad: StrokePad::default(),
            }),
            store,
            clock: local_now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn view(&self) -> Result<SessionView, DeskError> {
        Ok(self.state()?.session.view())
    }

    pub fn login(&self, login_id: &str, secret: &str) -> Result<SessionView, DeskError> {
        let mut state = self.state()?;
        state.session.login(login_id, secret)?;
        Ok(state.session.view())
    }

    pub fn logout(&self) -> Result<SessionView, DeskError> {
        let mut state = self.state()?;
        state.session.logout();
        state.pad.clear();
        Ok(state.session.view())
    }

    pub fn select(
        &self,
        field: SelectionField,
        value: Option<String>,
    ) -> Result<SessionView, DeskError> {
        let mut state = self.state()?;
        state.session.select(field, value)?;
        Ok(state.session.view())
    }

    pub fn set_score(
        &self,
        worker: &str,
        competency: &str,
        level: ScoreLevel,
    ) -> Result<(ScoreChange, SessionView), DeskError> {
        let mut state = self.state()?;
        let change = state.session.set_score(worker, competency, level)?;
        Ok((change, state.session.view()))
    }

    pub fn lock(&self, confirmed: bool) -> Result<(LockOutcome, SessionView), DeskError> {
        let mut state = self.state()?;
        let outcome = state.session.lock(LockConfirmation::from(confirmed))?;
        Ok((outcome, state.session.view()))
    }

    pub fn capture_photo(&self, data_url: &str) -> Result<SessionView, DeskError> {
        let frame = ImageHandle::from_data_url(data_url)?;
        let mut camera = StillCamera::new(frame);
        let mut state = self.state()?;
        state.session.capture_photo(&mut camera)?;
        Ok(state.session.view())
    }

    pub fn add_signature_strokes(&self, strokes: Vec<Vec<Point>>) -> Result<usize, DeskError> {
        let mut state = self.state()?;
        ensure_evidence_phase(&state.session)?;
        for stroke in strokes {
            state.pad.add_stroke(stroke);
        }
        Ok(state.pad.stroke_count())
    }

    pub fn clear_signature(&self) -> Result<(), DeskError> {
        let mut state = self.state()?;
        ensure_evidence_phase(&state.session)?;
        state.pad.clear();
        Ok(())
    }

    /// Generates both exports and hands them to the store.
    pub fn finalize(&self, full_name: &str) -> Result<FinalizeReceipt, DeskError> {
        let mut state = self.state()?;
        let DeskState { session, pad } = &mut *state;
        let store = &self.store;
        let bundle = session.finalize_with(full_name, &*pad, (self.clock)(), |bundle| {
            for artifact in bundle.artifacts() {
                store.put(artifact)?;
                info!(
                    file_name = %artifact.file_name,
                    bytes = artifact.bytes.len(),
                    "stored export"
                );
            }
            Ok::<(), DeskError>(())
        })?;

        Ok(FinalizeReceipt {
            notice: FINALIZE_NOTICE,
            workbook: ArtifactLink::for_artifact(&bundle.workbook),
            document: ArtifactLink::for_artifact(&bundle.document),
            result_rows: bundle.results.len(),
            document_pages: bundle.layout.pages.len(),
            session: session.view(),
        })
    }

    pub fn download(&self, file_name: &str) -> Result<Option<ExportArtifact>, DeskError> {
        let file_name = validate_file_name(file_name)?;
        Ok(self.store.fetch(file_name)?)
    }

    fn state(&self) -> Result<MutexGuard<'_, DeskState>, DeskError> {
        self.state.lock().map_err(|_| DeskError::Poisoned)
    }
}

fn ensure_evidence_phase(session: &EvaluationSession) -> Result<(), SessionError> {
    match session.phase() {
        SessionPhase::Evidence => Ok(()),
        SessionPhase::SignedOut => Err(SessionError::NotAuthenticated),
        SessionPhase::Scoring | SessionPhase::Finalized => Err(SessionError::NotAwaitingEvidence),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Evidence(#[from] EvidenceError),
    #[error(transparent)]
    Store(#[from] ArtifactStoreError),
    #[error("evaluation desk state is poisoned")]
    Poisoned,
}
