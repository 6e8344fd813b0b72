use super::completion::CompletionReport;
use super::directory::Directory;
use super::domain::{EvaluationAssignment, Identity, ScoreLevel};
use super::evidence::{Camera, EvidenceError, EvidenceRecord, ImageHandle, SignatureSurface};
use super::export::{self, ExportBundle, ExportContext, ExportError};
use super::filter::{FilterOptions, FilterSelection, SelectionField};
use super::grouping::RoleGroups;
use super::scoring::{ScoreBook, ScoreChange};
use super::views::{EvidenceView, ProgressView, RoleView, SessionView};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shown before the lock commits.
pub const LOCK_WARNING: &str =
    "Once the evaluation is saved its scores can no longer be modified. Continue?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    SignedOut,
    Scoring,
    /// Locked; waiting for name, photo and signature.
    Evidence,
    Finalized,
}

impl SessionPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SignedOut => "Signed out",
            Self::Scoring => "Scoring",
            Self::Evidence => "Collecting evidence",
            Self::Finalized => "Finalized",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockConfirmation {
    Accepted,
    Declined,
}

impl From<bool> for LockConfirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Accepted
        } else {
            Self::Declined
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockOutcome {
    Locked,
    /// The warning was not accepted; the session stays editable.
    Declined,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no evaluator is signed in")]
    NotAuthenticated,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("an evaluator is already signed in")]
    AlreadyAuthenticated,
    #[error("'{value}' is not an available {}", .field.label())]
    UnknownOption { field: SelectionField, value: String },
    #[error("the evaluation is locked")]
    Locked,
    #[error("{worker} is not evaluated on {competency} in the current selection")]
    UnknownCell { worker: String, competency: String },
    #[error("no assignments are selected for evaluation")]
    NothingToEvaluate,
    #[error(
        "every listed worker must be scored before saving: {} of {} scores missing",
        .0.missing.len(),
        .0.expected
    )]
    Incomplete(CompletionReport),
    #[error("evidence can only be collected after the evaluation is locked")]
    NotAwaitingEvidence,
    #[error(transparent)]
    Evidence(#[from] EvidenceError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// All mutable state of one evaluator's session.
#[derive(Debug, Clone)]
pub struct EvaluationSession {
    directory: Arc<Directory>,
    identity: Option<Identity>,
    selection: FilterSelection,
    scores: ScoreBook,
    phase: SessionPhase,
    photo: Option<ImageHandle>,
    evidence: Option<EvidenceRecord>,
}

impl EvaluationSession {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self {
            directory,
            identity: None,
            selection: FilterSelection::default(),
            scores: ScoreBook::new(),
            phase: SessionPhase::SignedOut,
            photo: None,
            evidence: None,
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn scores(&self) -> &ScoreBook {
        &self.scores
    }

    pub fn is_locked(&self) -> bool {
        self.scores.is_locked()
    }

    pub fn photo(&self) -> Option<&ImageHandle> {
        self.photo.as_ref()
    }

    pub fn evidence(&self) -> Option<&EvidenceRecord> {
        self.evidence.as_ref()
    }

    pub fn login(&mut self, login_id: &str, secret: &str) -> Result<&Identity, SessionError> {
        if self.identity.is_some() {
            return Err(SessionError::AlreadyAuthenticated);
        }

        let Some(identity) = self.directory.authenticate(login_id, secret).cloned() else {
            warn!(login_id, "rejected evaluator credentials");
            return Err(SessionError::InvalidCredentials);
        };

        let visible = self.directory.visible_assignments(&identity);
        self.selection = FilterSelection::initial_for(&identity, &visible);
        self.phase = SessionPhase::Scoring;
        info!(
            login_id,
            sub_unit = %identity.assigned_sub_unit,
            administrator = identity.is_administrator(),
            "evaluator signed in"
        );

        Ok(self.identity.insert(identity))
    }

    /// Discards identity, selection, scores, lock and evidence.
    pub fn logout(&mut self) {
        if let Some(identity) = &self.identity {
            info!(login_id = %identity.login_id, "evaluator signed out");
        }
        *self = Self::new(Arc::clone(&self.directory));
    }

    pub fn visible_assignments(&self) -> Vec<&EvaluationAssignment> {
        match &self.identity {
            Some(identity) => self.directory.visible_assignments(identity),
            None => Vec::new(),
        }
    }

    pub fn options(&self) -> FilterOptions {
        FilterOptions::derive(&self.visible_assignments(), &self.selection)
    }

    /// `None` clears the field. Lower fields are always cleared.
    pub fn select(
        &mut self,
        field: SelectionField,
        value: Option<String>,
    ) -> Result<(), SessionError> {
        self.require_identity()?;
        if self.is_locked() {
            return Err(SessionError::Locked);
        }

        if let Some(candidate) = value.as_deref() {
            let options = self.options();
            if !options.for_field(field).iter().any(|option| option == candidate) {
                return Err(SessionError::UnknownOption {
                    field,
                    value: candidate.to_string(),
                });
            }
        }

        self.selection.select(field, value);
        Ok(())
    }

    /// Always derived from the current selection.
    pub fn role_groups(&self) -> RoleGroups {
        RoleGroups::derive(&self.visible_assignments(), self.selection.sub_unit.as_deref())
    }

    /// A locked session ignores the write and reports [`ScoreChange::Ignored`].
    pub fn set_score(
        &mut self,
        worker: &str,
        competency: &str,
        level: ScoreLevel,
    ) -> Result<ScoreChange, SessionError> {
        self.require_identity()?;
        if self.is_locked() {
            debug!(worker, competency, "score change ignored on locked evaluation");
            return Ok(ScoreChange::Ignored);
        }
        if !self.role_groups().contains_cell(worker, competency) {
            return Err(SessionError::UnknownCell {
                worker: worker.to_string(),
                competency: competency.to_string(),
            });
        }

        Ok(self.scores.set(worker, competency, level))
    }

    pub fn score(&self, worker: &str, competency: &str) -> Option<ScoreLevel> {
        self.scores.get(worker, competency)
    }

    pub fn completion(&self) -> CompletionReport {
        CompletionReport::check(&self.role_groups(), &self.scores)
    }

    /// Runs the completion gate, then commits the lock only when the
    /// irreversibility warning was accepted.
    pub fn lock(&mut self, confirmation: LockConfirmation) -> Result<LockOutcome, SessionError> {
        self.require_identity()?;
        if self.is_locked() {
            return Err(SessionError::Locked);
        }

        let groups = self.role_groups();
        if groups.is_empty() {
            return Err(SessionError::NothingToEvaluate);
        }

        let report = CompletionReport::check(&groups, &self.scores);
        if !report.is_complete() {
            if let Some(first) = report.first_missing() {
                warn!(
                    missing = report.missing.len(),
                    expected = report.expected,
                    role = %first.role,
                    worker = %first.worker,
                    competency = %first.competency,
                    "evaluation incomplete"
                );
            }
            return Err(SessionError::Incomplete(report));
        }

        if confirmation == LockConfirmation::Declined {
            return Ok(LockOutcome::Declined);
        }

        self.scores.lock();
        self.phase = SessionPhase::Evidence;
        info!(cells = report.expected, "evaluation locked");
        Ok(LockOutcome::Locked)
    }

    /// Replaces any earlier photo.
    pub fn capture_photo(&mut self, camera: &mut dyn Camera) -> Result<(), SessionError> {
        self.require_phase(SessionPhase::Evidence)?;
        let frame = camera.capture_image().ok_or(EvidenceError::MissingPhoto)?;
        self.photo = Some(frame);
        Ok(())
    }

    /// Validates the evidence and produces both artifacts. On failure the
    /// session stays in the evidence phase for correction.
    pub fn finalize(
        &mut self,
        full_name: &str,
        signature: &dyn SignatureSurface,
        finalized_at: NaiveDateTime,
    ) -> Result<ExportBundle, SessionError> {
        self.finalize_with(full_name, signature, finalized_at, |_| Ok(()))
    }

    /// Generates the exports and hands them to `deliver`. The session only
    /// moves to `Finalized` once delivery succeeds; on failure it stays in
    /// the evidence phase with photo and scores intact.
    pub fn finalize_with<E, F>(
        &mut self,
        full_name: &str,
        signature: &dyn SignatureSurface,
        finalized_at: NaiveDateTime,
        deliver: F,
    ) -> Result<ExportBundle, E>
    where
        E: From<SessionError> + std::fmt::Display,
        F: FnOnce(&ExportBundle) -> Result<(), E>,
    {
        self.require_phase(SessionPhase::Evidence)?;
        let identity = self.require_identity()?;

        let evidence = match EvidenceRecord::collect(full_name, self.photo.as_ref(), signature) {
            Ok(evidence) => evidence,
            Err(err) => {
                warn!(error = %err, "evidence rejected");
                return Err(SessionError::from(err).into());
            }
        };

        let groups = self.role_groups();
        let bundle = export::generate(&ExportContext {
            identity,
            selection: &self.selection,
            groups: &groups,
            scores: &self.scores,
            evidence: &evidence,
            finalized_at,
        })
        .map_err(SessionError::from)?;

        if let Err(err) = deliver(&bundle) {
            warn!(error = %err, "export delivery failed; evidence phase kept open");
            return Err(err);
        }

        info!(
            workbook = %bundle.workbook.file_name,
            document = %bundle.document.file_name,
            "evaluation finalized"
        );
        self.evidence = Some(evidence);
        self.phase = SessionPhase::Finalized;
        Ok(bundle)
    }

    pub fn view(&self) -> SessionView {
        let groups = self.role_groups();
        let report = CompletionReport::check(&groups, &self.scores);
        let roles = groups
            .iter()
            .map(|group| RoleView::from_group(group, &self.scores))
            .collect();

        SessionView {
            phase: self.phase,
            phase_label: self.phase.label(),
            locked: self.is_locked(),
            identity: self.identity.as_ref().map(Identity::view),
            selection: self.selection.clone(),
            options: self.options(),
            roles,
            progress: ProgressView {
                scored: report.scored(),
                expected: report.expected,
            },
            evidence: EvidenceView {
                photo_captured: self.photo.is_some(),
                full_name: self.evidence.as_ref().map(|record| record.full_name.clone()),
            },
        }
    }

    fn require_identity(&self) -> Result<&Identity, SessionError> {
        self.identity.as_ref().ok_or(SessionError::NotAuthenticated)
    }

    fn require_phase(&self, phase: SessionPhase) -> Result<(), SessionError> {
        self.require_identity()?;
        if self.phase == phase {
            Ok(())
        } else {
            Err(SessionError::NotAwaitingEvidence)
        }
    }
}
