//! Competency evaluation: an evaluator signs in, narrows the assignment
//! directory to one sub-unit, scores every worker against the rubric, locks
//! the result and signs it off with a name, photo and signature before the
//! workbook and summary document are produced.

pub mod completion;
pub mod desk;
pub mod directory;
pub mod domain;
pub mod evidence;
pub mod export;
pub mod filter;
pub mod grouping;
pub mod import;
pub mod router;
pub mod scoring;
mod seed;
pub mod session;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use completion::{CompletionReport, MissingScore};
pub use desk::{DeskError, EvaluationDesk, FinalizeReceipt};
pub use directory::Directory;
pub use domain::{
    EvaluationAssignment, EvaluationStatus, Identity, IdentityKind, IdentityView,
    RubricLevelView, ScoreLevel, ScoreLevelError, MAX_SCORE,
};
pub use evidence::{
    Camera, EvidenceError, EvidenceRecord, ImageEncoding, ImageHandle, ImageSignature,
    SignatureSurface, StillCamera, StrokePad,
};
pub use export::{generate, ExportArtifact, ExportBundle, ExportContext, ExportError};
pub use filter::{FilterOptions, FilterSelection, SelectionField};
pub use grouping::{RoleGroup, RoleGroups};
pub use import::{ImportError, ScoreRecord};
pub use router::evaluation_router;
pub use scoring::{ScoreBook, ScoreChange, WorkerSummary};
pub use session::{
    EvaluationSession, LockConfirmation, LockOutcome, SessionError, SessionPhase, LOCK_WARNING,
};
pub use store::{ArtifactLink, ArtifactStore, ArtifactStoreError};
pub use views::SessionView;
