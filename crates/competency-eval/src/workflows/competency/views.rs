use super::domain::{EvaluationStatus, IdentityView, RubricLevelView, ScoreLevel};
use super::filter::{FilterOptions, FilterSelection};
use super::grouping::RoleGroup;
use super::scoring::ScoreBook;
use super::session::SessionPhase;
use serde::Serialize;

/// Snapshot of a session for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub phase_label: &'static str,
    pub locked: bool,
    pub identity: Option<IdentityView>,
    pub selection: FilterSelection,
    pub options: FilterOptions,
    pub roles: Vec<RoleView>,
    pub progress: ProgressView,
    pub evidence: EvidenceView,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleView {
    pub role: String,
    pub competencies: Vec<String>,
    pub workers: Vec<WorkerRowView>,
}

impl RoleView {
    pub fn from_group(group: &RoleGroup, scores: &ScoreBook) -> Self {
        let workers = group
            .workers
            .iter()
            .map(|worker| {
                let summary = scores.summarize(worker, &group.competencies);
                WorkerRowView {
                    worker: worker.clone(),
                    scores: group
                        .competencies
                        .iter()
                        .map(|competency| scores.get(worker, competency).map(ScoreLevel::value))
                        .collect(),
                    percentage: summary.percentage,
                    status: summary.status,
                    status_label: summary.status_label,
                }
            })
            .collect();

        Self {
            role: group.role.clone(),
            competencies: group.competencies.clone(),
            workers,
        }
    }
}

/// One table row; `scores` follows the role's competency order and `None`
/// marks an unscored cell.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerRowView {
    pub worker: String,
    pub scores: Vec<Option<u8>>,
    pub percentage: u8,
    pub status: EvaluationStatus,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressView {
    pub scored: usize,
    pub expected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceView {
    pub photo_captured: bool,
    pub full_name: Option<String>,
}

/// The rubric in display order.
pub fn rubric() -> Vec<RubricLevelView> {
    ScoreLevel::ordered().into_iter().map(ScoreLevel::view).collect()
}
