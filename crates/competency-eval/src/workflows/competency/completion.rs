use super::grouping::RoleGroups;
use super::scoring::ScoreBook;
use serde::Serialize;

/// A (worker, competency) cell with no stored score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingScore {
    pub role: String,
    pub worker: String,
    pub competency: String,
}

/// Outcome of checking every cell implied by the current grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReport {
    pub expected: usize,
    pub missing: Vec<MissingScore>,
}

impl CompletionReport {
    /// Missing cells are listed in role, worker, competency order.
    pub fn check(groups: &RoleGroups, scores: &ScoreBook) -> Self {
        let missing = groups
            .cells()
            .filter(|(_, worker, competency)| scores.get(worker, competency).is_none())
            .map(|(role, worker, competency)| MissingScore {
                role: role.to_string(),
                worker: worker.to_string(),
                competency: competency.to_string(),
            })
            .collect();

        Self {
            expected: groups.cell_count(),
            missing,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn scored(&self) -> usize {
        self.expected - self.missing.len()
    }

    /// The cell a caller should bring into focus.
    pub fn first_missing(&self) -> Option<&MissingScore> {
        self.missing.first()
    }
}
