use super::domain::{EvaluationStatus, ScoreLevel, MAX_SCORE};
use super::grouping::RoleGroup;
use serde::Serialize;
use std::collections::HashMap;

/// Worker → competency → level. Absence means "not yet scored", which is
/// distinct from a stored [`ScoreLevel::Unaware`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBook {
    scores: HashMap<String, HashMap<String, ScoreLevel>>,
    locked: bool,
}

/// Result of a write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreChange {
    Recorded { previous: Option<ScoreLevel> },
    /// The book is locked; nothing changed.
    Ignored,
}

impl ScoreBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, worker: &str, competency: &str, level: ScoreLevel) -> ScoreChange {
        if self.locked {
            return ScoreChange::Ignored;
        }

        let previous = self
            .scores
            .entry(worker.to_string())
            .or_default()
            .insert(competency.to_string(), level);
        ScoreChange::Recorded { previous }
    }

    pub fn get(&self, worker: &str, competency: &str) -> Option<ScoreLevel> {
        self.scores
            .get(worker)
            .and_then(|competencies| competencies.get(competency))
            .copied()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// One-way; only a fresh book is unlocked again.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn len(&self) -> usize {
        self.scores.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Completion percentage for display. Unscored competencies count as 0
    /// here, unlike the completion gate. Rounds half up.
    pub fn percentage(&self, worker: &str, competencies: &[String]) -> u8 {
        if competencies.is_empty() {
            return 0;
        }

        let total: u64 = competencies
            .iter()
            .filter_map(|competency| self.get(worker, competency))
            .map(|level| u64::from(level.value()))
            .sum();
        let max_possible = competencies.len() as u64 * u64::from(MAX_SCORE);

        // round(total * 100 / max) == floor((200 * total + max) / (2 * max))
        let rounded = (200 * total + max_possible) / (2 * max_possible);
        rounded.min(100) as u8
    }

    pub fn summarize(&self, worker: &str, competencies: &[String]) -> WorkerSummary {
        let percentage = self.percentage(worker, competencies);
        let status = EvaluationStatus::from_percentage(percentage);
        WorkerSummary {
            worker: worker.to_string(),
            percentage,
            status,
            status_label: status.label(),
        }
    }

    pub fn summarize_group(&self, group: &RoleGroup) -> Vec<WorkerSummary> {
        group
            .workers
            .iter()
            .map(|worker| self.summarize(worker, &group.competencies))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerSummary {
    pub worker: String,
    pub percentage: u8,
    pub status: EvaluationStatus,
    pub status_label: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competencies(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn unscored_is_distinct_from_zero() {
        let mut book = ScoreBook::new();
        assert_eq!(book.get("A", "X"), None);

        book.set("A", "X", ScoreLevel::Unaware);
        assert_eq!(book.get("A", "X"), Some(ScoreLevel::Unaware));
        assert_eq!(book.get("A", "Y"), None);
    }

    #[test]
    fn set_overwrites_and_reports_previous_level() {
        let mut book = ScoreBook::new();
        assert_eq!(
            book.set("A", "X", ScoreLevel::Learning),
            ScoreChange::Recorded { previous: None }
        );
        assert_eq!(
            book.set("A", "X", ScoreLevel::Proficient),
            ScoreChange::Recorded {
                previous: Some(ScoreLevel::Learning)
            }
        );
        assert_eq!(book.get("A", "X"), Some(ScoreLevel::Proficient));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn locked_book_ignores_writes() {
        let mut book = ScoreBook::new();
        book.set("A", "X", ScoreLevel::Developing);
        book.lock();
        let before = book.clone();

        assert_eq!(book.set("A", "X", ScoreLevel::Proficient), ScoreChange::Ignored);
        assert_eq!(book.set("B", "Y", ScoreLevel::Proficient), ScoreChange::Ignored);
        assert_eq!(book, before);
    }

    #[test]
    fn percentage_of_no_competencies_is_zero() {
        let mut book = ScoreBook::new();
        book.set("A", "X", ScoreLevel::Proficient);
        assert_eq!(book.percentage("A", &[]), 0);
        assert_eq!(book.percentage("nobody", &[]), 0);
    }

    #[test]
    fn percentage_rounds_half_up() {
        let comps = competencies(&["X", "Y", "Z"]);
        let mut book = ScoreBook::new();
        for comp in &comps {
            book.set("A", comp, ScoreLevel::Learning);
        }
        assert_eq!(book.percentage("A", &comps), 33);

        book.set("A", "X", ScoreLevel::Developing);
        // 4 / 9 = 44.4
        assert_eq!(book.percentage("A", &comps), 44);

        let pair = competencies(&["X", "Y"]);
        let mut half = ScoreBook::new();
        half.set("B", "X", ScoreLevel::Proficient);
        // 3 / 6 = 50 exactly; 1 / 6 = 16.67
        assert_eq!(half.percentage("B", &pair), 50);
        let mut sixth = ScoreBook::new();
        sixth.set("C", "X", ScoreLevel::Learning);
        assert_eq!(sixth.percentage("C", &pair), 17);
    }

    #[test]
    fn round_half_up_on_exact_midpoints() {
        // 3 / 24 = 12.5 -> 13
        let comps: Vec<String> = (0..8).map(|i| format!("C{i}")).collect();
        let mut book = ScoreBook::new();
        book.set("A", "C0", ScoreLevel::Proficient);
        assert_eq!(book.percentage("A", &comps), 13);
    }

    #[test]
    fn percentage_is_monotonic_in_each_score() {
        let comps = competencies(&["X", "Y", "Z"]);
        for fixed in ScoreLevel::ordered() {
            let mut previous = 0;
            for level in ScoreLevel::ordered() {
                let mut book = ScoreBook::new();
                book.set("A", "X", level);
                book.set("A", "Y", fixed);
                let pct = book.percentage("A", &comps);
                assert!(pct >= previous, "{pct} < {previous}");
                previous = pct;
            }
        }
    }

    #[test]
    fn summaries_carry_status_tiers() {
        let group = RoleGroup {
            role: "OPERADOR DE HORNO".into(),
            workers: competencies(&["A", "B"]),
            competencies: competencies(&["X", "Y", "Z"]),
        };
        let mut book = ScoreBook::new();
        for comp in &group.competencies {
            book.set("A", comp, ScoreLevel::Proficient);
            book.set("B", comp, ScoreLevel::Learning);
        }

        let summaries = book.summarize_group(&group);
        assert_eq!(summaries[0].percentage, 100);
        assert_eq!(summaries[0].status, EvaluationStatus::Approved);
        assert_eq!(summaries[1].percentage, 33);
        assert_eq!(summaries[1].status_label, "Rejected");
    }
}
