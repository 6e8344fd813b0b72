use serde::{Deserialize, Serialize};

/// One (worker, competency) pairing that must be scored, located within the
/// organizational hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationAssignment {
    pub organizational_unit: String,
    pub sub_unit: String,
    pub role: String,
    pub worker: String,
    pub competency: String,
}

impl EvaluationAssignment {
    pub fn new(
        organizational_unit: impl Into<String>,
        sub_unit: impl Into<String>,
        role: impl Into<String>,
        worker: impl Into<String>,
        competency: impl Into<String>,
    ) -> Self {
        Self {
            organizational_unit: organizational_unit.into(),
            sub_unit: sub_unit.into(),
            role: role.into(),
            worker: worker.into(),
            competency: competency.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    /// Sees every assignment regardless of sub-unit.
    Administrator,
    Evaluator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub login_id: String,
    pub secret: String,
    pub display_name: String,
    pub assigned_sub_unit: String,
    pub kind: IdentityKind,
}

impl Identity {
    pub fn evaluator(
        login_id: impl Into<String>,
        secret: impl Into<String>,
        display_name: impl Into<String>,
        assigned_sub_unit: impl Into<String>,
    ) -> Self {
        Self {
            login_id: login_id.into(),
            secret: secret.into(),
            display_name: display_name.into(),
            assigned_sub_unit: assigned_sub_unit.into(),
            kind: IdentityKind::Evaluator,
        }
    }

    pub fn administrator(
        login_id: impl Into<String>,
        secret: impl Into<String>,
        display_name: impl Into<String>,
        assigned_sub_unit: impl Into<String>,
    ) -> Self {
        Self {
            kind: IdentityKind::Administrator,
            ..Self::evaluator(login_id, secret, display_name, assigned_sub_unit)
        }
    }

    pub fn is_administrator(&self) -> bool {
        self.kind == IdentityKind::Administrator
    }

    pub fn can_see(&self, assignment: &EvaluationAssignment) -> bool {
        self.is_administrator() || assignment.sub_unit == self.assigned_sub_unit
    }

    pub fn view(&self) -> IdentityView {
        IdentityView {
            login_id: self.login_id.clone(),
            display_name: self.display_name.clone(),
            assigned_sub_unit: self.assigned_sub_unit.clone(),
            kind: self.kind,
        }
    }
}

/// Identity fields safe to hand back to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityView {
    pub login_id: String,
    pub display_name: String,
    pub assigned_sub_unit: String,
    pub kind: IdentityKind,
}

/// Rubric level for a single competency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ScoreLevel {
    Unaware,
    Learning,
    Developing,
    Proficient,
}

pub const MAX_SCORE: u8 = 3;

impl ScoreLevel {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Unaware,
            Self::Learning,
            Self::Developing,
            Self::Proficient,
        ]
    }

    pub const fn value(self) -> u8 {
        match self {
            Self::Unaware => 0,
            Self::Learning => 1,
            Self::Developing => 2,
            Self::Proficient => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unaware => "NIVEL 0",
            Self::Learning => "NIVEL 1",
            Self::Developing => "NIVEL 2",
            Self::Proficient => "NIVEL 3",
        }
    }

    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Unaware => "Desconoce",
            Self::Learning => "En aprendizaje",
            Self::Developing => "En desarrollo",
            Self::Proficient => "Promedio",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Unaware => {
                "El colaborador desconoce los fundamentos básicos de la competencia."
            }
            Self::Learning => {
                "El colaborador evidencia conocimiento a nivel básico, sin llegar a completar actividades de la competencia."
            }
            Self::Developing => {
                "El colaborador logra el desarrollo de la competencia, evidencia dificultad para su término."
            }
            Self::Proficient => {
                "El colaborador evidencia el dominio de la competencia alineado al estándar establecido dentro del área."
            }
        }
    }

    pub fn view(self) -> RubricLevelView {
        RubricLevelView {
            value: self.value(),
            label: self.label(),
            short_name: self.short_name(),
            description: self.description(),
        }
    }
}

impl TryFrom<u8> for ScoreLevel {
    type Error = ScoreLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unaware),
            1 => Ok(Self::Learning),
            2 => Ok(Self::Developing),
            3 => Ok(Self::Proficient),
            other => Err(ScoreLevelError(i64::from(other))),
        }
    }
}

impl TryFrom<i64> for ScoreLevel {
    type Error = ScoreLevelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| ScoreLevelError(value))
            .and_then(Self::try_from)
    }
}

impl From<ScoreLevel> for u8 {
    fn from(level: ScoreLevel) -> Self {
        level.value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("score {0} is outside the rubric range 0..=3")]
pub struct ScoreLevelError(pub i64);

#[derive(Debug, Clone, Serialize)]
pub struct RubricLevelView {
    pub value: u8,
    pub label: &'static str,
    pub short_name: &'static str,
    pub description: &'static str,
}

/// Tier derived from a worker's completion percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Approved,
    ImprovementOpportunity,
    Rejected,
}

impl EvaluationStatus {
    pub const fn from_percentage(percentage: u8) -> Self {
        if percentage >= 70 {
            Self::Approved
        } else if percentage >= 50 {
            Self::ImprovementOpportunity
        } else {
            Self::Rejected
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::ImprovementOpportunity => "Improvement opportunity",
            Self::Rejected => "Rejected",
        }
    }
}
