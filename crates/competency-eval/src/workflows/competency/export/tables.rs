use super::ExportContext;
use serde::Serialize;

pub const RESULTS_SHEET: &str = "Resultados";
pub const ACTIVITY_SHEET: &str = "Actividades Evaluador";

pub const RESULT_COLUMNS: [&str; 7] = [
    "Colaborador",
    "Puesto",
    "Competencia",
    "Puntaje",
    "Area",
    "Gerencia",
    "Fecha",
];

pub const ACTIVITY_COLUMNS: [&str; 7] = [
    "Evaluador",
    "Email",
    "AreaAsignada",
    "NombreEvidencia",
    "FechaFinalizacion",
    "Foto",
    "Firma",
];

const STORED_IMAGE_NOTE: &str = "Ver en sistema (Base64)";

/// One scored (role, worker, competency) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub worker: String,
    pub role: String,
    pub competency: String,
    pub score: u8,
    pub sub_unit: String,
    pub organizational_unit: String,
    pub timestamp: String,
}

/// Who finalized the evaluation and with which evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRow {
    pub evaluator: String,
    pub email: String,
    pub assigned_sub_unit: String,
    pub evidence_name: String,
    pub finalized_at: String,
    pub photo: String,
    pub signature: String,
}

impl ActivityRow {
    pub fn values(&self) -> [&str; 7] {
        [
            &self.evaluator,
            &self.email,
            &self.assigned_sub_unit,
            &self.evidence_name,
            &self.finalized_at,
            &self.photo,
            &self.signature,
        ]
    }
}

pub(crate) fn results_table(ctx: &ExportContext<'_>) -> Vec<ResultRow> {
    let timestamp = ctx.timestamp();
    let sub_unit = ctx.selection.sub_unit.clone().unwrap_or_default();
    let organizational_unit = ctx.selection.organizational_unit.clone().unwrap_or_default();

    ctx.groups
        .cells()
        .map(|(role, worker, competency)| ResultRow {
            worker: worker.to_string(),
            role: role.to_string(),
            competency: competency.to_string(),
            score: ctx
                .scores
                .get(worker, competency)
                .map(|level| level.value())
                .unwrap_or(0),
            sub_unit: sub_unit.clone(),
            organizational_unit: organizational_unit.clone(),
            timestamp: timestamp.clone(),
        })
        .collect()
}

pub(crate) fn activity_row(ctx: &ExportContext<'_>) -> ActivityRow {
    ActivityRow {
        evaluator: ctx.identity.display_name.clone(),
        email: ctx.identity.login_id.clone(),
        assigned_sub_unit: ctx.identity.assigned_sub_unit.clone(),
        evidence_name: ctx.evidence.full_name.clone(),
        finalized_at: ctx.timestamp(),
        photo: STORED_IMAGE_NOTE.to_string(),
        signature: STORED_IMAGE_NOTE.to_string(),
    }
}
