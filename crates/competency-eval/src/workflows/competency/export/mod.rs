mod document;
mod tables;
mod workbook;

pub use document::{DocumentItem, DocumentLayout, DocumentPage, FontWeight, PAGE_BREAK_AT};
pub use tables::{
    ActivityRow, ResultRow, ACTIVITY_COLUMNS, ACTIVITY_SHEET, RESULTS_SHEET, RESULT_COLUMNS,
};

use super::domain::Identity;
use super::evidence::{EvidenceError, EvidenceRecord};
use super::filter::FilterSelection;
use super::grouping::RoleGroups;
use super::scoring::ScoreBook;
use chrono::NaiveDateTime;
use serde::Serialize;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("a sub-unit must be selected before exporting")]
    MissingSubUnit,
    #[error("workbook generation failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("evidence could not be embedded: {0}")]
    Evidence(#[from] EvidenceError),
}

/// Everything the generator reads; borrowed from a locked session.
#[derive(Debug, Clone, Copy)]
pub struct ExportContext<'a> {
    pub identity: &'a Identity,
    pub selection: &'a FilterSelection,
    pub groups: &'a RoleGroups,
    pub scores: &'a ScoreBook,
    pub evidence: &'a EvidenceRecord,
    pub finalized_at: NaiveDateTime,
}

impl ExportContext<'_> {
    pub(crate) fn timestamp(&self) -> String {
        self.finalized_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// A generated file ready to be offered for download.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ExportArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportArtifact")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub workbook: ExportArtifact,
    pub document: ExportArtifact,
    pub results: Vec<ResultRow>,
    pub activity: ActivityRow,
    pub layout: DocumentLayout,
}

impl ExportBundle {
    pub fn artifacts(&self) -> [&ExportArtifact; 2] {
        [&self.workbook, &self.document]
    }
}

pub fn generate(ctx: &ExportContext<'_>) -> Result<ExportBundle, ExportError> {
    let sub_unit = ctx
        .selection
        .sub_unit
        .as_deref()
        .ok_or(ExportError::MissingSubUnit)?;
    let base_name = file_stem(sub_unit, &ctx.identity.display_name);

    let results = tables::results_table(ctx);
    let activity = tables::activity_row(ctx);
    let workbook_bytes = workbook::render_workbook(&results, &activity)?;

    let layout = DocumentLayout::build(ctx)?;
    let document_bytes = layout.render_pdf();

    Ok(ExportBundle {
        workbook: ExportArtifact {
            file_name: format!("{base_name}.xlsx"),
            content_type: XLSX_CONTENT_TYPE,
            bytes: workbook_bytes,
        },
        document: ExportArtifact {
            file_name: format!("{base_name}.pdf"),
            content_type: PDF_CONTENT_TYPE,
            bytes: document_bytes,
        },
        results,
        activity,
        layout,
    })
}

/// `Evaluacion_{sub_unit}_{evaluator}` with path separators and control
/// characters replaced.
pub fn file_stem(sub_unit: &str, evaluator: &str) -> String {
    let raw = format!("Evaluacion_{sub_unit}_{evaluator}");
    raw.chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect()
}
