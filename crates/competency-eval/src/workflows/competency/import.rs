use super::domain::{EvaluationAssignment, ScoreLevel, ScoreLevelError};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read evaluation data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid evaluation CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: column '{column}' is blank")]
    BlankField { row: usize, column: &'static str },
    #[error("row {row}: {source}")]
    Score {
        row: usize,
        #[source]
        source: ScoreLevelError,
    },
}

/// Header: `organizational_unit,sub_unit,role,worker,competency`.
pub fn assignments_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<EvaluationAssignment>, ImportError> {
    let file = std::fs::File::open(path)?;
    assignments_from_reader(file)
}

pub fn assignments_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<EvaluationAssignment>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut assignments = Vec::new();

    for (index, record) in csv_reader.deserialize::<AssignmentRow>().enumerate() {
        let row = record?;
        let line = index + 2;
        assignments.push(EvaluationAssignment {
            organizational_unit: required(row.organizational_unit, line, "organizational_unit")?,
            sub_unit: required(row.sub_unit, line, "sub_unit")?,
            role: required(row.role, line, "role")?,
            worker: required(row.worker, line, "worker")?,
            competency: required(row.competency, line, "competency")?,
        });
    }

    Ok(assignments)
}

/// A score captured outside the interactive flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub worker: String,
    pub competency: String,
    pub level: ScoreLevel,
}

/// Header: `worker,competency,score`.
pub fn scores_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ScoreRecord>, ImportError> {
    let file = std::fs::File::open(path)?;
    scores_from_reader(file)
}

pub fn scores_from_reader<R: Read>(reader: R) -> Result<Vec<ScoreRecord>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut scores = Vec::new();

    for (index, record) in csv_reader.deserialize::<ScoreRow>().enumerate() {
        let row = record?;
        let line = index + 2;
        let level =
            ScoreLevel::try_from(row.score).map_err(|source| ImportError::Score { row: line, source })?;
        scores.push(ScoreRecord {
            worker: required(row.worker, line, "worker")?,
            competency: required(row.competency, line, "competency")?,
            level,
        });
    }

    Ok(scores)
}

#[derive(Debug, Deserialize)]
struct AssignmentRow {
    organizational_unit: String,
    sub_unit: String,
    role: String,
    worker: String,
    competency: String,
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    worker: String,
    competency: String,
    score: i64,
}

fn required(value: String, row: usize, column: &'static str) -> Result<String, ImportError> {
    if value.trim().is_empty() {
        Err(ImportError::BlankField { row, column })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn assignments_parse_with_trimmed_fields() {
        let csv = "organizational_unit,sub_unit,role,worker,competency\n\
GERENCIA , Hornos eléctricos ,OPERADOR DE HORNO, A ,X\n\
GERENCIA,Hornos eléctricos,OPERADOR DE HORNO,B,Y\n";
        let assignments = assignments_from_reader(Cursor::new(csv)).expect("parses");

        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].organizational_unit, "GERENCIA");
        assert_eq!(assignments[0].sub_unit, "Hornos eléctricos");
        assert_eq!(assignments[0].worker, "A");
    }

    #[test]
    fn blank_assignment_fields_are_rejected_with_row_number() {
        let csv = "organizational_unit,sub_unit,role,worker,competency\n\
G,S,R,W,C\n\
G,S,R,,C\n";
        match assignments_from_reader(Cursor::new(csv)) {
            Err(ImportError::BlankField { row, column }) => {
                assert_eq!(row, 3);
                assert_eq!(column, "worker");
            }
            other => panic!("expected blank field error, got {other:?}"),
        }
    }

    #[test]
    fn scores_reject_values_outside_the_rubric() {
        let csv = "worker,competency,score\nA,X,3\nA,Y,5\n";
        match scores_from_reader(Cursor::new(csv)) {
            Err(ImportError::Score { row, source }) => {
                assert_eq!(row, 3);
                assert_eq!(source, ScoreLevelError(5));
            }
            other => panic!("expected score error, got {other:?}"),
        }
    }

    #[test]
    fn scores_parse_levels() {
        let csv = "worker,competency,score\nA,X,0\nB,Y,2\n";
        let scores = scores_from_reader(Cursor::new(csv)).expect("parses");
        assert_eq!(scores[0].level, ScoreLevel::Unaware);
        assert_eq!(scores[1].level, ScoreLevel::Developing);
    }

    #[test]
    fn missing_files_surface_io_errors() {
        let error = assignments_from_path("./does-not-exist.csv").expect_err("io error");
        assert!(matches!(error, ImportError::Io(_)));
    }
}
