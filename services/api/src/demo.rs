use crate::infra::{load_directory, DirectoryArtifactStore};
use chrono::Local;
use clap::Args;
use competency_eval::config::AppConfig;
use competency_eval::error::AppError;
use competency_eval::workflows::competency::import;
use competency_eval::workflows::competency::{
    ArtifactStore, Directory, EvaluationSession, ExportBundle, ImageHandle, ImageSignature,
    LockConfirmation, LockOutcome, ScoreLevel, SelectionField, SessionError, SignatureSurface,
    StillCamera, StrokePad, LOCK_WARNING,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Evaluator login id (email)
    #[arg(long)]
    pub(crate) login: String,
    /// Evaluator secret
    #[arg(long)]
    pub(crate) secret: String,
    /// CSV with `worker,competency,score` rows
    #[arg(long)]
    pub(crate) scores: PathBuf,
    /// Still photo of the evaluator (PNG or JPEG)
    #[arg(long)]
    pub(crate) photo: PathBuf,
    /// Signature image (PNG or JPEG)
    #[arg(long)]
    pub(crate) signature: PathBuf,
    /// Full name written on the evidence page
    #[arg(long)]
    pub(crate) full_name: String,
    /// Sub-unit to evaluate (defaults to the evaluator's own)
    #[arg(long)]
    pub(crate) sub_unit: Option<String>,
    /// CSV replacing the built-in assignments
    #[arg(long)]
    pub(crate) assignments: Option<PathBuf>,
    /// Directory receiving the exports (defaults to EVAL_EXPORT_DIR)
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
    /// Accept the irreversible lock without prompting
    #[arg(long)]
    pub(crate) yes: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory receiving the exports (defaults to EVAL_EXPORT_DIR)
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let directory = load_directory(&config.evaluation, args.assignments.as_deref())?;
    let mut session = EvaluationSession::new(Arc::new(directory));
    session.login(&args.login, &args.secret)?;

    if let Some(sub_unit) = args.sub_unit.as_deref() {
        select_sub_unit(&mut session, sub_unit)?;
    }

    for record in import::scores_from_path(&args.scores)? {
        session.set_score(&record.worker, &record.competency, record.level)?;
    }
    print_summary(&session);

    let confirmation = LockConfirmation::from(args.yes);
    if session.lock(confirmation)? == LockOutcome::Declined {
        println!("\n{LOCK_WARNING}");
        println!("Nothing was locked. Re-run with --yes to confirm.");
        return Ok(());
    }

    let photo = ImageHandle::from_bytes(fs::read(&args.photo)?)?;
    session.capture_photo(&mut StillCamera::new(photo))?;
    let signature = ImageSignature::from_image(ImageHandle::from_bytes(fs::read(
        &args.signature,
    )?)?)?;

    let bundle = session.finalize(&args.full_name, &signature, Local::now().naive_local())?;
    let out_dir = args.out_dir.unwrap_or(config.evaluation.export_dir);
    write_bundle(&bundle, &out_dir)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let directory = Directory::standard();
    let Some(evaluator) = directory
        .identities()
        .iter()
        .find(|identity| !identity.is_administrator())
        .cloned()
    else {
        println!("No evaluator is configured; nothing to demo.");
        return Ok(());
    };

    println!("Competency evaluation demo");
    println!(
        "Evaluator: {} ({})",
        evaluator.display_name, evaluator.assigned_sub_unit
    );

    let mut session = EvaluationSession::new(Arc::new(directory));
    session.login(&evaluator.login_id, &evaluator.secret)?;

    let cells: Vec<(String, String)> = session
        .role_groups()
        .cells()
        .map(|(_, worker, competency)| (worker.to_string(), competency.to_string()))
        .collect();
    let levels = ScoreLevel::ordered();
    for (index, (worker, competency)) in cells.iter().enumerate() {
        let level = levels[(index * 3 + 3) % levels.len()];
        session.set_score(worker, competency, level)?;
    }
    print_summary(&session);

    session.lock(LockConfirmation::Accepted)?;

    let mut frame = StrokePad::new(64, 48);
    frame.add_stroke(vec![(8.0, 8.0), (56.0, 8.0), (56.0, 40.0), (8.0, 40.0), (8.0, 8.0)]);
    session.capture_photo(&mut StillCamera::new(frame.export_image()?))?;

    let mut signature = StrokePad::default();
    signature.add_stroke(vec![
        (40.0, 150.0),
        (90.0, 60.0),
        (140.0, 150.0),
        (190.0, 60.0),
        (240.0, 150.0),
    ]);

    let bundle = session.finalize(
        &evaluator.display_name,
        &signature,
        Local::now().naive_local(),
    )?;
    let out_dir = args.out_dir.unwrap_or(config.evaluation.export_dir);
    write_bundle(&bundle, &out_dir)
}

/// Walks the drill-down from the organizational unit that owns `sub_unit`.
fn select_sub_unit(session: &mut EvaluationSession, sub_unit: &str) -> Result<(), SessionError> {
    let unit = session
        .visible_assignments()
        .iter()
        .find(|assignment| assignment.sub_unit == sub_unit)
        .map(|assignment| assignment.organizational_unit.clone());

    let Some(unit) = unit else {
        return Err(SessionError::UnknownOption {
            field: SelectionField::SubUnit,
            value: sub_unit.to_string(),
        });
    };
    session.select(SelectionField::OrganizationalUnit, Some(unit))?;
    session.select(SelectionField::SubUnit, Some(sub_unit.to_string()))
}

fn print_summary(session: &EvaluationSession) {
    let groups = session.role_groups();
    let progress = session.completion();
    println!(
        "\nScored {} of {} cells",
        progress.scored(),
        progress.expected
    );
    for group in groups.iter() {
        println!("Role: {}", group.role);
        for summary in session.scores().summarize_group(group) {
            println!(
                "  - {}: {}% ({})",
                summary.worker, summary.percentage, summary.status_label
            );
        }
    }
}

fn write_bundle(bundle: &ExportBundle, out_dir: &Path) -> Result<(), AppError> {
    let store = DirectoryArtifactStore::new(out_dir);
    println!("\nExports");
    for artifact in bundle.artifacts() {
        store.put(artifact)?;
        println!(
            "- {} ({} bytes)",
            store.path_for(&artifact.file_name).display(),
            artifact.bytes.len()
        );
    }
    Ok(())
}
