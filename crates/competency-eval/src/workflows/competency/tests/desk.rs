use super::common::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::workflows::competency::{
    ArtifactStore, ArtifactStoreError, DeskError, Directory, EvaluationDesk, ExportArtifact,
    ScoreLevel, SessionPhase,
};

/// Rejects writes while `offline` is set.
#[derive(Default)]
struct FlakyStore {
    offline: AtomicBool,
    inner: MemoryStore,
}

impl ArtifactStore for FlakyStore {
    fn put(&self, artifact: &ExportArtifact) -> Result<(), ArtifactStoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ArtifactStoreError::Unavailable("disk full".to_string()));
        }
        self.inner.put(artifact)
    }

    fn fetch(&self, file_name: &str) -> Result<Option<ExportArtifact>, ArtifactStoreError> {
        self.inner.fetch(file_name)
    }
}

fn ready_to_finalize(desk: &EvaluationDesk<FlakyStore>) {
    desk.login("marlon@empresa.com", "123")
        .expect("seeded evaluator");
    let view = desk.view().expect("session view");
    for role in &view.roles {
        for row in &role.workers {
            for competency in &role.competencies {
                desk.set_score(&row.worker, competency, ScoreLevel::Developing)
                    .expect("visible cell");
            }
        }
    }
    desk.lock(true).expect("complete evaluation locks");
    desk.capture_photo(&photo().to_data_url())
        .expect("photo accepted");
    desk.add_signature_strokes(vec![vec![(10.0, 10.0), (200.0, 120.0)]])
        .expect("signature strokes");
}

#[test]
fn failed_delivery_keeps_the_evidence_phase_open() {
    let store = Arc::new(FlakyStore::default());
    store.offline.store(true, Ordering::SeqCst);
    let desk = EvaluationDesk::new(Arc::new(Directory::standard()), Arc::clone(&store))
        .with_clock(fixed_clock);
    ready_to_finalize(&desk);

    let err = desk.finalize("Marlon Ruiz").expect_err("store is offline");
    assert!(matches!(
        err,
        DeskError::Store(ArtifactStoreError::Unavailable(_))
    ));

    let view = desk.view().expect("session view");
    assert_eq!(view.phase, SessionPhase::Evidence);
    assert!(view.locked);
    assert!(view.evidence.photo_captured);
    assert_eq!(view.progress.scored, view.progress.expected);

    store.offline.store(false, Ordering::SeqCst);
    let receipt = desk.finalize("Marlon Ruiz").expect("retry succeeds");
    assert_eq!(receipt.session.phase, SessionPhase::Finalized);
    assert!(desk
        .download(&receipt.document.file_name)
        .expect("lookup")
        .is_some());
}

#[test]
fn far_off_pad_strokes_still_finalize() {
    let desk = EvaluationDesk::new(
        Arc::new(Directory::standard()),
        Arc::new(FlakyStore::default()),
    )
    .with_clock(fixed_clock);
    ready_to_finalize(&desk);
    desk.add_signature_strokes(vec![vec![(0.0, 0.0), (2.0e8, 0.0)]])
        .expect("strokes accepted");

    let receipt = desk.finalize("Marlon Ruiz").expect("exports generated");
    assert_eq!(receipt.result_rows, 10);
}
