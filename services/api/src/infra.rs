use competency_eval::config::EvaluationConfig;
use competency_eval::error::AppError;
use competency_eval::workflows::competency::import;
use competency_eval::workflows::competency::store::validate_file_name;
use competency_eval::workflows::competency::{
    ArtifactStore, ArtifactStoreError, Directory, ExportArtifact,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Holds finalized exports until the process exits.
#[derive(Default, Clone)]
pub(crate) struct InMemoryArtifactStore {
    artifacts: Arc<Mutex<HashMap<String, ExportArtifact>>>,
}

impl ArtifactStore for InMemoryArtifactStore {
    fn put(&self, artifact: &ExportArtifact) -> Result<(), ArtifactStoreError> {
        let mut guard = self
            .artifacts
            .lock()
            .map_err(|_| ArtifactStoreError::Unavailable("store mutex poisoned".to_string()))?;
        guard.insert(artifact.file_name.clone(), artifact.clone());
        Ok(())
    }

    fn fetch(&self, file_name: &str) -> Result<Option<ExportArtifact>, ArtifactStoreError> {
        let guard = self
            .artifacts
            .lock()
            .map_err(|_| ArtifactStoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(guard.get(file_name).cloned())
    }
}

/// Writes each export as a file under `root`.
#[derive(Debug, Clone)]
pub(crate) struct DirectoryArtifactStore {
    root: PathBuf,
}

impl DirectoryArtifactStore {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub(crate) fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}

impl ArtifactStore for DirectoryArtifactStore {
    fn put(&self, artifact: &ExportArtifact) -> Result<(), ArtifactStoreError> {
        let file_name = validate_file_name(&artifact.file_name)?;
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(file_name), &artifact.bytes)?;
        Ok(())
    }

    fn fetch(&self, file_name: &str) -> Result<Option<ExportArtifact>, ArtifactStoreError> {
        let file_name = validate_file_name(file_name)?;
        let path = self.path_for(file_name);
        if !path.is_file() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        Ok(Some(ExportArtifact {
            file_name: file_name.to_string(),
            content_type: content_type_for(&path),
            bytes,
        }))
    }
}

pub(crate) fn content_type_for(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}

/// The seeded directory, or its identities paired with assignments from CSV.
pub(crate) fn load_directory(
    config: &EvaluationConfig,
    assignments_override: Option<&Path>,
) -> Result<Directory, AppError> {
    let source = assignments_override.or(config.assignments_csv.as_deref());
    match source {
        Some(path) => {
            let assignments = import::assignments_from_path(path)?;
            info!(path = %path.display(), rows = assignments.len(), "loaded assignments");
            Ok(Directory::standard().with_assignments(assignments))
        }
        None => Ok(Directory::standard()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use competency_eval::workflows::competency::export::{PDF_CONTENT_TYPE, XLSX_CONTENT_TYPE};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "competency-eval-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn artifact(file_name: &str, content_type: &'static str) -> ExportArtifact {
        ExportArtifact {
            file_name: file_name.to_string(),
            content_type,
            bytes: b"%PDF-1.7".to_vec(),
        }
    }

    #[test]
    fn directory_store_round_trips_with_guessed_content_type() {
        let root = scratch_dir("store");
        let store = DirectoryArtifactStore::new(&root);

        store
            .put(&artifact("Evaluacion_A_B.pdf", PDF_CONTENT_TYPE))
            .expect("write artifact");
        let fetched = store
            .fetch("Evaluacion_A_B.pdf")
            .expect("read artifact")
            .expect("artifact present");

        assert_eq!(fetched.content_type, "application/pdf");
        assert_eq!(fetched.bytes, b"%PDF-1.7");
        assert!(store.fetch("other.pdf").expect("lookup").is_none());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn directory_store_refuses_escaping_names() {
        let store = DirectoryArtifactStore::new(scratch_dir("escape"));
        let result = store.put(&artifact("../outside.pdf", PDF_CONTENT_TYPE));
        assert!(matches!(result, Err(ArtifactStoreError::InvalidName(_))));
    }

    #[test]
    fn workbook_extension_maps_to_spreadsheet_type() {
        assert_eq!(content_type_for(Path::new("x.xlsx")), XLSX_CONTENT_TYPE);
    }

    #[test]
    fn memory_store_returns_stored_artifacts() {
        let store = InMemoryArtifactStore::default();
        store
            .put(&artifact("a.pdf", PDF_CONTENT_TYPE))
            .expect("store artifact");
        assert!(store.fetch("a.pdf").expect("lookup").is_some());
        assert!(store.fetch("b.pdf").expect("lookup").is_none());
    }

    #[test]
    fn default_directory_uses_seed_data() {
        let config = EvaluationConfig {
            export_dir: PathBuf::from("exports"),
            assignments_csv: None,
        };
        let directory = load_directory(&config, None).expect("seeded directory");
        assert_eq!(directory.assignments().len(), 18);
    }
}
