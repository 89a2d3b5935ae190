//! Viewer session state
//!
//! [`ViewerSession`] owns everything the viewer knows about the currently
//! loaded model: the scene, the visibility flag, the in-flight load and the
//! status line. It is GPU-free so the whole load/normalize/toggle flow can be
//! driven from tests.

use std::path::PathBuf;

use crate::{
    config::{ViewerConfig, UNSUPPORTED_FILE_MESSAGE},
    error::{Result, ViewerError},
    gfx::{camera::CameraManager, scene::Scene},
    loader::{display_name, LoadedModel, ModelLoader, PendingLoad},
    normalize::{normalize_scene, Normalization},
    ui::dialogs::Notifier,
    visibility::{Visibility, VisibilityController},
};

/// What the info panel shows below the file button.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewerStatus {
    #[default]
    Idle,
    Loading {
        file: String,
    },
    Loaded {
        file: String,
        meshes: usize,
        triangles: usize,
    },
    Failed {
        file: String,
        message: String,
    },
}

impl ViewerStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewerStatus::Loading { .. })
    }
}

pub struct ViewerSession {
    pub scene: Scene,
    visibility: VisibilityController,
    loader: ModelLoader,
    pending: Option<PendingLoad>,
    status: ViewerStatus,
    normalization_factor: f32,
    last_normalization: Option<Normalization>,
}

impl ViewerSession {
    pub fn new(config: &ViewerConfig) -> Self {
        let (width, height) = config.window_size;
        let aspect = width as f32 / height.max(1) as f32;
        let scene = Scene::new(
            CameraManager::from_config(&config.camera, aspect),
            config.light,
        );

        Self {
            scene,
            visibility: VisibilityController::new(),
            loader: ModelLoader::new(),
            pending: None,
            status: ViewerStatus::Idle,
            normalization_factor: config.normalization_factor,
            last_normalization: None,
        }
    }

    pub fn status(&self) -> &ViewerStatus {
        &self.status
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility.state()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Normalization applied by the most recent completed load.
    pub fn last_normalization(&self) -> Option<&Normalization> {
        self.last_normalization.as_ref()
    }

    /// Handles the result of the file picker.
    ///
    /// `None` (dialog dismissed) does nothing. A file with an unsupported
    /// extension raises the alert and leaves the scene as it is. Otherwise a
    /// background load starts and supersedes any load still in flight.
    pub fn choose_file(&mut self, file: Option<PathBuf>, notifier: &dyn Notifier) {
        let Some(path) = file else {
            return;
        };

        match self.loader.load(&path) {
            Ok(pending) => {
                if let Some(previous) = self.pending.replace(pending) {
                    log::info!(
                        "{} superseded by {}",
                        previous.path.display(),
                        path.display()
                    );
                }
                self.status = ViewerStatus::Loading {
                    file: display_name(&path),
                };
            }
            Err(err) if err.is_unsupported_format() => {
                log::warn!("{}", err);
                notifier.alert(UNSUPPORTED_FILE_MESSAGE);
            }
            Err(err) => self.fail(&path, err),
        }
    }

    /// Applies the pending load if it has finished. Called once per frame.
    ///
    /// Returns `true` when the scene changed.
    pub fn poll_load(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let Some(result) = pending.try_complete() else {
            return false;
        };
        let Some(pending) = self.pending.take() else {
            return false;
        };

        self.finish(pending.path, result)
    }

    /// Blocks until the pending load finishes and applies it.
    pub fn wait_for_load(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                let path = pending.path.clone();
                let result = pending.wait();
                self.finish(path, result)
            }
            None => false,
        }
    }

    pub fn hide(&mut self) {
        self.visibility.hide(&mut self.scene);
    }

    pub fn show(&mut self) {
        self.visibility.show(&mut self.scene);
    }

    fn finish(&mut self, path: PathBuf, result: Result<LoadedModel>) -> bool {
        match result {
            Ok(model) => {
                self.apply(model);
                true
            }
            Err(err) => {
                self.fail(&path, err);
                false
            }
        }
    }

    fn apply(&mut self, model: LoadedModel) {
        let file = model.file_name();

        self.scene.clear_meshes();
        let added = model.payload.add_to_scene(&mut self.scene);
        self.last_normalization = normalize_scene(&mut self.scene, self.normalization_factor);
        self.visibility.sync(&mut self.scene);

        let stats = self.scene.get_statistics();
        log::info!(
            "loaded {} ({:?}): {} meshes, {} triangles",
            file,
            model.format,
            added,
            stats.total_triangles
        );
        self.status = ViewerStatus::Loaded {
            file,
            meshes: stats.mesh_count,
            triangles: stats.total_triangles,
        };
    }

    fn fail(&mut self, path: &std::path::Path, err: ViewerError) {
        log::error!("failed to load {}: {}", path.display(), err);
        self.status = ViewerStatus::Failed {
            file: display_name(path),
            message: err.to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{loader::test_models::babylon_box_json, ui::dialogs::RecordingNotifier};

    fn write(dir: &tempfile::TempDir, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn dismissed_dialog_does_nothing() {
        let mut session = ViewerSession::new(&ViewerConfig::default());
        let notifier = RecordingNotifier::new();
        session.choose_file(None, &notifier);

        assert!(!session.is_loading());
        assert!(notifier.messages().is_empty());
        assert_eq!(session.status(), &ViewerStatus::Idle);
    }

    #[test]
    fn failed_load_keeps_previous_meshes() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(&dir, "box.babylon", babylon_box_json(1.0, [0.0; 3]));
        let bad = write(&dir, "bad.babylon", "{ nope");

        let mut session = ViewerSession::new(&ViewerConfig::default());
        let notifier = RecordingNotifier::new();
        session.choose_file(Some(good), &notifier);
        assert!(session.wait_for_load());
        assert_eq!(session.scene.mesh_count(), 2);

        session.choose_file(Some(bad), &notifier);
        assert!(session.status().is_loading());
        assert!(!session.wait_for_load());

        assert_eq!(session.scene.mesh_count(), 2);
        assert!(matches!(session.status(), ViewerStatus::Failed { file, .. } if file == "bad.babylon"));
    }

    #[test]
    fn poll_applies_finished_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "box.babylon", babylon_box_json(1.0, [0.0; 3]));

        let mut session = ViewerSession::new(&ViewerConfig::default());
        session.choose_file(Some(path), &RecordingNotifier::new());

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while !session.poll_load() {
            assert!(std::time::Instant::now() < deadline, "load never finished");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        assert!(!session.is_loading());
        assert_eq!(
            session.status(),
            &ViewerStatus::Loaded {
                file: "box.babylon".into(),
                meshes: 2,
                triangles: 2
            }
        );
    }
}
