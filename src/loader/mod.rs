//! # Model Loading
//!
//! Turns a user-selected file into meshes without blocking the event loop.
//!
//! [`ModelLoader::load`] validates the extension up front, then parses the
//! file on a worker thread. The result arrives through a oneshot channel
//! wrapped in [`PendingLoad`], which can be polled once per frame or awaited
//! as a future. Each load carries a [`LoadTicket`] so that a newer selection
//! can supersede an older one that is still in flight.
//!
//! Two strategies exist, picked by format:
//!
//! - [`LoadStrategy::Append`] (`.gltf`, `.babylon`): the meshes go straight
//!   into the scene
//! - [`LoadStrategy::Container`] (`.glb`): the meshes are loaded into an
//!   [`AssetContainer`] that is then merged into the scene

pub mod babylon;
pub mod container;
pub mod gltf;
#[cfg(test)]
pub(crate) mod test_models;

use std::{
    future::Future,
    path::{Path, PathBuf},
    pin::Pin,
    task::{Context, Poll},
    thread,
};

use futures::channel::oneshot;

pub use container::AssetContainer;

use crate::{
    config::SUPPORTED_EXTENSIONS,
    error::{Result, ViewerError},
    gfx::scene::{Mesh, Scene},
};

/// Supported model file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Gltf,
    Glb,
    Babylon,
}

/// How loaded meshes reach the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    Append,
    Container,
}

impl ModelFormat {
    /// Matches an extension without the dot, ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "gltf" => Some(ModelFormat::Gltf),
            "glb" => Some(ModelFormat::Glb),
            "babylon" => Some(ModelFormat::Babylon),
            _ => None,
        }
    }

    /// Validates a path's extension against the supported set.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ViewerError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
    }

    pub fn extension(self) -> &'static str {
        match self {
            ModelFormat::Gltf => SUPPORTED_EXTENSIONS[0],
            ModelFormat::Glb => SUPPORTED_EXTENSIONS[1],
            ModelFormat::Babylon => SUPPORTED_EXTENSIONS[2],
        }
    }

    pub fn strategy(self) -> LoadStrategy {
        match self {
            ModelFormat::Gltf | ModelFormat::Babylon => LoadStrategy::Append,
            ModelFormat::Glb => LoadStrategy::Container,
        }
    }
}

/// Identifies one call to [`ModelLoader::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// Parsed meshes, shaped by the format's [`LoadStrategy`]
#[derive(Debug)]
pub enum LoadPayload {
    Append(Vec<Mesh>),
    Container(AssetContainer),
}

impl LoadPayload {
    pub fn meshes(&self) -> &[Mesh] {
        match self {
            LoadPayload::Append(meshes) => meshes,
            LoadPayload::Container(container) => container.meshes(),
        }
    }

    /// Whether at least one mesh has triangles to show.
    pub fn has_geometry(&self) -> bool {
        self.meshes().iter().any(Mesh::has_geometry)
    }

    /// Adds the meshes to the scene and returns how many were added.
    pub fn add_to_scene(self, scene: &mut Scene) -> usize {
        match self {
            LoadPayload::Append(meshes) => {
                let count = meshes.len();
                scene.extend_meshes(meshes);
                count
            }
            LoadPayload::Container(container) => container.add_all_to_scene(scene),
        }
    }
}

/// A fully parsed model file
#[derive(Debug)]
pub struct LoadedModel {
    pub path: PathBuf,
    pub format: ModelFormat,
    pub payload: LoadPayload,
}

impl LoadedModel {
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parses a model file synchronously on the calling thread.
pub fn parse_model(path: &Path, format: ModelFormat) -> Result<LoadedModel> {
    let payload = match format.strategy() {
        LoadStrategy::Append => LoadPayload::Append(match format {
            ModelFormat::Babylon => babylon::load_babylon_meshes(path)?,
            _ => gltf::load_gltf_meshes(path)?,
        }),
        LoadStrategy::Container => LoadPayload::Container(AssetContainer::load_glb(path)?),
    };

    if !payload.has_geometry() {
        return Err(ViewerError::EmptyModel {
            path: path.to_path_buf(),
        });
    }

    Ok(LoadedModel {
        path: path.to_path_buf(),
        format,
        payload,
    })
}

/// A load running on a worker thread
///
/// Resolves exactly once, either through [`PendingLoad::try_complete`] or by
/// awaiting it. A worker that dies without answering resolves to
/// [`ViewerError::LoadCancelled`].
#[derive(Debug)]
pub struct PendingLoad {
    pub ticket: LoadTicket,
    pub path: PathBuf,
    pub format: ModelFormat,
    receiver: oneshot::Receiver<Result<LoadedModel>>,
}

impl PendingLoad {
    /// Non-blocking check for the result.
    pub fn try_complete(&mut self) -> Option<Result<LoadedModel>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(ViewerError::LoadCancelled)),
        }
    }

    /// Blocks the calling thread until the load finishes.
    pub fn wait(self) -> Result<LoadedModel> {
        pollster::block_on(self)
    }
}

impl Future for PendingLoad {
    type Output = Result<LoadedModel>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(ViewerError::LoadCancelled)))
    }
}

/// Starts model loads on worker threads and hands out tickets
#[derive(Debug, Default)]
pub struct ModelLoader {
    issued: u64,
}

impl ModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `path` and starts parsing it in the background.
    ///
    /// Fails immediately with [`ViewerError::UnsupportedFormat`] for an
    /// unknown extension; no ticket is issued in that case.
    pub fn load(&mut self, path: &Path) -> Result<PendingLoad> {
        let format = ModelFormat::from_path(path)?;

        self.issued += 1;
        let ticket = LoadTicket(self.issued);
        let (sender, receiver) = oneshot::channel();

        let worker_path = path.to_path_buf();
        thread::Builder::new()
            .name(format!("model-loader-{}", self.issued))
            .spawn(move || {
                let result = parse_model(&worker_path, format);
                if sender.send(result).is_err() {
                    log::debug!("load of {} finished after it was abandoned", worker_path.display());
                }
            })
            .map_err(|source| ViewerError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!("loading {} as {:?} ({:?})", path.display(), format, ticket);

        Ok(PendingLoad {
            ticket,
            path: path.to_path_buf(),
            format,
            receiver,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_models::{babylon_box_json, cube_glb, cube_gltf_json};

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(ModelFormat::from_path(Path::new("a/B.GLTF")).unwrap(), ModelFormat::Gltf);
        assert_eq!(ModelFormat::from_path(Path::new("x.Glb")).unwrap(), ModelFormat::Glb);
        assert_eq!(
            ModelFormat::from_path(Path::new("scene.babylon")).unwrap(),
            ModelFormat::Babylon
        );
    }

    #[test]
    fn unknown_or_missing_extension_is_rejected() {
        for name in ["model.txt", "model", "model.obj", "gltf", "model.gltf.zip"] {
            let err = ModelFormat::from_path(Path::new(name)).unwrap_err();
            assert!(err.is_unsupported_format(), "{name} should be rejected");
        }
    }

    #[test]
    fn strategies_follow_format() {
        assert_eq!(ModelFormat::Gltf.strategy(), LoadStrategy::Append);
        assert_eq!(ModelFormat::Babylon.strategy(), LoadStrategy::Append);
        assert_eq!(ModelFormat::Glb.strategy(), LoadStrategy::Container);
        assert_eq!(ModelFormat::Glb.extension(), "glb");
    }

    #[test]
    fn rejected_file_issues_no_ticket() {
        let mut loader = ModelLoader::new();
        assert!(loader.load(Path::new("model.txt")).is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.babylon");
        std::fs::write(&path, babylon_box_json(1.0, [0.0; 3])).unwrap();
        let pending = loader.load(&path).unwrap();
        assert_eq!(pending.ticket, LoadTicket(1));
    }

    #[test]
    fn background_loads_resolve_with_the_right_payload() {
        let dir = tempfile::tempdir().unwrap();
        let gltf_path = dir.path().join("cube.gltf");
        let glb_path = dir.path().join("cube.glb");
        std::fs::write(&gltf_path, cube_gltf_json(None)).unwrap();
        std::fs::write(&glb_path, cube_glb(None)).unwrap();

        let mut loader = ModelLoader::new();
        let gltf = loader.load(&gltf_path).unwrap().wait().unwrap();
        let glb = loader.load(&glb_path).unwrap().wait().unwrap();

        assert!(matches!(gltf.payload, LoadPayload::Append(ref m) if m.len() == 1));
        assert!(matches!(glb.payload, LoadPayload::Container(ref c) if c.meshes().len() == 1));
        assert_eq!(glb.file_name(), "cube.glb");
    }

    #[test]
    fn empty_babylon_scene_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.babylon");
        std::fs::write(&path, r#"{ "meshes": [] }"#).unwrap();

        let err = ModelLoader::new().load(&path).unwrap().wait().unwrap_err();
        assert!(matches!(err, ViewerError::EmptyModel { .. }));
    }

    #[test]
    fn transform_only_babylon_scene_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes.babylon");
        std::fs::write(
            &path,
            r#"{ "meshes": [ { "name": "root", "position": [1, 2, 3] }, { "name": "pivot" } ] }"#,
        )
        .unwrap();

        let err = ModelLoader::new().load(&path).unwrap().wait().unwrap_err();
        assert!(matches!(err, ViewerError::EmptyModel { .. }));
    }

    #[test]
    fn dropped_sender_resolves_as_cancelled() {
        let (sender, receiver) = oneshot::channel();
        let mut pending = PendingLoad {
            ticket: LoadTicket(7),
            path: PathBuf::from("x.glb"),
            format: ModelFormat::Glb,
            receiver,
        };
        assert!(pending.try_complete().is_none());
        drop(sender);
        assert!(matches!(pending.try_complete(), Some(Err(ViewerError::LoadCancelled))));
    }
}
