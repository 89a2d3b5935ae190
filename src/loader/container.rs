use std::path::Path;

use crate::{
    error::{Result, ViewerError},
    gfx::scene::{Mesh, Scene},
};

/// Meshes loaded off-scene, waiting to be merged into a [`Scene`].
#[derive(Debug, Default)]
pub struct AssetContainer {
    meshes: Vec<Mesh>,
}

impl AssetContainer {
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self { meshes }
    }

    /// Reads a binary `.glb` file into a container.
    pub fn load_glb(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let meshes = super::gltf::load_glb_meshes(&bytes, path.parent())?;
        Ok(Self::new(meshes))
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Moves every mesh into the scene and returns how many were added.
    pub fn add_all_to_scene(self, scene: &mut Scene) -> usize {
        let count = self.meshes.len();
        scene.extend_meshes(self.meshes);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{CameraConfig, LightConfig},
        gfx::camera::CameraManager,
        loader::test_models::cube_glb,
    };

    #[test]
    fn glb_container_merges_into_scene() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.glb");
        std::fs::write(&path, cube_glb(Some([1.0, 0.0, 0.0]))).unwrap();

        let container = AssetContainer::load_glb(&path).unwrap();
        assert_eq!(container.meshes().len(), 1);

        let mut scene = Scene::new(
            CameraManager::from_config(&CameraConfig::default(), 1.0),
            LightConfig::default(),
        );
        scene.add_mesh(Mesh::empty("existing"));
        assert_eq!(container.add_all_to_scene(&mut scene), 1);
        assert_eq!(scene.mesh_count(), 2);
        assert_eq!(scene.meshes()[1].name, "Cube");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AssetContainer::load_glb(Path::new("/definitely/not/here.glb")).unwrap_err();
        assert!(matches!(err, ViewerError::Io { .. }));
    }
}
