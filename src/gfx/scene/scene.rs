use wgpu::Device;

use crate::{
    config::LightConfig,
    gfx::{camera::camera_utils::CameraManager, scene::bounds::Aabb},
};

use super::mesh::Mesh;

/// Main scene containing the meshes, the camera and the single
/// hemispheric light
pub struct Scene {
    pub camera_manager: CameraManager,
    pub light: LightConfig,
    meshes: Vec<Mesh>,
}

impl Scene {
    /// Creates a new, empty scene with the given camera manager
    pub fn new(camera_manager: CameraManager, light: LightConfig) -> Self {
        Self {
            camera_manager,
            light,
            meshes: Vec::new(),
        }
    }

    /// Updates the scene (camera matrices, etc.)
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    pub fn extend_meshes<I: IntoIterator<Item = Mesh>>(&mut self, meshes: I) {
        self.meshes.extend(meshes);
    }

    /// Removes every mesh. GPU buffers are released with the meshes.
    pub fn clear_meshes(&mut self) {
        self.meshes.clear();
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Enables or disables every mesh in the scene.
    pub fn set_all_enabled(&mut self, enabled: bool) {
        for mesh in &mut self.meshes {
            mesh.set_enabled(enabled);
        }
    }

    /// Aggregate world-space bounding box of every mesh with geometry.
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.meshes
            .iter()
            .filter_map(Mesh::world_bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Uploads GPU resources for every mesh that does not have them yet.
    ///
    /// Called once per frame; already uploaded meshes are skipped.
    pub fn init_gpu_resources(&mut self, device: &Device, transform_layout: &wgpu::BindGroupLayout) {
        for mesh in self.meshes.iter_mut() {
            mesh.init_gpu_resources(device, transform_layout);
        }
    }

    /// Releases the GPU buffers of every mesh, e.g. before the device goes away.
    pub fn release_gpu_resources(&mut self) {
        for mesh in &mut self.meshes {
            mesh.release_gpu_resources();
        }
    }

    /// Syncs every mesh transform to the GPU
    pub fn update_transforms(&self, queue: &wgpu::Queue) {
        for mesh in &self.meshes {
            mesh.update_transform(queue);
        }
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            mesh_count: self.meshes.len(),
            total_triangles: self.meshes.iter().map(Mesh::triangle_count).sum(),
        }
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub mesh_count: usize,
    pub total_triangles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use cgmath::Vector3;

    fn unit_cube_corners(name: &str) -> Mesh {
        let positions = [
            -1.0, -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0,
        ];
        Mesh::from_flat(name, &positions, &[], vec![0, 1, 2, 0, 2, 3]).unwrap()
    }

    fn scene() -> Scene {
        Scene::new(
            CameraManager::from_config(&CameraConfig::default(), 1.0),
            LightConfig::default(),
        )
    }

    #[test]
    fn empty_scene_has_no_bounds() {
        let mut scene = scene();
        assert!(scene.bounding_box().is_none());
        scene.add_mesh(Mesh::empty("node"));
        assert!(scene.bounding_box().is_none());
    }

    #[test]
    fn bounding_box_unions_all_meshes() {
        let mut scene = scene();
        let mut a = unit_cube_corners("a");
        a.transform.position = Vector3::new(3.0, 0.0, 0.0);
        scene.add_mesh(a);
        scene.add_mesh(unit_cube_corners("b"));

        let bounds = scene.bounding_box().unwrap();
        assert_eq!(bounds.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vector3::new(4.0, 1.0, 1.0));
    }

    #[test]
    fn statistics_count_meshes_and_triangles() {
        let mut scene = scene();
        scene.add_mesh(unit_cube_corners("a"));
        scene.add_mesh(unit_cube_corners("b"));
        scene.add_mesh(Mesh::empty("node"));

        let stats = scene.get_statistics();
        assert_eq!(stats.mesh_count, 3);
        assert_eq!(stats.total_triangles, 4);
    }
}
