//! All-or-nothing visibility toggling for the loaded model.

use crate::gfx::scene::Scene;

/// Whether the loaded model is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// Keeps the visibility flag and the enabled state of every mesh in sync.
#[derive(Debug, Default)]
pub struct VisibilityController {
    state: Visibility,
}

impl VisibilityController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    /// Disables every mesh currently in the scene.
    pub fn hide(&mut self, scene: &mut Scene) {
        self.set(scene, Visibility::Hidden);
    }

    /// Enables every mesh currently in the scene.
    pub fn show(&mut self, scene: &mut Scene) {
        self.set(scene, Visibility::Visible);
    }

    /// Re-applies the current state to every mesh, e.g. after new meshes
    /// were added to the scene.
    pub fn sync(&self, scene: &mut Scene) {
        scene.set_all_enabled(self.state.is_visible());
    }

    fn set(&mut self, scene: &mut Scene, state: Visibility) {
        self.state = state;
        self.sync(scene);
        log::debug!("model {:?} ({} meshes)", state, scene.mesh_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{CameraConfig, LightConfig},
        gfx::{camera::CameraManager, scene::Mesh},
    };

    fn scene_with_nodes(count: usize) -> Scene {
        let mut scene = Scene::new(
            CameraManager::from_config(&CameraConfig::default(), 1.0),
            LightConfig::default(),
        );
        for i in 0..count {
            scene.add_mesh(Mesh::empty(format!("node {i}")));
        }
        scene
    }

    #[test]
    fn starts_visible() {
        assert_eq!(VisibilityController::new().state(), Visibility::Visible);
    }

    #[test]
    fn hide_twice_stays_hidden() {
        let mut scene = scene_with_nodes(3);
        let mut visibility = VisibilityController::new();

        visibility.hide(&mut scene);
        visibility.hide(&mut scene);

        assert_eq!(visibility.state(), Visibility::Hidden);
        assert!(scene.meshes().iter().all(|m| !m.is_enabled()));
    }

    #[test]
    fn show_after_hide_enables_everything() {
        let mut scene = scene_with_nodes(4);
        let mut visibility = VisibilityController::new();

        visibility.hide(&mut scene);
        visibility.show(&mut scene);

        assert_eq!(visibility.state(), Visibility::Visible);
        assert!(scene.meshes().iter().all(|m| m.is_enabled()));
    }

    #[test]
    fn sync_reaches_meshes_added_later() {
        let mut scene = scene_with_nodes(1);
        let mut visibility = VisibilityController::new();
        visibility.hide(&mut scene);

        scene.add_mesh(Mesh::empty("late"));
        assert!(scene.meshes()[1].is_enabled());

        visibility.sync(&mut scene);
        assert!(scene.meshes().iter().all(|m| !m.is_enabled()));
    }
}
