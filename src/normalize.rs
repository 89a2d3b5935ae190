//! Model normalization
//!
//! Loaded models come in every size and with arbitrary origins. After a load
//! completes the scene's aggregate bounding box is measured and every mesh is
//! scaled by `1 / (factor * largest half-extent)` and moved down by the
//! box's vertical half-extent, so models show up at a consistent size around
//! the camera target.

use cgmath::Vector3;

use crate::gfx::scene::{Aabb, Scene};

/// Scale and offset applied to every mesh of a freshly loaded model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Multiplied into each mesh's scaling. `1.0` when the box is degenerate.
    pub scale: f32,
    /// Added to each mesh's position.
    pub offset: Vector3<f32>,
    /// The bounding box the normalization was computed from.
    pub source_bounds: Aabb,
}

impl Normalization {
    /// Computes the normalization for a bounding box.
    ///
    /// A box with zero or non-finite extent keeps its scale and is only
    /// translated.
    pub fn from_bounds(bounds: Aabb, factor: f32) -> Self {
        let half = bounds.half_extent();
        let largest = half.x.max(half.y).max(half.z) * factor;

        let scale = if bounds.is_finite() && largest > f32::EPSILON {
            1.0 / largest
        } else {
            log::warn!("model bounding box is degenerate ({:?}), skipping scale", half);
            1.0
        };

        let offset = if half.y.is_finite() {
            Vector3::new(0.0, -half.y, 0.0)
        } else {
            Vector3::new(0.0, 0.0, 0.0)
        };

        Self {
            scale,
            offset,
            source_bounds: bounds,
        }
    }

    /// Applies the scale and offset to every mesh in the scene.
    pub fn apply(&self, scene: &mut Scene) {
        for mesh in scene.meshes_mut() {
            mesh.transform.scaling *= self.scale;
            mesh.transform.position += self.offset;
        }
    }
}

/// Measures the scene and normalizes every mesh in it.
///
/// Returns `None` and leaves the scene untouched when no mesh has geometry.
pub fn normalize_scene(scene: &mut Scene, factor: f32) -> Option<Normalization> {
    let bounds = scene.bounding_box()?;
    let normalization = Normalization::from_bounds(bounds, factor);
    normalization.apply(scene);

    log::debug!(
        "normalized {} meshes: half extent {:?}, scale {}, offset {:?}",
        scene.mesh_count(),
        bounds.half_extent(),
        normalization.scale,
        normalization.offset
    );

    Some(normalization)
}
