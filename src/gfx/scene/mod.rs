//! # Scene Management Module
//!
//! Scene graph for the viewer: a flat list of meshes, the orbit camera and
//! the hemispheric light.
//!
//! ## Key Components
//!
//! - [`Scene`] - The main scene container that owns meshes, camera and light
//! - [`Mesh`] - Geometry with a local transform and an enabled flag
//! - [`Aabb`] - Axis-aligned bounding boxes used to measure loaded models
//! - [`Vertex3D`] - Vertex layout shared with the render pipeline

pub mod bounds;
pub mod mesh;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use bounds::Aabb;
pub use mesh::{DrawMesh, Mesh, Transform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
