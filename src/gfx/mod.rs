//! # Graphics Module
//!
//! Everything that touches the GPU or describes what ends up on screen.
//!
//! - **Camera System** ([`camera`]) - Orbit camera with rotate, pan and zoom
//! - **Rendering** ([`rendering`]) - Mesh pipeline, render engine and render loop
//! - **Scene Management** ([`scene`]) - Meshes, bounds and the scene container
//! - **Resource Management** ([`resources`]) - Depth buffer and global uniforms
//!
//! Scene data is GPU-free until [`Scene::init_gpu_resources`] uploads it, so
//! loaders and tests can build scenes without an adapter.
//!
//! [`Scene::init_gpu_resources`]: scene::Scene::init_gpu_resources

pub mod camera;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
