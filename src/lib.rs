// src/lib.rs
//! Model Viewer
//!
//! A desktop viewer for `.gltf`, `.glb` and `.babylon` models built on wgpu,
//! winit and Dear ImGui. Loaded models are centred and scaled to a common
//! size, and can be hidden or shown as a whole.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod loader;
pub mod normalize;
pub mod session;
pub mod ui;
pub mod visibility;
pub mod wgpu_utils;

pub use app::ViewerApp;
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use session::{ViewerSession, ViewerStatus};
