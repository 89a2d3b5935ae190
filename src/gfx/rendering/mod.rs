// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles the mesh pipeline, GPU resource upkeep and frame pacing.

pub mod pipeline_manager;
pub mod render_engine;
pub mod render_loop;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{FrameStatus, RenderEngine};
pub use render_loop::RenderLoop;
