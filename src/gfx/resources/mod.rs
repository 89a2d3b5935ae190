// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Depth buffer and the global camera/light uniforms.

pub mod global_bindings;
pub mod texture_resource;

pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUbo};
pub use texture_resource::TextureResource;
