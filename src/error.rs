//! Error types for the model viewer
//!
//! Every fallible operation in the library returns [`ViewerError`]. Loader
//! failures are recoverable and end up in the UI status line; engine
//! construction failures are fatal and bubble out of [`ViewerApp::run`].
//!
//! [`ViewerApp::run`]: crate::app::ViewerApp::run

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading models or driving the rendering engine.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("unsupported model format: {} (expected .gltf, .glb or .babylon)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to import glTF: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("failed to parse .babylon scene: {0}")]
    Babylon(#[from] serde_json::Error),

    #[error("mesh '{mesh}' has invalid geometry: {reason}")]
    InvalidGeometry { mesh: String, reason: String },

    #[error("no mesh geometry found in {}", path.display())]
    EmptyModel { path: PathBuf },

    #[error("model load was cancelled before it completed")]
    LoadCancelled,

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

impl ViewerError {
    /// Returns true for errors the user caused by picking the wrong file.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, ViewerError::UnsupportedFormat { .. })
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_names_the_file() {
        let err = ViewerError::UnsupportedFormat {
            path: PathBuf::from("model.txt"),
        };
        assert!(err.is_unsupported_format());
        assert!(err.to_string().contains("model.txt"));
    }

    #[test]
    fn cancelled_is_not_a_format_error() {
        assert!(!ViewerError::LoadCancelled.is_unsupported_format());
    }
}
