//! # User Interface Module
//!
//! Dear ImGui overlay and native dialogs for the viewer.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`panel`] - Header, upload panel and the Hide/Show overlay, reporting
//!   [`UiAction`]s back to the application
//! - [`dialogs`] - Native file picker and the [`Notifier`] used for alerts
//!
//! When ImGui wants the mouse or keyboard, camera input is suppressed so
//! clicking a button does not rotate the model.

pub mod dialogs;
pub mod manager;
pub mod panel;

pub use dialogs::{pick_model_file, DialogNotifier, Notifier, RecordingNotifier};
pub use manager::UiManager;
pub use panel::{viewer_panels, PanelState, UiAction};
