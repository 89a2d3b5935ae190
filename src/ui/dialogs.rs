//! Native dialogs: the model file picker and user-facing alerts.

use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

use crate::config::SUPPORTED_EXTENSIONS;

/// Opens the native file picker. `None` when the user cancels.
pub fn pick_model_file() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Choose a 3D model")
        .add_filter("3D Models", &SUPPORTED_EXTENSIONS[..])
        .add_filter("All Files", &["*"])
        .pick_file()
}

/// Shows a blocking message to the user.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Native message box.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn alert(&self, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("3D Model Viewer")
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

/// Collects alerts instead of showing them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: std::cell::RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
