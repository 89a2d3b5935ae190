// src/ui/panel.rs
//! Viewer panels
//!
//! The panels never act on the session themselves. They return
//! [`UiAction`]s that the application applies after the ImGui frame has
//! ended, so native dialogs never open inside a frame.

use imgui::{Condition, Ui, WindowFlags};

use crate::{session::ViewerStatus, visibility::Visibility};

const HEADER_HEIGHT: f32 = 48.0;
const MARGIN: f32 = 12.0;

pub const INFO_TEXT: &str =
    "Kindly ensure that your files are in .babylon format to utilize our 3D viewer.";

/// A user request coming out of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ChooseFile,
    Hide,
    Show,
}

/// Everything the panels need to know about the session for one frame.
#[derive(Debug, Clone, Copy)]
pub struct PanelState<'a> {
    pub title: &'a str,
    pub status: &'a ViewerStatus,
    pub visibility: Visibility,
}

/// Draws every panel and collects the actions the user triggered.
pub fn viewer_panels(ui: &Ui, state: PanelState<'_>) -> Vec<UiAction> {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return Vec::new();
    }

    navigation_header(ui, state.title, display_size);

    let mut actions = Vec::new();
    actions.extend(info_panel(ui, state.status));
    actions.extend(visibility_overlay(ui, state.visibility, display_size));
    actions
}

fn fixed_flags() -> WindowFlags {
    WindowFlags::NO_MOVE
        | WindowFlags::NO_RESIZE
        | WindowFlags::NO_COLLAPSE
        | WindowFlags::NO_SAVED_SETTINGS
}

fn navigation_header(ui: &Ui, title: &str, display_size: [f32; 2]) {
    ui.window("##header")
        .position([0.0, 0.0], Condition::Always)
        .size([display_size[0], HEADER_HEIGHT], Condition::Always)
        .flags(fixed_flags() | WindowFlags::NO_TITLE_BAR | WindowFlags::NO_SCROLLBAR)
        .build(|| {
            ui.text(title);
        });
}

/// Left panel: info text, file button and the status line.
fn info_panel(ui: &Ui, status: &ViewerStatus) -> Option<UiAction> {
    let mut action = None;

    ui.window("Upload")
        .position([MARGIN, HEADER_HEIGHT + MARGIN], Condition::Always)
        .size([320.0, 0.0], Condition::Always)
        .flags(fixed_flags() | WindowFlags::ALWAYS_AUTO_RESIZE)
        .build(|| {
            ui.text_wrapped(INFO_TEXT);
            ui.spacing();

            if ui.button("Choose File") {
                action = Some(UiAction::ChooseFile);
            }

            ui.separator();
            status_line(ui, status);
        });

    action
}

fn status_line(ui: &Ui, status: &ViewerStatus) {
    match status {
        ViewerStatus::Idle => ui.text_disabled("No model loaded"),
        ViewerStatus::Loading { file } => ui.text(format!("Loading {}...", file)),
        ViewerStatus::Loaded {
            file,
            meshes,
            triangles,
        } => {
            ui.text(file);
            ui.text(format!("{} meshes, {} triangles", meshes, triangles));
        }
        ViewerStatus::Failed { file, message } => {
            ui.text_colored([1.0, 0.4, 0.4, 1.0], format!("Could not load {}", file));
            ui.text_wrapped(message);
        }
    }
}

/// Hide and Show buttons anchored to the top-right corner of the viewport.
fn visibility_overlay(ui: &Ui, visibility: Visibility, display_size: [f32; 2]) -> Option<UiAction> {
    let mut action = None;

    ui.window("##visibility")
        .position(
            [display_size[0] - MARGIN, HEADER_HEIGHT + MARGIN],
            Condition::Always,
        )
        .position_pivot([1.0, 0.0])
        .flags(
            fixed_flags()
                | WindowFlags::NO_TITLE_BAR
                | WindowFlags::ALWAYS_AUTO_RESIZE
                | WindowFlags::NO_BACKGROUND,
        )
        .build(|| {
            ui.disabled(!visibility.is_visible(), || {
                if ui.button("Hide") {
                    action = Some(UiAction::Hide);
                }
            });
            ui.same_line();
            ui.disabled(visibility.is_visible(), || {
                if ui.button("Show") {
                    action = Some(UiAction::Show);
                }
            });
        });

    action
}
