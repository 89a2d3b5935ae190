use std::{path::PathBuf, sync::Arc};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::ViewerConfig,
    error::{Result, ViewerError},
    gfx::rendering::{FrameStatus, RenderEngine, RenderLoop},
    session::ViewerSession,
    ui::{pick_model_file, viewer_panels, DialogNotifier, PanelState, UiAction, UiManager},
};

/// The model viewer application: one window, one session.
pub struct ViewerApp {
    config: ViewerConfig,
    initial_file: Option<PathBuf>,
}

/// GPU-facing state that only exists while the viewer is mounted.
struct Gpu {
    window: Arc<Window>,
    render_engine: RenderEngine,
    ui_manager: UiManager,
}

struct AppState {
    config: ViewerConfig,
    session: ViewerSession,
    notifier: DialogNotifier,
    initial_file: Option<PathBuf>,
    gpu: Option<Gpu>,
    render_loop: RenderLoop,
    fatal: Option<ViewerError>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            initial_file: None,
        }
    }

    /// Loads `path` as if it had been chosen in the dialog once the window is up.
    pub fn with_initial_file(mut self, path: Option<PathBuf>) -> Self {
        self.initial_file = path;
        self
    }

    /// Runs the event loop until the window is closed.
    ///
    /// Returns the error that stopped the viewer, if any.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = AppState {
            session: ViewerSession::new(&self.config),
            config: self.config,
            notifier: DialogNotifier,
            initial_file: self.initial_file,
            gpu: None,
            render_loop: RenderLoop::new(),
            fatal: None,
        };

        event_loop.run_app(&mut state)?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let (width, height) = self.config.window_size;
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title(self.config.window_title.clone())
                .with_inner_size(LogicalSize::new(width, height)),
        )?;
        let window = Arc::new(window);

        let PhysicalSize { width, height } = window.inner_size();
        let render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.clear_color,
        ))?;

        self.session
            .scene
            .camera_manager
            .camera
            .resize_projection(width, height);

        let mut ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );
        ui_manager.update_display_size(width, height);

        Ok(Gpu {
            window,
            render_engine,
            ui_manager,
        })
    }

    /// Stops the render loop for good and drops every GPU resource.
    fn unmount(&mut self) {
        self.render_loop.stop();
        self.session.scene.release_gpu_resources();
        if self.gpu.take().is_some() {
            log::info!("viewer unmounted");
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.unmount();
        event_loop.exit();
    }

    fn redraw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        if !self.render_loop.tick() {
            return;
        }

        let scene = &mut self.session.scene;
        scene.update();
        scene.init_gpu_resources(gpu.render_engine.device(), gpu.render_engine.transform_layout());
        scene.update_transforms(gpu.render_engine.queue());
        gpu.render_engine
            .update(scene.camera_manager.camera.uniform, &scene.light);

        let Gpu {
            window,
            render_engine,
            ui_manager,
        } = gpu;
        let panel_state = PanelState {
            title: &self.config.window_title,
            status: self.session.status(),
            visibility: self.session.visibility(),
        };
        let mut actions = Vec::new();

        let status = render_engine.render_frame(
            &self.session.scene,
            |device, queue, encoder, color_attachment| {
                ui_manager.draw(device, queue, encoder, window, color_attachment, |ui| {
                    actions = viewer_panels(ui, panel_state);
                });
            },
        );
        if status == FrameStatus::Reconfigured {
            window.request_redraw();
        }

        for action in actions {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::ChooseFile => {
                let file = pick_model_file();
                self.session.choose_file(file, &self.notifier);
            }
            UiAction::Hide => self.session.hide(),
            UiAction::Show => self.session.show(),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() || self.fatal.is_some() {
            return;
        }

        match self.mount(event_loop) {
            Ok(gpu) => {
                log::info!("viewer mounted");
                self.gpu = Some(gpu);
                self.render_loop.start();

                if let Some(path) = self.initial_file.take() {
                    self.session.choose_file(Some(path), &self.notifier);
                }
            }
            Err(err) => {
                log::error!("failed to start the viewer: {}", err);
                self.fatal = Some(err);
                self.shutdown(event_loop);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let ui_event: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        if gpu.ui_manager.handle_input(&gpu.window, &ui_event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::KeyboardInput { event, .. } => {
                self.session
                    .scene
                    .camera_manager
                    .process_keyboard_event(&event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width == 0 || height == 0 {
                    return;
                }
                self.session
                    .scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                gpu.render_engine.resize(width, height);
                gpu.ui_manager.update_display_size(width, height);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };

        // Don't move the camera while the UI is being used
        if gpu.ui_manager.wants_input() {
            return;
        }

        self.session
            .scene
            .camera_manager
            .process_event(&event, &gpu.window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.session.poll_load();

        if let Some(gpu) = self.gpu.as_ref() {
            if self.render_loop.wants_redraw() {
                gpu.window.request_redraw();
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }
}
