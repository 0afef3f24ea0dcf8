//! Windowed runner.
//!
//! Opens a winit window, renders the field through [`GpuState`] and feeds
//! cursor and resize events into the scheduler. Every delivered redraw that
//! answers the scheduler's request runs one tick.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::FieldConfig;
use crate::error::{FieldError, Result};
use crate::gpu::GpuState;
use crate::input::{InputEvent, InputSender};
use crate::scheduler::{FrameId, FrameScheduler, FrameSource};
use crate::surface::DrawList;

/// Frames backed by window redraw requests.
#[derive(Debug, Default)]
pub struct RedrawFrames {
    window: Option<Arc<Window>>,
    next_id: FrameId,
    requested: Option<FrameId>,
}

impl RedrawFrames {
    fn attach(&mut self, window: Arc<Window>) {
        self.window = Some(window);
    }

    /// The request a redraw answers, if the redraw was ours.
    fn take(&mut self) -> Option<FrameId> {
        self.requested.take()
    }
}

impl FrameSource for RedrawFrames {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        self.requested = Some(self.next_id);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        self.next_id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.requested == Some(id) {
            self.requested = None;
        }
    }
}

/// Builder for a standalone particle field window.
///
/// # Example
///
/// ```ignore
/// AmbientField::new()
///     .with_config(FieldConfig::new().with_particle_count(40))
///     .with_title("Sign in")
///     .run()?;
/// ```
#[derive(Debug, Clone)]
pub struct AmbientField {
    config: FieldConfig,
    title: String,
    window_size: (u32, u32),
}

impl AmbientField {
    pub fn new() -> Self {
        Self {
            config: FieldConfig::default(),
            title: "driftfield".to_string(),
            window_size: (1280, 720),
        }
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<()> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for AmbientField {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    settings: AmbientField,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    draw_list: DrawList,
    scheduler: FrameScheduler<RedrawFrames>,
    input: InputSender,
    error: Option<FieldError>,
}

impl App {
    fn new(settings: AmbientField) -> Self {
        let scheduler = FrameScheduler::new(RedrawFrames::default());
        let input = scheduler.input();
        Self {
            settings,
            window: None,
            gpu_state: None,
            draw_list: DrawList::new(0, 0),
            scheduler,
            input,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: FieldError) {
        log::error!("{error}");
        self.error = Some(error);
        self.scheduler.cancel();
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.settings.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());
        self.scheduler.frames_mut().attach(window.clone());

        let size = window.inner_size();
        self.draw_list.set_size(size.width, size.height);

        let config = self.settings.config.clone();
        match pollster::block_on(GpuState::new(window, config.background)) {
            Ok(gpu_state) => {
                self.gpu_state = Some(gpu_state);
                if let Err(e) = self.scheduler.start(Some(&self.draw_list), config) {
                    self.fail(event_loop, e);
                }
            }
            Err(e) => {
                // Nothing to draw on; the field simply does not run.
                log::warn!("{e}");
                if let Err(e) = self.scheduler.start::<DrawList>(None, config) {
                    return self.fail(event_loop, e);
                }
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(input) = InputEvent::from_window_event(&event) {
            self.input.send(input);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.scheduler.cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.draw_list
                    .set_size(physical_size.width, physical_size.height);
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                // Redraws the system asks for on its own repaint the last
                // frame without advancing the field.
                if let Some(id) = self.scheduler.frames_mut().take() {
                    self.scheduler.run_frame(id, &mut self.draw_list);
                }
                if let Some(gpu_state) = &mut self.gpu_state {
                    match gpu_state.render(&self.draw_list) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => gpu_state.resize(winit::dpi::PhysicalSize {
                            width: gpu_state.config.width,
                            height: gpu_state.config.height,
                        }),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            self.scheduler.cancel();
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("render error: {e:?}"),
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redraw_frames_track_latest_request() {
        let mut frames = RedrawFrames::default();
        let first = frames.request_frame();
        let second = frames.request_frame();
        assert_ne!(first, second);
        assert_eq!(frames.take(), Some(second));
        assert_eq!(frames.take(), None);
    }

    #[test]
    fn test_redraw_frames_cancel() {
        let mut frames = RedrawFrames::default();
        let id = frames.request_frame();
        frames.cancel_frame(id + 1);
        assert_eq!(frames.requested, Some(id));
        frames.cancel_frame(id);
        assert_eq!(frames.take(), None);
    }

    #[test]
    fn test_builder() {
        let field = AmbientField::new()
            .with_title("Sign in")
            .with_window_size(640, 480)
            .with_config(FieldConfig::new().with_particle_count(40));
        assert_eq!(field.title, "Sign in");
        assert_eq!(field.window_size, (640, 480));
        assert_eq!(field.config.particle_count, 40);
    }

    #[test]
    fn test_run_rejects_bad_config_before_opening_window() {
        let err = AmbientField::new()
            .with_config(FieldConfig::new().with_colors([]))
            .run()
            .unwrap_err();
        assert!(matches!(err, FieldError::EmptyPalette));
    }
}
