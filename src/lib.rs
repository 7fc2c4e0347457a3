// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod animator;
pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod session;
pub mod state;

// External crate imports
use log::{info, warn};
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;

// Standard library imports
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

pub use animator::{
    target_angle, AnimationState, FrameRequest, SpinAnimator, SpinPhase, SpinPhysics,
};
pub use config::{Color, WheelConfig, PALETTE};
pub use error::{Result, SpinRejection, WheelError};
pub use layout::{layout, Participant, ParticipantId, Sector, WheelLayout};
pub use render::{render_wheel, Canvas};
pub use session::SelectionSession;
pub use state::{AppState, WheelCommand};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// A window showing the moderator wheel for one meeting.
pub struct Wheel {
    config: WheelConfig,
    session: SelectionSession,
}

impl Wheel {
    pub fn new(config: WheelConfig, participants: Vec<Participant>) -> Self {
        Self {
            config,
            session: SelectionSession::new(participants),
        }
    }

    pub fn with_session(config: WheelConfig, session: SelectionSession) -> Self {
        Self { config, session }
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    /// Opens the window; Space or a left click spins the wheel.
    pub fn show(&mut self) -> Result<()> {
        self.run_window(None)
    }

    pub fn show_with_commands(&mut self, receiver: Receiver<WheelCommand>) -> Result<()> {
        self.run_window(Some(receiver))
    }

    fn run_window(&mut self, receiver: Option<Receiver<WheelCommand>>) -> Result<()> {
        let font = match &self.config.font_path {
            Some(path) => Some(load_font(path)?),
            None => {
                warn!("no font configured, names will not be drawn");
                None
            }
        };

        let size = self.config.canvas_size;
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(size as f64, size as f64))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();
        let inner = window.inner_size();
        let surface_texture = SurfaceTexture::new(inner.width, inner.height, &window);
        // the buffer stays at the configured square; pixels scales it onto the surface
        let mut pixels = Pixels::new(size as u32, size as u32, surface_texture)?;

        let mut app_state = AppState::new(self.session.clone(), self.config.physics);
        let mut rng = rand::rng();
        let mut frame_requested = true;

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate);
        let mut last_frame = Instant::now();
        let config = &self.config;

        event_loop.run(|event, window_target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    app_state.shutdown();
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    let _ = pixels.resize_surface(new_size.width, new_size.height);
                    frame_requested = true;
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: Key::Named(NamedKey::Space),
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                }
                | WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    app_state.apply(WheelCommand::SpinRandom, &mut rng);
                    frame_requested = true;
                }
                WindowEvent::RedrawRequested => {
                    let request = match receiver {
                        Some(ref receiver) => app_state.update_with_commands(receiver, &mut rng),
                        None => app_state.update(),
                    };
                    frame_requested = request == FrameRequest::NextFrame;

                    let mut canvas = Canvas::new(pixels.frame_mut(), size, size);
                    render_wheel(
                        &mut canvas,
                        app_state.visible_layout(),
                        app_state.angle(),
                        app_state.caption(),
                        config,
                        font.as_ref(),
                    );
                    if let Err(err) = pixels.render() {
                        warn!("render failed: {err}");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                // commands can arrive at any time, so a command-driven wheel keeps polling
                if frame_requested || receiver.is_some() {
                    let next_frame = last_frame + frame_duration;
                    if Instant::now() >= next_frame {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                        window_target.set_control_flow(ControlFlow::Poll);
                    } else {
                        window_target.set_control_flow(ControlFlow::WaitUntil(next_frame));
                    }
                } else {
                    window_target.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        })?;

        self.session = app_state.session().clone();
        info!(
            "wheel closed with {} of {} selected",
            self.session.selected().len(),
            self.session.participants().len()
        );
        Ok(())
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Reads and parses a TrueType/OpenType font.
pub fn load_font(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path).map_err(|source| WheelError::FontLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_vec(data).ok_or_else(|| WheelError::InvalidFont(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_is_reported() {
        let err = load_font(Path::new("/nonexistent/wheel-font.ttf")).unwrap_err();
        assert!(matches!(err, WheelError::FontLoad { .. }));
        assert!(!err.is_ignorable());
    }

    #[test]
    fn test_wheel_keeps_session() {
        let wheel = Wheel::new(WheelConfig::default(), Participant::roster(["A", "B"]));
        assert_eq!(wheel.session().remaining().len(), 2);
        assert_eq!(wheel.config().canvas_size, 400);
    }
}
