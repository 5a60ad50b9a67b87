//! Windowed application runner for the debug renderer.
//!
//! Provides [`run_windowed`], which takes ownership of a [`FrameHost`] and
//! drives it inside a winit event loop. Keyboard, mouse, and touch events are
//! translated into [`DeviceEvent`]s; each `RedrawRequested` event runs one
//! host frame into a [`DrawList`] and renders it.
//!
//! This module is feature-gated behind `renderer`.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{WindowAttributes, WindowId};

use super::renderer::{Camera2D, DebugRenderer};
use crate::engine::FrameHost;
use crate::input::{DeviceEvent, Key, SurfaceGeometry};
use crate::surface::DrawList;

/// Run `host` in a window with debug rendering.
///
/// Blocks until the window is closed. The window opens at `width` x
/// `height` physical pixels; the host's logical surface is stretched to fill
/// it and pointer coordinates are mapped back through the host's
/// [`SurfaceGeometry`].
///
/// # Errors
///
/// Returns an error if the event loop cannot be created or the window or
/// renderer fails to initialize.
pub fn run_windowed<H: FrameHost + 'static>(
    host: H,
    width: u32,
    height: u32,
) -> Result<(), anyhow::Error> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = App {
        state: AppState::Pending {
            host,
            width,
            height,
        },
        init_failed: false,
    };

    event_loop.run_app(&mut app)?;

    if app.init_failed {
        return Err(anyhow::anyhow!(
            "failed to initialize windowed renderer (see logs for details)"
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Internal state machine
// ---------------------------------------------------------------------------

/// Winit 0.30 only allows window creation inside `resumed`, hence the
/// `Pending` phase.
enum AppState<H> {
    Pending {
        host: H,
        width: u32,
        height: u32,
    },
    Running(Box<Running<H>>),
    Transitioning,
}

struct Running<H> {
    host: H,
    renderer: DebugRenderer,
    list: DrawList,
    started: Instant,
    cursor: (f64, f64),
    title: String,
}

struct App<H> {
    state: AppState<H>,
    init_failed: bool,
}

impl<H: FrameHost> App<H> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, host: H, width: u32, height: u32) {
        self.init_failed = true;
        self.state = AppState::Pending {
            host,
            width,
            height,
        };
        event_loop.exit();
    }
}

impl<H: FrameHost> ApplicationHandler for App<H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let state = std::mem::replace(&mut self.state, AppState::Transitioning);
        match state {
            AppState::Pending {
                mut host,
                width,
                height,
            } => {
                let title = host.window_title();
                let window_attrs = WindowAttributes::default()
                    .with_title(title.clone())
                    .with_inner_size(winit::dpi::PhysicalSize::new(width, height));

                let window = match event_loop.create_window(window_attrs) {
                    Ok(window) => Arc::new(window),
                    Err(e) => {
                        tracing::error!(error = %e, "failed to create window -- exiting");
                        self.fail(event_loop, host, width, height);
                        return;
                    }
                };

                let (logical_w, logical_h) = host.surface_size();
                let camera = Camera2D::new(logical_w as f32, logical_h as f32);
                match pollster::block_on(DebugRenderer::new(window.clone(), camera)) {
                    Ok(renderer) => {
                        tracing::info!(width, height, "arcade window created");
                        host.set_geometry(geometry_for(window.inner_size().width, logical_w));
                        window.request_redraw();
                        self.state = AppState::Running(Box::new(Running {
                            host,
                            renderer,
                            list: DrawList::new(),
                            started: Instant::now(),
                            cursor: (0.0, 0.0),
                            title,
                        }));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to initialize debug renderer -- exiting");
                        self.fail(event_loop, host, width, height);
                    }
                }
            }
            running @ AppState::Running(_) => self.state = running,
            AppState::Transitioning => {
                tracing::warn!("resumed called during state transition");
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let AppState::Running(app) = &mut self.state else {
            return;
        };
        let app = &mut **app;

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window close requested -- shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!(
                    width = new_size.width,
                    height = new_size.height,
                    "window resized"
                );
                app.renderer.resize(new_size);
                let (logical_w, _) = app.host.surface_size();
                app.host.set_geometry(geometry_for(new_size.width, logical_w));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    let key = Key::from_code(&format!("{code:?}"));
                    let device_event = match event.state {
                        ElementState::Pressed => DeviceEvent::KeyDown(key),
                        ElementState::Released => DeviceEvent::KeyUp(key),
                    };
                    app.host.device_event(&device_event);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                app.cursor = (position.x, position.y);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let device_event = match state {
                    ElementState::Pressed => DeviceEvent::PointerDown {
                        x: app.cursor.0,
                        y: app.cursor.1,
                    },
                    ElementState::Released => DeviceEvent::PointerUp,
                };
                app.host.device_event(&device_event);
            }
            WindowEvent::Touch(touch) => {
                let device_event = match touch.phase {
                    TouchPhase::Started => Some(DeviceEvent::TouchStart {
                        x: touch.location.x,
                        y: touch.location.y,
                    }),
                    TouchPhase::Ended | TouchPhase::Cancelled => Some(DeviceEvent::TouchEnd),
                    TouchPhase::Moved => None,
                };
                if let Some(device_event) = device_event {
                    app.host.device_event(&device_event);
                }
            }
            WindowEvent::RedrawRequested => {
                let timestamp_ms = app.started.elapsed().as_secs_f64() * 1000.0;

                // An idle host keeps showing its last frame.
                let mut next = DrawList::new();
                if app.host.frame(timestamp_ms, &mut next) {
                    app.list = next;
                }

                match app.renderer.render(&app.list) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = app.renderer.window().inner_size();
                        app.renderer.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("GPU out of memory -- exiting");
                        event_loop.exit();
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "surface error during render");
                    }
                }

                let title = app.host.window_title();
                if title != app.title {
                    app.renderer.window().set_title(&title);
                    app.title = title;
                }

                app.renderer.window().request_redraw();
            }
            _ => {}
        }
    }
}

/// Geometry for a window `window_width` physical pixels wide showing a
/// logical surface `logical_width` wide.
fn geometry_for(window_width: u32, logical_width: f64) -> SurfaceGeometry {
    if window_width == 0 || logical_width <= 0.0 {
        return SurfaceGeometry::default();
    }
    SurfaceGeometry::new(0.0, 0.0, f64::from(window_width) / logical_width)
}
