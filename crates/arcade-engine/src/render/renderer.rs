//! Debug 2D renderer using wgpu.
//!
//! # Architecture
//!
//! The renderer does NOT own the event loop or the game. Each frame:
//!
//! 1. The host lets the engine draw into a [`DrawList`].
//! 2. [`tessellate`] converts the recorded commands into a [`Frame`]: a
//!    clear color plus a flat list of colored triangles in surface pixel
//!    coordinates. This step is pure and needs no GPU.
//! 3. [`DebugRenderer::render`] uploads the triangles and draws them with
//!    alpha blending through a top-left-origin orthographic camera.
//!
//! # Primitive mapping
//!
//! | Command        | Triangles                                      |
//! |----------------|------------------------------------------------|
//! | `FillRect`     | one quad                                       |
//! | `StrokeRect`   | four quads, each `line_width` thick, centered on the edge |
//! | `FillCircle`   | a fan of [`CIRCLE_SEGMENTS`] triangles         |
//! | `Line`         | one quad `line_width` wide                     |
//! | `GradientRect` | [`GRADIENT_BANDS`] quads with per-vertex colors |
//! | `Text`         | skipped                                        |
//! | `Clear`        | sets the clear color, drops everything before it |

use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::collision::Rect;
use crate::surface::{Color, DrawCommand, DrawList, LinearGradient};

/// Triangles per circle fan.
pub const CIRCLE_SEGMENTS: usize = 24;

/// Slices a gradient rect is cut into along its dominant axis.
pub const GRADIENT_BANDS: usize = 16;

// ---------------------------------------------------------------------------
// Vertex
// ---------------------------------------------------------------------------

/// A single vertex with 2D position (surface pixels) and sRGB + alpha color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Camera2D
// ---------------------------------------------------------------------------

/// Orthographic camera over a `width` x `height` surface with its origin at
/// the top-left corner and y growing downward.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    pub width: f32,
    pub height: f32,
}

impl Camera2D {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Column-major 4x4 matrix mapping `(0, 0)` to clip `(-1, 1)` and
    /// `(width, height)` to clip `(1, -1)`.
    pub fn orthographic_matrix(&self) -> [f32; 16] {
        let sx = 2.0 / self.width;
        let sy = -2.0 / self.height;
        [
            sx, 0.0, 0.0, 0.0, // column 0
            0.0, sy, 0.0, 0.0, // column 1
            0.0, 0.0, 1.0, 0.0, // column 2
            -1.0, 1.0, 0.0, 1.0, // column 3
        ]
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

// ---------------------------------------------------------------------------
// Tessellation
// ---------------------------------------------------------------------------

/// GPU-ready contents of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Color of the last `Clear` command, if any.
    pub clear: Option<Color>,
    /// Triangle list, three vertices per triangle.
    pub vertices: Vec<Vertex>,
}

/// Convert recorded draw commands into triangles.
pub fn tessellate(commands: &[DrawCommand]) -> Frame {
    let mut frame = Frame::default();
    for command in commands {
        match command {
            DrawCommand::Clear { color } => {
                frame.clear = Some(*color);
                frame.vertices.clear();
            }
            DrawCommand::FillRect { rect, color, alpha } => {
                push_rect(&mut frame.vertices, *rect, color.to_rgba(*alpha));
            }
            DrawCommand::StrokeRect {
                rect,
                color,
                line_width,
                alpha,
            } => {
                let c = color.to_rgba(*alpha);
                let h = line_width / 2.0;
                let (x, y, w, ht) = (rect.x, rect.y, rect.width, rect.height);
                push_rect(&mut frame.vertices, Rect::new(x - h, y - h, w + line_width, *line_width), c);
                push_rect(
                    &mut frame.vertices,
                    Rect::new(x - h, y + ht - h, w + line_width, *line_width),
                    c,
                );
                push_rect(&mut frame.vertices, Rect::new(x - h, y + h, *line_width, ht - line_width), c);
                push_rect(
                    &mut frame.vertices,
                    Rect::new(x + w - h, y + h, *line_width, ht - line_width),
                    c,
                );
            }
            DrawCommand::FillCircle {
                cx,
                cy,
                radius,
                color,
                alpha,
            } => {
                push_circle(&mut frame.vertices, *cx, *cy, *radius, color.to_rgba(*alpha));
            }
            DrawCommand::Line {
                from,
                to,
                color,
                line_width,
                alpha,
            } => {
                push_line(&mut frame.vertices, *from, *to, *line_width, color.to_rgba(*alpha));
            }
            DrawCommand::GradientRect {
                rect,
                gradient,
                alpha,
            } => {
                push_gradient_rect(&mut frame.vertices, *rect, gradient, *alpha);
            }
            DrawCommand::Text { .. } => {}
        }
    }
    frame
}

fn vertex(x: f64, y: f64, color: [f32; 4]) -> Vertex {
    Vertex {
        position: [x as f32, y as f32],
        color,
    }
}

fn push_quad(out: &mut Vec<Vertex>, corners: [(f64, f64); 4], colors: [[f32; 4]; 4]) {
    // Corners in order: top-left, top-right, bottom-right, bottom-left.
    let v: Vec<Vertex> = corners
        .iter()
        .zip(colors)
        .map(|(&(x, y), c)| vertex(x, y, c))
        .collect();
    out.extend_from_slice(&[v[0], v[1], v[2], v[0], v[2], v[3]]);
}

fn push_rect(out: &mut Vec<Vertex>, rect: Rect, color: [f32; 4]) {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }
    push_quad(
        out,
        [
            (rect.x, rect.y),
            (rect.right(), rect.y),
            (rect.right(), rect.bottom()),
            (rect.x, rect.bottom()),
        ],
        [color; 4],
    );
}

fn push_circle(out: &mut Vec<Vertex>, cx: f64, cy: f64, radius: f64, color: [f32; 4]) {
    if radius <= 0.0 {
        return;
    }
    let step = std::f64::consts::TAU / CIRCLE_SEGMENTS as f64;
    for i in 0..CIRCLE_SEGMENTS {
        let a0 = i as f64 * step;
        let a1 = (i + 1) as f64 * step;
        out.push(vertex(cx, cy, color));
        out.push(vertex(cx + radius * a0.cos(), cy + radius * a0.sin(), color));
        out.push(vertex(cx + radius * a1.cos(), cy + radius * a1.sin(), color));
    }
}

fn push_line(
    out: &mut Vec<Vertex>,
    from: (f64, f64),
    to: (f64, f64),
    width: f64,
    color: [f32; 4],
) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = dx.hypot(dy);
    if len == 0.0 || width <= 0.0 {
        return;
    }
    let (nx, ny) = (-dy / len * width / 2.0, dx / len * width / 2.0);
    push_quad(
        out,
        [
            (from.0 + nx, from.1 + ny),
            (to.0 + nx, to.1 + ny),
            (to.0 - nx, to.1 - ny),
            (from.0 - nx, from.1 - ny),
        ],
        [color; 4],
    );
}

fn push_gradient_rect(out: &mut Vec<Vertex>, rect: Rect, gradient: &LinearGradient, alpha: f64) {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }
    let (dx, dy) = (
        gradient.end.0 - gradient.start.0,
        gradient.end.1 - gradient.start.1,
    );
    let color = |x: f64, y: f64| gradient.color_at(x, y).to_rgba(alpha);
    let vertical = dy.abs() >= dx.abs();

    for band in 0..GRADIENT_BANDS {
        let t0 = band as f64 / GRADIENT_BANDS as f64;
        let t1 = (band + 1) as f64 / GRADIENT_BANDS as f64;
        let corners = if vertical {
            let (y0, y1) = (rect.y + rect.height * t0, rect.y + rect.height * t1);
            [(rect.x, y0), (rect.right(), y0), (rect.right(), y1), (rect.x, y1)]
        } else {
            let (x0, x1) = (rect.x + rect.width * t0, rect.x + rect.width * t1);
            [(x0, rect.y), (x1, rect.y), (x1, rect.bottom()), (x0, rect.bottom())]
        };
        let colors = corners.map(|(x, y)| color(x, y));
        push_quad(out, corners, colors);
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

// ---------------------------------------------------------------------------
// DebugRenderer
// ---------------------------------------------------------------------------

/// Initial vertex buffer capacity; the buffer grows on demand.
const INITIAL_VERTICES: usize = 8192;

/// Debug 2D renderer using wgpu.
///
/// Call [`DebugRenderer::new`] with an `Arc<winit::window::Window>`. If no
/// suitable GPU is available the error is returned and the caller can fall
/// back to headless mode.
pub struct DebugRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    window: Arc<winit::window::Window>,
    /// Logical surface the draw lists are expressed in.
    pub camera: Camera2D,
}

impl DebugRenderer {
    /// Initialize wgpu: surface, device, queue, pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable GPU adapter or device is available.
    pub async fn new(
        window: Arc<winit::window::Window>,
        camera: Camera2D,
    ) -> Result<Self, anyhow::Error> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no suitable GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("arcade_debug_renderer"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("arcade_debug_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });

        let camera_matrix = camera.orthographic_matrix();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_uniform"),
            contents: bytemuck::cast_slice(&camera_matrix),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("arcade_debug_pipeline_layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("arcade_debug_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let vertex_buffer = Self::create_vertex_buffer(&device, INITIAL_VERTICES);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTICES,
            camera_buffer,
            camera_bind_group,
            window,
            camera,
        })
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vertex_buffer"),
            size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Tessellate and present a recorded draw list.
    ///
    /// # Errors
    ///
    /// Returns a [`wgpu::SurfaceError`] if the surface cannot provide an
    /// output texture (e.g. window minimized, surface lost).
    pub fn render(&mut self, list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let frame = tessellate(list.commands());
        self.render_frame(&frame)
    }

    /// Present an already tessellated frame.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render).
    pub fn render_frame(&mut self, frame: &Frame) -> Result<(), wgpu::SurfaceError> {
        let camera_matrix = self.camera.orthographic_matrix();
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&camera_matrix));

        if frame.vertices.len() > self.vertex_capacity {
            self.vertex_capacity = frame.vertices.len().next_power_of_two();
            self.vertex_buffer = Self::create_vertex_buffer(&self.device, self.vertex_capacity);
            tracing::debug!(capacity = self.vertex_capacity, "vertex buffer grown");
        }
        if !frame.vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&frame.vertices));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let clear = frame.clear.unwrap_or(Color::BLACK).to_rgba(1.0);
        let clear = wgpu::Color {
            r: srgb_to_linear(clear[0] as f64),
            g: srgb_to_linear(clear[1] as f64),
            b: srgb_to_linear(clear[2] as f64),
            a: 1.0,
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("arcade_debug_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("arcade_debug_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            let vertex_count = frame.vertices.len() as u32;
            if vertex_count > 0 {
                render_pass.draw(0..vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Resize the swap chain. Zero-sized requests are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn window(&self) -> &winit::window::Window {
        &self.window
    }
}
