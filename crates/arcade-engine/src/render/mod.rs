//! Debug 2D renderer for recorded draw lists.
//!
//! This module is feature-gated behind `renderer`. Games draw into a
//! [`DrawList`](crate::surface::DrawList); [`tessellate`] turns the recorded
//! commands into colored triangles and [`DebugRenderer`] pushes them through
//! wgpu. [`run_windowed`] hosts any [`FrameHost`](crate::engine::FrameHost)
//! in a winit window.
//!
//! This is a debug view, not a faithful canvas: text is not drawn, and
//! circles are approximated by triangle fans.

pub mod app;
pub mod renderer;

pub use app::run_windowed;
pub use renderer::{tessellate, Camera2D, DebugRenderer, Frame, Vertex};
