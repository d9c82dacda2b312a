//! Rendering module
//!
//! `scene` turns simulation state into a display list; `shapes` triangulates
//! it; `pipeline` owns the WebGPU device and draws it.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{DrawItem, Frame, build_frame};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Nothing to draw into this frame (hidden canvas, lost context, no adapter)
    #[error("render surface unavailable")]
    SurfaceUnavailable,

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
