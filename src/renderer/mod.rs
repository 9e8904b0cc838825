//! WebGPU rendering module
//!
//! Every frame is a flat list of coloured quads built from a `ui::Scene`.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
