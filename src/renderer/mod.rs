//! WebGPU rendering module
//!
//! The scene is composed on the CPU as colored triangles in canvas pixels,
//! then mapped to clip space and drawn in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{SceneOptions, build_scene};
pub use vertex::Vertex;
