//! WebGPU rendering module
//!
//! Geometry is transformed and lit on the CPU each frame, then drawn in
//! painter's order with a single pipeline and two detail textures.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::{DrawBatch, Material, SceneMeshes, scene_batches};
pub use vertex::Vertex;
