//! WebGPU rendering module
//!
//! `scene` builds board-space triangles from the game; `pipeline` uploads and
//! draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{board_size, build_scene};
pub use vertex::Vertex;
