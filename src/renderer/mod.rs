//! wgpu rendering module
//!
//! The game state is turned into a flat list of textured quads by `scene`,
//! expanded to triangles by `vertex` and drawn by `pipeline`.

pub mod pipeline;
pub mod scene;
pub mod texture;
pub mod vertex;

pub use pipeline::Renderer;
pub use scene::{SpriteDraw, build_scene};
