//! Software triangle rasterizer
//!
//! Features:
//! - Model -> clip -> NDC -> screen transform chain
//! - Bounding-box scan with barycentric inside test
//! - Less-than depth test
//! - Perspective-correct UV and normal interpolation
//! - Fixed-function diffuse lighting

mod math;
mod types;
mod transform;
mod render;

pub use math::*;
pub use types::*;
pub use transform::*;
pub use render::*;

/// Default framebuffer dimensions
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
