//! Simple Rasterizer: a minimal software triangle renderer
//!
//! Faces go model -> clip -> NDC -> screen, then get filled with
//! depth-tested, perspective-correct, texture-sampled, diffuse-lit color.

pub mod config;
pub mod error;
pub mod rasterizer;

pub use config::{load_config, parse_config, save_config, RenderConfig};
pub use error::RasterError;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
