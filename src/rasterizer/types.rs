//! Core types for the rasterizer

use serde::{Serialize, Deserialize};

use super::math::{Vec2, Vec3, Vec4};
use crate::error::RasterError;

/// RGBA color, one f32 per channel (nominally 0.0-1.0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const GREEN: Color = Color { r: 0.0, g: 1.0, b: 0.0, a: 1.0 };
    pub const BLUE: Color = Color { r: 0.0, g: 0.0, b: 1.0, a: 1.0 };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            r: bytes[0] as f32 / 255.0,
            g: bytes[1] as f32 / 255.0,
            b: bytes[2] as f32 / 255.0,
            a: bytes[3] as f32 / 255.0,
        }
    }

    /// Scale all four channels (no clamping, diffuse may exceed 1.0)
    pub fn shade(self, intensity: f32) -> Self {
        Self {
            r: self.r * intensity,
            g: self.g * intensity,
            b: self.b * intensity,
            a: self.a * intensity,
        }
    }

    /// Rec.601 luma of the RGB channels
    pub fn luminance(self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// Convert to [u8; 4] for the framebuffer, clamping each channel
    pub fn to_bytes(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// A vertex with homogeneous position, texture coordinate, and normal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec4,
    pub uv: Vec2,
    pub normal: Vec4,
}

impl Vertex {
    pub fn new(pos: Vec4, uv: Vec2, normal: Vec4) -> Self {
        Self { pos, uv, normal }
    }

    pub fn from_pos(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self {
            pos: Vec4::new(x, y, z, w),
            uv: Vec2::default(),
            normal: Vec4::ZERO,
        }
    }
}

/// A triangle carried by value through every pipeline stage.
/// Vertex order sets the winding; it is not validated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Face {
    pub v0: Vertex,
    pub v1: Vertex,
    pub v2: Vertex,
}

impl Face {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self { v0, v1, v2 }
    }

    /// New face with `f` applied to each vertex
    pub fn map(self, mut f: impl FnMut(Vertex) -> Vertex) -> Self {
        Self {
            v0: f(self.v0),
            v1: f(self.v1),
            v2: f(self.v2),
        }
    }

    pub fn vertices(&self) -> [Vertex; 3] {
        [self.v0, self.v1, self.v2]
    }
}

/// Render target the rasterizer writes into.
///
/// Coordinates are always inside `[0, width) x [0, height)`; the depth test and
/// the write that follows are not atomic, so concurrent callers must not share pixels.
pub trait RenderTarget {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn depth(&self, x: usize, y: usize) -> f32;
    fn set_depth(&mut self, x: usize, y: usize, z: f32);
    fn set_color(&mut self, x: usize, y: usize, color: Color);
}

/// Read-only texture lookup returning one channel value.
/// Addressing (wrap, clamp, texel vs normalized) is up to the implementor.
pub trait TextureSampler {
    fn get_pixel(&self, u: f32, v: f32) -> f32;
}

/// Simple texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self::solid(width, height, Color::WHITE)
    }

    pub fn solid(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
            name: String::new(),
        }
    }

    /// Load texture from an image file (PNG, JPEG or BMP)
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, RasterError> {
        let path = path.as_ref();
        let img = image::open(path)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let tex = Self::from_image(img, name);
        log::info!("Loaded texture: {} ({}x{})", tex.name, tex.width, tex.height);
        Ok(tex)
    }

    /// Load texture from raw encoded bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, RasterError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(img, name))
    }

    fn from_image(img: image::DynamicImage, name: String) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::from_bytes(p.0))
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        }
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Sample at normalized UV, nearest texel, wrapping in both directions
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.pixels.is_empty() {
            return Color::BLACK;
        }
        let tx = ((u * self.width as f32).floor() as i64).rem_euclid(self.width as i64) as usize;
        let ty = ((v * self.height as f32).floor() as i64).rem_euclid(self.height as i64) as usize;
        self.pixels[ty * self.width + tx]
    }

    /// Get pixel at x,y coordinates
    pub fn texel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::BLACK
        }
    }
}

impl TextureSampler for Texture {
    fn get_pixel(&self, u: f32, v: f32) -> f32 {
        self.sample(u, v).luminance()
    }
}

/// Which screen corner row 0 maps to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenOrigin {
    /// NDC y = -1 lands on row 0 (y up)
    #[default]
    BottomLeft,
    /// NDC y = +1 lands on row 0 (y down)
    TopLeft,
}

/// Rasterizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Light direction for the diffuse term (normalized at use)
    pub light_dir: Vec3,
    /// Multiplier applied to the clamped N.L term
    pub diffuse_intensity: f32,
    /// Row 0 convention for the viewport map
    pub origin: ScreenOrigin,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            light_dir: Vec3::new(0.0, 1.0, 1.0),
            diffuse_intensity: 1.5,
            origin: ScreenOrigin::BottomLeft,
        }
    }
}
