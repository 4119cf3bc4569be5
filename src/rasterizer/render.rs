//! Core rendering functions
//! Triangle rasterization with depth test, perspective-correct attributes and diffuse light

use std::path::Path;

use super::math::{barycentric, Vec2, Vec3, Vec4};
use super::transform::{project_face, Transforms};
use super::types::{Color, Face, RasterSettings, RenderTarget, TextureSampler, Vertex};
use crate::error::RasterError;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(f32::MAX);
    }

    pub fn color_at(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * self.width + x) * 4;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2], self.pixels[idx + 3]]
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.zbuffer[y * self.width + x]
    }

    /// Write the color plane as a PNG, row 0 first
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RasterError> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.pixels,
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )?;
        log::info!("Saved framebuffer ({}x{}) to {}", self.width, self.height, path.display());
        Ok(())
    }
}

impl RenderTarget for Framebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn depth(&self, x: usize, y: usize) -> f32 {
        self.depth_at(x, y)
    }

    fn set_depth(&mut self, x: usize, y: usize, z: f32) {
        self.zbuffer[y * self.width + x] = z;
    }

    fn set_color(&mut self, x: usize, y: usize, color: Color) {
        let idx = (y * self.width + x) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
    }
}

/// Inclusive pixel bounds of a screen-space face, clamped to
/// `[0, width-1] x [0, height-1]`. Returns `(min, max)` as `[x, y]` pairs.
///
/// NaN coordinates clamp to 0. Both dimensions must be non-zero.
pub fn bounding_box(face: &Face, width: usize, height: usize) -> ([usize; 2], [usize; 2]) {
    let [a, b, c] = face.vertices().map(|v| v.pos.xy());
    let lo = Vec2::new(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y));
    let hi = Vec2::new(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y));

    let lim_x = width.saturating_sub(1) as f32;
    let lim_y = height.saturating_sub(1) as f32;
    let clamp = |v: f32, lim: f32| v.max(0.0).min(lim) as usize;

    (
        [clamp(lo.x, lim_x), clamp(lo.y, lim_y)],
        [clamp(hi.x, lim_x), clamp(hi.y, lim_y)],
    )
}

/// Screen-space weights corrected by each vertex's clip w, renormalized to sum to 1
pub fn perspective_weights(bary: Vec3, face: &Face) -> Vec3 {
    let p = Vec3::new(
        bary.x / face.v0.pos.w,
        bary.y / face.v1.pos.w,
        bary.z / face.v2.pos.w,
    );
    p.scale(1.0 / (p.x + p.y + p.z))
}

fn lerp_uv(w: Vec3, face: &Face) -> Vec2 {
    face.v0.uv * w.x + face.v1.uv * w.y + face.v2.uv * w.z
}

fn lerp_normal(w: Vec3, face: &Face) -> Vec4 {
    face.v0.normal * w.x + face.v1.normal * w.y + face.v2.normal * w.z
}

/// Clamped Lambert term scaled by the configured intensity
fn diffuse(normal: Vec3, settings: &RasterSettings) -> f32 {
    let n_dot_l = normal.normalize().dot(settings.light_dir.normalize());
    settings.diffuse_intensity * n_dot_l.max(0.0)
}

/// Four single-channel lookups along the texel diagonal, one per output channel
fn shade_texel<S: TextureSampler + ?Sized>(texture: &S, uv: Vec2, light: f32) -> Color {
    Color::new(
        texture.get_pixel(uv.x, uv.y),
        texture.get_pixel(uv.x + 1.0, uv.y + 1.0),
        texture.get_pixel(uv.x + 2.0, uv.y + 2.0),
        texture.get_pixel(uv.x + 3.0, uv.y + 3.0),
    )
    .shade(light)
}

/// Rasterize one screen-space face.
///
/// A pixel is written only when every barycentric weight is non-negative and
/// its depth is strictly less than the stored one.
pub fn draw_face<T, S>(target: &mut T, face: &Face, texture: &S, settings: &RasterSettings)
where
    T: RenderTarget + ?Sized,
    S: TextureSampler + ?Sized,
{
    if target.width() == 0 || target.height() == 0 {
        return;
    }

    let ([min_x, min_y], [max_x, max_y]) = bounding_box(face, target.width(), target.height());
    let (p0, p1, p2) = (face.v0.pos, face.v1.pos, face.v2.pos);

    for x in min_x..=max_x {
        for y in min_y..=max_y {
            let bary = barycentric(Vec2::new(x as f32, y as f32), p0, p1, p2);
            if bary.x < 0.0 || bary.y < 0.0 || bary.z < 0.0 {
                continue;
            }

            let z = p0.z * bary.x + p1.z * bary.y + p2.z * bary.z;
            // Negated so NaN depths fail too
            if !(z < target.depth(x, y)) {
                continue;
            }

            let persp = perspective_weights(bary, face);
            let uv = lerp_uv(persp, face);
            let normal = lerp_normal(persp, face);
            let light = diffuse(normal.xyz(), settings);

            target.set_color(x, y, shade_texel(texture, uv, light));
            target.set_depth(x, y, z);
        }
    }
}

/// Project and draw every face in order
pub fn render_mesh<T, S>(
    target: &mut T,
    faces: &[Face],
    transforms: &Transforms,
    texture: &S,
    settings: &RasterSettings,
) where
    T: RenderTarget + ?Sized,
    S: TextureSampler + ?Sized,
{
    let (width, height) = (target.width(), target.height());
    if width == 0 || height == 0 {
        log::warn!("render_mesh: zero-sized target ({}x{}), nothing drawn", width, height);
        return;
    }

    for face in faces {
        let screen = project_face(*face, transforms, width, height, settings.origin);
        draw_face(target, &screen, texture, settings);
    }

    log::debug!("render_mesh: {} faces into {}x{}", faces.len(), width, height);
}

/// Create a simple test cube mesh (unit half-extent, centered on the origin)
pub fn create_test_cube() -> Vec<Face> {
    let mut faces = Vec::with_capacity(12);

    // Four corners per side, counter-clockwise seen from outside
    let sides: [([[f32; 3]; 4], [f32; 3]); 6] = [
        // Front
        ([[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]], [0.0, 0.0, 1.0]),
        // Back
        ([[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]], [0.0, 0.0, -1.0]),
        // Top
        ([[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]], [0.0, 1.0, 0.0]),
        // Bottom
        ([[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]], [0.0, -1.0, 0.0]),
        // Right
        ([[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]], [1.0, 0.0, 0.0]),
        // Left
        ([[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]], [-1.0, 0.0, 0.0]),
    ];

    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    for (corners, [nx, ny, nz]) in sides {
        let normal = Vec4::direction(nx, ny, nz);
        let quad: Vec<Vertex> = corners
            .iter()
            .zip(uvs)
            .map(|(&[x, y, z], uv)| Vertex::new(Vec4::point(x, y, z), uv, normal))
            .collect();

        // Two triangles per side
        faces.push(Face::new(quad[0], quad[1], quad[2]));
        faces.push(Face::new(quad[0], quad[2], quad[3]));
    }

    faces
}
