//! Vertex stages: model -> clip -> NDC -> screen
//!
//! Every stage takes a face by value and returns a new one.

use super::math::{Mat4, Vec4};
use super::types::{Face, ScreenOrigin, Vertex};

/// Per-draw matrices
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transforms {
    /// Model-view-projection
    pub mvp: Mat4,
    /// Light-space matrix, only used by a caller-side shadow pass
    pub light: Mat4,
}

impl Transforms {
    pub fn new(mvp: Mat4, light: Mat4) -> Self {
        Self { mvp, light }
    }
}

fn apply(face: Face, m: &Mat4) -> Face {
    face.map(|v| Vertex {
        pos: m.transform(v.pos),
        normal: m.transform(v.normal),
        uv: v.uv,
    })
}

/// Model space to clip space. Position and normal both go through `mvp`;
/// the light matrix is left for [`model_to_light`].
pub fn model_to_clip(face: Face, transforms: &Transforms) -> Face {
    apply(face, &transforms.mvp)
}

/// Model space to light space, for shadow-map passes run by the caller
pub fn model_to_light(face: Face, transforms: &Transforms) -> Face {
    apply(face, &transforms.light)
}

/// Divide x/y/z by w, keeping w for perspective-correct interpolation.
///
/// w is not guarded: w = 0 yields inf/NaN, which the inside and depth
/// tests downstream reject.
pub fn perspective_divide(face: Face) -> Face {
    face.map(|v| {
        let p = v.pos;
        Vertex {
            pos: Vec4::new(p.x / p.w, p.y / p.w, p.z / p.w, p.w),
            ..v
        }
    })
}

/// NDC to pixel coordinates, floored to the cell origin. z and w pass through.
pub fn ndc_to_screen(face: Face, width: usize, height: usize, origin: ScreenOrigin) -> Face {
    let (w, h) = (width as f32, height as f32);
    face.map(|v| {
        let p = v.pos;
        let y_ndc = match origin {
            ScreenOrigin::BottomLeft => p.y,
            ScreenOrigin::TopLeft => -p.y,
        };
        Vertex {
            pos: Vec4::new(
                (0.5 * w * (p.x + 1.0)).floor(),
                (0.5 * h * (y_ndc + 1.0)).floor(),
                p.z,
                p.w,
            ),
            ..v
        }
    })
}

/// Model space straight to screen space
pub fn project_face(
    face: Face,
    transforms: &Transforms,
    width: usize,
    height: usize,
    origin: ScreenOrigin,
) -> Face {
    let clip = model_to_clip(face, transforms);
    ndc_to_screen(perspective_divide(clip), width, height, origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::Vec2;

    fn face_at(p: [Vec4; 3]) -> Face {
        let uv = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let n = Vec4::direction(0.0, 0.0, 1.0);
        Face::new(
            Vertex::new(p[0], uv[0], n),
            Vertex::new(p[1], uv[1], n),
            Vertex::new(p[2], uv[2], n),
        )
    }

    #[test]
    fn test_model_to_clip_transforms_position_and_normal() {
        let face = face_at([
            Vec4::point(0.0, 0.0, 0.0),
            Vec4::point(1.0, 0.0, 0.0),
            Vec4::point(0.0, 1.0, 0.0),
        ]);
        let t = Transforms::new(Mat4::scale(2.0, 3.0, 4.0), Mat4::translation(9.0, 9.0, 9.0));
        let clip = model_to_clip(face, &t);

        assert_eq!(clip.v1.pos, Vec4::point(2.0, 0.0, 0.0));
        assert_eq!(clip.v2.pos, Vec4::point(0.0, 3.0, 0.0));
        assert_eq!(clip.v0.normal, Vec4::direction(0.0, 0.0, 4.0));
        // uv untouched, light matrix unused
        assert_eq!(clip.v1.uv, face.v1.uv);
        assert_eq!(clip.v0.pos, Vec4::point(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_model_to_light_uses_light_matrix() {
        let face = face_at([Vec4::point(0.0, 0.0, 0.0); 3]);
        let t = Transforms::new(Mat4::IDENTITY, Mat4::translation(1.0, 2.0, 3.0));
        let lit = model_to_light(face, &t);
        assert_eq!(lit.v2.pos, Vec4::point(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_perspective_divide_keeps_w() {
        let face = face_at([
            Vec4::new(2.0, 4.0, 6.0, 2.0),
            Vec4::new(-3.0, 3.0, 1.5, 3.0),
            Vec4::new(1.0, 1.0, 1.0, 1.0),
        ]);
        let ndc = perspective_divide(face);
        assert_eq!(ndc.v0.pos, Vec4::new(1.0, 2.0, 3.0, 2.0));
        assert_eq!(ndc.v1.pos, Vec4::new(-1.0, 1.0, 0.5, 3.0));
        assert_eq!(ndc.v2.pos, Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(ndc.v0.uv, face.v0.uv);
    }

    #[test]
    fn test_perspective_divide_zero_w_is_unguarded() {
        let face = face_at([Vec4::new(1.0, 0.0, 0.0, 0.0); 3]);
        let ndc = perspective_divide(face);
        assert!(ndc.v0.pos.x.is_infinite());
        assert!(ndc.v0.pos.y.is_nan());
        assert_eq!(ndc.v0.pos.w, 0.0);
    }

    #[test]
    fn test_ndc_to_screen_bottom_left() {
        let face = face_at([
            Vec4::new(-1.0, -1.0, 0.25, 2.0),
            Vec4::new(0.0, 0.0, 0.5, 3.0),
            Vec4::new(0.999, 0.999, 0.75, 4.0),
        ]);
        let s = ndc_to_screen(face, 100, 50, ScreenOrigin::BottomLeft);
        assert_eq!(s.v0.pos, Vec4::new(0.0, 0.0, 0.25, 2.0));
        assert_eq!(s.v1.pos, Vec4::new(50.0, 25.0, 0.5, 3.0));
        assert_eq!(s.v2.pos, Vec4::new(99.0, 49.0, 0.75, 4.0));
    }

    #[test]
    fn test_ndc_to_screen_top_left_flips_y() {
        let face = face_at([
            Vec4::new(-1.0, 1.0, 0.0, 1.0),
            Vec4::new(-1.0, -0.999, 0.0, 1.0),
            Vec4::new(0.0, 0.5, 0.0, 1.0),
        ]);
        let s = ndc_to_screen(face, 100, 50, ScreenOrigin::TopLeft);
        assert_eq!(s.v0.pos.y, 0.0);
        assert_eq!(s.v1.pos.y, 49.0);
        assert_eq!(s.v2.pos.y, 12.0);
    }

    #[test]
    fn test_project_face_origin_through_full_chain() {
        // Camera at z=+5 looking down -Z; the model origin sits at the
        // center of the screen, depth from the projection matrix.
        let proj = Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 10.0);
        let mvp = proj * Mat4::translation(0.0, 0.0, -5.0);
        let face = face_at([Vec4::point(0.0, 0.0, 0.0); 3]);

        let s = project_face(face, &Transforms::new(mvp, Mat4::IDENTITY), 64, 48, ScreenOrigin::BottomLeft);

        // z_ndc = ((f+n)/(n-f) * -5 + 2fn/(n-f)) / 5 = (55/9 - 20/9) / 5 = 7/9
        assert_eq!(s.v0.pos.x, 32.0);
        assert_eq!(s.v0.pos.y, 24.0);
        assert!((s.v0.pos.z - 7.0 / 9.0).abs() < 1e-5);
        assert!((s.v0.pos.w - 5.0).abs() < 1e-6);
    }
}
