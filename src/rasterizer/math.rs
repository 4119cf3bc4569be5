//! Vector and matrix math for the transform and raster stages

use std::ops::{Add, Mul, Sub};
use serde::{Serialize, Deserialize};

/// 2D Vector (texture coordinates, screen-space query points)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scale(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        self.scale(s)
    }
}

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction; a zero vector stays zero
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// Homogeneous 4D vector (positions and normals through the pipeline)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Vec4 = Vec4 { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// A point (w = 1)
    pub fn point(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// A direction (w = 0)
    pub fn direction(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 0.0)
    }

    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn dot(self, other: Vec4) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn scale(self, s: f32) -> Vec4 {
        Vec4::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    fn add(self, other: Vec4) -> Vec4 {
        Vec4::new(self.x + other.x, self.y + other.y, self.z + other.z, self.w + other.w)
    }
}

impl Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, other: Vec4) -> Vec4 {
        Vec4::new(self.x - other.x, self.y - other.y, self.z - other.z, self.w - other.w)
    }
}

impl Mul<f32> for Vec4 {
    type Output = Vec4;
    fn mul(self, s: f32) -> Vec4 {
        self.scale(s)
    }
}

/// 4x4 matrix, row-major: `rows[r][c]`, applied to column vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub rows: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::from_rows([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed OpenGL-style projection: camera looks down -Z,
    /// clip w = -z_view, NDC z in [-1, 1]
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y * 0.5).tan();
        let nf = 1.0 / (near - far);
        Self::from_rows([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (far + near) * nf, 2.0 * far * near * nf],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    pub fn row(&self, r: usize) -> Vec4 {
        let [x, y, z, w] = self.rows[r];
        Vec4::new(x, y, z, w)
    }

    pub fn col(&self, c: usize) -> Vec4 {
        Vec4::new(self.rows[0][c], self.rows[1][c], self.rows[2][c], self.rows[3][c])
    }

    pub fn transform(&self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, other: Mat4) -> Mat4 {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = self.row(r).dot(other.col(c));
            }
        }
        Mat4 { rows }
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        self.transform(v)
    }
}

/// Below this doubled triangle area a face is treated as degenerate
const DEGENERATE_AREA: f32 = 1e-2;

/// Barycentric weights of `p` relative to the triangle (v0, v1, v2), using only x/y.
///
/// The weights come from the cross product of the x and y rows of the
/// (ac, ab, pa) system; its z component is the doubled signed area. When that
/// area is below [`DEGENERATE_AREA`] the result is `(-1, 1, 1)`, so callers that
/// reject any negative weight skip the pixel.
///
/// Either winding works: the signed area divides out.
pub fn barycentric(p: Vec2, v0: Vec4, v1: Vec4, v2: Vec4) -> Vec3 {
    let ab = v1 - v0;
    let ac = v2 - v0;
    let pa = v0.xy() - p;

    let u = Vec3::new(ac.x, ab.x, pa.x).cross(Vec3::new(ac.y, ab.y, pa.y));
    if u.z.abs() < DEGENERATE_AREA {
        return Vec3::new(-1.0, 1.0, 1.0);
    }

    Vec3::new(u.z - (u.x + u.y), u.y, u.x).scale(1.0 / u.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS && (a.z - b.z).abs() < EPS
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        assert!((Vec3::new(0.0, 3.0, 4.0).normalize().len() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_mat4_identity_and_translation() {
        let p = Vec4::point(1.0, 2.0, 3.0);
        assert_eq!(Mat4::IDENTITY * p, p);

        let moved = Mat4::translation(1.0, -1.0, 2.0) * p;
        assert_eq!(moved, Vec4::point(2.0, 1.0, 5.0));

        // Directions ignore translation
        let d = Vec4::direction(0.0, 1.0, 0.0);
        assert_eq!(Mat4::translation(5.0, 5.0, 5.0) * d, d);
    }

    #[test]
    fn test_mat4_product_order() {
        // (T * S) scales first, then translates
        let m = Mat4::translation(1.0, 0.0, 0.0) * Mat4::scale(2.0, 2.0, 2.0);
        let p = m * Vec4::point(1.0, 1.0, 1.0);
        assert_eq!(p, Vec4::point(3.0, 2.0, 2.0));
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let r = Mat4::rotation_y(std::f32::consts::FRAC_PI_2);
        let p = r * Vec4::point(1.0, 0.0, 0.0);
        assert!((p.x).abs() < EPS);
        assert!((p.z + 1.0).abs() < EPS);
    }

    #[test]
    fn test_perspective_w_is_negated_view_z() {
        let proj = Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let clip = proj * Vec4::point(0.0, 0.0, -5.0);
        assert!((clip.w - 5.0).abs() < EPS);
        // Near plane maps to NDC z = -1, far plane to +1
        let near = proj * Vec4::point(0.0, 0.0, -0.1);
        let far = proj * Vec4::point(0.0, 0.0, -100.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-3);
        assert!((far.z / far.w - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_barycentric_inside() {
        let v1 = Vec4::point(0.0, 0.0, 0.0);
        let v2 = Vec4::point(10.0, 0.0, 0.0);
        let v3 = Vec4::point(5.0, 10.0, 0.0);
        let bc = barycentric(Vec2::new(5.0, 3.0), v1, v2, v3);
        assert!(bc.x >= 0.0 && bc.y >= 0.0 && bc.z >= 0.0);
        assert!((bc.x + bc.y + bc.z - 1.0).abs() < EPS);
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let v0 = Vec4::point(1.0, 2.0, 0.0);
        let v1 = Vec4::point(9.0, 3.0, 0.0);
        let v2 = Vec4::point(4.0, 11.0, 0.0);
        assert!(close(barycentric(v0.xy(), v0, v1, v2), Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(barycentric(v1.xy(), v0, v1, v2), Vec3::new(0.0, 1.0, 0.0)));
        assert!(close(barycentric(v2.xy(), v0, v1, v2), Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_barycentric_reconstructs_point() {
        let v0 = Vec4::point(0.0, 0.0, 0.0);
        let v1 = Vec4::point(8.0, 1.0, 0.0);
        let v2 = Vec4::point(2.0, 7.0, 0.0);
        for p in [Vec2::new(3.0, 2.0), Vec2::new(-4.0, 9.0), Vec2::new(20.0, -3.0)] {
            let bc = barycentric(p, v0, v1, v2);
            assert!((bc.x + bc.y + bc.z - 1.0).abs() < EPS);
            let x = bc.x * v0.x + bc.y * v1.x + bc.z * v2.x;
            let y = bc.x * v0.y + bc.y * v1.y + bc.z * v2.y;
            assert!((x - p.x).abs() < 1e-4 && (y - p.y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_barycentric_winding_independent() {
        let a = Vec4::point(0.0, 0.0, 0.0);
        let b = Vec4::point(6.0, 0.0, 0.0);
        let c = Vec4::point(0.0, 6.0, 0.0);
        let p = Vec2::new(1.0, 1.0);
        let ccw = barycentric(p, a, b, c);
        let cw = barycentric(p, a, c, b);
        assert!(close(ccw, Vec3::new(cw.x, cw.z, cw.y)));
    }

    #[test]
    fn test_barycentric_outside_has_negative_weight() {
        let v0 = Vec4::point(0.0, 0.0, 0.0);
        let v1 = Vec4::point(4.0, 0.0, 0.0);
        let v2 = Vec4::point(0.0, 4.0, 0.0);
        for p in [Vec2::new(5.0, 5.0), Vec2::new(-1.0, 1.0), Vec2::new(1.0, -1.0)] {
            let bc = barycentric(p, v0, v1, v2);
            assert!(bc.x < 0.0 || bc.y < 0.0 || bc.z < 0.0, "{:?} -> {:?}", p, bc);
        }
    }

    #[test]
    fn test_barycentric_degenerate_sentinel() {
        let collinear = [
            Vec4::point(0.0, 0.0, 0.0),
            Vec4::point(2.0, 2.0, 0.0),
            Vec4::point(5.0, 5.0, 0.0),
        ];
        let coincident = [Vec4::point(3.0, 3.0, 0.0); 3];
        for [v0, v1, v2] in [collinear, coincident] {
            for p in [Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0), Vec2::new(7.0, -1.0)] {
                assert_eq!(barycentric(p, v0, v1, v2), Vec3::new(-1.0, 1.0, 1.0));
            }
        }
    }
}
