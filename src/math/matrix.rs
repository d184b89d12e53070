//! 3x3 row-major matrix for Z-axis rotations

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use super::Vector3;

/// Row-major 3x3 matrix: `m[row * 3 + col]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix3 {
    pub m: [f32; 9],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3 {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);

    /// Build from entries given row by row
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m00: f32,
        m01: f32,
        m02: f32,
        m10: f32,
        m11: f32,
        m12: f32,
        m20: f32,
        m21: f32,
        m22: f32,
    ) -> Self {
        Self {
            m: [m00, m01, m02, m10, m11, m12, m20, m21, m22],
        }
    }

    /// A rotation about Z by `radians`
    pub fn from_rotation_z(radians: f32) -> Self {
        let mut mat = Self::IDENTITY;
        mat.set_rotate_z(radians);
        mat
    }

    /// Overwrite every entry with a rotation about Z.
    ///
    /// The bottom row stays `(0, 0, 1)` so a homogeneous 1 in z survives
    /// `multiply` untouched.
    pub fn set_rotate_z(&mut self, radians: f32) {
        let (sin, cos) = radians.sin_cos();
        self.m = [cos, -sin, 0.0, sin, cos, 0.0, 0.0, 0.0, 1.0];
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.m[row * 3 + col]
    }

    /// Matrix-vector product with `v` as a column
    pub fn multiply(&self, v: Vector3) -> Vector3 {
        let m = &self.m;
        Vector3::new(
            m[0] * v.x + m[1] * v.y + m[2] * v.z,
            m[3] * v.x + m[4] * v.y + m[5] * v.z,
            m[6] * v.x + m[7] * v.y + m[8] * v.z,
        )
    }
}

impl Mul for Matrix3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [0.0f32; 9];
        for row in 0..3 {
            for col in 0..3 {
                for k in 0..3 {
                    out[row * 3 + col] += self.at(row, k) * rhs.at(k, col);
                }
            }
        }
        Self { m: out }
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    #[inline]
    fn mul(self, v: Vector3) -> Vector3 {
        self.multiply(v)
    }
}
