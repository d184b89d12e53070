//! Minimal linear algebra for 2D rotate-and-translate transforms
//!
//! Points and directions are `Vector3` with z = 0 for directions and z = 1
//! when a homogeneous point is needed. `Matrix3` only ever holds Z rotations.

pub mod matrix;
pub mod vector;

pub use matrix::Matrix3;
pub use vector::Vector3;
