//! Mathematical utilities for truss calculations

use nalgebra::{DMatrix, DVector, Matrix4};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// 4x4 matrix for member stiffness (i x, i y, j x, j y)
pub type Mat4 = Matrix4<f64>;

/// Length and direction cosines of the segment from `i_node` to `j_node`
///
/// # Returns
/// `(length, c, s)`, or `None` for a zero-length segment
pub fn direction_cosines(i_node: &[f64; 2], j_node: &[f64; 2]) -> Option<(f64, f64, f64)> {
    let dx = j_node[0] - i_node[0];
    let dy = j_node[1] - i_node[1];
    let length = dx.hypot(dy);

    if length == 0.0 || !length.is_finite() {
        return None;
    }

    Some((length, dx / length, dy / length))
}

/// Compute the global stiffness contribution of a 2D axial bar
///
/// # Arguments
/// * `k` - Axial stiffness coefficient
/// * `c` - Direction cosine along X
/// * `s` - Direction cosine along Y
///
/// # Returns
/// 4x4 matrix in the DOF order (i x, i y, j x, j y)
pub fn member_global_stiffness(k: f64, c: f64, s: f64) -> Mat4 {
    let cc = c * c;
    let cs = c * s;
    let ss = s * s;

    #[rustfmt::skip]
    let data = [
        cc,   cs,  -cc,  -cs,
        cs,   ss,  -cs,  -ss,
       -cc,  -cs,   cc,   cs,
       -cs,  -ss,   cs,   ss,
    ];

    Mat4::from_row_slice(&data) * k
}

/// Infinity norm (maximum absolute row sum) of a matrix
pub fn infinity_norm(m: &Mat) -> f64 {
    m.row_iter()
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}
