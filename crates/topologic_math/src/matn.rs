//! Square matrices and affine transformations
//!
//! Matrices are stored row-major and act on row vectors: `v' = v * M`.
//! An affine [`Transformation`] of d-space is a (d+1)x(d+1) matrix whose
//! last row holds the translation, matching the cell layout used by the
//! `e<i>-<j>` metadata attributes.

use serde::{Serialize, Deserialize};

use crate::VecN;

/// Square matrix of runtime size
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatN {
    size: usize,
    data: Vec<f64>,
}

impl MatN {
    /// Matrix of zeros
    pub fn zeros(size: usize) -> Self {
        Self { size, data: vec![0.0; size * size] }
    }

    /// Identity matrix
    pub fn identity(size: usize) -> Self {
        let mut m = Self::zeros(size);
        for i in 0..size {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Build a matrix from row vectors, all of which must be `rows.len()` long
    pub fn from_rows(rows: &[VecN]) -> Self {
        let size = rows.len();
        let mut m = Self::zeros(size);
        for (i, row) in rows.iter().enumerate() {
            for j in 0..size.min(row.dim()) {
                m.set(i, j, row[j]);
            }
        }
        m
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.size + col] = value;
    }

    /// Cells in row-major order
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Multiply two matrices: result = self * other
    ///
    /// With the row-vector convention this applies `self` first, then `other`.
    #[allow(clippy::needless_range_loop)]
    pub fn mul(&self, other: &Self) -> Self {
        let n = self.size;
        let mut result = Self::zeros(n);
        for i in 0..n {
            for j in 0..n {
                let mut sum = 0.0;
                for k in 0..n {
                    sum += self.get(i, k) * other.get(k, j);
                }
                result.set(i, j, sum);
            }
        }
        result
    }

    /// Multiply a column vector by this matrix: result = M * v
    pub fn apply(&self, v: &VecN) -> VecN {
        let n = self.size;
        let mut out = VecN::zeros(n);
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..n.min(v.dim()) {
                sum += self.get(i, j) * v[j];
            }
            out[i] = sum;
        }
        out
    }

    /// Check every cell is within `epsilon` of the identity
    pub fn is_identity(&self, epsilon: f64) -> bool {
        (0..self.size).all(|i| {
            (0..self.size).all(|j| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (self.get(i, j) - expected).abs() <= epsilon
            })
        })
    }
}

/// Affine transformation of d-space
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    depth: usize,
    matrix: MatN,
}

impl Transformation {
    /// Identity transformation of `depth`-space
    pub fn identity(depth: usize) -> Self {
        Self { depth, matrix: MatN::identity(depth + 1) }
    }

    /// Rotation in the plane spanned by axes `p1` and `p2`
    pub fn plane_rotation(depth: usize, angle: f64, p1: usize, p2: usize) -> Self {
        let mut t = Self::identity(depth);
        let (sn, cs) = angle.sin_cos();
        t.matrix.set(p1, p1, cs);
        t.matrix.set(p2, p2, cs);
        t.matrix.set(p1, p2, sn);
        t.matrix.set(p2, p1, -sn);
        t
    }

    /// Uniform scale
    pub fn scale(depth: usize, factor: f64) -> Self {
        let mut t = Self::identity(depth);
        for i in 0..depth {
            t.matrix.set(i, i, factor);
        }
        t
    }

    /// Translation by `offset`
    pub fn translation(depth: usize, offset: &VecN) -> Self {
        let mut t = Self::identity(depth);
        for i in 0..depth.min(offset.dim()) {
            t.matrix.set(depth, i, offset[i]);
        }
        t
    }

    /// Number of dimensions this transformation acts on
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The (depth+1)x(depth+1) matrix
    #[inline]
    pub fn matrix(&self) -> &MatN {
        &self.matrix
    }

    #[inline]
    pub fn matrix_mut(&mut self) -> &mut MatN {
        &mut self.matrix
    }

    /// Compose two transformations: `self` is applied first, then `other`
    pub fn then(&self, other: &Self) -> Self {
        Self { depth: self.depth, matrix: self.matrix.mul(&other.matrix) }
    }

    /// Transform a point
    ///
    /// The point is extended with a homogeneous 1, multiplied as a row vector
    /// and divided by the resulting homogeneous coordinate unless it is zero.
    pub fn apply(&self, p: &VecN) -> VecN {
        let d = self.depth;
        let mut out = VecN::zeros(d);
        let mut w = self.matrix.get(d, d);
        for i in 0..d.min(p.dim()) {
            w += p[i] * self.matrix.get(i, d);
        }
        for j in 0..d {
            let mut sum = self.matrix.get(d, j);
            for i in 0..d.min(p.dim()) {
                sum += p[i] * self.matrix.get(i, j);
            }
            out[j] = sum;
        }
        if w != 0.0 && w != 1.0 {
            out *= 1.0 / w;
        }
        out
    }
}
