//! n-dimensional Vector type

use serde::{Serialize, Deserialize};

/// Vector with a runtime number of components
///
/// Component `i` is the coordinate along axis `i`. Binary operations between
/// vectors of different sizes use the shorter size.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VecN {
    data: Vec<f64>,
}

impl VecN {
    /// Create a zero vector with `dim` components
    pub fn zeros(dim: usize) -> Self {
        Self { data: vec![0.0; dim] }
    }

    /// Create a vector from a slice of components
    pub fn from_slice(components: &[f64]) -> Self {
        Self { data: components.to_vec() }
    }

    /// Unit vector along `axis` in `dim`-space
    pub fn basis(dim: usize, axis: usize) -> Self {
        let mut v = Self::zeros(dim);
        if axis < dim {
            v.data[axis] = 1.0;
        }
        v
    }

    /// Number of components
    #[inline]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum()
    }

    /// Length squared (faster than length)
    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Length (magnitude)
    #[inline]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Normalize to unit length
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self * (1.0 / len)
        } else {
            Self::zeros(self.dim())
        }
    }

    /// Copy into `dim`-space, padding with zeros or dropping trailing axes
    pub fn embed(&self, dim: usize) -> Self {
        let mut v = Self::zeros(dim);
        for (dst, src) in v.data.iter_mut().zip(&self.data) {
            *dst = *src;
        }
        v
    }

    /// Linear interpolation between two vectors
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        &(self * (1.0 - t)) + &(other * t)
    }

    /// Check all components are within `epsilon` of `other`
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.dim() == other.dim()
            && self.data.iter().zip(&other.data).all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl From<Vec<f64>> for VecN {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

// Operator overloads

impl std::ops::Index<usize> for VecN {
    type Output = f64;
    #[inline]
    fn index(&self, i: usize) -> &f64 {
        &self.data[i]
    }
}

impl std::ops::IndexMut<usize> for VecN {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.data[i]
    }
}

impl std::ops::Add for &VecN {
    type Output = VecN;
    fn add(self, other: &VecN) -> VecN {
        self.data.iter().zip(&other.data).map(|(a, b)| a + b).collect::<Vec<_>>().into()
    }
}

impl std::ops::Sub for &VecN {
    type Output = VecN;
    fn sub(self, other: &VecN) -> VecN {
        self.data.iter().zip(&other.data).map(|(a, b)| a - b).collect::<Vec<_>>().into()
    }
}

impl std::ops::Mul<f64> for &VecN {
    type Output = VecN;
    fn mul(self, scalar: f64) -> VecN {
        self.data.iter().map(|a| a * scalar).collect::<Vec<_>>().into()
    }
}

impl std::ops::Neg for &VecN {
    type Output = VecN;
    fn neg(self) -> VecN {
        self * -1.0
    }
}

impl std::ops::AddAssign<&VecN> for VecN {
    fn add_assign(&mut self, other: &VecN) {
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
    }
}

impl std::ops::MulAssign<f64> for VecN {
    fn mul_assign(&mut self, scalar: f64) {
        for a in self.data.iter_mut() {
            *a *= scalar;
        }
    }
}
