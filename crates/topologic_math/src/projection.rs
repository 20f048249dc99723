//! Perspective projection from d-space to (d-1)-space
//!
//! The camera sits at `from` and looks at `to`. [`PerspectiveProjection::update_matrix`]
//! rebuilds an orthonormal view basis whose last axis is the viewing direction;
//! projecting a point expresses it in that basis and divides the remaining
//! coordinates by its depth along the viewing direction.

use std::f64::consts::FRAC_PI_4;

use serde::{Serialize, Deserialize};

use crate::{MatN, VecN};

const DEGENERATE: f64 = 1e-12;

/// Perspective projection of d-space onto (d-1)-space
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveProjection {
    /// Camera position
    pub from: VecN,
    /// Point the camera looks at
    pub to: VecN,
    /// Field of view in radians
    pub eye_angle: f64,
    view: MatN,
}

impl PerspectiveProjection {
    /// Projection of `depth`-space with both camera vectors at the origin
    /// and a quarter-turn field of view
    pub fn new(depth: usize) -> Self {
        Self {
            from: VecN::zeros(depth),
            to: VecN::zeros(depth),
            eye_angle: FRAC_PI_4,
            view: MatN::identity(depth),
        }
    }

    /// Number of dimensions projected from
    #[inline]
    pub fn depth(&self) -> usize {
        self.from.dim()
    }

    /// Current view basis, one row per axis
    #[inline]
    pub fn view(&self) -> &MatN {
        &self.view
    }

    /// Recompute the view basis from `from` and `to`
    ///
    /// When the two coincide the view falls back to the identity basis.
    pub fn update_matrix(&mut self) {
        let d = self.depth();
        let direction = (&self.to - &self.from).normalized();
        if direction.length_squared() < DEGENERATE {
            self.view = MatN::identity(d);
            return;
        }

        // Gram-Schmidt over the standard axes, seeded with the viewing direction
        let mut basis = vec![direction.clone()];
        for axis in 0..d {
            if basis.len() == d {
                break;
            }
            let mut candidate = VecN::basis(d, axis);
            for b in &basis {
                let along = candidate.dot(b);
                candidate = &candidate - &(b * along);
            }
            if candidate.length_squared() > 1e-9 {
                basis.push(candidate.normalized());
            }
        }

        let mut rows: Vec<VecN> = basis.drain(1..).collect();
        rows.push(direction);
        self.view = MatN::from_rows(&rows);
    }

    /// Project a d-point onto (d-1)-space
    pub fn project(&self, p: &VecN) -> VecN {
        let d = self.depth();
        if d == 0 {
            return VecN::zeros(0);
        }

        let q = self.view.apply(&(&p.embed(d) - &self.from));
        let depth = q[d - 1];
        let focal = (self.eye_angle * 0.5).tan();
        let scale = if depth.abs() > DEGENERATE && focal.abs() > DEGENERATE {
            1.0 / (depth * focal)
        } else {
            1.0
        };

        let mut out = VecN::zeros(d - 1);
        for i in 0..d - 1 {
            out[i] = q[i] * scale;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_default_projection() {
        let p = PerspectiveProjection::new(4);
        assert_eq!(p.depth(), 4);
        assert_eq!(p.eye_angle, FRAC_PI_4);
        assert!(p.view().is_identity(EPSILON));
    }

    #[test]
    fn test_view_basis_is_orthonormal() {
        let mut p = PerspectiveProjection::new(4);
        p.from = VecN::from_slice(&[1.0, 2.0, -1.0, 0.5]);
        p.update_matrix();

        let v = p.view();
        for i in 0..4 {
            for j in 0..4 {
                let dot: f64 = (0..4).map(|k| v.get(i, k) * v.get(j, k)).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-9, "rows {} and {} dot {}", i, j, dot);
            }
        }
    }

    #[test]
    fn test_target_projects_to_centre() {
        let mut p = PerspectiveProjection::new(3);
        p.from = VecN::from_slice(&[0.0, 0.0, 3.0]);
        p.update_matrix();

        let centre = p.project(&VecN::zeros(3));
        assert!(centre.approx_eq(&VecN::zeros(2), EPSILON), "got {:?}", centre);
    }

    #[test]
    fn test_farther_points_shrink() {
        let mut p = PerspectiveProjection::new(3);
        p.from = VecN::from_slice(&[0.0, 0.0, 5.0]);
        p.update_matrix();

        let near = p.project(&VecN::from_slice(&[1.0, 0.0, 1.0]));
        let far = p.project(&VecN::from_slice(&[1.0, 0.0, -1.0]));
        assert!(near.length() > far.length());
    }
}
