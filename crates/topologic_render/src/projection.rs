//! Projection pipeline
//!
//! Points are carried from the render depth down to a target dimension: in
//! each dimension `d` above the target the point is transformed by that
//! dimension's transformation and then projected by its camera onto
//! (d-1)-space. The target dimension's transformation is applied last.

use topologic_core::{DimensionState, VecN};

use crate::models::Mesh;

/// Carry one point from `render_depth`-space down to `target`-space
pub fn project_point(state: &DimensionState, point: &VecN, render_depth: usize, target: usize) -> VecN {
    let mut p = point.embed(render_depth);
    for d in ((target + 1)..=render_depth).rev() {
        if let Some(t) = state.transformation(d) {
            p = t.apply(&p);
        }
        p = match state.camera(d) {
            Some(camera) => camera.projection.project(&p),
            None => p.embed(d - 1),
        };
    }
    if let Some(t) = state.transformation(target) {
        p = t.apply(&p);
    }
    p.embed(target)
}

/// Carry every face of `mesh` down to `target`-space
pub fn project_mesh(state: &DimensionState, mesh: &Mesh, render_depth: usize, target: usize) -> Vec<Vec<VecN>> {
    mesh.faces()
        .iter()
        .map(|face| {
            face.iter()
                .map(|p| project_point(state, p, render_depth, target))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use topologic_core::Transformation;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_identity_at_target() {
        let state = DimensionState::with_max_depth(3);
        let p = VecN::from_slice(&[0.25, -0.5]);
        let q = project_point(&state, &p, 2, 2);
        assert!(q.approx_eq(&p, EPSILON));
    }

    #[test]
    fn test_target_transformation_applied() {
        let mut state = DimensionState::with_max_depth(3);
        if let Some(t) = state.transformation_mut(2) {
            *t = Transformation::scale(2, 2.0);
        }
        let q = project_point(&state, &VecN::from_slice(&[0.25, -0.5]), 2, 2);
        assert!(q.approx_eq(&VecN::from_slice(&[0.5, -1.0]), EPSILON));
    }

    #[test]
    fn test_projection_reduces_dimension() {
        let mut state = DimensionState::with_max_depth(4);
        state.refresh();
        let p = VecN::from_slice(&[0.1, 0.2, 0.3]);
        let q = project_point(&state, &p, 4, 2);
        assert_eq!(q.dim(), 2);

        let q3 = project_point(&state, &p, 4, 3);
        assert_eq!(q3.dim(), 3);
    }

    #[test]
    fn test_project_camera_on_axis() {
        // Camera on the last axis looking at the origin: the origin stays central
        let mut state = DimensionState::with_max_depth(3);
        state.polar_coordinates = false;
        if let Some(camera) = state.camera_mut(3) {
            *camera.from_mut() = VecN::from_slice(&[0.0, 0.0, 4.0]);
        }
        state.refresh();
        let q = project_point(&state, &VecN::zeros(3), 3, 2);
        assert!(q.approx_eq(&VecN::zeros(2), EPSILON));
    }
}
