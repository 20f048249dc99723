//! Parametric surfaces
//!
//! Surfaces are sampled on a regular grid over their parameter domain and
//! emitted as quads. The sphere of depth `d` is the d-sphere embedded in
//! (d+1)-space; the Möbius strip and the Klein bagel are embedded in 3-space.

use std::f64::consts::{PI, TAU};

use topologic_core::VecN;
use topologic_math::polar;

use super::{for_each_index, Generation, Mesh};

/// Quads over `[u0, u1] x [v0, v1]` mapped through `f`
fn surface(
    generation: &Generation<'_>,
    dim: usize,
    (u0, u1): (f64, f64),
    (v0, v1): (f64, f64),
    v_steps: usize,
    f: impl Fn(f64, f64) -> VecN,
) -> Mesh {
    let u_steps = generation.steps;
    let mut mesh = generation.mesh(dim);
    let u = |i: usize| u0 + (u1 - u0) * (i as f64) / (u_steps as f64);
    let v = |j: usize| v0 + (v1 - v0) * (j as f64) / (v_steps as f64);

    for i in 0..u_steps {
        for j in 0..v_steps {
            let face = vec![
                f(u(i), v(j)),
                f(u(i + 1), v(j)),
                f(u(i + 1), v(j + 1)),
                f(u(i), v(j + 1)),
            ];
            if !mesh.push_face(face) {
                return mesh;
            }
        }
    }
    mesh
}

/// The d-sphere of radius `radius`
///
/// Angles 1..d-1 range over [0, pi], the last over [0, 2pi]. Quads span each
/// pair of adjacent angles, with the other angles held at grid values.
pub fn sphere(generation: &Generation<'_>) -> Mesh {
    let depth = generation.depth;
    let dim = depth + 1;
    let steps = generation.steps;
    let radius = generation.parameters.radius;
    let mut mesh = generation.mesh(dim);

    let angle = |axis: usize, i: usize| {
        let range = if axis == depth { TAU } else { PI };
        range * (i as f64) / (steps as f64)
    };
    let point = |angles: &[usize]| {
        let mut p = VecN::zeros(dim);
        p[0] = radius;
        for (k, &i) in angles.iter().enumerate() {
            p[k + 1] = angle(k + 1, i);
        }
        polar::to_cartesian(&p)
    };

    let counts = vec![steps; depth];
    for a in 0..depth.saturating_sub(1) {
        let mut full = false;
        for_each_index(&counts, |index| {
            let mut corner = index.to_vec();
            let mut face = Vec::with_capacity(4);
            for (da, db) in [(0, 0), (1, 0), (1, 1), (0, 1)] {
                corner[a] = index[a] + da;
                corner[a + 1] = index[a + 1] + db;
                face.push(point(&corner));
            }
            full = !mesh.push_face(face);
            !full
        });
        if full {
            break;
        }
    }
    mesh
}

/// Möbius strip with centre radius `radius` and half-width `minor_radius`
pub fn moebius_strip(generation: &Generation<'_>) -> Mesh {
    let radius = generation.parameters.radius;
    let width = generation.parameters.minor_radius;
    let v_steps = (generation.steps / 2).max(1);

    surface(generation, 3, (0.0, TAU), (-1.0, 1.0), v_steps, |u, v| {
        let r = radius + width * v * (u * 0.5).cos();
        VecN::from_slice(&[r * u.cos(), r * u.sin(), width * v * (u * 0.5).sin()])
    })
}

/// Figure-8 immersion of the Klein bottle with tube radius `radius`
pub fn klein_bagel(generation: &Generation<'_>) -> Mesh {
    let radius = generation.parameters.radius;

    surface(generation, 3, (0.0, TAU), (0.0, TAU), generation.steps, |u, v| {
        let (half_sin, half_cos) = (u * 0.5).sin_cos();
        let r = radius + half_cos * v.sin() - half_sin * (2.0 * v).sin();
        VecN::from_slice(&[
            r * u.cos(),
            r * u.sin(),
            half_sin * v.sin() + half_cos * (2.0 * v).sin(),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use topologic_core::{CoordinateFormat, Parameters};

    const EPSILON: f64 = 1e-9;

    fn generation(depth: usize, parameters: &Parameters) -> Generation<'_> {
        Generation {
            depth,
            parameters,
            steps: parameters.steps(1.0),
            format: CoordinateFormat::Polar,
        }
    }

    #[test]
    fn test_sphere_points_on_surface() {
        let parameters = Parameters {
            radius: 2.0,
            ..Parameters::default()
        };
        let mesh = sphere(&generation(2, &parameters));
        assert_eq!(mesh.dim(), 3);
        assert_eq!(mesh.face_count(), 100);
        for face in mesh.faces() {
            for p in face {
                assert!((p.length() - 2.0).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_sphere_higher_depth() {
        let parameters = Parameters {
            precision: 3.0,
            ..Parameters::default()
        };
        let mesh = sphere(&generation(3, &parameters));
        assert_eq!(mesh.dim(), 4);
        // Two adjacent angle pairs, 3^3 quads each
        assert_eq!(mesh.face_count(), 2 * 27);
    }

    #[test]
    fn test_moebius_strip() {
        let parameters = Parameters::default();
        let mesh = moebius_strip(&generation(2, &parameters));
        assert_eq!(mesh.dim(), 3);
        assert_eq!(mesh.face_count(), 10 * 5);

        // The centre line is a circle of the major radius
        for face in mesh.faces() {
            for p in face {
                let planar = (p[0] * p[0] + p[1] * p[1]).sqrt();
                assert!(planar <= parameters.radius + parameters.minor_radius + EPSILON);
            }
        }
    }

    #[test]
    fn test_klein_bagel_respects_limit() {
        let parameters = Parameters {
            vertex_limit: 40,
            ..Parameters::default()
        };
        let mesh = klein_bagel(&generation(2, &parameters));
        assert_eq!(mesh.face_count(), 10);
    }
}
