//! Regular polytopes and the plane
//!
//! Hypercube vertices are indexed by bit pattern: vertex `i` has coordinate
//! `+h` on axis `k` if bit `k` of `i` is set and `-h` otherwise. A 2-face is
//! spanned by two axes with every other axis held fixed.

use topologic_core::VecN;

use super::{Generation, Mesh};

/// Position of hypercube vertex `bits`
fn cube_vertex(depth: usize, half: f64, bits: usize) -> VecN {
    let mut v = VecN::zeros(depth);
    for axis in 0..depth {
        v[axis] = if bits & (1 << axis) != 0 { half } else { -half };
    }
    v
}

/// Hypercube with edge length `radius`, as its square 2-faces
pub fn cube(generation: &Generation<'_>) -> Mesh {
    let depth = generation.depth;
    let half = generation.parameters.radius * 0.5;
    let mut mesh = generation.mesh(depth);

    for a in 0..depth {
        for b in (a + 1)..depth {
            let spanned = (1 << a) | (1 << b);
            for base in 0..(1usize << depth) {
                if base & spanned != 0 {
                    continue;
                }
                let face = [0, 1 << a, spanned, 1 << b]
                    .iter()
                    .map(|corner| cube_vertex(depth, half, base | corner))
                    .collect();
                if !mesh.push_face(face) {
                    return mesh;
                }
            }
        }
    }
    mesh
}

/// Vertices of the regular simplex in `depth`-space, centred on the origin
/// with circumradius `radius`
pub(crate) fn simplex_vertices(depth: usize, radius: f64) -> Vec<VecN> {
    if depth == 0 {
        return Vec::new();
    }

    // Unit basis vectors plus one point on the diagonal, equidistant to all of them
    let n = depth as f64;
    let diagonal = (1.0 - (n + 1.0).sqrt()) / n;
    let mut vertices: Vec<VecN> = (0..depth).map(|axis| VecN::basis(depth, axis)).collect();
    vertices.push(VecN::from_slice(&vec![diagonal; depth]));

    let mut centre = VecN::zeros(depth);
    for v in &vertices {
        centre += v;
    }
    centre *= 1.0 / (n + 1.0);

    vertices
        .iter()
        .map(|v| {
            let offset = v - &centre;
            &offset.normalized() * radius
        })
        .collect()
}

/// Triangles over every vertex triple
pub(crate) fn triangles(vertices: &[VecN], mesh: &mut Mesh) -> bool {
    let n = vertices.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let face = vec![vertices[i].clone(), vertices[j].clone(), vertices[k].clone()];
                if !mesh.push_face(face) {
                    return false;
                }
            }
        }
    }
    true
}

/// Regular simplex, as its triangular 2-faces
pub fn simplex(generation: &Generation<'_>) -> Mesh {
    let depth = generation.depth;
    let mut mesh = generation.mesh(depth);
    triangles(&simplex_vertices(depth, generation.parameters.radius), &mut mesh);
    mesh
}

/// Square of half-width `radius`, subdivided into a grid
pub fn plane(generation: &Generation<'_>) -> Mesh {
    let radius = generation.parameters.radius;
    let steps = generation.steps;
    let mut mesh = generation.mesh(2);
    let at = |i: usize| -radius + 2.0 * radius * (i as f64) / (steps as f64);

    for i in 0..steps {
        for j in 0..steps {
            let face = vec![
                VecN::from_slice(&[at(i), at(j)]),
                VecN::from_slice(&[at(i + 1), at(j)]),
                VecN::from_slice(&[at(i + 1), at(j + 1)]),
                VecN::from_slice(&[at(i), at(j + 1)]),
            ];
            if !mesh.push_face(face) {
                return mesh;
            }
        }
    }
    mesh
}
