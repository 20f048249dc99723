//! Iterated function systems and fractal flames
//!
//! All three models start from a base mesh and replace it, once per
//! iteration, with the union of its images under every function of the
//! system. Random systems are drawn from a generator seeded with
//! [`Parameters::seed`](topologic_core::Parameters::seed), so a seed always
//! reproduces the same model.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use topologic_core::{Transformation, VecN};

use super::polytope::{cube, simplex_vertices, triangles};
use super::{Generation, Mesh};

/// Vertices all rounds together may produce, as a multiple of the vertex limit
const WORK_FACTOR: usize = 16;

/// How many of `functions` maps can contribute to a mesh grown from `base`
///
/// The first round stores every image of the first face before the next
/// face, so maps past the vertex limit's worth of faces are never used.
fn usable_maps(base: &Mesh, functions: u32) -> usize {
    let smallest = base.faces().iter().map(Vec::len).min().unwrap_or(1).max(1);
    (functions as usize).min(base.vertex_limit() / smallest)
}

/// Apply `maps` to `base` for `iterations` rounds
///
/// Stops early once the vertex limit is reached, or once the rounds have
/// produced [`WORK_FACTOR`] times the limit in vertices, which bounds
/// systems whose mesh never grows.
pub fn iterate<F>(base: Mesh, maps: &[F], iterations: u32) -> Mesh
where
    F: Fn(&VecN) -> VecN,
{
    let mut current = base;
    if maps.is_empty() {
        return current;
    }

    let mut work = current.vertex_limit().saturating_mul(WORK_FACTOR);
    for _ in 0..iterations {
        let mut next = Mesh::new(current.dim(), current.vertex_limit());
        'faces: for face in current.faces() {
            for map in maps {
                if !next.push_face(face.iter().map(map).collect()) {
                    break 'faces;
                }
            }
        }
        let full = next.is_full();
        work = work.saturating_sub(next.vertex_count().max(1));
        current = next;
        if full || work == 0 {
            break;
        }
    }
    current
}

/// Sierpinski gasket: halve towards each vertex of a simplex
pub fn sierpinski_gasket(generation: &Generation<'_>) -> Mesh {
    let depth = generation.depth;
    let corners = simplex_vertices(depth, generation.parameters.radius);

    let mut base = generation.mesh(depth);
    triangles(&corners, &mut base);

    let maps: Vec<_> = corners
        .iter()
        .map(|corner| move |p: &VecN| &(p + corner) * 0.5)
        .collect();
    iterate(base, &maps, generation.parameters.iterations)
}

fn random_rotation(rng: &mut StdRng, depth: usize) -> Transformation {
    if depth < 2 {
        return Transformation::identity(depth);
    }
    let p1 = rng.gen_range(0..depth);
    let p2 = (p1 + rng.gen_range(1..depth)) % depth;
    Transformation::plane_rotation(depth, rng.gen_range(0.0..std::f64::consts::TAU), p1, p2)
}

/// Random contracting affine map
fn random_affine(rng: &mut StdRng, generation: &Generation<'_>) -> Transformation {
    let depth = generation.depth;
    let parameters = generation.parameters;

    let mut offset = VecN::zeros(depth);
    for i in 0..depth {
        offset[i] = rng.gen_range(-1.0..1.0) * parameters.radius;
    }

    let mut t = Transformation::identity(depth);
    if parameters.pre_rotate {
        t = t.then(&random_rotation(rng, depth));
    }
    t = t
        .then(&Transformation::scale(depth, rng.gen_range(0.3..0.7)))
        .then(&Transformation::translation(depth, &offset));
    if parameters.post_rotate {
        t = t.then(&random_rotation(rng, depth));
    }
    t
}

/// Random affine IFS applied to a hypercube
pub fn random_affine_ifs(generation: &Generation<'_>) -> Mesh {
    let base = cube(generation);
    let mut rng = StdRng::seed_from_u64(generation.parameters.seed);
    let maps: Vec<Transformation> = (0..usable_maps(&base, generation.parameters.functions))
        .map(|_| random_affine(&mut rng, generation))
        .collect();

    let maps: Vec<_> = maps.iter().map(|t| move |p: &VecN| t.apply(p)).collect();
    iterate(base, &maps, generation.parameters.iterations)
}

/// Flame variations, indexed by coefficient
const VARIATIONS: [fn(&VecN) -> VecN; 5] = [linear, sinusoidal, spherical, bubble, horseshoe];

fn linear(p: &VecN) -> VecN {
    p.clone()
}

fn sinusoidal(p: &VecN) -> VecN {
    p.as_slice().iter().map(|c| c.sin()).collect::<Vec<_>>().into()
}

fn spherical(p: &VecN) -> VecN {
    let r2 = p.length_squared();
    if r2 > 0.0 {
        p * (1.0 / r2)
    } else {
        p.clone()
    }
}

fn bubble(p: &VecN) -> VecN {
    p * (4.0 / (p.length_squared() + 4.0))
}

fn horseshoe(p: &VecN) -> VecN {
    let r = p.length();
    if r == 0.0 || p.dim() < 2 {
        return p.clone();
    }
    let mut out = p.clone();
    out[0] = (p[0] - p[1]) * (p[0] + p[1]) / r;
    out[1] = 2.0 * p[0] * p[1] / r;
    out
}

/// One flame function: an affine map followed by a weighted blend of variations
struct FlameFunction {
    affine: Transformation,
    weights: Vec<f64>,
}

impl FlameFunction {
    fn apply(&self, p: &VecN) -> VecN {
        let q = self.affine.apply(p);
        let mut out = VecN::zeros(q.dim());
        for (variation, weight) in VARIATIONS.iter().zip(&self.weights) {
            out += &(&variation(&q) * *weight);
        }
        out
    }
}

/// Random fractal flame applied to a simplex
///
/// Each function blends `flame_coefficients` variations with random weights
/// that sum to one. There is one coefficient per variation, so at most
/// `VARIATIONS.len()` are drawn.
pub fn random_flame(generation: &Generation<'_>) -> Mesh {
    let parameters = generation.parameters;
    let mut base = generation.mesh(generation.depth);
    triangles(&simplex_vertices(generation.depth, parameters.radius), &mut base);

    let coefficients = (parameters.flame_coefficients as usize).clamp(1, VARIATIONS.len());
    let mut rng = StdRng::seed_from_u64(parameters.seed);
    let functions: Vec<FlameFunction> = (0..usable_maps(&base, parameters.functions))
        .map(|_| {
            let affine = random_affine(&mut rng, generation);
            let mut weights: Vec<f64> = (0..coefficients)
                .map(|_| rng.gen_range(0.0..1.0))
                .collect();
            let total: f64 = weights.iter().sum();
            if total > 0.0 {
                weights.iter_mut().for_each(|w| *w /= total);
            }
            FlameFunction { affine, weights }
        })
        .collect();

    let maps: Vec<_> = functions.iter().map(|f| move |p: &VecN| f.apply(p)).collect();
    iterate(base, &maps, parameters.iterations)
}
