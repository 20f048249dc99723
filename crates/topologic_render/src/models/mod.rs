//! Model generators
//!
//! A generator turns a [`Generation`] request into a [`Mesh`]: a list of
//! polygonal faces in model space. Renderers draw every face twice, once as an
//! outline (wireframe pass) and once filled (solid pass).
//!
//! Generation is bounded by [`Parameters::vertex_limit`]: once a mesh holds
//! that many vertices, further faces are dropped.

pub mod polytope;
pub mod parametric;
pub mod ifs;

use topologic_core::{CoordinateFormat, ModelDeclaration, Parameters, VecN};

/// Polygonal faces in model space
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    dim: usize,
    faces: Vec<Vec<VecN>>,
    vertices: usize,
    vertex_limit: usize,
}

impl Mesh {
    /// Empty mesh in `dim`-space holding at most `vertex_limit` vertices
    pub fn new(dim: usize, vertex_limit: usize) -> Self {
        Self {
            dim,
            faces: Vec::new(),
            vertices: 0,
            vertex_limit,
        }
    }

    /// Dimension of the space the faces live in
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn faces(&self) -> &[Vec<VecN>] {
        &self.faces
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices
    }

    #[inline]
    pub fn vertex_limit(&self) -> usize {
        self.vertex_limit
    }

    /// Has the vertex limit been reached?
    #[inline]
    pub fn is_full(&self) -> bool {
        self.vertices >= self.vertex_limit
    }

    /// Add a face
    ///
    /// Returns false, and drops the face, if it would exceed the vertex limit.
    pub fn push_face(&mut self, face: Vec<VecN>) -> bool {
        if self.vertices + face.len() > self.vertex_limit {
            self.vertices = self.vertex_limit;
            return false;
        }
        self.vertices += face.len();
        self.faces.push(face);
        true
    }
}

/// Everything a generator needs to build a mesh
#[derive(Clone, Copy, Debug)]
pub struct Generation<'a> {
    /// Model depth
    pub depth: usize,
    pub parameters: &'a Parameters,
    /// Subdivisions per parameter axis
    pub steps: usize,
    pub format: CoordinateFormat,
}

impl Generation<'_> {
    /// Empty mesh in `dim`-space with this request's vertex limit
    pub fn mesh(&self, dim: usize) -> Mesh {
        Mesh::new(dim, self.parameters.vertex_limit)
    }
}

/// Model generator function
pub type Generator = fn(&Generation<'_>) -> Mesh;

struct CachedMesh {
    parameters: Parameters,
    multiplier: f64,
    mesh: Mesh,
}

/// A generator bound to a declaration, with its last mesh cached
pub(crate) struct BoundModel {
    declaration: ModelDeclaration,
    generate: Generator,
    cache: Option<CachedMesh>,
}

impl BoundModel {
    pub(crate) fn new(declaration: ModelDeclaration, generate: Generator) -> Self {
        Self {
            declaration,
            generate,
            cache: None,
        }
    }

    #[inline]
    pub(crate) fn declaration(&self) -> &ModelDeclaration {
        &self.declaration
    }

    /// The mesh for `parameters` at `multiplier` times their precision
    ///
    /// Regenerated only when the parameters or the multiplier changed since
    /// the previous call.
    pub(crate) fn mesh(&mut self, parameters: &Parameters, multiplier: f64) -> &Mesh {
        let stale = match &self.cache {
            Some(cached) => cached.parameters != *parameters || cached.multiplier != multiplier,
            None => true,
        };
        if stale {
            self.cache = None;
        }

        let declaration = &self.declaration;
        let generate = self.generate;
        let cached = self.cache.get_or_insert_with(|| {
            let generation = Generation {
                depth: declaration.depth,
                parameters,
                steps: parameters.steps(multiplier),
                format: declaration.format,
            };
            let mesh = generate(&generation);
            log::debug!(
                "generated {}-{}: {} faces, {} vertices",
                declaration.depth,
                declaration.id,
                mesh.face_count(),
                mesh.vertex_count()
            );
            CachedMesh {
                parameters: parameters.clone(),
                multiplier,
                mesh,
            }
        });
        &cached.mesh
    }
}

/// Visit every multi-index below `counts`, last axis fastest
///
/// Stops early when `visit` returns false.
pub(crate) fn for_each_index(counts: &[usize], mut visit: impl FnMut(&[usize]) -> bool) {
    if counts.iter().any(|&c| c == 0) {
        return;
    }
    let mut index = vec![0; counts.len()];
    loop {
        if !visit(&index) {
            return;
        }
        let mut axis = counts.len();
        loop {
            if axis == 0 {
                return;
            }
            axis -= 1;
            index[axis] += 1;
            if index[axis] < counts[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
}
