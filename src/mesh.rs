
use std::collections::{BTreeMap, BTreeSet, HashSet};
use glam::{DVec2, DVec3};
use itertools::Itertools;
use thiserror::Error;
use crate::hierarchy::ParentPointer;

pub type VertexId = usize;
pub type FaceId = usize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("a convex polygon needs at least three points, got {0}")]
    InsufficientPoints(usize),
    #[error("face {face} repeats a vertex index")]
    DegenerateFace { face: FaceId },
    #[error("face {face} references vertex {vertex}, but the mesh has {num_vertices} vertices")]
    VertexOutOfRange {
        face: FaceId,
        vertex: VertexId,
        num_vertices: usize,
    },
}

/// A triangular face stored as its vertex indices in ascending order, so two
/// faces covering the same vertices always compare equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Face {
    u: VertexId,
    v: VertexId,
    w: VertexId,
}

impl Face {
    pub fn new(a: VertexId, b: VertexId, c: VertexId) -> Self {
        let mut indices = [a, b, c];
        indices.sort_unstable();

        Self {
            u: indices[0],
            v: indices[1],
            w: indices[2],
        }
    }

    pub const fn vertices(&self) -> [VertexId; 3] {
        [self.u, self.v, self.w]
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.u == vertex || self.v == vertex || self.w == vertex
    }
}

/// Triangulated convex mesh with derived adjacency tables.
///
/// Vertices are stored in three dimensions; planar input enters through
/// [from_convex_polygon](#method.from_convex_polygon) with `z = 0`, and the
/// query side of the crate works on the projection to the first two
/// coordinates. The mesh is immutable after construction:
/// [create_next_layer](#method.create_next_layer) returns a new mesh rather
/// than mutating in place.
#[derive(Clone, Debug)]
pub struct ConvexMesh {
    vertices: Vec<DVec3>,
    faces: Vec<Face>,
    neighbors: Vec<BTreeSet<VertexId>>,
    incident: Vec<Vec<FaceId>>,
}

impl ConvexMesh {
    /// Canonicalizes and validates `faces`, then builds the neighbor and
    /// incident-face tables.
    pub fn new(vertices: Vec<DVec3>, faces: Vec<[VertexId; 3]>) -> Result<Self, MeshError> {
        let num_vertices = vertices.len();
        let mut canonical = Vec::with_capacity(faces.len());

        for (i, [a, b, c]) in faces.into_iter().enumerate() {
            let face = Face::new(a, b, c);
            let [u, v, w] = face.vertices();

            if u == v || v == w {
                return Err(MeshError::DegenerateFace { face: i });
            }

            if w >= num_vertices {
                return Err(MeshError::VertexOutOfRange {
                    face: i,
                    vertex: w,
                    num_vertices,
                });
            }

            canonical.push(face);
        }

        Ok(Self::from_parts(vertices, canonical))
    }

    /// Fan-triangulates a convex planar polygon into a mesh the hierarchy can
    /// consume. Every cell of a rasterized glyph goes through here.
    pub fn from_convex_polygon(points: &[DVec2]) -> Result<Self, MeshError> {
        if points.len() < 3 {
            return Err(MeshError::InsufficientPoints(points.len()));
        }

        let vertices = points.iter().map(|p| p.extend(0.0)).collect();
        let faces = (1..points.len() - 1).map(|i| [0, i, i + 1]).collect();

        Self::new(vertices, faces)
    }

    // Faces are assumed canonical and in range.
    fn from_parts(vertices: Vec<DVec3>, faces: Vec<Face>) -> Self {
        let mut neighbors = vec![BTreeSet::new(); vertices.len()];
        let mut incident = vec![Vec::new(); vertices.len()];

        for (i, face) in faces.iter().enumerate() {
            let [a, b, c] = face.vertices();

            for (u, v) in [(a, b), (b, c), (c, a)] {
                neighbors[u].insert(v);
                neighbors[v].insert(u);
            }

            for v in face.vertices() {
                incident[v].push(i);
            }
        }

        Self {
            vertices,
            faces,
            neighbors,
            incident,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn degree(&self, vertex: VertexId) -> usize {
        self.neighbors[vertex].len()
    }

    /// Neighbor indices of `vertex` in ascending order.
    pub fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.neighbors[vertex].iter().copied()
    }

    /// Indices of the faces containing `vertex`, ascending.
    pub fn incident_faces(&self, vertex: VertexId) -> &[FaceId] {
        &self.incident[vertex]
    }

    pub fn face_vertices(&self, face: FaceId) -> [DVec3; 3] {
        self.faces[face].vertices().map(|v| self.vertices[v])
    }

    /// The face's corners projected to the query plane.
    pub fn projected_face(&self, face: FaceId) -> [DVec2; 3] {
        self.face_vertices(face).map(|p| p.truncate())
    }

    /// Neighbors of `vertex` in cyclic order around the hole its removal
    /// would leave.
    ///
    /// Two neighbors are linked iff they co-occur in a face incident to
    /// `vertex`; the walk starts at the smallest-indexed neighbor and always
    /// steps to the smallest-indexed unvisited linked neighbor. If the link is
    /// not a single cycle the walk stops early and the remaining neighbors are
    /// appended in index order, which keeps the builder total on degenerate
    /// input at the cost of a worse fill triangulation.
    pub fn ordered_ring(&self, vertex: VertexId) -> Vec<VertexId> {
        let neighbors = &self.neighbors[vertex];

        if neighbors.len() < 3 {
            return neighbors.iter().copied().collect();
        }

        let mut link: BTreeMap<VertexId, BTreeSet<VertexId>> =
            neighbors.iter().map(|&n| (n, BTreeSet::new())).collect();

        for &face in &self.incident[vertex] {
            let others = self.faces[face]
                .vertices()
                .into_iter()
                .filter(|&u| u != vertex)
                .collect_vec();

            if let [a, b] = others[..] {
                if let Some(adjacent) = link.get_mut(&a) {
                    adjacent.insert(b);
                }
                if let Some(adjacent) = link.get_mut(&b) {
                    adjacent.insert(a);
                }
            }
        }

        let mut ordered = Vec::with_capacity(neighbors.len());
        let mut visited = BTreeSet::new();
        let mut current = match neighbors.first() {
            Some(&start) => start,
            None => return Vec::new(),
        };

        ordered.push(current);
        visited.insert(current);

        while let Some(next) = link
            .get(&current)
            .and_then(|adjacent| adjacent.iter().copied().find(|n| !visited.contains(n)))
        {
            ordered.push(next);
            visited.insert(next);
            current = next;
        }

        if ordered.len() != neighbors.len() {
            ordered.extend(neighbors.iter().copied().filter(|n| !visited.contains(n)));
        }

        ordered
    }

    /// Greedy maximal independent set over `candidates`, visited in ascending
    /// (degree, index) order. The ordering is what makes hierarchy
    /// construction reproducible.
    pub fn maximal_independent_set(
        &self,
        candidates: impl IntoIterator<Item = VertexId>,
    ) -> Vec<VertexId> {
        let mut blocked = vec![false; self.vertices.len()];
        let mut independent = Vec::new();

        for vertex in candidates
            .into_iter()
            .sorted_by_key(|&v| (self.degree(v), v))
        {
            if blocked[vertex] {
                continue;
            }

            independent.push(vertex);
            blocked[vertex] = true;

            for &neighbor in &self.neighbors[vertex] {
                blocked[neighbor] = true;
            }
        }

        independent
    }

    /// Removes the vertices in `remove`, re-triangulates each removal hole by
    /// fanning its ordered ring, and returns the reindexed mesh together with
    /// one parent pointer per new face.
    ///
    /// Surviving faces are recorded first, in ascending face index; fill-in
    /// triangles never overwrite them. A fill-in that coincides with a
    /// surviving face must keep the `Face` pointer, otherwise the query engine
    /// would widen its descent for a face that was never removed.
    pub fn create_next_layer(&self, remove: &[VertexId]) -> (Self, Vec<ParentPointer>) {
        assert!(!remove.is_empty(), "expected at least one vertex to remove");

        let mut removed = vec![false; self.vertices.len()];

        for &vertex in remove {
            removed[vertex] = true;
        }

        let mut kept: Vec<(Face, ParentPointer)> = Vec::new();
        let mut seen: HashSet<Face> = HashSet::new();

        for (i, face) in self.faces.iter().enumerate() {
            if face.vertices().into_iter().any(|v| removed[v]) {
                continue;
            }

            seen.insert(*face);
            kept.push((*face, ParentPointer::Face(i)));
        }

        for vertex in remove.iter().copied().sorted_unstable() {
            let ring = self.ordered_ring(vertex);

            if ring.len() < 3 {
                continue;
            }

            let anchor = ring[0];

            for pair in ring[1..].windows(2) {
                let triangle = Face::new(anchor, pair[0], pair[1]);

                if seen.insert(triangle) {
                    kept.push((triangle, ParentPointer::Vertex(vertex)));
                }
            }
        }

        let mut index_map = vec![None; self.vertices.len()];
        let mut new_vertices = Vec::with_capacity(self.vertices.len().saturating_sub(remove.len()));

        for (i, &point) in self.vertices.iter().enumerate() {
            if removed[i] {
                continue;
            }

            index_map[i] = Some(new_vertices.len());
            new_vertices.push(point);
        }

        let mut new_faces = Vec::with_capacity(kept.len());
        let mut parents = Vec::with_capacity(kept.len());

        for (face, pointer) in kept {
            let [a, b, c] = face.vertices();
            let (Some(a), Some(b), Some(c)) = (index_map[a], index_map[b], index_map[c]) else {
                continue;
            };

            let triangle = Face::new(a, b, c);
            let [u, v, w] = triangle.vertices();

            // A face that collapses after remapping would poison every level
            // above it.
            if u == v || v == w {
                continue;
            }

            new_faces.push(triangle);
            parents.push(pointer);
        }

        (Self::from_parts(new_vertices, new_faces), parents)
    }
}
