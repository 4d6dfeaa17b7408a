#![doc = include_str!("hierarchy/DOCS.md")]


use glam::DVec2;
use itertools::Itertools;
use thiserror::Error;
use tracing::debug;
use crate::geometry::{segment_hits_convex, Aabb};
use crate::mesh::{ConvexMesh, FaceId, VertexId};

/// Classical Dobkin–Kirkpatrick degree bound. Removing an independent set of
/// vertices with degree at most 11 deletes a constant fraction of a
/// triangulated mesh per layer, which is what makes the hierarchy height
/// logarithmic.
pub const DEFAULT_DEGREE_LIMIT: usize = 11;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("a hierarchy requires at least one level")]
    EmptyHierarchy,
}

/// Maps a face of level `k + 1` back into level `k`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParentPointer {
    /// The face already existed in the finer level, at this face index.
    Face(FaceId),
    /// The face is a fill-in triangle produced by removing this vertex, in
    /// the finer level's vertex numbering.
    Vertex(VertexId),
}

/// One mesh of the hierarchy plus the derived data the query engine needs:
/// the parent pointers of its faces (absent for the base level), the mesh
/// bounding box, and one bounding box per face.
#[derive(Clone, Debug)]
pub struct Level {
    mesh: ConvexMesh,
    parents: Option<Vec<ParentPointer>>,
    bounds: Aabb,
    face_bounds: Vec<Aabb>,
}

impl Level {
    /// `parents` must hold one pointer per face of `mesh`, in face order, or
    /// be `None` for a base level.
    pub fn new(mesh: ConvexMesh, parents: Option<Vec<ParentPointer>>) -> Self {
        let bounds = Aabb::from_points(mesh.vertices().iter().map(|p| p.truncate()));
        let face_bounds = (0..mesh.num_faces())
            .map(|face| Aabb::from_points(mesh.projected_face(face)))
            .collect();

        Self {
            mesh,
            parents,
            bounds,
            face_bounds,
        }
    }

    pub fn mesh(&self) -> &ConvexMesh {
        &self.mesh
    }

    pub fn parents(&self) -> Option<&[ParentPointer]> {
        self.parents.as_deref()
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn face_bounds(&self) -> &[Aabb] {
        &self.face_bounds
    }
}

/// One record of [trace_intersection](Hierarchy::trace_intersection): a face
/// that was actually tested, after bounding-box pruning, in test order.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceStep {
    pub level: usize,
    pub polygon: Vec<DVec2>,
    pub hit: bool,
}

#[derive(Clone, Debug)]
pub struct Hierarchy {
    levels: Vec<Level>,
}

impl Hierarchy {
    /// Wraps prebuilt levels. Level 0 must be the base and the last level the
    /// apex; most callers want [build](#method.build) instead.
    pub fn new(levels: Vec<Level>) -> Result<Self, HierarchyError> {
        if levels.is_empty() {
            return Err(HierarchyError::EmptyHierarchy);
        }

        Ok(Self { levels })
    }

    /// Builds a hierarchy with the [default degree limit](DEFAULT_DEGREE_LIMIT).
    pub fn build(mesh: ConvexMesh) -> Self {
        Self::build_with_limit(mesh, DEFAULT_DEGREE_LIMIT)
    }

    /// Coarsens `mesh` level by level until at most four vertices remain.
    ///
    /// Each round removes a maximal independent set of vertices with degree at
    /// most `degree_limit`. When a round cannot make progress (no candidates,
    /// an empty independent set, or a layer that removed nothing) the limit is
    /// raised by one and the round retried, so meshes that violate the
    /// classical degree assumptions still terminate; a fan-triangulated
    /// polygon has one hub vertex of arbitrarily high degree, and the only
    /// cost there is a taller hierarchy. The limit resets after every
    /// productive round.
    pub fn build_with_limit(mesh: ConvexMesh, degree_limit: usize) -> Self {
        let mut levels = Vec::new();
        let mut parents = None;
        let mut current = mesh;
        let mut limit = degree_limit;

        while current.num_vertices() > 4 {
            let candidates = (0..current.num_vertices())
                .filter(|&v| current.degree(v) <= limit)
                .collect_vec();

            if candidates.is_empty() {
                limit += 1;
                debug!(limit, "no low-degree candidates, relaxing degree limit");
                continue;
            }

            let independent = current.maximal_independent_set(candidates);

            if independent.is_empty() {
                limit += 1;
                debug!(limit, "empty independent set, relaxing degree limit");
                continue;
            }

            let (next, next_parents) = current.create_next_layer(&independent);

            if next.num_vertices() == current.num_vertices() {
                limit += 1;
                continue;
            }

            debug!(
                vertices = next.num_vertices(),
                faces = next.num_faces(),
                "coarsened level"
            );

            levels.push(Level::new(current, parents.take()));
            current = next;
            parents = Some(next_parents);
            limit = degree_limit;
        }

        levels.push(Level::new(current, parents));

        Self { levels }
    }

    /// Levels from base (index 0) to apex.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// The base mesh, exactly as passed to the builder.
    pub fn top(&self) -> &ConvexMesh {
        self.levels[0].mesh()
    }

    /// The coarsest mesh.
    pub fn apex(&self) -> &ConvexMesh {
        self.levels[self.levels.len() - 1].mesh()
    }

    /// Whether the segment from `start` to `end` hits the base mesh's
    /// projection. A degenerate segment (`start == end`) degenerates to a
    /// point-containment test.
    ///
    /// The result is a pure function of the hierarchy and the two endpoints;
    /// concurrent callers need no synchronization.
    pub fn intersects_segment(&self, start: DVec2, end: DVec2) -> bool {
        self.descend(start, end, None)
    }

    /// Runs the same descent as
    /// [intersects_segment](#method.intersects_segment) and records every face
    /// tested after bounding-box pruning, in test order. The trace ends at the
    /// first base-level hit, or once every reachable candidate has been
    /// exhausted.
    pub fn trace_intersection(&self, start: DVec2, end: DVec2) -> Vec<TraceStep> {
        let mut steps = Vec::new();
        self.descend(start, end, Some(&mut steps));
        steps
    }

    // Depth-first apex-to-base traversal. A hit at level k descends through
    // the face's parent pointer: a surviving face narrows level k - 1 to a
    // single face, a removed vertex widens it to the faces incident to that
    // vertex. Only a hit at level 0 is conclusive.
    fn descend(&self, start: DVec2, end: DVec2, mut trace: Option<&mut Vec<TraceStep>>) -> bool {
        let segment_bounds = Aabb::from_segment(start, end);
        let mut stack = vec![(self.levels.len() - 1, None)];

        while let Some((level_idx, constraint)) = stack.pop() {
            let level = &self.levels[level_idx];

            if !level.bounds.overlaps(&segment_bounds) {
                continue;
            }

            let candidates: Vec<FaceId> = match constraint {
                None => (0..level.mesh.num_faces()).collect(),
                Some(ParentPointer::Face(face)) => vec![face],
                Some(ParentPointer::Vertex(vertex)) => level.mesh.incident_faces(vertex).to_vec(),
            };

            for face in candidates {
                if !level.face_bounds[face].overlaps(&segment_bounds) {
                    continue;
                }

                let polygon = level.mesh.projected_face(face);
                let hit = segment_hits_convex(start, end, &polygon);

                if let Some(steps) = trace.as_mut() {
                    steps.push(TraceStep {
                        level: level_idx,
                        polygon: polygon.to_vec(),
                        hit,
                    });
                }

                if !hit {
                    continue;
                }

                if level_idx == 0 {
                    return true;
                }

                match level.parents.as_ref().and_then(|parents| parents.get(face)) {
                    Some(&pointer) => stack.push((level_idx - 1, Some(pointer))),
                    // A non-base face without a back-map cannot be refined
                    // further; treat the coarse hit as conclusive.
                    None => return true,
                }
            }
        }

        false
    }
}
