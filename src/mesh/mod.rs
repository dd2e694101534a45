//! Mesh graph, quadric error engine, and contraction scheduler.
//!
//! This is the simplification core: a triangle mesh represented as a
//! mutable incidence graph (`graph`), the per-vertex quadric error
//! machinery (`quadric`), and the priority-queue-driven edge-contraction
//! loop that reduces it (`simplify`).

pub mod error;
pub mod graph;
pub mod handle;
pub mod quadric;
pub mod simplify;

pub use error::MeshError;
pub use handle::{EdgeId, FaceId, VertexId};
pub use simplify::SimplificationReport;

use crate::core::Point3;
use graph::MeshGraph;

/// A triangle mesh, ready for simplification.
///
/// Thin wrapper over [`MeshGraph`] exposing the construction and
/// simplification entry points the I/O adapters and driver need, without
/// letting callers reach into the graph's internals directly.
#[derive(Debug, Default)]
pub struct Mesh {
    graph: MeshGraph,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            graph: MeshGraph::new(),
        }
    }

    pub fn add_vertex(&mut self, position: Point3) -> VertexId {
        self.graph.add_vertex(position)
    }

    pub fn add_triangle(
        &mut self,
        v0: VertexId,
        v1: VertexId,
        v2: VertexId,
    ) -> Result<FaceId, MeshError> {
        self.graph.add_triangle(v0, v1, v2)
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.alive_vertex_count()
    }

    pub fn face_count(&self) -> usize {
        self.graph.face_count()
    }

    /// Reduces the mesh to `target` surviving vertices (or as close as the
    /// heap permits) via iterated quadric-error edge contraction, then
    /// compacts the graph to dense zero-based numbering.
    pub fn simplify(&mut self, target: usize) -> SimplificationReport {
        simplify::simplify(&mut self.graph, target)
    }

    /// Vertex positions in current (post-compaction, if called after
    /// `simplify`) id order.
    pub fn vertex_positions(&self) -> Vec<Point3> {
        self.graph
            .vertex_ids()
            .map(|id| self.graph.vertex(id).unwrap().position)
            .collect()
    }

    /// Triangles as 0-based vertex index triples, in current face id order.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.graph
            .face_ids()
            .map(|id| {
                let face = self.graph.face(id).unwrap();
                [
                    face.vertices[0].index(),
                    face.vertices[1].index(),
                    face.vertices[2].index(),
                ]
            })
            .collect()
    }
}
