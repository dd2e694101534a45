//! Mesh connectivity graph: vertices, edges, and triangular faces with
//! bidirectional incidence.
//!
//! Storage follows the teacher's half-edge arena convention, generalized to
//! this module's direct-incidence model: each entity kind lives in a
//! `Vec<Option<T>>` with a free-list of reusable slots, so handles stay
//! stable across retirements within one simplification run. Dense
//! renumbering happens only in `compact()`.

use std::collections::{HashMap, HashSet};

use crate::core::precision::EPSILON_FINE;
use crate::core::{Matrix4, Point3, Vector3};

use super::error::MeshError;
use super::handle::{EdgeId, FaceId, VertexId};

/// A mesh vertex: position, accumulated quadric, and incidence sets.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: Point3,
    pub quadric: Matrix4,
    pub edges: HashSet<EdgeId>,
    pub faces: HashSet<FaceId>,
    pub alive: bool,
}

impl Vertex {
    fn new(position: Point3) -> Self {
        Self {
            position,
            quadric: Matrix4::zeros(),
            edges: HashSet::new(),
            faces: HashSet::new(),
            alive: true,
        }
    }
}

/// An edge's cached optimal contraction point and scalar cost, absent until
/// the quadric engine has computed it.
#[derive(Debug, Clone, Copy)]
pub struct EdgeCandidate {
    pub position: Point3,
    pub cost: f64,
}

/// A mesh edge, identity being the unordered pair of its two endpoints.
#[derive(Debug, Clone)]
pub struct Edge {
    pub v0: VertexId,
    pub v1: VertexId,
    pub faces: HashSet<FaceId>,
    pub candidate: Option<EdgeCandidate>,
    pub alive: bool,
}

impl Edge {
    fn new(v0: VertexId, v1: VertexId) -> Self {
        Self {
            v0,
            v1,
            faces: HashSet::new(),
            candidate: None,
            alive: true,
        }
    }

}

/// A triangular face: ordered vertex triple, cached normal and centroid.
#[derive(Debug, Clone)]
pub struct Face {
    pub vertices: [VertexId; 3],
    pub edges: [EdgeId; 3],
    pub normal: Vector3,
    pub centroid: Point3,
    pub alive: bool,
}

pub(crate) fn face_normal_centroid(p0: Point3, p1: Point3, p2: Point3) -> (Vector3, Point3) {
    let n = (p1 - p0).cross(&(p2 - p0));
    let norm = n.norm();
    let normal = if norm < EPSILON_FINE {
        Vector3::zeros()
    } else {
        n / norm
    };
    let centroid = Point3::new(
        (p0.x + p1.x + p2.x) / 3.0,
        (p0.y + p1.y + p2.y) / 3.0,
        (p0.z + p1.z + p2.z) / 3.0,
    );
    (normal, centroid)
}

/// Sorted unordered-pair key used by the edge lookup table.
#[inline]
fn edge_key(a: VertexId, b: VertexId) -> (usize, usize) {
    if a.0 <= b.0 {
        (a.0, b.0)
    } else {
        (b.0, a.0)
    }
}

/// The mutable incidence graph of vertices, edges, and faces.
#[derive(Debug, Default)]
pub struct MeshGraph {
    vertices: Vec<Option<Vertex>>,
    edges: Vec<Option<Edge>>,
    faces: Vec<Option<Face>>,
    free_vertices: Vec<usize>,
    free_edges: Vec<usize>,
    free_faces: Vec<usize>,
    edge_lookup: HashMap<(usize, usize), EdgeId>,
}

impl MeshGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn add_vertex(&mut self, position: Point3) -> VertexId {
        let vertex = Vertex::new(position);
        if let Some(slot) = self.free_vertices.pop() {
            self.vertices[slot] = Some(vertex);
            VertexId(slot)
        } else {
            self.vertices.push(Some(vertex));
            VertexId(self.vertices.len() - 1)
        }
    }

    /// Looks up the alive edge between `a` and `b`, creating it if absent.
    /// Returns the handle either way.
    fn get_or_create_edge(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        let key = edge_key(a, b);
        if let Some(&id) = self.edge_lookup.get(&key) {
            if self.edges[id.0].as_ref().map_or(false, |e| e.alive) {
                return id;
            }
        }
        let edge = Edge::new(a, b);
        let id = if let Some(slot) = self.free_edges.pop() {
            self.edges[slot] = Some(edge);
            EdgeId(slot)
        } else {
            self.edges.push(Some(edge));
            EdgeId(self.edges.len() - 1)
        };
        self.edge_lookup.insert(key, id);
        id
    }

    /// Creates a triangular face from three vertex handles, deduplicating
    /// and wiring its three edges.
    pub fn add_triangle(
        &mut self,
        v0: VertexId,
        v1: VertexId,
        v2: VertexId,
    ) -> Result<FaceId, MeshError> {
        let p0 = self.vertex(v0)?.position;
        let p1 = self.vertex(v1)?.position;
        let p2 = self.vertex(v2)?.position;
        let (normal, centroid) = face_normal_centroid(p0, p1, p2);

        let e0 = self.get_or_create_edge(v0, v1);
        let e1 = self.get_or_create_edge(v1, v2);
        let e2 = self.get_or_create_edge(v2, v0);

        let face = Face {
            vertices: [v0, v1, v2],
            edges: [e0, e1, e2],
            normal,
            centroid,
            alive: true,
        };
        let face_id = if let Some(slot) = self.free_faces.pop() {
            self.faces[slot] = Some(face);
            FaceId(slot)
        } else {
            self.faces.push(Some(face));
            FaceId(self.faces.len() - 1)
        };

        for v in [v0, v1, v2] {
            self.vertex_mut(v)?.faces.insert(face_id);
        }
        for (edge_id, (a, b)) in [(e0, (v0, v1)), (e1, (v1, v2)), (e2, (v2, v0))] {
            self.edge_mut(edge_id)?.faces.insert(face_id);
            self.vertex_mut(a)?.edges.insert(edge_id);
            self.vertex_mut(b)?.edges.insert(edge_id);
        }

        Ok(face_id)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn vertex(&self, id: VertexId) -> Result<&Vertex, MeshError> {
        self.vertices
            .get(id.0)
            .and_then(|v| v.as_ref())
            .filter(|v| v.alive)
            .ok_or(MeshError::InvalidVertexId(id))
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut Vertex, MeshError> {
        self.vertices
            .get_mut(id.0)
            .and_then(|v| v.as_mut())
            .filter(|v| v.alive)
            .ok_or(MeshError::InvalidVertexId(id))
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, MeshError> {
        self.edges
            .get(id.0)
            .and_then(|e| e.as_ref())
            .filter(|e| e.alive)
            .ok_or(MeshError::InvalidEdgeId(id))
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge, MeshError> {
        self.edges
            .get_mut(id.0)
            .and_then(|e| e.as_mut())
            .filter(|e| e.alive)
            .ok_or(MeshError::InvalidEdgeId(id))
    }

    pub fn face(&self, id: FaceId) -> Result<&Face, MeshError> {
        self.faces
            .get(id.0)
            .and_then(|f| f.as_ref())
            .filter(|f| f.alive)
            .ok_or(MeshError::InvalidFaceId(id))
    }

    pub fn face_mut(&mut self, id: FaceId) -> Result<&mut Face, MeshError> {
        self.faces
            .get_mut(id.0)
            .and_then(|f| f.as_mut())
            .filter(|f| f.alive)
            .ok_or(MeshError::InvalidFaceId(id))
    }

    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup
            .get(&edge_key(a, b))
            .copied()
            .filter(|id| self.edges[id.0].as_ref().map_or(false, |e| e.alive))
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.as_ref().map_or(false, |v| v.alive))
            .map(|(i, _)| VertexId(i))
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.as_ref().map_or(false, |e| e.alive))
            .map(|(i, _)| EdgeId(i))
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.as_ref().map_or(false, |f| f.alive))
            .map(|(i, _)| FaceId(i))
    }

    pub fn alive_vertex_count(&self) -> usize {
        self.vertex_ids().count()
    }

    // ------------------------------------------------------------------
    // Retirement and creation used by the contraction scheduler
    // ------------------------------------------------------------------

    pub fn retire_vertex(&mut self, id: VertexId) {
        if let Some(slot) = self.vertices.get_mut(id.0).and_then(|v| v.as_mut()) {
            slot.alive = false;
        }
    }

    pub fn retire_edge(&mut self, id: EdgeId) {
        if let Some(slot) = self.edges.get_mut(id.0).and_then(|e| e.as_mut()) {
            slot.alive = false;
        }
    }

    pub fn retire_face(&mut self, id: FaceId) {
        if let Some(slot) = self.faces.get_mut(id.0).and_then(|f| f.as_mut()) {
            slot.alive = false;
        }
    }

    /// Creates a new vertex (used by the contraction transaction to birth
    /// the merged vertex) with a caller-supplied quadric.
    pub fn birth_vertex(&mut self, position: Point3, quadric: Matrix4) -> VertexId {
        let id = self.add_vertex(position);
        self.vertices[id.0].as_mut().unwrap().quadric = quadric;
        id
    }

    /// Creates a fresh edge between `a` and `b`, bypassing lookup reuse —
    /// used only when the scheduler has already confirmed no alive edge for
    /// this key exists. Registers it in the lookup table.
    pub fn create_edge(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        self.get_or_create_edge(a, b)
    }

    /// Renumbers alive vertices and faces densely from zero, preserving
    /// relative order; drops all non-alive entries and all edges (alive or
    /// not — edges are an internal scheduling structure, not part of the
    /// on-disk format).
    pub fn compact(&mut self) {
        let mut new_vertices = Vec::new();
        let mut vertex_remap = HashMap::new();
        for (old_idx, slot) in self.vertices.iter().enumerate() {
            if let Some(v) = slot {
                if v.alive {
                    vertex_remap.insert(old_idx, new_vertices.len());
                    let mut clean = v.clone();
                    clean.edges.clear();
                    clean.faces.clear();
                    new_vertices.push(Some(clean));
                }
            }
        }

        let mut new_faces = Vec::new();
        for slot in self.faces.iter() {
            if let Some(f) = slot {
                if f.alive {
                    let remapped = [
                        VertexId(vertex_remap[&f.vertices[0].0]),
                        VertexId(vertex_remap[&f.vertices[1].0]),
                        VertexId(vertex_remap[&f.vertices[2].0]),
                    ];
                    let mut remapped_face = f.clone();
                    remapped_face.vertices = remapped;
                    new_faces.push(Some(remapped_face));
                }
            }
        }

        self.vertices = new_vertices;
        self.faces = new_faces;
        self.edges.clear();
        self.edge_lookup.clear();
        self.free_vertices.clear();
        self.free_edges.clear();
        self.free_faces.clear();

        // Re-derive vertex->face incidence against the new ids.
        for face_idx in 0..self.faces.len() {
            let vertices = match &self.faces[face_idx] {
                Some(f) => f.vertices,
                None => continue,
            };
            for v in vertices {
                if let Some(vertex) = self.vertices[v.0].as_mut() {
                    vertex.faces.insert(FaceId(face_idx));
                }
            }
        }
    }

    pub fn face_count(&self) -> usize {
        self.face_ids().count()
    }
}
