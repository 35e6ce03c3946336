//! Canonical hexahedron topology.
//!
//! The tables below use the OpenFOAM hex numbering and are the single source
//! of truth for every geometric computation in the crate: which corner each
//! vertex sits on, which axis each edge runs along, how each face is wound so
//! its normal points outward, and which in-plane axis pair belongs to each
//! face-normal axis.

use crate::error::{MeshError, Result};

/// Which end of an axis a vertex sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Corner {
    First,
    Last,
}

impl Corner {
    /// Concrete index on an axis of the given length.
    #[inline]
    pub fn index(self, len: usize) -> usize {
        match self {
            Corner::First => 0,
            Corner::Last => len - 1,
        }
    }
}

/// Traversal direction along an axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sense {
    Forward,
    Backward,
}

/// Corner of each canonical vertex along the three logical axes.
pub const VERTEX_CORNERS: [[Corner; 3]; 8] = {
    use Corner::{First as F, Last as L};
    [
        [F, F, F],
        [L, F, F],
        [L, L, F],
        [F, L, F],
        [F, F, L],
        [L, F, L],
        [L, L, L],
        [F, L, L],
    ]
};

/// The twelve edges as `(v0, v1, axis)`, with `v0 -> v1` ascending along `axis`.
pub const EDGES: [(usize, usize, usize); 12] = [
    (0, 1, 0),
    (3, 2, 0),
    (7, 6, 0),
    (4, 5, 0),
    (0, 3, 1),
    (1, 2, 1),
    (5, 6, 1),
    (4, 7, 1),
    (0, 4, 2),
    (1, 5, 2),
    (2, 6, 2),
    (3, 7, 2),
];

/// The six faces as outward-wound vertex quads.
pub const FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 4, 7, 3],
    [1, 2, 6, 5],
];

/// In-plane axes per face-normal axis; cross(first, second) points along +normal.
pub const FACE_AXES: [[usize; 2]; 3] = [[1, 2], [2, 0], [0, 1]];

/// Offsets from a face-grid position to its four wound corner points.
pub const QUAD_CORNERS: [[usize; 2]; 4] = [[0, 0], [1, 0], [1, 1], [0, 1]];

/// Axis and direction of the edge joining two vertices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EdgeSense {
    pub axis: usize,
    pub sense: Sense,
}

/// Look up the edge from `v0` to `v1`.
///
/// A literal table match walks the edge ascending, a reversed match
/// descending, so the result is always oriented from `v0` toward `v1`.
pub fn edge_between(v0: usize, v1: usize) -> Result<EdgeSense> {
    for &(a, b, axis) in EDGES.iter() {
        if (a, b) == (v0, v1) {
            return Ok(EdgeSense {
                axis,
                sense: Sense::Forward,
            });
        }
        if (a, b) == (v1, v0) {
            return Ok(EdgeSense {
                axis,
                sense: Sense::Backward,
            });
        }
    }
    Err(MeshError::NotAnEdge(v0, v1))
}

/// In-plane walk and constant axis of a face traversal `(v0, v1, v2, v3)`.
#[derive(Copy, Clone, Debug)]
pub struct FaceFrame {
    /// Edge from v0 to v1; first in-plane view axis.
    pub edge0: EdgeSense,
    /// Edge from v1 to v2; second in-plane view axis.
    pub edge1: EdgeSense,
    /// The axis held constant across the face.
    pub normal_axis: usize,
    /// Which end of the normal axis the face sits on.
    pub corner: Corner,
}

impl FaceFrame {
    pub fn of(face: [usize; 4]) -> Result<Self> {
        let edge0 = edge_between(face[0], face[1])?;
        let edge1 = edge_between(face[1], face[2])?;
        if edge0.axis == edge1.axis {
            return Err(MeshError::NotAFace(face));
        }
        let normal_axis = 3 - edge0.axis - edge1.axis;
        let corner = VERTEX_CORNERS[face[0]][normal_axis];
        for &v in face.iter() {
            if VERTEX_CORNERS[v][normal_axis] != corner {
                return Err(MeshError::NotAFace(face));
            }
        }
        Ok(Self {
            edge0,
            edge1,
            normal_axis,
            corner,
        })
    }
}

/// Canonical outward winding of the face containing exactly these vertices.
pub fn canonical_face(vertices: [usize; 4]) -> Result<[usize; 4]> {
    let key = sorted4(vertices);
    for &face in FACES.iter() {
        if sorted4(face) == key {
            return Ok(face);
        }
    }
    Err(MeshError::NotAFace(vertices))
}

pub(crate) fn sorted4(vertices: [usize; 4]) -> [usize; 4] {
    let mut s = vertices;
    s.sort_unstable();
    s
}
