use serde::Serialize;

use crate::block::HexBlock;
use crate::error::{MeshError, Result};
use crate::faces::FaceGrid;
use crate::geometry::dist;
use crate::topology::{canonical_face, sorted4, FaceFrame};

/// Connected block faces must agree pointwise to within this distance.
pub const COINCIDENCE_TOL: f64 = 1e-6;

/// A glued pair of block faces.
///
/// The caller names each face by its four vertices, listed so that equal
/// positions in the two lists touch. Internally `face0` is rewound to the
/// canonical outward order of block 0's face and `face1` is the image of
/// that rewinding under the caller's correspondence, so walking both faces
/// in parallel visits coincident points throughout. A correspondence whose
/// image does not follow the edges of block 1's face (a rotation taking a
/// vertex to a diagonal) is rejected on construction.
#[derive(Clone, Debug)]
pub struct Connection {
    block0: usize,
    block1: usize,
    face0: [usize; 4],
    face1: [usize; 4],
}

/// Plain-data description of a [`Connection`], for reports and manifests.
#[derive(Clone, Debug, Serialize)]
pub struct ConnectionRecord {
    pub block0: usize,
    pub block1: usize,
    pub face0: [usize; 4],
    pub face1: [usize; 4],
}

impl Connection {
    pub fn new(
        block0: usize,
        block1: usize,
        face0: [usize; 4],
        face1: [usize; 4],
    ) -> Result<Self> {
        if block0 == block1 {
            return Err(MeshError::SameBlock(block0));
        }
        let canonical0 = canonical_face(face0)?;
        canonical_face(face1)?;
        let mut mapped1 = [0usize; 4];
        for slot in 0..4 {
            let position = face0
                .iter()
                .position(|&v| v == canonical0[slot])
                .ok_or(MeshError::NotAFace(face0))?;
            mapped1[slot] = face1[position];
        }
        FaceFrame::of(mapped1)?;
        Ok(Self {
            block0,
            block1,
            face0: canonical0,
            face1: mapped1,
        })
    }

    #[inline]
    pub fn blocks(&self) -> (usize, usize) {
        (self.block0, self.block1)
    }

    /// Canonical winding of block 0's connected face.
    #[inline]
    pub fn face0(&self) -> [usize; 4] {
        self.face0
    }

    /// Winding of block 1's connected face matching [`Connection::face0`]
    /// positionwise.
    #[inline]
    pub fn face1(&self) -> [usize; 4] {
        self.face1
    }

    /// Whether this connection glues the given face of the given block.
    pub fn involves_face(&self, block: usize, face: [usize; 4]) -> bool {
        let key = sorted4(face);
        (block == self.block0 && sorted4(self.face0) == key)
            || (block == self.block1 && sorted4(self.face1) == key)
    }

    fn check_blocks(&self, num_blocks: usize) -> Result<()> {
        for block in [self.block0, self.block1] {
            if block >= num_blocks {
                return Err(MeshError::BlockOutOfRange { block, num_blocks });
            }
        }
        Ok(())
    }

    /// Verify that the two faces carry the same point grid geometrically.
    pub fn check_coincidence(&self, blocks: &[HexBlock]) -> Result<()> {
        self.check_blocks(blocks.len())?;
        let (dims0, coords0) = blocks[self.block0].surface_point_coordinates(self.face0)?;
        let (dims1, coords1) = blocks[self.block1].surface_point_coordinates(self.face1)?;
        if dims0 != dims1 {
            return Err(MeshError::FaceShapeMismatch {
                block0: self.block0,
                block1: self.block1,
                dims0,
                dims1,
            });
        }
        for (index, (a, b)) in coords0.iter().zip(&coords1).enumerate() {
            let distance = dist(*a, *b);
            if distance > COINCIDENCE_TOL {
                return Err(MeshError::FacesNotCoincident {
                    block0: self.block0,
                    block1: self.block1,
                    index,
                    distance,
                });
            }
        }
        Ok(())
    }

    /// Share point IDs across the four touching vertex pairs, numbering the
    /// unassigned ones from `start`. Returns the next free ID.
    pub fn assign_vertex_point_ids(
        &self,
        blocks: &mut [HexBlock],
        start: usize,
    ) -> Result<usize> {
        self.check_blocks(blocks.len())?;
        let mut id = start;
        for slot in 0..4 {
            let v0 = self.face0[slot];
            let v1 = self.face1[slot];
            let id0 = blocks[self.block0].vertex_point_id(v0)?;
            let id1 = blocks[self.block1].vertex_point_id(v1)?;
            match (id0, id1) {
                (None, None) => {
                    blocks[self.block0].set_vertex_point_id(v0, id)?;
                    blocks[self.block1].set_vertex_point_id(v1, id)?;
                    id += 1;
                }
                (Some(existing), None) => {
                    blocks[self.block1].set_vertex_point_id(v1, existing)?;
                }
                (None, Some(existing)) => {
                    blocks[self.block0].set_vertex_point_id(v0, existing)?;
                }
                (Some(a), Some(b)) => {
                    if a != b {
                        return Err(MeshError::PointIdConflict {
                            block0: self.block0,
                            block1: self.block1,
                            id0: a,
                            id1: b,
                            site: format!("vertex pair ({v0}, {v1})"),
                        });
                    }
                }
            }
        }
        Ok(id)
    }

    /// Share point IDs across the four touching edge interiors, numbering
    /// the unassigned ones from `start`. Returns the next free ID.
    ///
    /// A touching edge pair must be either fully assigned on a side or fully
    /// unassigned there; a half-written edge means the vertex passes were
    /// skipped or interleaved and the numbering is unusable.
    pub fn assign_edge_point_ids(&self, blocks: &mut [HexBlock], start: usize) -> Result<usize> {
        self.check_blocks(blocks.len())?;
        let mut id = start;
        for slot in 0..4 {
            let (a0, a1) = (self.face0[slot], self.face0[(slot + 1) % 4]);
            let (b0, b1) = (self.face1[slot], self.face1[(slot + 1) % 4]);
            let ids0 = blocks[self.block0].edge_point_ids(a0, a1)?;
            let ids1 = blocks[self.block1].edge_point_ids(b0, b1)?;
            if ids0.len() != ids1.len() {
                return Err(MeshError::ShapeMismatch {
                    what: "connected edge interiors",
                    expected: ids0.len(),
                    got: ids1.len(),
                });
            }
            if ids0.is_empty() {
                continue;
            }
            match (classify(&ids0), classify(&ids1)) {
                (EdgeState::Mixed, _) => {
                    return Err(MeshError::PartialEdgeAssignment {
                        block: self.block0,
                        v0: a0,
                        v1: a1,
                    });
                }
                (_, EdgeState::Mixed) => {
                    return Err(MeshError::PartialEdgeAssignment {
                        block: self.block1,
                        v0: b0,
                        v1: b1,
                    });
                }
                (EdgeState::Unset, EdgeState::Unset) => {
                    let fresh: Vec<usize> = (id..id + ids0.len()).collect();
                    blocks[self.block0].set_edge_point_ids(a0, a1, &fresh)?;
                    blocks[self.block1].set_edge_point_ids(b0, b1, &fresh)?;
                    id += fresh.len();
                }
                (EdgeState::Set(existing), EdgeState::Unset) => {
                    blocks[self.block1].set_edge_point_ids(b0, b1, &existing)?;
                }
                (EdgeState::Unset, EdgeState::Set(existing)) => {
                    blocks[self.block0].set_edge_point_ids(a0, a1, &existing)?;
                }
                (EdgeState::Set(set0), EdgeState::Set(set1)) => {
                    for (&x, &y) in set0.iter().zip(&set1) {
                        if x != y {
                            return Err(MeshError::PointIdConflict {
                                block0: self.block0,
                                block1: self.block1,
                                id0: x,
                                id1: y,
                                site: format!("edge pair ({a0}, {a1}) / ({b0}, {b1})"),
                            });
                        }
                    }
                }
            }
        }
        Ok(id)
    }

    /// Number both face interiors with one fresh ID grid starting at
    /// `start`. Returns the next free ID.
    ///
    /// Face interiors belong to exactly one connection, so any existing
    /// assignment means the face was glued twice.
    pub fn assign_face_point_ids(&self, blocks: &mut [HexBlock], start: usize) -> Result<usize> {
        self.check_blocks(blocks.len())?;
        let (dims0, ids0) = blocks[self.block0].surface_point_ids(self.face0)?;
        let (dims1, ids1) = blocks[self.block1].surface_point_ids(self.face1)?;
        if dims0 != dims1 {
            return Err(MeshError::FaceShapeMismatch {
                block0: self.block0,
                block1: self.block1,
                dims0,
                dims1,
            });
        }
        if ids0.iter().any(|id| id.is_some()) {
            return Err(MeshError::FaceInteriorAssigned {
                block: self.block0,
                face: self.face0,
            });
        }
        if ids1.iter().any(|id| id.is_some()) {
            return Err(MeshError::FaceInteriorAssigned {
                block: self.block1,
                face: self.face1,
            });
        }
        if ids0.is_empty() {
            return Ok(start);
        }
        let fresh: Vec<usize> = (start..start + ids0.len()).collect();
        blocks[self.block0].set_surface_point_ids(self.face0, dims0, &fresh)?;
        blocks[self.block1].set_surface_point_ids(self.face1, dims1, &fresh)?;
        Ok(start + fresh.len())
    }

    /// The interface as one structured face grid: block 0's surface faces,
    /// wound block 0 -> block 1, with block 1's touching cells attached as
    /// neighbours.
    pub fn interface_faces(&self, blocks: &[HexBlock]) -> Result<FaceGrid> {
        self.check_blocks(blocks.len())?;
        let mut grid0 = blocks[self.block0].surface_faces(self.face0)?;
        let grid1 = blocks[self.block1].surface_faces(self.face1)?;
        if grid0.dims() != grid1.dims() {
            let d0 = grid0.dims();
            let d1 = grid1.dims();
            return Err(MeshError::FaceShapeMismatch {
                block0: self.block0,
                block1: self.block1,
                dims0: [d0[0], d0[1]],
                dims1: [d1[0], d1[1]],
            });
        }
        for (index, (q0, q1)) in grid0.vertices().iter().zip(grid1.vertices()).enumerate() {
            if q0 != q1 {
                return Err(MeshError::InterfaceMismatch {
                    block0: self.block0,
                    block1: self.block1,
                    index,
                });
            }
        }
        grid0.set_neighbour(grid1.owner().to_vec())?;
        Ok(grid0)
    }

    pub fn record(&self) -> ConnectionRecord {
        ConnectionRecord {
            block0: self.block0,
            block1: self.block1,
            face0: self.face0,
            face1: self.face1,
        }
    }
}

enum EdgeState {
    Unset,
    Set(Vec<usize>),
    Mixed,
}

fn classify(ids: &[Option<usize>]) -> EdgeState {
    let set: Vec<usize> = ids.iter().copied().flatten().collect();
    if set.is_empty() {
        EdgeState::Unset
    } else if set.len() == ids.len() {
        EdgeState::Set(set)
    } else {
        EdgeState::Mixed
    }
}
