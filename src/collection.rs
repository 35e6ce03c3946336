use crate::block::HexBlock;
use crate::connection::{Connection, ConnectionRecord, COINCIDENCE_TOL};
use crate::error::{MeshError, Result};
use crate::faces::FaceList;
use crate::geometry::dist;
use crate::slice::delinearize;
use crate::topology::{EDGES, FACES};

/// A collection of hexahedral blocks glued along coincident faces.
///
/// Blocks are registered first, then connected, then numbered: cell IDs are
/// handed out per block, and point IDs in shared-before-private order so
/// every coincident point across a connection gets exactly one global ID.
/// After numbering, the collection can emit its global point and cell
/// coordinate tables and its faces grouped into one interior group plus one
/// boundary group per unconnected block face.
#[derive(Clone, Debug, Default)]
pub struct BlockMesh {
    blocks: Vec<HexBlock>,
    connections: Vec<Connection>,
    num_points: Option<usize>,
    num_cells: Option<usize>,
}

impl BlockMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block and return its index.
    pub fn add_block(&mut self, block: HexBlock) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, index: usize) -> Result<&HexBlock> {
        self.blocks.get(index).ok_or(MeshError::BlockOutOfRange {
            block: index,
            num_blocks: self.blocks.len(),
        })
    }

    #[inline]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection_records(&self) -> Vec<ConnectionRecord> {
        self.connections.iter().map(Connection::record).collect()
    }

    /// Total point count, available once point IDs are assigned.
    #[inline]
    pub fn num_points(&self) -> Option<usize> {
        self.num_points
    }

    /// Total cell count, available once cell IDs are assigned.
    #[inline]
    pub fn num_cells(&self) -> Option<usize> {
        self.num_cells
    }

    /// Whether some connection already glues the given face of the block.
    pub fn is_face_connected(&self, block: usize, face: [usize; 4]) -> bool {
        self.connections
            .iter()
            .any(|connection| connection.involves_face(block, face))
    }

    /// Glue `face0` of `block0` to `face1` of `block1`.
    ///
    /// The face lists pair up positionwise, as in [`Connection::new`]. Both
    /// blocks must already carry coordinates; the glued point grids are
    /// checked for coincidence before the connection is accepted.
    pub fn connect(
        &mut self,
        block0: usize,
        block1: usize,
        face0: [usize; 4],
        face1: [usize; 4],
    ) -> Result<()> {
        for block in [block0, block1] {
            if block >= self.blocks.len() {
                return Err(MeshError::BlockOutOfRange {
                    block,
                    num_blocks: self.blocks.len(),
                });
            }
        }
        let connection = Connection::new(block0, block1, face0, face1)?;
        if self.is_face_connected(block0, connection.face0()) {
            return Err(MeshError::FaceAlreadyConnected {
                block: block0,
                face: connection.face0(),
            });
        }
        if self.is_face_connected(block1, connection.face1()) {
            return Err(MeshError::FaceAlreadyConnected {
                block: block1,
                face: connection.face1(),
            });
        }
        connection.check_coincidence(&self.blocks)?;
        self.connections.push(connection);
        Ok(())
    }

    /// Number every cell of every block consecutively from `start`, block by
    /// block in registration order. Returns the next free ID.
    pub fn assign_cell_ids(&mut self, start: usize) -> usize {
        let mut id = start;
        for block in &mut self.blocks {
            id = block.set_cell_ids(id);
        }
        self.num_cells = Some(id - start);
        id
    }

    /// Number every point of every block from `start`, sharing IDs across
    /// connections. Returns the next free ID.
    ///
    /// Sites are numbered from most to least shared: connected vertices,
    /// remaining vertices, connected edge interiors, remaining edge
    /// interiors, connected face interiors, remaining face interiors, and
    /// finally block interiors. Each pass completes over all blocks before
    /// the next begins, so a site shared by several connections is always
    /// propagated, never renumbered.
    pub fn assign_point_ids(&mut self, start: usize) -> Result<usize> {
        let mut id = start;

        for c in 0..self.connections.len() {
            id = self.connections[c].assign_vertex_point_ids(&mut self.blocks, id)?;
        }
        for block in &mut self.blocks {
            for vertex in 0..8 {
                if block.vertex_point_id(vertex)?.is_none() {
                    block.set_vertex_point_id(vertex, id)?;
                    id += 1;
                }
            }
        }

        for c in 0..self.connections.len() {
            id = self.connections[c].assign_edge_point_ids(&mut self.blocks, id)?;
        }
        for (b, block) in self.blocks.iter_mut().enumerate() {
            for &(v0, v1, _) in EDGES.iter() {
                let ids = block.edge_point_ids(v0, v1)?;
                let assigned = ids.iter().filter(|id| id.is_some()).count();
                if assigned == ids.len() {
                    continue;
                }
                if assigned > 0 {
                    return Err(MeshError::PartialEdgeAssignment { block: b, v0, v1 });
                }
                let fresh: Vec<usize> = (id..id + ids.len()).collect();
                block.set_edge_point_ids(v0, v1, &fresh)?;
                id += fresh.len();
            }
        }

        for c in 0..self.connections.len() {
            id = self.connections[c].assign_face_point_ids(&mut self.blocks, id)?;
        }
        for (b, block) in self.blocks.iter_mut().enumerate() {
            for &face in FACES.iter() {
                let (dims, ids) = block.surface_point_ids(face)?;
                let assigned = ids.iter().filter(|id| id.is_some()).count();
                if assigned == ids.len() {
                    continue;
                }
                if assigned > 0 {
                    return Err(MeshError::PartialFaceAssignment { block: b, face });
                }
                let fresh: Vec<usize> = (id..id + ids.len()).collect();
                block.set_surface_point_ids(face, dims, &fresh)?;
                id += fresh.len();
            }
        }

        for block in &mut self.blocks {
            id = block.set_internal_point_ids(id);
        }
        self.num_points = Some(id - start);
        Ok(id)
    }

    /// Every face of the mesh, grouped: one `interior` group holding all
    /// connection interfaces and in-block faces, then one boundary group per
    /// unconnected block face.
    pub fn faces(&self) -> Result<Vec<FaceList>> {
        let mut lists = Vec::new();
        let mut interior = FaceList::new("interior");
        for connection in &self.connections {
            interior.push_grid(&connection.interface_faces(&self.blocks)?)?;
        }
        for block in &self.blocks {
            for grid in block.interior_faces()? {
                interior.push_grid(&grid)?;
            }
        }
        lists.push(interior);
        for (b, block) in self.blocks.iter().enumerate() {
            for &face in FACES.iter() {
                if self.is_face_connected(b, face) {
                    continue;
                }
                let mut list = FaceList::new(boundary_face_name(b, face));
                list.push_grid(&block.surface_faces(face)?)?;
                lists.push(list);
            }
        }
        Ok(lists)
    }

    /// The global point coordinate table, indexed by global point ID.
    ///
    /// Every block writes its points through its ID grid; a point shared by
    /// several blocks must land on the same coordinates each time, and every
    /// global ID must be written by someone.
    pub fn points(&self) -> Result<Vec<[f64; 3]>> {
        let count = self.num_points.ok_or(MeshError::IdsNotAssigned)?;
        let mut table: Vec<Option<[f64; 3]>> = vec![None; count];
        for block in &self.blocks {
            let coords = block.point_coordinates()?;
            let pdims = block.point_dims();
            for (slot, (id, p)) in block.point_ids().iter().zip(coords).enumerate() {
                let id = id.ok_or(MeshError::PointIdUnassigned {
                    index: delinearize(pdims, slot),
                })?;
                if id >= count {
                    return Err(MeshError::IdOutOfRange {
                        what: "point",
                        id,
                        len: count,
                    });
                }
                match table[id] {
                    None => table[id] = Some(*p),
                    Some(existing) => {
                        if dist(existing, *p) > COINCIDENCE_TOL {
                            return Err(MeshError::PointMismatch { id });
                        }
                    }
                }
            }
        }
        let mut points = Vec::with_capacity(count);
        for (id, slot) in table.into_iter().enumerate() {
            points.push(slot.ok_or(MeshError::PointNotWritten { id })?);
        }
        Ok(points)
    }

    /// The global cell centroid table, indexed by global cell ID. Unlike
    /// points, a cell belongs to exactly one block.
    pub fn cell_centers(&self) -> Result<Vec<[f64; 3]>> {
        let count = self.num_cells.ok_or(MeshError::IdsNotAssigned)?;
        let mut table: Vec<Option<[f64; 3]>> = vec![None; count];
        for block in &self.blocks {
            let centers = block.cell_center_coordinates()?;
            let cdims = block.cell_dims();
            for (slot, (id, center)) in block.cell_ids().iter().zip(&centers).enumerate() {
                let id = id.ok_or(MeshError::CellIdUnassigned {
                    index: delinearize(cdims, slot),
                })?;
                if id >= count {
                    return Err(MeshError::IdOutOfRange {
                        what: "cell",
                        id,
                        len: count,
                    });
                }
                if table[id].is_some() {
                    return Err(MeshError::CellOverlap { id });
                }
                table[id] = Some(*center);
            }
        }
        let mut centers = Vec::with_capacity(count);
        for (id, slot) in table.into_iter().enumerate() {
            centers.push(slot.ok_or(MeshError::CellNotWritten { id })?);
        }
        Ok(centers)
    }
}

fn boundary_face_name(block: usize, face: [usize; 4]) -> String {
    format!(
        "block{}_face_{}{}{}{}",
        block, face[0], face[1], face[2], face[3]
    )
}
