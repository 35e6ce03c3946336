use crate::error::{MeshError, Result};
use crate::faces::FaceGrid;
use crate::geometry::{cross, dot, sub};
use crate::slice::{
    delinearize, edge_interior_slice, interior_face_slices, linear_index, surface_face_slices,
    surface_interior_slice, surface_slice, FaceSlices, Slice3,
};
use crate::topology::{FaceFrame, QUAD_CORNERS, VERTEX_CORNERS};

/// One structured hexahedral block.
///
/// A block of `n0 x n1 x n2` cells carries `(n0+1) x (n1+1) x (n2+1)` points.
/// Both grids are stored flat in column-major order, axis 0 fastest. Global
/// cell and point IDs start out unassigned; point IDs on shared vertices,
/// edges, and faces are written once through the setters below and may not
/// be overwritten afterwards.
#[derive(Clone, Debug)]
pub struct HexBlock {
    dims: [usize; 3],
    cell_ids: Vec<Option<usize>>,
    point_ids: Vec<Option<usize>>,
    coords: Option<Vec<[f64; 3]>>,
}

impl HexBlock {
    pub fn new(n0: usize, n1: usize, n2: usize) -> Result<Self> {
        let dims = [n0, n1, n2];
        if dims.iter().any(|&n| n == 0) {
            return Err(MeshError::EmptyBlock { dims });
        }
        Ok(Self {
            dims,
            cell_ids: vec![None; n0 * n1 * n2],
            point_ids: vec![None; (n0 + 1) * (n1 + 1) * (n2 + 1)],
            coords: None,
        })
    }

    /// Number of cells along each axis.
    #[inline]
    pub fn cell_dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Number of points along each axis.
    #[inline]
    pub fn point_dims(&self) -> [usize; 3] {
        [self.dims[0] + 1, self.dims[1] + 1, self.dims[2] + 1]
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cell_ids.len()
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.point_ids.len()
    }

    #[inline]
    pub fn cell_id(&self, index: [usize; 3]) -> Option<usize> {
        self.cell_ids[linear_index(self.dims, index)]
    }

    #[inline]
    pub fn point_id(&self, index: [usize; 3]) -> Option<usize> {
        self.point_ids[linear_index(self.point_dims(), index)]
    }

    /// Flat cell IDs in column-major order.
    #[inline]
    pub fn cell_ids(&self) -> &[Option<usize>] {
        &self.cell_ids
    }

    /// Flat point IDs in column-major order.
    #[inline]
    pub fn point_ids(&self) -> &[Option<usize>] {
        &self.point_ids
    }

    /// Flat point coordinates in column-major order.
    pub fn point_coordinates(&self) -> Result<&[[f64; 3]]> {
        self.coords.as_deref().ok_or(MeshError::CoordinatesNotSet)
    }

    /// Number cells consecutively from `start`; returns the next free ID.
    pub fn set_cell_ids(&mut self, start: usize) -> usize {
        for (offset, slot) in self.cell_ids.iter_mut().enumerate() {
            *slot = Some(start + offset);
        }
        start + self.cell_ids.len()
    }

    /// Number the points interior to the block consecutively from `start`;
    /// returns the next free ID.
    pub fn set_internal_point_ids(&mut self, start: usize) -> usize {
        let pdims = self.point_dims();
        let mut id = start;
        for k in 1..self.dims[2] {
            for j in 1..self.dims[1] {
                for i in 1..self.dims[0] {
                    let slot = &mut self.point_ids[linear_index(pdims, [i, j, k])];
                    debug_assert!(slot.is_none());
                    *slot = Some(id);
                    id += 1;
                }
            }
        }
        id
    }

    fn vertex_index(&self, vertex: usize) -> Result<[usize; 3]> {
        if vertex >= 8 {
            return Err(MeshError::InvalidVertex(vertex));
        }
        let pdims = self.point_dims();
        let corners = VERTEX_CORNERS[vertex];
        Ok([
            corners[0].index(pdims[0]),
            corners[1].index(pdims[1]),
            corners[2].index(pdims[2]),
        ])
    }

    pub fn vertex_point_id(&self, vertex: usize) -> Result<Option<usize>> {
        let index = self.vertex_index(vertex)?;
        Ok(self.point_id(index))
    }

    pub fn set_vertex_point_id(&mut self, vertex: usize, id: usize) -> Result<()> {
        let index = self.vertex_index(vertex)?;
        let flat = linear_index(self.point_dims(), index);
        let slot = &mut self.point_ids[flat];
        if let Some(existing) = *slot {
            return Err(MeshError::PointIdAlreadySet {
                site: format!("vertex {vertex}"),
                existing,
            });
        }
        *slot = Some(id);
        Ok(())
    }

    /// Point IDs interior to the edge from `v0` to `v1`, walked v0 -> v1.
    pub fn edge_point_ids(&self, v0: usize, v1: usize) -> Result<Vec<Option<usize>>> {
        let slice = edge_interior_slice(v0, v1)?;
        Ok(slice.gather(self.point_dims(), &self.point_ids))
    }

    pub fn set_edge_point_ids(&mut self, v0: usize, v1: usize, ids: &[usize]) -> Result<()> {
        let slice = edge_interior_slice(v0, v1)?;
        let site = || format!("edge ({v0}, {v1})");
        self.write_point_ids(&slice, ids, "edge interior point IDs", site)
    }

    /// Point IDs interior to a face, with the view shape, in face-frame order.
    pub fn surface_point_ids(&self, face: [usize; 4]) -> Result<([usize; 2], Vec<Option<usize>>)> {
        let slice = surface_interior_slice(face)?;
        let vd = slice.view_dims(self.point_dims());
        Ok(([vd[0], vd[1]], slice.gather(self.point_dims(), &self.point_ids)))
    }

    pub fn set_surface_point_ids(
        &mut self,
        face: [usize; 4],
        dims: [usize; 2],
        ids: &[usize],
    ) -> Result<()> {
        let slice = surface_interior_slice(face)?;
        let vd = slice.view_dims(self.point_dims());
        if [vd[0], vd[1]] != dims {
            return Err(MeshError::GridShapeMismatch {
                expected: [vd[0], vd[1]],
                got: dims,
            });
        }
        let site = || format!("face {face:?} interior");
        self.write_point_ids(&slice, ids, "face interior point IDs", site)
    }

    /// Write-once scatter shared by the edge and face setters: every target
    /// slot is checked before any is written.
    fn write_point_ids(
        &mut self,
        slice: &Slice3,
        ids: &[usize],
        what: &'static str,
        site: impl Fn() -> String,
    ) -> Result<()> {
        let flat = slice.flat_indices(self.point_dims());
        if ids.len() != flat.len() {
            return Err(MeshError::ShapeMismatch {
                what,
                expected: flat.len(),
                got: ids.len(),
            });
        }
        for &slot in flat.iter() {
            if let Some(existing) = self.point_ids[slot] {
                return Err(MeshError::PointIdAlreadySet {
                    site: site(),
                    existing,
                });
            }
        }
        for (&slot, &id) in flat.iter().zip(ids) {
            self.point_ids[slot] = Some(id);
        }
        Ok(())
    }

    /// Shape of the full point grid of a face, in face-frame order.
    pub fn surface_shape(&self, face: [usize; 4]) -> Result<[usize; 2]> {
        let frame = FaceFrame::of(face)?;
        let pdims = self.point_dims();
        Ok([pdims[frame.edge0.axis], pdims[frame.edge1.axis]])
    }

    /// Coordinates of the full point grid of a face, with the view shape, in
    /// face-frame order.
    pub fn surface_point_coordinates(
        &self,
        face: [usize; 4],
    ) -> Result<([usize; 2], Vec<[f64; 3]>)> {
        let coords = self.point_coordinates()?;
        let slice = surface_slice(face)?;
        let vd = slice.view_dims(self.point_dims());
        Ok(([vd[0], vd[1]], slice.gather(self.point_dims(), coords)))
    }

    /// Attach point coordinates. Rejected wholesale if any cell of the
    /// resulting grid is left-handed, so a stored grid is always usable.
    pub fn set_point_coordinates(&mut self, coords: Vec<[f64; 3]>) -> Result<()> {
        if self.coords.is_some() {
            return Err(MeshError::CoordinatesAlreadySet);
        }
        if coords.len() != self.point_ids.len() {
            return Err(MeshError::ShapeMismatch {
                what: "point coordinates",
                expected: self.point_ids.len(),
                got: coords.len(),
            });
        }
        self.check_orientation(&coords)?;
        self.coords = Some(coords);
        Ok(())
    }

    /// Every cell must span a positively oriented frame: the determinant of
    /// the three edge increments out of the cell's origin corner has to be
    /// strictly positive.
    fn check_orientation(&self, coords: &[[f64; 3]]) -> Result<()> {
        let pdims = self.point_dims();
        for k in 0..self.dims[2] {
            for j in 0..self.dims[1] {
                for i in 0..self.dims[0] {
                    let origin = coords[linear_index(pdims, [i, j, k])];
                    let e0 = sub(coords[linear_index(pdims, [i + 1, j, k])], origin);
                    let e1 = sub(coords[linear_index(pdims, [i, j + 1, k])], origin);
                    let e2 = sub(coords[linear_index(pdims, [i, j, k + 1])], origin);
                    let det = dot(e0, cross(e1, e2));
                    // NaN coordinates fail this comparison as well.
                    if !(det > 0.0) {
                        return Err(MeshError::LeftHanded {
                            cell: [i, j, k],
                            det,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// The structured grid of faces lying on one block face, wound outward,
    /// owned by the adjacent cell layer.
    pub fn surface_faces(&self, face: [usize; 4]) -> Result<FaceGrid> {
        let slices = surface_face_slices(face)?;
        self.assemble_faces(&slices)
    }

    /// The three structured grids of faces interior to the block, one per
    /// normal axis, owners on the lower-index side.
    pub fn interior_faces(&self) -> Result<[FaceGrid; 3]> {
        Ok([
            self.assemble_faces(&interior_face_slices(0))?,
            self.assemble_faces(&interior_face_slices(1))?,
            self.assemble_faces(&interior_face_slices(2))?,
        ])
    }

    fn assemble_faces(&self, slices: &FaceSlices) -> Result<FaceGrid> {
        let owner = self.gather_cell_ids(&slices.owner)?;
        let neighbour = match &slices.neighbour {
            Some(slice) => Some(self.gather_cell_ids(slice)?),
            None => None,
        };
        let pdims = self.point_dims();
        let pv_dims = slices.vertices.view_dims(pdims);
        let mut view = Vec::with_capacity(pv_dims[0] * pv_dims[1] * pv_dims[2]);
        for flat in slices.vertices.flat_indices(pdims) {
            view.push(self.point_ids[flat].ok_or(MeshError::PointIdUnassigned {
                index: delinearize(pdims, flat),
            })?);
        }
        let grid_dims = slices.owner.view_dims(self.dims);
        let mut quads = Vec::with_capacity(owner.len());
        for c in 0..grid_dims[2] {
            for b in 0..grid_dims[1] {
                for a in 0..grid_dims[0] {
                    let mut quad = [0usize; 4];
                    for (m, offset) in QUAD_CORNERS.iter().enumerate() {
                        quad[m] = view[linear_index(pv_dims, [a + offset[0], b + offset[1], c])];
                    }
                    quads.push(quad);
                }
            }
        }
        FaceGrid::new(grid_dims, owner, quads, neighbour)
    }

    fn gather_cell_ids(&self, slice: &Slice3) -> Result<Vec<usize>> {
        let mut out = Vec::new();
        for flat in slice.flat_indices(self.dims) {
            out.push(self.cell_ids[flat].ok_or(MeshError::CellIdUnassigned {
                index: delinearize(self.dims, flat),
            })?);
        }
        Ok(out)
    }

    /// Centroid of the eight corner points of every cell, in column-major
    /// cell order.
    pub fn cell_center_coordinates(&self) -> Result<Vec<[f64; 3]>> {
        let coords = self.point_coordinates()?;
        let pdims = self.point_dims();
        let mut centers = Vec::with_capacity(self.cell_ids.len());
        for k in 0..self.dims[2] {
            for j in 0..self.dims[1] {
                for i in 0..self.dims[0] {
                    let mut sum = [0.0f64; 3];
                    for dk in 0..2 {
                        for dj in 0..2 {
                            for di in 0..2 {
                                let p = coords[linear_index(pdims, [i + di, j + dj, k + dk])];
                                sum[0] += p[0];
                                sum[1] += p[1];
                                sum[2] += p[2];
                            }
                        }
                    }
                    centers.push([sum[0] / 8.0, sum[1] / 8.0, sum[2] / 8.0]);
                }
            }
        }
        Ok(centers)
    }
}
