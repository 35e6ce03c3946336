use crate::error::{MeshError, Result};
use crate::geometry::{cross, dot, sub};
use crate::slice::linear_index;

/// A structured grid of quadrilateral faces.
///
/// Owner cells sit on the side the face normal points away from; the
/// optional neighbour grid holds the far-side cells of interior faces.
/// Storage is flat column-major over `dims`, so the flattened accessors
/// preserve the association between owner, vertices, and neighbour at every
/// logical position.
#[derive(Clone, Debug)]
pub struct FaceGrid {
    dims: [usize; 3],
    owner: Vec<usize>,
    neighbour: Option<Vec<usize>>,
    vertices: Vec<[usize; 4]>,
}

impl FaceGrid {
    pub fn new(
        dims: [usize; 3],
        owner: Vec<usize>,
        vertices: Vec<[usize; 4]>,
        neighbour: Option<Vec<usize>>,
    ) -> Result<Self> {
        let n = dims[0] * dims[1] * dims[2];
        if owner.len() != n {
            return Err(MeshError::ShapeMismatch {
                what: "face grid owners",
                expected: n,
                got: owner.len(),
            });
        }
        if vertices.len() != n {
            return Err(MeshError::ShapeMismatch {
                what: "face grid vertex quads",
                expected: n,
                got: vertices.len(),
            });
        }
        if let Some(nb) = &neighbour {
            if nb.len() != n {
                return Err(MeshError::ShapeMismatch {
                    what: "face grid neighbours",
                    expected: n,
                    got: nb.len(),
                });
            }
        }
        Ok(Self {
            dims,
            owner,
            neighbour,
            vertices,
        })
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.owner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }

    #[inline]
    pub fn has_neighbours(&self) -> bool {
        self.neighbour.is_some()
    }

    #[inline]
    pub fn owner_at(&self, index: [usize; 3]) -> usize {
        self.owner[linear_index(self.dims, index)]
    }

    #[inline]
    pub fn neighbour_at(&self, index: [usize; 3]) -> Option<usize> {
        self.neighbour
            .as_ref()
            .map(|nb| nb[linear_index(self.dims, index)])
    }

    #[inline]
    pub fn vertices_at(&self, index: [usize; 3]) -> [usize; 4] {
        self.vertices[linear_index(self.dims, index)]
    }

    /// Flattened owners, in column-major grid order.
    #[inline]
    pub fn owner(&self) -> &[usize] {
        &self.owner
    }

    /// Flattened neighbours, if present.
    #[inline]
    pub fn neighbour(&self) -> Option<&[usize]> {
        self.neighbour.as_deref()
    }

    /// Flattened vertex quads, in column-major grid order.
    #[inline]
    pub fn vertices(&self) -> &[[usize; 4]] {
        &self.vertices
    }

    /// Attach the far-side cell grid; used when pairing coincident surfaces.
    pub fn set_neighbour(&mut self, neighbour: Vec<usize>) -> Result<()> {
        if neighbour.len() != self.owner.len() {
            return Err(MeshError::ShapeMismatch {
                what: "face grid neighbours",
                expected: self.owner.len(),
                got: neighbour.len(),
            });
        }
        self.neighbour = Some(neighbour);
        Ok(())
    }
}

/// A named flat group of faces.
///
/// Interior faces (those with a neighbour) always form the leading run of
/// the group; once a boundary face has been appended no further interior
/// faces are accepted, which keeps the neighbour array an aligned prefix of
/// the owner array.
#[derive(Clone, Debug, Default)]
pub struct FaceList {
    name: String,
    owner: Vec<usize>,
    neighbour: Vec<usize>,
    vertices: Vec<[usize; 4]>,
}

impl FaceList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: Vec::new(),
            neighbour: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Build a group from raw arrays; the neighbour array covers the leading
    /// owners.
    pub fn from_parts(
        name: impl Into<String>,
        owner: Vec<usize>,
        neighbour: Vec<usize>,
        vertices: Vec<[usize; 4]>,
    ) -> Result<Self> {
        if vertices.len() != owner.len() {
            return Err(MeshError::ShapeMismatch {
                what: "face list vertex quads",
                expected: owner.len(),
                got: vertices.len(),
            });
        }
        if neighbour.len() > owner.len() {
            return Err(MeshError::ShapeMismatch {
                what: "face list neighbours",
                expected: owner.len(),
                got: neighbour.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            owner,
            neighbour,
            vertices,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.owner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }

    /// Number of faces with a neighbour.
    #[inline]
    pub fn num_interior(&self) -> usize {
        self.neighbour.len()
    }

    #[inline]
    pub fn owner(&self) -> &[usize] {
        &self.owner
    }

    #[inline]
    pub fn neighbour(&self) -> &[usize] {
        &self.neighbour
    }

    #[inline]
    pub fn vertices(&self) -> &[[usize; 4]] {
        &self.vertices
    }

    /// A non-empty group made of owner-only faces.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.owner.is_empty() && self.neighbour.is_empty()
    }

    /// Append a flattened grid. Interior faces cannot follow boundary faces.
    pub fn push_grid(&mut self, grid: &FaceGrid) -> Result<()> {
        if grid.has_neighbours() && self.owner.len() > self.neighbour.len() {
            return Err(MeshError::MixedFaceGroup {
                name: self.name.clone(),
            });
        }
        self.owner.extend_from_slice(grid.owner());
        if let Some(nb) = grid.neighbour() {
            self.neighbour.extend_from_slice(nb);
        }
        self.vertices.extend_from_slice(grid.vertices());
        Ok(())
    }

    /// Append another flat group under the same ordering rule.
    pub fn push_list(&mut self, list: &FaceList) -> Result<()> {
        if list.num_interior() > 0 && self.owner.len() > self.neighbour.len() {
            return Err(MeshError::MixedFaceGroup {
                name: self.name.clone(),
            });
        }
        self.owner.extend_from_slice(&list.owner);
        self.neighbour.extend_from_slice(&list.neighbour);
        self.vertices.extend_from_slice(&list.vertices);
        Ok(())
    }
}

/// Concatenate groups into one; groups carrying interior faces must come
/// before boundary-only groups.
pub fn merge_face_lists<'a>(
    name: impl Into<String>,
    lists: impl IntoIterator<Item = &'a FaceList>,
) -> Result<FaceList> {
    let mut merged = FaceList::new(name);
    for list in lists {
        merged.push_list(list)?;
    }
    Ok(merged)
}

/// Verify the owner -> neighbour orientation of every face in an interior
/// group: the face normal (right-hand rule over the first three vertices)
/// must point from the owner cell toward the neighbour cell.
pub fn check_interior_faces(
    list: &FaceList,
    points: &[[f64; 3]],
    cell_centers: &[[f64; 3]],
) -> Result<bool> {
    if list.num_interior() != list.len() {
        return Err(MeshError::MissingNeighbours {
            name: list.name().to_string(),
            count: list.len() - list.num_interior(),
        });
    }
    for t in 0..list.len() {
        let normal = face_normal(list.vertices()[t], points)?;
        let owner = cell_center(cell_centers, list.owner()[t])?;
        let neighbour = cell_center(cell_centers, list.neighbour()[t])?;
        if dot(normal, sub(neighbour, owner)) <= 0.0 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Verify the outward orientation of every face in a group using only the
/// owner cell: the face normal must point from the owner cell center toward
/// the face's own centroid.
pub fn check_boundary_faces(
    list: &FaceList,
    points: &[[f64; 3]],
    cell_centers: &[[f64; 3]],
) -> Result<bool> {
    for t in 0..list.len() {
        let quad = list.vertices()[t];
        let normal = face_normal(quad, points)?;
        let owner = cell_center(cell_centers, list.owner()[t])?;
        let mut centroid = [0.0f64; 3];
        for &v in quad.iter() {
            let p = point(points, v)?;
            centroid[0] += p[0];
            centroid[1] += p[1];
            centroid[2] += p[2];
        }
        centroid = [centroid[0] / 4.0, centroid[1] / 4.0, centroid[2] / 4.0];
        if dot(normal, sub(centroid, owner)) <= 0.0 {
            return Ok(false);
        }
    }
    Ok(true)
}

fn face_normal(quad: [usize; 4], points: &[[f64; 3]]) -> Result<[f64; 3]> {
    let p0 = point(points, quad[0])?;
    let p1 = point(points, quad[1])?;
    let p2 = point(points, quad[2])?;
    // The fourth vertex does not enter the normal but must still resolve.
    point(points, quad[3])?;
    Ok(cross(sub(p1, p0), sub(p2, p1)))
}

fn point(points: &[[f64; 3]], id: usize) -> Result<[f64; 3]> {
    points.get(id).copied().ok_or(MeshError::IdOutOfRange {
        what: "point",
        id,
        len: points.len(),
    })
}

fn cell_center(cell_centers: &[[f64; 3]], id: usize) -> Result<[f64; 3]> {
    cell_centers
        .get(id)
        .copied()
        .ok_or(MeshError::IdOutOfRange {
            what: "cell",
            id,
            len: cell_centers.len(),
        })
}
