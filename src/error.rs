use thiserror::Error;

/// Fatal validation failures raised while assembling a block mesh.
///
/// None of these are recoverable: the caller is expected to fix the input
/// geometry or topology and rebuild from scratch.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("block dimensions {dims:?} must all be positive")]
    EmptyBlock { dims: [usize; 3] },

    #[error("vertex index {0} is out of range 0..8")]
    InvalidVertex(usize),

    #[error("vertices ({0}, {1}) do not form a hexahedron edge")]
    NotAnEdge(usize, usize),

    #[error("vertices {0:?} do not form a hexahedron face")]
    NotAFace([usize; 4]),

    #[error("a block cannot be connected to itself (block {0})")]
    SameBlock(usize),

    #[error("block index {block} is out of range ({num_blocks} blocks registered)")]
    BlockOutOfRange { block: usize, num_blocks: usize },

    #[error("expected {expected} values for {what}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("face interior grid shape {got:?} does not match the view shape {expected:?}")]
    GridShapeMismatch {
        expected: [usize; 2],
        got: [usize; 2],
    },

    #[error("point ID at {site} is already set to {existing}")]
    PointIdAlreadySet { site: String, existing: usize },

    #[error("point coordinates are already set for this block")]
    CoordinatesAlreadySet,

    #[error("point coordinates have not been set for this block")]
    CoordinatesNotSet,

    #[error("coordinate grid is left-handed at cell {cell:?} (det = {det})")]
    LeftHanded { cell: [usize; 3], det: f64 },

    #[error("face {face:?} of block {block} is already connected")]
    FaceAlreadyConnected { block: usize, face: [usize; 4] },

    #[error(
        "connected faces of blocks {block0} and {block1} have shapes {dims0:?} and {dims1:?}"
    )]
    FaceShapeMismatch {
        block0: usize,
        block1: usize,
        dims0: [usize; 2],
        dims1: [usize; 2],
    },

    #[error(
        "faces of blocks {block0} and {block1} are not coincident at face point {index} \
         (distance {distance})"
    )]
    FacesNotCoincident {
        block0: usize,
        block1: usize,
        index: usize,
        distance: f64,
    },

    #[error(
        "blocks {block0} and {block1} hold conflicting point IDs {id0} and {id1} for a shared {site}"
    )]
    PointIdConflict {
        block0: usize,
        block1: usize,
        id0: usize,
        id1: usize,
        site: String,
    },

    #[error("edge ({v0}, {v1}) of block {block} is only partially assigned")]
    PartialEdgeAssignment { block: usize, v0: usize, v1: usize },

    #[error("face {face:?} interior of block {block} is only partially assigned")]
    PartialFaceAssignment { block: usize, face: [usize; 4] },

    #[error("face {face:?} interior of block {block} is already assigned")]
    FaceInteriorAssigned { block: usize, face: [usize; 4] },

    #[error("interface vertex grids of blocks {block0} and {block1} disagree at face {index}")]
    InterfaceMismatch {
        block0: usize,
        block1: usize,
        index: usize,
    },

    #[error("point IDs have not been assigned yet")]
    IdsNotAssigned,

    #[error("point ID at local index {index:?} is unassigned")]
    PointIdUnassigned { index: [usize; 3] },

    #[error("cell ID at local index {index:?} is unassigned")]
    CellIdUnassigned { index: [usize; 3] },

    #[error("{what} ID {id} is out of range 0..{len}")]
    IdOutOfRange {
        what: &'static str,
        id: usize,
        len: usize,
    },

    #[error("global point {id} was written with disagreeing coordinates from two blocks")]
    PointMismatch { id: usize },

    #[error("global point {id} was never written by any block")]
    PointNotWritten { id: usize },

    #[error("global cell {id} is claimed by two blocks")]
    CellOverlap { id: usize },

    #[error("global cell {id} was never written by any block")]
    CellNotWritten { id: usize },

    #[error("cannot append interior faces to group '{name}' after boundary faces")]
    MixedFaceGroup { name: String },

    #[error("face group '{name}' is missing neighbours for {count} faces")]
    MissingNeighbours { name: String, count: usize },

    #[error("boundary patch '{0}' is defined twice")]
    DuplicatePatch(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;
