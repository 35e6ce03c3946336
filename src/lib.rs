pub mod block;
pub mod collection;
pub mod connection;
pub mod error;
pub mod faces;
mod geometry;
pub mod slice;
pub mod topology;
pub mod write;

pub use block::HexBlock;
pub use collection::BlockMesh;
pub use connection::{Connection, ConnectionRecord, COINCIDENCE_TOL};
pub use error::{MeshError, Result};
pub use faces::{
    check_boundary_faces, check_interior_faces, merge_face_lists, FaceGrid, FaceList,
};
pub use slice::{AxisSpan, Slice3};
pub use topology::{
    canonical_face, edge_between, Corner, EdgeSense, FaceFrame, Sense, EDGES, FACES, FACE_AXES,
    QUAD_CORNERS, VERTEX_CORNERS,
};
pub use write::{organize_face_lists, write_poly_mesh, BoundaryPatch, PatchPrinter};
