//! Axis-permuting views over dense column-major 3D arrays.
//!
//! Every dense array in this crate is a flat `Vec` in column-major order:
//! the first logical axis varies fastest. A [`Slice3`] names a permutation
//! of the three storage axes plus one [`AxisSpan`] per view axis, and
//! materializes to the flat storage indices of the selected sub-array, so
//! callers read and write through index lists instead of aliased views.
//!
//! The builders at the bottom translate hexahedron vertex tuples into the
//! slices used for edge interiors, face grids, and structured face sets.

use crate::error::Result;
use crate::topology::{edge_between, Corner, FaceFrame, Sense, FACE_AXES, VERTEX_CORNERS};

/// Flat index of `index` in a column-major array of the given shape.
#[inline]
pub fn linear_index(shape: [usize; 3], index: [usize; 3]) -> usize {
    debug_assert!(index[0] < shape[0] && index[1] < shape[1] && index[2] < shape[2]);
    (index[2] * shape[1] + index[1]) * shape[0] + index[0]
}

/// Inverse of [`linear_index`].
#[inline]
pub(crate) fn delinearize(shape: [usize; 3], flat: usize) -> [usize; 3] {
    [
        flat % shape[0],
        (flat / shape[0]) % shape[1],
        flat / (shape[0] * shape[1]),
    ]
}

/// Index selection along one axis of a [`Slice3`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AxisSpan {
    /// A single plane at one end of the axis; collapses the axis.
    At(Corner),
    /// Every index, in the given direction.
    Full(Sense),
    /// Indices `1..len-1`, in the given direction.
    Interior(Sense),
    /// Indices `0..len-1`, ascending.
    DropLast,
    /// Indices `1..len`, ascending.
    DropFirst,
}

impl AxisSpan {
    /// Resolved index sequence for an axis of the given length.
    pub fn indices(self, len: usize) -> Vec<usize> {
        match self {
            AxisSpan::At(corner) => vec![corner.index(len)],
            AxisSpan::Full(Sense::Forward) => (0..len).collect(),
            AxisSpan::Full(Sense::Backward) => (0..len).rev().collect(),
            AxisSpan::Interior(Sense::Forward) => (1..len.saturating_sub(1)).collect(),
            AxisSpan::Interior(Sense::Backward) => (1..len.saturating_sub(1)).rev().collect(),
            AxisSpan::DropLast => (0..len.saturating_sub(1)).collect(),
            AxisSpan::DropFirst => (1..len).collect(),
        }
    }

    /// Number of selected indices without materializing them.
    pub fn len(self, len: usize) -> usize {
        match self {
            AxisSpan::At(_) => 1,
            AxisSpan::Full(_) => len,
            AxisSpan::Interior(_) => len.saturating_sub(2),
            AxisSpan::DropLast | AxisSpan::DropFirst => len.saturating_sub(1),
        }
    }
}

/// A permuted, per-axis-sliced selection of a dense 3D array.
///
/// `axes[i]` is the storage axis appearing at view position `i`. The view is
/// enumerated in column-major view order, view axis 0 fastest.
#[derive(Clone, Debug)]
pub struct Slice3 {
    pub axes: [usize; 3],
    pub spans: [AxisSpan; 3],
}

impl Slice3 {
    pub fn new(axes: [usize; 3], spans: [AxisSpan; 3]) -> Self {
        let mut seen = [false; 3];
        for &axis in axes.iter() {
            assert!(axis < 3 && !seen[axis], "axes must be a permutation of 0..3");
            seen[axis] = true;
        }
        Self { axes, spans }
    }

    /// Extent of each view axis for a backing array of `shape`.
    pub fn view_dims(&self, shape: [usize; 3]) -> [usize; 3] {
        [
            self.spans[0].len(shape[self.axes[0]]),
            self.spans[1].len(shape[self.axes[1]]),
            self.spans[2].len(shape[self.axes[2]]),
        ]
    }

    /// Flat storage indices of the view, in column-major view order.
    pub fn flat_indices(&self, shape: [usize; 3]) -> Vec<usize> {
        let i0 = self.spans[0].indices(shape[self.axes[0]]);
        let i1 = self.spans[1].indices(shape[self.axes[1]]);
        let i2 = self.spans[2].indices(shape[self.axes[2]]);
        let mut out = Vec::with_capacity(i0.len() * i1.len() * i2.len());
        let mut index = [0usize; 3];
        for &c in &i2 {
            index[self.axes[2]] = c;
            for &b in &i1 {
                index[self.axes[1]] = b;
                for &a in &i0 {
                    index[self.axes[0]] = a;
                    out.push(linear_index(shape, index));
                }
            }
        }
        out
    }

    /// Copy of the selected values, in view order.
    pub fn gather<T: Copy>(&self, shape: [usize; 3], data: &[T]) -> Vec<T> {
        self.flat_indices(shape).iter().map(|&i| data[i]).collect()
    }

    /// Write `values` through the view, in view order.
    pub fn scatter<T: Copy>(&self, shape: [usize; 3], data: &mut [T], values: &[T]) {
        let indices = self.flat_indices(shape);
        assert_eq!(indices.len(), values.len());
        for (&i, &v) in indices.iter().zip(values) {
            data[i] = v;
        }
    }
}

/// Interior points of the edge from `v0` to `v1`, oriented v0 -> v1.
pub fn edge_interior_slice(v0: usize, v1: usize) -> Result<Slice3> {
    let edge = edge_between(v0, v1)?;
    let [lo, hi] = other_axes(edge.axis);
    let corners = VERTEX_CORNERS[v0];
    Ok(Slice3::new(
        [edge.axis, lo, hi],
        [
            AxisSpan::Interior(edge.sense),
            AxisSpan::At(corners[lo]),
            AxisSpan::At(corners[hi]),
        ],
    ))
}

/// Full point grid of a face, in face-frame order.
pub fn surface_slice(face: [usize; 4]) -> Result<Slice3> {
    let frame = FaceFrame::of(face)?;
    Ok(Slice3::new(
        frame_axes(&frame),
        [
            AxisSpan::Full(frame.edge0.sense),
            AxisSpan::Full(frame.edge1.sense),
            AxisSpan::At(frame.corner),
        ],
    ))
}

/// Interior point grid of a face, vertices and edges excluded.
pub fn surface_interior_slice(face: [usize; 4]) -> Result<Slice3> {
    let frame = FaceFrame::of(face)?;
    Ok(Slice3::new(
        frame_axes(&frame),
        [
            AxisSpan::Interior(frame.edge0.sense),
            AxisSpan::Interior(frame.edge1.sense),
            AxisSpan::At(frame.corner),
        ],
    ))
}

/// Owner/neighbour/vertex slices of one structured set of faces.
///
/// The owner and neighbour slices apply to the cell array, the vertices
/// slice to the point array; a collapsed corner span selects the cell layer
/// or point plane adjacent to the face.
#[derive(Clone, Debug)]
pub struct FaceSlices {
    pub owner: Slice3,
    pub neighbour: Option<Slice3>,
    pub vertices: Slice3,
}

/// Faces lying on one block face; owner is the adjacent cell layer.
pub fn surface_face_slices(face: [usize; 4]) -> Result<FaceSlices> {
    let frame = FaceFrame::of(face)?;
    let axes = frame_axes(&frame);
    let spans = [
        AxisSpan::Full(frame.edge0.sense),
        AxisSpan::Full(frame.edge1.sense),
        AxisSpan::At(frame.corner),
    ];
    Ok(FaceSlices {
        owner: Slice3::new(axes, spans),
        neighbour: None,
        vertices: Slice3::new(axes, spans),
    })
}

/// All interior faces normal to `axis`; owner on the lower-index side.
pub fn interior_face_slices(axis: usize) -> FaceSlices {
    assert!(axis < 3);
    let [a, b] = FACE_AXES[axis];
    let axes = [a, b, axis];
    let full = AxisSpan::Full(Sense::Forward);
    FaceSlices {
        owner: Slice3::new(axes, [full, full, AxisSpan::DropLast]),
        neighbour: Some(Slice3::new(axes, [full, full, AxisSpan::DropFirst])),
        vertices: Slice3::new(axes, [full, full, AxisSpan::Interior(Sense::Forward)]),
    }
}

fn frame_axes(frame: &FaceFrame) -> [usize; 3] {
    [frame.edge0.axis, frame.edge1.axis, frame.normal_axis]
}

fn other_axes(axis: usize) -> [usize; 2] {
    match axis {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    }
}
