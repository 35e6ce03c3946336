use hexmesh::slice::{
    edge_interior_slice, interior_face_slices, linear_index, surface_interior_slice,
    surface_slice,
};
use hexmesh::{AxisSpan, Corner, Sense};

// 2x4x3 point grid whose value at (i, j, k) is its row-major rank plus one,
// so every expected array below can be read off by hand.
const SHAPE: [usize; 3] = [2, 4, 3];

fn make_grid() -> Vec<usize> {
    let mut data = vec![0usize; SHAPE[0] * SHAPE[1] * SHAPE[2]];
    for i in 0..SHAPE[0] {
        for j in 0..SHAPE[1] {
            for k in 0..SHAPE[2] {
                data[linear_index(SHAPE, [i, j, k])] = i * 12 + j * 3 + k + 1;
            }
        }
    }
    data
}

#[test]
fn linear_index_is_column_major() {
    assert_eq!(linear_index(SHAPE, [0, 0, 0]), 0);
    assert_eq!(linear_index(SHAPE, [1, 0, 0]), 1);
    assert_eq!(linear_index(SHAPE, [0, 1, 0]), 2);
    assert_eq!(linear_index(SHAPE, [1, 2, 1]), 1 + 2 * 2 + 1 * 8);
}

#[test]
fn axis_spans_resolve_to_index_sequences() {
    assert_eq!(AxisSpan::At(Corner::First).indices(4), vec![0]);
    assert_eq!(AxisSpan::At(Corner::Last).indices(4), vec![3]);
    assert_eq!(AxisSpan::Full(Sense::Forward).indices(3), vec![0, 1, 2]);
    assert_eq!(AxisSpan::Full(Sense::Backward).indices(3), vec![2, 1, 0]);
    assert_eq!(AxisSpan::Interior(Sense::Forward).indices(4), vec![1, 2]);
    assert_eq!(AxisSpan::Interior(Sense::Backward).indices(4), vec![2, 1]);
    assert_eq!(AxisSpan::Interior(Sense::Forward).indices(2), vec![]);
    assert_eq!(AxisSpan::DropLast.indices(3), vec![0, 1]);
    assert_eq!(AxisSpan::DropFirst.indices(3), vec![1, 2]);
    for len in [2usize, 3, 4] {
        assert_eq!(AxisSpan::Interior(Sense::Forward).len(len), len - 2);
        assert_eq!(AxisSpan::DropLast.len(len), len - 1);
    }
}

#[test]
fn edge_interiors_follow_the_requested_orientation() {
    let data = make_grid();

    // (0, 4) runs along axis 2 at the (First, First) corner of the others.
    let slice = edge_interior_slice(0, 4).unwrap();
    assert_eq!(slice.gather(SHAPE, &data), vec![2]);

    // (5, 6) runs along axis 1 at the (Last, Last) corner.
    let slice = edge_interior_slice(5, 6).unwrap();
    assert_eq!(slice.gather(SHAPE, &data), vec![18, 21]);

    // Reversing the vertices reverses the walk.
    let slice = edge_interior_slice(6, 5).unwrap();
    assert_eq!(slice.gather(SHAPE, &data), vec![21, 18]);

    assert!(edge_interior_slice(0, 6).is_err());
}

#[test]
fn surface_views_follow_the_face_frame() {
    let data = make_grid();

    // (2, 6, 5, 1): first view axis 2 (forward), second axis 1 (backward),
    // pinned at the last index of axis 0.
    let slice = surface_interior_slice([2, 6, 5, 1]).unwrap();
    assert_eq!(slice.view_dims(SHAPE), [1, 2, 1]);
    assert_eq!(slice.gather(SHAPE, &data), vec![20, 17]);

    let slice = surface_slice([2, 6, 5, 1]).unwrap();
    assert_eq!(slice.view_dims(SHAPE), [3, 4, 1]);
    assert_eq!(
        slice.gather(SHAPE, &data),
        vec![22, 23, 24, 19, 20, 21, 16, 17, 18, 13, 14, 15]
    );

    let slice = surface_slice([0, 1, 5, 4]).unwrap();
    assert_eq!(slice.view_dims(SHAPE), [2, 3, 1]);
    assert_eq!(slice.gather(SHAPE, &data), vec![1, 13, 2, 14, 3, 15]);
}

#[test]
fn scatter_writes_through_the_view() {
    let mut data = make_grid();
    let slice = surface_interior_slice([2, 6, 5, 1]).unwrap();
    slice.scatter(SHAPE, &mut data, &[100, 200]);
    assert_eq!(data[linear_index(SHAPE, [1, 2, 1])], 100);
    assert_eq!(data[linear_index(SHAPE, [1, 1, 1])], 200);
}

#[test]
fn interior_face_slices_pick_adjacent_cell_layers() {
    // Cell array for the same block is one smaller per axis.
    let cells: [usize; 3] = [1, 3, 2];
    let slices = interior_face_slices(1);
    assert_eq!(slices.owner.view_dims(cells), [2, 1, 2]);
    let neighbour = slices.neighbour.as_ref().unwrap();
    assert_eq!(neighbour.view_dims(cells), [2, 1, 2]);

    let mut cell_data = vec![0usize; 6];
    for (flat, value) in cell_data.iter_mut().enumerate() {
        *value = flat;
    }
    let owners = slices.owner.gather(cells, &cell_data);
    let neighbours = neighbour.gather(cells, &cell_data);
    // Owner j-layer 0 and 1 pair with neighbour j-layer 1 and 2.
    assert_eq!(owners, vec![0, 3, 1, 4]);
    assert_eq!(neighbours, vec![1, 4, 2, 5]);

    // The vertex view spans the interior point planes of the same axis.
    assert_eq!(slices.vertices.view_dims([2, 4, 3]), [3, 2, 2]);
}
