use hexmesh::{
    check_boundary_faces, check_interior_faces, merge_face_lists, FaceGrid, FaceList, MeshError,
};

fn quad_grid() -> FaceGrid {
    // 2x2 grid of faces over cells 0..4, z-normal quads over a 3x3 point plane.
    let owner = vec![0, 1, 2, 3];
    let vertices = vec![[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6], [4, 5, 8, 7]];
    FaceGrid::new([2, 2, 1], owner, vertices, None).unwrap()
}

#[test]
fn face_grid_validates_array_shapes() {
    let err = FaceGrid::new([2, 2, 1], vec![0, 1], vec![[0; 4]; 4], None).unwrap_err();
    assert!(matches!(err, MeshError::ShapeMismatch { .. }));

    let err = FaceGrid::new([2, 2, 1], vec![0; 4], vec![[0; 4]; 3], None).unwrap_err();
    assert!(matches!(err, MeshError::ShapeMismatch { .. }));

    let err = FaceGrid::new([1, 1, 1], vec![0], vec![[0; 4]], Some(vec![1, 2])).unwrap_err();
    assert!(matches!(err, MeshError::ShapeMismatch { .. }));

    let mut grid = quad_grid();
    assert!(grid.set_neighbour(vec![4, 5]).is_err());
    grid.set_neighbour(vec![4, 5, 6, 7]).unwrap();
    assert!(grid.has_neighbours());
}

#[test]
fn face_grid_indexing_matches_flat_order() {
    let grid = quad_grid();
    assert_eq!(grid.dims(), [2, 2, 1]);
    assert_eq!(grid.len(), 4);
    assert!(!grid.is_empty());
    assert_eq!(grid.owner_at([0, 0, 0]), grid.owner()[0]);
    assert_eq!(grid.owner_at([1, 0, 0]), grid.owner()[1]);
    assert_eq!(grid.owner_at([0, 1, 0]), grid.owner()[2]);
    assert_eq!(grid.vertices_at([1, 1, 0]), [4, 5, 8, 7]);
    assert_eq!(grid.neighbour_at([0, 0, 0]), None);

    let mut grid = grid;
    grid.set_neighbour(vec![4, 5, 6, 7]).unwrap();
    assert_eq!(grid.neighbour_at([0, 1, 0]), Some(6));
    assert_eq!(grid.neighbour(), Some(&[4, 5, 6, 7][..]));
}

#[test]
fn face_list_keeps_interior_faces_in_front() {
    let mut interior = quad_grid();
    interior.set_neighbour(vec![4, 5, 6, 7]).unwrap();
    let boundary = quad_grid();

    let mut list = FaceList::new("mesh");
    assert!(list.is_empty());
    assert!(!list.is_boundary());
    list.push_grid(&interior).unwrap();
    list.push_grid(&boundary).unwrap();
    assert_eq!(list.len(), 8);
    assert_eq!(list.num_interior(), 4);
    assert!(!list.is_boundary());

    // Interior faces may not land behind boundary faces.
    let err = list.push_grid(&interior).unwrap_err();
    assert!(matches!(err, MeshError::MixedFaceGroup { .. }));

    let boundary_list = FaceList::from_parts(
        "wall",
        boundary.owner().to_vec(),
        Vec::new(),
        boundary.vertices().to_vec(),
    )
    .unwrap();
    assert!(boundary_list.is_boundary());

    let mut interior_list = FaceList::new("inner");
    interior_list.push_grid(&interior).unwrap();
    let mut merged = FaceList::new("all");
    merged.push_list(&interior_list).unwrap();
    merged.push_list(&boundary_list).unwrap();
    assert_eq!(merged.len(), 8);
    let err = merged.push_list(&interior_list).unwrap_err();
    assert!(matches!(err, MeshError::MixedFaceGroup { .. }));
}

#[test]
fn from_parts_validates_array_lengths() {
    let err = FaceList::from_parts("bad", vec![0, 1], Vec::new(), vec![[0; 4]]).unwrap_err();
    assert!(matches!(err, MeshError::ShapeMismatch { .. }));
    let err = FaceList::from_parts("bad", vec![0], vec![1, 2], vec![[0; 4]]).unwrap_err();
    assert!(matches!(err, MeshError::ShapeMismatch { .. }));
}

#[test]
fn merging_orders_interior_before_boundary() {
    let mut interior_grid = quad_grid();
    interior_grid.set_neighbour(vec![4, 5, 6, 7]).unwrap();
    let mut interior = FaceList::new("interior");
    interior.push_grid(&interior_grid).unwrap();
    let boundary = FaceList::from_parts("wall", vec![0], Vec::new(), vec![[0, 1, 4, 3]]).unwrap();

    let merged = merge_face_lists("mesh", [&interior, &boundary]).unwrap();
    assert_eq!(merged.len(), 5);
    assert_eq!(merged.num_interior(), 4);

    let err = merge_face_lists("mesh", [&boundary, &interior]).unwrap_err();
    assert!(matches!(err, MeshError::MixedFaceGroup { .. }));
}

#[test]
fn interior_check_requires_owner_to_neighbour_normals() {
    // One unit quad in the z = 0 plane, wound so its normal points +z.
    let points = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ];
    let centers = vec![[0.5, 0.5, -0.5], [0.5, 0.5, 0.5]];

    let good = FaceList::from_parts("interior", vec![0], vec![1], vec![[0, 1, 2, 3]]).unwrap();
    assert!(check_interior_faces(&good, &points, &centers).unwrap());

    let flipped = FaceList::from_parts("interior", vec![1], vec![0], vec![[0, 1, 2, 3]]).unwrap();
    assert!(!check_interior_faces(&flipped, &points, &centers).unwrap());

    let boundary = FaceList::from_parts("wall", vec![0], Vec::new(), vec![[0, 1, 2, 3]]).unwrap();
    let err = check_interior_faces(&boundary, &points, &centers).unwrap_err();
    assert!(matches!(
        err,
        MeshError::MissingNeighbours { count: 1, .. }
    ));

    let bad_ids = FaceList::from_parts("interior", vec![0], vec![1], vec![[0, 1, 2, 9]]).unwrap();
    let err = check_interior_faces(&bad_ids, &points, &centers).unwrap_err();
    assert!(matches!(err, MeshError::IdOutOfRange { id: 9, .. }));
}

#[test]
fn boundary_check_requires_outward_normals() {
    let points = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ];
    let below = vec![[0.5, 0.5, -0.5]];
    let above = vec![[0.5, 0.5, 0.5]];

    let wall = FaceList::from_parts("wall", vec![0], Vec::new(), vec![[0, 1, 2, 3]]).unwrap();
    assert!(check_boundary_faces(&wall, &points, &below).unwrap());
    assert!(!check_boundary_faces(&wall, &points, &above).unwrap());

    let err = check_boundary_faces(&wall, &points, &[]).unwrap_err();
    assert!(matches!(err, MeshError::IdOutOfRange { what: "cell", .. }));
}
