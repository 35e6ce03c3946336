use std::fs;
use std::path::PathBuf;

use hexmesh::write::{write_boundary, write_faces, write_labels, write_points, FILE_EOF, FILE_SEPARATOR};
use hexmesh::{organize_face_lists, write_poly_mesh, BoundaryPatch, FaceList, MeshError, PatchPrinter};

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hexmesh_{}_{}", name, std::process::id()))
}

fn interior_list() -> FaceList {
    FaceList::from_parts(
        "interior",
        vec![0, 0, 1],
        vec![1, 2, 2],
        vec![[0, 1, 5, 4], [1, 2, 6, 5], [2, 3, 7, 6]],
    )
    .unwrap()
}

fn boundary_list(name: &str, faces: usize) -> FaceList {
    FaceList::from_parts(
        name,
        vec![0; faces],
        Vec::new(),
        vec![[0, 3, 2, 1]; faces],
    )
    .unwrap()
}

#[test]
fn organizing_moves_interior_groups_to_the_front() {
    let lists = [boundary_list("wall", 2), interior_list(), boundary_list("inlet", 1)];
    let (merged, patches) = organize_face_lists(&lists).unwrap();

    assert_eq!(merged.len(), 6);
    assert_eq!(merged.num_interior(), 3);
    // Boundary groups keep their relative order behind the interior run.
    assert_eq!(merged.vertices()[3], [0, 3, 2, 1]);

    assert_eq!(patches.len(), 2);
    assert_eq!(patches[0].name, "wall");
    assert_eq!(patches[0].patch_type, "patch");
    assert_eq!(patches[0].n_faces, 2);
    assert_eq!(patches[0].start_face, 3);
    assert_eq!(patches[1].name, "inlet");
    assert_eq!(patches[1].n_faces, 1);
    assert_eq!(patches[1].start_face, 5);
}

#[test]
fn patch_names_must_be_unique() {
    let lists = [interior_list(), boundary_list("wall", 1), boundary_list("wall", 2)];
    let err = organize_face_lists(&lists).unwrap_err();
    assert!(matches!(err, MeshError::DuplicatePatch(name) if name == "wall"));
}

#[test]
fn point_file_matches_reference_layout() {
    let dir = scratch_dir("points");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("points");
    write_points(&path, &[[0.5, 0.0, -2.5]]).unwrap();

    let expected = [
        r"/*--------------------------------*- C++ -*----------------------------------*\",
        r"  =========                 |",
        r"  \\      /  F ield         | OpenFOAM: The Open Source CFD Toolbox",
        r"   \\    /   O peration     | Website:  https://openfoam.org",
        r"    \\  /    A nd           | Version:  13",
        r"     \\/     M anipulation  |",
        r"\*---------------------------------------------------------------------------*/",
        "FoamFile",
        "{",
        "\tformat  \tascii;",
        "\tclass   \tvectorField;",
        "\tlocation\t\"constant/polyMesh\";",
        "\tobject  \tpoints;",
        "}",
        FILE_SEPARATOR,
        "",
        "",
        "1",
        "(",
        "\t(5.0000000000000000e-01\t\t0.0000000000000000e+00\t\t-2.5000000000000000e+00)",
        ")",
        "",
        FILE_EOF,
        "",
    ]
    .join("\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn face_and_label_files_share_the_header_scaffold() {
    let dir = scratch_dir("tables");
    fs::create_dir_all(&dir).unwrap();

    let faces_path = dir.join("faces");
    write_faces(&faces_path, &[[0, 1, 5, 4], [2, 3, 7, 6]]).unwrap();
    let contents = fs::read_to_string(&faces_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 24);
    assert_eq!(lines[7], "FoamFile");
    assert_eq!(lines[10], "\tclass   \tfaceList;");
    assert_eq!(lines[12], "\tobject  \tfaces;");
    assert_eq!(lines[17], "2");
    assert_eq!(lines[18], "(");
    assert_eq!(lines[19], "\t4(0\t\t1\t\t5\t\t4)");
    assert_eq!(lines[20], "\t4(2\t\t3\t\t7\t\t6)");
    assert_eq!(lines[21], ")");
    assert_eq!(lines[23], FILE_EOF);

    let owner_path = dir.join("owner");
    write_labels(&owner_path, "owner", &[0, 0, 7]).unwrap();
    let contents = fs::read_to_string(&owner_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[10], "\tclass   \tlabelList;");
    assert_eq!(lines[12], "\tobject  \towner;");
    assert_eq!(lines[17], "3");
    assert_eq!(lines[19], "\t0");
    assert_eq!(lines[21], "\t7");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn boundary_file_lists_patches_in_blocks() {
    let dir = scratch_dir("boundary");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("boundary");
    let patches = vec![
        BoundaryPatch {
            name: "wall".to_string(),
            patch_type: "patch".to_string(),
            n_faces: 4,
            start_face: 28,
        },
        BoundaryPatch {
            name: "inlet".to_string(),
            patch_type: "patch".to_string(),
            n_faces: 2,
            start_face: 32,
        },
    ];
    write_boundary(&path, &patches).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("\tclass   \tpolyBoundaryMesh;"));
    let expected_body = [
        "2",
        "(",
        "\twall",
        "\t{",
        "\t\ttype     \tpatch;",
        "\t\tnFaces   \t4;",
        "\t\tstartFace\t28;",
        "\t}",
        "",
        "\tinlet",
        "\t{",
        "\t\ttype     \tpatch;",
        "\t\tnFaces   \t2;",
        "\t\tstartFace\t32;",
        "\t}",
        ")",
    ]
    .join("\n");
    assert!(contents.contains(&expected_body));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn poly_mesh_directory_carries_all_five_tables() {
    let dir = scratch_dir("polymesh");
    let points = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];
    let interior = FaceList::from_parts("interior", vec![0], vec![1], vec![[1, 2, 6, 5]]).unwrap();
    let wall = FaceList::from_parts(
        "wall",
        vec![0, 1],
        Vec::new(),
        vec![[0, 3, 2, 1], [4, 5, 6, 7]],
    )
    .unwrap();

    // Boundary-first input still comes out interior-first on disk.
    let patches = write_poly_mesh(&dir, &points, &[wall, interior]).unwrap();
    patches.print();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].name, "wall");
    assert_eq!(patches[0].n_faces, 2);
    assert_eq!(patches[0].start_face, 1);

    for file in ["points", "faces", "owner", "neighbour", "boundary"] {
        assert!(dir.join(file).is_file(), "missing polyMesh file {file}");
    }
    let owner = fs::read_to_string(dir.join("owner")).unwrap();
    let lines: Vec<&str> = owner.lines().collect();
    assert_eq!(lines[17], "3");
    let neighbour = fs::read_to_string(dir.join("neighbour")).unwrap();
    let lines: Vec<&str> = neighbour.lines().collect();
    assert_eq!(lines[17], "1");
    let boundary = fs::read_to_string(dir.join("boundary")).unwrap();
    assert!(boundary.contains("\twall"));
    assert!(boundary.contains("\t\tstartFace\t1;"));

    fs::remove_dir_all(&dir).ok();
}
