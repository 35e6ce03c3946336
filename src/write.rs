//! OpenFOAM polyMesh ascii writer.
//!
//! Serializes a point table and a set of face groups into the five files of
//! a `constant/polyMesh` directory: `points`, `faces`, `owner`,
//! `neighbour`, and `boundary`. Face groups carrying neighbours are placed
//! first so interior faces occupy the leading run of the global face list,
//! and every boundary group becomes one patch entry in `boundary`.

use std::collections::HashSet;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{MeshError, Result};
use crate::faces::{merge_face_lists, FaceList};

/// OpenFOAM release stamped into every file banner.
pub const FOAM_VERSION: &str = "13";

pub const FILE_SEPARATOR: &str =
    "// * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * //";
pub const FILE_EOF: &str =
    "// ************************************************************************* //";

/// One entry of the polyMesh `boundary` file.
#[derive(Clone, Debug, Serialize)]
pub struct BoundaryPatch {
    pub name: String,
    #[serde(rename = "type")]
    pub patch_type: String,
    #[serde(rename = "nFaces")]
    pub n_faces: usize,
    #[serde(rename = "startFace")]
    pub start_face: usize,
}

/// Helper trait to print a boundary patch summary.
pub trait PatchPrinter {
    fn print(&self);
}

impl PatchPrinter for [BoundaryPatch] {
    fn print(&self) {
        for patch in self {
            println!(
                "patch {}: type {} nFaces {} startFace {}",
                patch.name, patch.patch_type, patch.n_faces, patch.start_face
            );
        }
    }
}

impl PatchPrinter for Vec<BoundaryPatch> {
    fn print(&self) {
        self.as_slice().print();
    }
}

/// Order face groups interior-first, merge them into one global list, and
/// describe every boundary group as a patch with its slot in that list.
///
/// The sort is stable, so groups keep their relative order within the
/// interior and boundary classes.
pub fn organize_face_lists(lists: &[FaceList]) -> Result<(FaceList, Vec<BoundaryPatch>)> {
    let mut ordered: Vec<&FaceList> = lists.iter().collect();
    ordered.sort_by_key(|list| list.is_boundary());
    let merged = merge_face_lists("mesh", ordered.iter().copied())?;
    let mut seen = HashSet::new();
    let mut patches = Vec::new();
    let mut offset = 0;
    for list in ordered {
        if !list.is_boundary() {
            offset += list.len();
            continue;
        }
        if !seen.insert(list.name()) {
            return Err(MeshError::DuplicatePatch(list.name().to_string()));
        }
        patches.push(BoundaryPatch {
            name: list.name().to_string(),
            patch_type: "patch".to_string(),
            n_faces: list.len(),
            start_face: offset,
        });
        offset += list.len();
    }
    debug_assert_eq!(offset, merged.len());
    Ok((merged, patches))
}

/// Write the five polyMesh files into `dir`, creating it if needed.
/// Returns the boundary patch table in file order.
pub fn write_poly_mesh(
    dir: &Path,
    points: &[[f64; 3]],
    lists: &[FaceList],
) -> Result<Vec<BoundaryPatch>> {
    let (merged, patches) = organize_face_lists(lists)?;
    create_dir_all(dir)?;
    write_points(&dir.join("points"), points)?;
    write_faces(&dir.join("faces"), merged.vertices())?;
    write_labels(&dir.join("owner"), "owner", merged.owner())?;
    write_labels(&dir.join("neighbour"), "neighbour", merged.neighbour())?;
    write_boundary(&dir.join("boundary"), &patches)?;
    Ok(patches)
}

pub fn write_points(path: &Path, points: &[[f64; 3]]) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_foam_header(&mut w, "vectorField", "points")?;
    writeln!(w, "{}", points.len())?;
    writeln!(w, "(")?;
    for p in points {
        writeln!(
            w,
            "\t({}\t\t{}\t\t{})",
            scientific(p[0]),
            scientific(p[1]),
            scientific(p[2])
        )?;
    }
    write_foam_footer(&mut w)?;
    w.flush()?;
    Ok(())
}

pub fn write_faces(path: &Path, faces: &[[usize; 4]]) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_foam_header(&mut w, "faceList", "faces")?;
    writeln!(w, "{}", faces.len())?;
    writeln!(w, "(")?;
    for quad in faces {
        writeln!(w, "\t4({}\t\t{}\t\t{}\t\t{})", quad[0], quad[1], quad[2], quad[3])?;
    }
    write_foam_footer(&mut w)?;
    w.flush()?;
    Ok(())
}

pub fn write_labels(path: &Path, object_name: &str, labels: &[usize]) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_foam_header(&mut w, "labelList", object_name)?;
    writeln!(w, "{}", labels.len())?;
    writeln!(w, "(")?;
    for label in labels {
        writeln!(w, "\t{label}")?;
    }
    write_foam_footer(&mut w)?;
    w.flush()?;
    Ok(())
}

pub fn write_boundary(path: &Path, patches: &[BoundaryPatch]) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_foam_header(&mut w, "polyBoundaryMesh", "boundary")?;
    writeln!(w, "{}", patches.len())?;
    writeln!(w, "(")?;
    for (index, patch) in patches.iter().enumerate() {
        writeln!(w, "\t{}", patch.name)?;
        writeln!(w, "\t{{")?;
        writeln!(w, "\t\t{:<9}\t{};", "type", patch.patch_type)?;
        writeln!(w, "\t\t{:<9}\t{};", "nFaces", patch.n_faces)?;
        writeln!(w, "\t\t{:<9}\t{};", "startFace", patch.start_face)?;
        writeln!(w, "\t}}")?;
        if index + 1 < patches.len() {
            writeln!(w)?;
        }
    }
    write_foam_footer(&mut w)?;
    w.flush()?;
    Ok(())
}

fn write_banner(w: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        w,
        r"/*--------------------------------*- C++ -*----------------------------------*\"
    )?;
    writeln!(w, r"  =========                 |")?;
    writeln!(
        w,
        r"  \\      /  F ield         | OpenFOAM: The Open Source CFD Toolbox"
    )?;
    writeln!(w, r"   \\    /   O peration     | Website:  https://openfoam.org")?;
    writeln!(w, r"    \\  /    A nd           | Version:  {FOAM_VERSION}")?;
    writeln!(w, r"     \\/     M anipulation  |")?;
    writeln!(
        w,
        r"\*---------------------------------------------------------------------------*/"
    )
}

fn write_foam_header(
    w: &mut impl Write,
    class_name: &str,
    object_name: &str,
) -> std::io::Result<()> {
    write_banner(w)?;
    writeln!(w, "FoamFile")?;
    writeln!(w, "{{")?;
    writeln!(w, "\t{:<8}\t{};", "format", "ascii")?;
    writeln!(w, "\t{:<8}\t{};", "class", class_name)?;
    writeln!(w, "\t{:<8}\t{};", "location", "\"constant/polyMesh\"")?;
    writeln!(w, "\t{:<8}\t{};", "object", object_name)?;
    writeln!(w, "}}")?;
    writeln!(w, "{FILE_SEPARATOR}")?;
    writeln!(w)?;
    writeln!(w)
}

fn write_foam_footer(w: &mut impl Write) -> std::io::Result<()> {
    writeln!(w, ")")?;
    writeln!(w)?;
    writeln!(w, "{FILE_EOF}")
}

/// `%.16e`-style rendering: two-or-more exponent digits with an explicit
/// sign, matching the mesh files emitted by other OpenFOAM tooling.
fn scientific(value: f64) -> String {
    let formatted = format!("{value:.16e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(rest) => ('-', rest),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}
