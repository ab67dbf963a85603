//! Wavefront OBJ export.
//!
//! Writes `v x y z` lines for every vertex followed by one `f` line per
//! face, listing its corners with 1-based indices in face-loop order.
//! Polygons are written as they are stored; nothing is triangulated.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Write a mesh as OBJ text.
///
/// # Example
///
/// ```
/// use hemesh::io::obj;
/// use hemesh::mesh::{primitives, HalfEdgeMesh};
///
/// let mesh: HalfEdgeMesh = primitives::tetrahedron().unwrap();
/// let mut out = Vec::new();
/// obj::write(&mesh, &mut out).unwrap();
///
/// let text = String::from_utf8(out).unwrap();
/// assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 4);
/// ```
pub fn write<I: MeshIndex, W: Write>(mesh: &HalfEdgeMesh<I>, mut writer: W) -> Result<()> {
    for v in mesh.vertex_ids() {
        let p = mesh.position(v);
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    for f in mesh.face_ids() {
        write!(writer, "f")?;
        for v in mesh.vertices_around_face(f) {
            write!(writer, " {}", v.index() + 1)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save a mesh to an OBJ file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write(mesh, BufWriter::new(file))?;

    log::info!(
        "wrote {} ({} vertices, {} faces)",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(())
}
