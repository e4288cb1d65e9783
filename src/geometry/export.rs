//! @acp:module "Mesh Export"
//! @acp:summary "Binary STL and Wavefront OBJ writers"
//! @acp:domain geometry
//! @acp:layer io
//!
//! Bridges are written as STL first and then converted to OBJ, the format
//! the downstream scan simulator loads.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use stl_io::{Normal, Triangle, Vertex};

use super::mesh::TriangleMesh;
use crate::error::{BridgeError, Result};

/// @acp:summary "Writes solids to mesh files"
pub trait MeshExporter: Send + Sync {
    type Solid;

    fn write_stl(&self, solid: &Self::Solid, path: &Path) -> Result<()>;

    fn write_obj(&self, solid: &Self::Solid, path: &Path) -> Result<()>;

    /// Re-read an STL file and write it as OBJ
    fn convert_stl_to_obj(&self, stl: &Path, obj: &Path) -> Result<()>;
}

/// @acp:summary "STL/OBJ exporter for triangle meshes"
#[derive(Debug, Clone, Copy, Default)]
pub struct StlObjExporter;

impl StlObjExporter {
    pub fn new() -> Self {
        Self
    }
}

fn export_failure(path: &Path, reason: impl Into<String>) -> BridgeError {
    BridgeError::ExportFailure {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn ensure_not_empty(mesh: &TriangleMesh, path: &Path) -> Result<()> {
    if mesh.vertices.is_empty() || mesh.triangles.is_empty() {
        return Err(export_failure(path, "mesh has no vertices"));
    }
    Ok(())
}

fn to_vertex(p: &Point3<f64>) -> Vertex {
    Vertex::new([p.x as f32, p.y as f32, p.z as f32])
}

impl MeshExporter for StlObjExporter {
    type Solid = TriangleMesh;

    fn write_stl(&self, mesh: &TriangleMesh, path: &Path) -> Result<()> {
        ensure_not_empty(mesh, path)?;
        if u32::try_from(mesh.triangle_count()).is_err() {
            return Err(export_failure(path, "too many triangles for binary STL"));
        }

        let triangles: Vec<Triangle> = mesh
            .triangles
            .iter()
            .map(|t| {
                let n = mesh.face_normal(t);
                Triangle {
                    normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                    vertices: [
                        to_vertex(&mesh.vertices[t[0] as usize]),
                        to_vertex(&mesh.vertices[t[1] as usize]),
                        to_vertex(&mesh.vertices[t[2] as usize]),
                    ],
                }
            })
            .collect();

        let mut writer = BufWriter::new(File::create(path)?);
        stl_io::write_stl(&mut writer, triangles.iter())
            .map_err(|e| export_failure(path, format!("STL write failed: {}", e)))?;
        writer.flush()?;
        Ok(())
    }

    fn write_obj(&self, mesh: &TriangleMesh, path: &Path) -> Result<()> {
        ensure_not_empty(mesh, path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "# bridgegen")?;
        for v in &mesh.vertices {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for t in &mesh.triangles {
            writeln!(writer, "f {} {} {}", t[0] + 1, t[1] + 1, t[2] + 1)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn convert_stl_to_obj(&self, stl: &Path, obj: &Path) -> Result<()> {
        let mesh = read_stl(stl)?;
        self.write_obj(&mesh, obj)
    }
}

/// @acp:summary "Read an STL file into an indexed mesh"
///
/// `stl_io` welds bitwise-identical vertices, so shared corners come back
/// as one vertex.
pub fn read_stl(path: &Path) -> Result<TriangleMesh> {
    let mut reader = BufReader::new(File::open(path)?);
    let stl = stl_io::read_stl(&mut reader)
        .map_err(|e| export_failure(path, format!("unreadable STL: {}", e)))?;

    let mut mesh = TriangleMesh::new();
    mesh.vertices = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();
    mesh.triangles = stl
        .faces
        .iter()
        .map(|face| {
            let [a, b, c] = face.vertices;
            match (u32::try_from(a), u32::try_from(b), u32::try_from(c)) {
                (Ok(a), Ok(b), Ok(c)) => Ok([a, b, c]),
                _ => Err(export_failure(path, "vertex index out of range")),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    ensure_not_empty(&mesh, path)?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryKernel, MeshKernel};

    fn cube() -> TriangleMesh {
        MeshKernel::new()
            .cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
            .unwrap()
    }

    #[test]
    fn test_stl_size_and_readback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.stl");
        StlObjExporter::new().write_stl(&cube(), &path).unwrap();

        // 80 byte header, u32 count, 50 bytes per triangle
        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(len, 80 + 4 + 12 * 50);

        let mesh = read_stl(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 8);
        assert!((mesh.volume() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stl_to_obj_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let stl = dir.path().join("cube.stl");
        let obj = dir.path().join("cube.obj");
        let exporter = StlObjExporter::new();
        exporter.write_stl(&cube(), &stl).unwrap();
        exporter.convert_stl_to_obj(&stl, &obj).unwrap();

        let text = std::fs::read_to_string(&obj).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 8);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 12);
    }

    #[test]
    fn test_empty_mesh_is_export_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.obj");
        let err = StlObjExporter::new()
            .write_obj(&TriangleMesh::new(), &path)
            .unwrap_err();
        assert!(matches!(err, BridgeError::ExportFailure { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_truncated_stl_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.stl");
        std::fs::write(&path, [0u8; 40]).unwrap();
        assert!(matches!(read_stl(&path), Err(BridgeError::ExportFailure { .. })));
    }

    #[test]
    fn test_ascii_stl_readback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facet.stl");
        let text = "solid facet
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid facet
";
        std::fs::write(&path, text).unwrap();

        let mesh = read_stl(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
    }
}
