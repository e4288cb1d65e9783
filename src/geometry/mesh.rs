//! @acp:module "Mesh Kernel"
//! @acp:summary "Triangle-mesh geometry kernel with ear-clipping caps"
//! @acp:domain geometry
//! @acp:layer service
//!
//! Solids are closed, outward-oriented triangle shells. Union concatenates
//! shells and cut appends the inverted tool shell. A cut is only exact when
//! the tool lies strictly inside the base, with no face touching the base
//! boundary; layout keeps every cut tool enclosed.

use nalgebra::{Point2, Point3, Vector3};

use super::kernel::GeometryKernel;
use super::{Aabb, MirrorPlane, SketchPlane, CIRCLE_SEGMENTS};
use crate::error::{BridgeError, Result};

/// @acp:summary "Indexed triangle mesh"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3<f64>>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn push_vertex(&mut self, p: Point3<f64>) -> u32 {
        self.vertices.push(p);
        (self.vertices.len() - 1) as u32
    }

    /// Append another mesh, re-indexing its triangles
    pub fn append(&mut self, other: &TriangleMesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles
            .extend(other.triangles.iter().map(|t| [t[0] + base, t[1] + base, t[2] + base]));
    }

    /// Flip every triangle so normals point the other way
    pub fn invert(&mut self) {
        for t in &mut self.triangles {
            t.swap(1, 2);
        }
    }

    pub fn translated(mut self, offset: Vector3<f64>) -> Self {
        for v in &mut self.vertices {
            *v += offset;
        }
        self
    }

    pub fn reflected(&self, plane: MirrorPlane) -> Self {
        let mut mesh = TriangleMesh {
            vertices: self.vertices.iter().map(|v| plane.reflect(v)).collect(),
            triangles: self.triangles.clone(),
        };
        // reflection reverses handedness
        mesh.invert();
        mesh
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    /// Signed enclosed volume (positive for outward-oriented shells)
    pub fn volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let a = self.vertices[t[0] as usize].coords;
                let b = self.vertices[t[1] as usize].coords;
                let c = self.vertices[t[2] as usize].coords;
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }

    /// Unit normal of a triangle, zero for degenerate faces
    pub fn face_normal(&self, t: &[u32; 3]) -> Vector3<f64> {
        let a = self.vertices[t[0] as usize];
        let b = self.vertices[t[1] as usize];
        let c = self.vertices[t[2] as usize];
        (b - a).cross(&(c - a)).try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
    }
}

/// @acp:summary "GeometryKernel producing triangle meshes"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshKernel {
    circle_segments: usize,
}

impl Default for MeshKernel {
    fn default() -> Self {
        Self {
            circle_segments: CIRCLE_SEGMENTS,
        }
    }
}

impl MeshKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_circle_segments(segments: usize) -> Self {
        Self {
            circle_segments: segments.max(3),
        }
    }
}

impl GeometryKernel for MeshKernel {
    type Solid = TriangleMesh;

    fn cuboid(&self, min: Point3<f64>, max: Point3<f64>) -> Result<TriangleMesh> {
        let outline = [
            Point2::new(min.x, min.y),
            Point2::new(max.x, min.y),
            Point2::new(max.x, max.y),
            Point2::new(min.x, max.y),
        ];
        self.extrude_polygon(SketchPlane::XY, &outline, min.z, max.z)
    }

    fn extrude_polygon(
        &self,
        plane: SketchPlane,
        outline: &[Point2<f64>],
        w0: f64,
        w1: f64,
    ) -> Result<TriangleMesh> {
        if !(w1 - w0 > 0.0) {
            return Err(BridgeError::Geometry(format!(
                "extrusion depth must be positive, got {} to {}",
                w0, w1
            )));
        }
        let ring = oriented(outline)?;
        let cap = triangulate(&ring)?;

        let mut mesh = TriangleMesh::new();
        let bottom: Vec<u32> = ring.iter().map(|p| mesh.push_vertex(plane.to_world(p, w0))).collect();
        let top: Vec<u32> = ring.iter().map(|p| mesh.push_vertex(plane.to_world(p, w1))).collect();

        for [a, b, c] in &cap {
            mesh.triangles.push([bottom[*a], bottom[*c], bottom[*b]]);
            mesh.triangles.push([top[*a], top[*b], top[*c]]);
        }

        let n = ring.len();
        for i in 0..n {
            let j = (i + 1) % n;
            let (a, b) = (bottom[i], bottom[j]);
            let (c, d) = (top[j], top[i]);
            mesh.triangles.push([a, b, c]);
            mesh.triangles.push([a, c, d]);
        }
        Ok(mesh)
    }

    fn extrude_circle(
        &self,
        plane: SketchPlane,
        centre: Point2<f64>,
        radius: f64,
        w0: f64,
        w1: f64,
    ) -> Result<TriangleMesh> {
        if !(radius > 0.0) {
            return Err(BridgeError::Geometry(format!("circle radius must be positive, got {}", radius)));
        }
        let n = self.circle_segments;
        let outline: Vec<Point2<f64>> = (0..n)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / n as f64;
                Point2::new(centre.x + radius * angle.cos(), centre.y + radius * angle.sin())
            })
            .collect();
        self.extrude_polygon(plane, &outline, w0, w1)
    }

    fn union(&self, mut a: TriangleMesh, b: TriangleMesh) -> Result<TriangleMesh> {
        a.append(&b);
        Ok(a)
    }

    fn cut(&self, mut base: TriangleMesh, mut tool: TriangleMesh) -> Result<TriangleMesh> {
        tool.invert();
        base.append(&tool);
        Ok(base)
    }

    fn translate(&self, solid: TriangleMesh, offset: Vector3<f64>) -> TriangleMesh {
        solid.translated(offset)
    }

    fn mirror(&self, solid: &TriangleMesh, plane: MirrorPlane) -> TriangleMesh {
        solid.reflected(plane)
    }

    fn bounding_box(&self, solid: &TriangleMesh) -> Option<Aabb> {
        solid.bounding_box()
    }
}

fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (p, q) = (points[i], points[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum::<f64>()
        / 2.0
}

/// Copy of a loop wound counter-clockwise
fn oriented(points: &[Point2<f64>]) -> Result<Vec<Point2<f64>>> {
    let mut pts: Vec<Point2<f64>> = points.to_vec();
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    if pts.len() < 3 {
        return Err(BridgeError::Geometry(format!(
            "polygon needs at least 3 points, got {}",
            pts.len()
        )));
    }
    let area = signed_area(&pts);
    if area.abs() < 1e-12 {
        return Err(BridgeError::Geometry("polygon has zero area".to_string()));
    }
    if area < 0.0 {
        pts.reverse();
    }
    Ok(pts)
}

/// Ear-clip a simple loop; triangles are returned counter-clockwise
fn triangulate(ring: &[Point2<f64>]) -> Result<Vec<[usize; 3]>> {
    let coords: Vec<f64> = ring.iter().flat_map(|p| [p.x, p.y]).collect();

    let indices = earcutr::earcut(&coords, &[], 2)
        .map_err(|e| BridgeError::Geometry(format!("triangulation failed: {:?}", e)))?;
    if indices.is_empty() {
        return Err(BridgeError::Geometry("triangulation produced no triangles".to_string()));
    }

    let at = |i: usize| Point2::new(coords[2 * i], coords[2 * i + 1]);
    Ok(indices
        .chunks_exact(3)
        .map(|t| {
            let tri = [t[0], t[1], t[2]];
            if signed_area(&[at(tri[0]), at(tri[1]), at(tri[2])]) < 0.0 {
                [tri[0], tri[2], tri[1]]
            } else {
                tri
            }
        })
        .collect())
}
