//! @acp:module "Geometry"
//! @acp:summary "Declarative shape recipes and the kernel/exporter seams"
//! @acp:domain geometry
//! @acp:layer model
//!
//! Layout code describes solids as [`ShapeRecipe`]s placed by a
//! [`Placement`]. Nothing here touches a kernel: realizing a recipe is the
//! job of a [`GeometryKernel`] implementation.

pub mod export;
pub mod kernel;
pub mod mesh;

use nalgebra::{Point2, Point3, Vector3};
use serde::Serialize;

pub use export::{MeshExporter, StlObjExporter};
pub use kernel::{realize, GeometryKernel};
pub use mesh::{MeshKernel, TriangleMesh};

/// Segments used to approximate a circle
pub const CIRCLE_SEGMENTS: usize = 32;

/// @acp:summary "Sketch plane for planar profiles"
///
/// Each plane has a right-handed basis `(u, v, w)` with `w = u x v`, the
/// extrusion direction. For `XZ` that makes `w` point along -Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SketchPlane {
    XY,
    XZ,
    YZ,
}

impl SketchPlane {
    /// Unit vectors `(u, v, w)` of the plane
    pub fn basis(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        match self {
            SketchPlane::XY => (Vector3::x(), Vector3::y(), Vector3::z()),
            SketchPlane::XZ => (Vector3::x(), Vector3::z(), -Vector3::y()),
            SketchPlane::YZ => (Vector3::y(), Vector3::z(), Vector3::x()),
        }
    }

    /// Map a world-axis range along the plane normal to `(w0, w1)` with w0 < w1
    pub fn normal_range(&self, lo: f64, hi: f64) -> (f64, f64) {
        match self {
            SketchPlane::XZ => (-hi, -lo),
            _ => (lo, hi),
        }
    }

    /// World point of plane coordinates `(u, v)` at height `w`
    pub fn to_world(&self, p: &Point2<f64>, w: f64) -> Point3<f64> {
        let (eu, ev, ew) = self.basis();
        Point3::from(eu * p.x + ev * p.y + ew * w)
    }
}

/// @acp:summary "Plane through the origin used for mirror copies"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MirrorPlane {
    /// Flips Y
    XZ,
    /// Flips X
    YZ,
    /// Flips Z
    XY,
}

impl MirrorPlane {
    pub fn reflect(&self, p: &Point3<f64>) -> Point3<f64> {
        match self {
            MirrorPlane::XZ => Point3::new(p.x, -p.y, p.z),
            MirrorPlane::YZ => Point3::new(-p.x, p.y, p.z),
            MirrorPlane::XY => Point3::new(p.x, p.y, -p.z),
        }
    }
}

/// @acp:summary "Solid construction recipe, realized later by a kernel"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeRecipe {
    /// Axis-aligned box between two corners
    Cuboid { min: Point3<f64>, max: Point3<f64> },

    /// Planar profile extruded along the plane normal over a world-axis range
    Prism {
        plane: SketchPlane,
        outline: Vec<Point2<f64>>,
        extent: (f64, f64),
    },

    /// Circle extruded along the plane normal over a world-axis range
    Cylinder {
        plane: SketchPlane,
        centre: Point2<f64>,
        radius: f64,
        extent: (f64, f64),
    },

    /// `base` with `tool` removed
    Cut {
        base: Box<ShapeRecipe>,
        tool: Box<ShapeRecipe>,
    },

    /// Union of several placed shapes
    Group(Vec<PlacedShape>),
}

impl ShapeRecipe {
    pub fn cuboid(min: [f64; 3], max: [f64; 3]) -> Self {
        ShapeRecipe::Cuboid {
            min: Point3::from(min),
            max: Point3::from(max),
        }
    }

    pub fn prism(plane: SketchPlane, outline: &[[f64; 2]], extent: (f64, f64)) -> Self {
        ShapeRecipe::Prism {
            plane,
            outline: outline.iter().map(|p| Point2::new(p[0], p[1])).collect(),
            extent,
        }
    }

    /// Vertical cylinder standing on the XY plane
    pub fn column(x: f64, y: f64, radius: f64, z_range: (f64, f64)) -> Self {
        ShapeRecipe::Cylinder {
            plane: SketchPlane::XY,
            centre: Point2::new(x, y),
            radius,
            extent: z_range,
        }
    }

    pub fn cut(base: ShapeRecipe, tool: ShapeRecipe) -> Self {
        ShapeRecipe::Cut {
            base: Box::new(base),
            tool: Box::new(tool),
        }
    }

    pub fn placed(self, placement: Placement) -> PlacedShape {
        PlacedShape {
            recipe: self,
            placement,
        }
    }

    pub fn at_origin(self) -> PlacedShape {
        self.placed(Placement::identity())
    }
}

/// @acp:summary "Rigid placement: optional mirror copy, then translation"
///
/// A mirror here keeps the original and adds its reflection through a
/// plane containing the origin, before the translation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub translation: Vector3<f64>,
    pub mirror: Option<MirrorPlane>,
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            mirror: None,
        }
    }

    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        Self {
            translation: Vector3::new(x, y, z),
            mirror: None,
        }
    }

    pub fn mirrored(plane: MirrorPlane) -> Self {
        Self {
            translation: Vector3::zeros(),
            mirror: Some(plane),
        }
    }

    pub fn with_mirror(mut self, plane: MirrorPlane) -> Self {
        self.mirror = Some(plane);
        self
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

/// A recipe together with where it goes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedShape {
    pub recipe: ShapeRecipe,
    pub placement: Placement,
}

/// @acp:summary "Axis-aligned bounding box"
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Aabb {
            min: *first,
            max: *first,
        };
        for p in iter {
            bounds.min = bounds.min.inf(p);
            bounds.max = bounds.max.sup(p);
        }
        Some(bounds)
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn approx_eq(&self, other: &Aabb, tol: f64) -> bool {
        (self.min - other.min).amax() <= tol && (self.max - other.max).amax() <= tol
    }
}
