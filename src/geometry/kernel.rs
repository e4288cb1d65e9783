//! @acp:module "Geometry Kernel"
//! @acp:summary "Solid construction interface and recipe realization"
//! @acp:domain geometry
//! @acp:layer service

use nalgebra::{Point2, Point3, Vector3};

use super::{Aabb, MirrorPlane, PlacedShape, ShapeRecipe, SketchPlane};
use crate::error::{BridgeError, Result};

/// @acp:summary "Operations a solid-modelling backend must provide"
///
/// Implementations must be shareable across the build thread pool.
pub trait GeometryKernel: Send + Sync {
    type Solid: Clone + Send;

    fn cuboid(&self, min: Point3<f64>, max: Point3<f64>) -> Result<Self::Solid>;

    /// Extrude a simple polygon along the plane normal from `w0` to `w1`
    fn extrude_polygon(
        &self,
        plane: SketchPlane,
        outline: &[Point2<f64>],
        w0: f64,
        w1: f64,
    ) -> Result<Self::Solid>;

    fn extrude_circle(
        &self,
        plane: SketchPlane,
        centre: Point2<f64>,
        radius: f64,
        w0: f64,
        w1: f64,
    ) -> Result<Self::Solid>;

    fn union(&self, a: Self::Solid, b: Self::Solid) -> Result<Self::Solid>;

    fn cut(&self, base: Self::Solid, tool: Self::Solid) -> Result<Self::Solid>;

    fn translate(&self, solid: Self::Solid, offset: Vector3<f64>) -> Self::Solid;

    /// Reflected copy of `solid` (the original is not included)
    fn mirror(&self, solid: &Self::Solid, plane: MirrorPlane) -> Self::Solid;

    fn bounding_box(&self, solid: &Self::Solid) -> Option<Aabb>;
}

/// @acp:summary "Turn a placed recipe into a kernel solid"
pub fn realize<K: GeometryKernel + ?Sized>(kernel: &K, shape: &PlacedShape) -> Result<K::Solid> {
    let mut solid = build(kernel, &shape.recipe)?;
    if let Some(plane) = shape.placement.mirror {
        let copy = kernel.mirror(&solid, plane);
        solid = kernel.union(solid, copy)?;
    }
    if shape.placement.translation != Vector3::zeros() {
        solid = kernel.translate(solid, shape.placement.translation);
    }
    Ok(solid)
}

fn build<K: GeometryKernel + ?Sized>(kernel: &K, recipe: &ShapeRecipe) -> Result<K::Solid> {
    match recipe {
        ShapeRecipe::Cuboid { min, max } => kernel.cuboid(*min, *max),
        ShapeRecipe::Prism {
            plane,
            outline,
            extent,
        } => {
            let (w0, w1) = plane.normal_range(extent.0, extent.1);
            kernel.extrude_polygon(*plane, outline, w0, w1)
        }
        ShapeRecipe::Cylinder {
            plane,
            centre,
            radius,
            extent,
        } => {
            let (w0, w1) = plane.normal_range(extent.0, extent.1);
            kernel.extrude_circle(*plane, *centre, *radius, w0, w1)
        }
        ShapeRecipe::Cut { base, tool } => {
            let base = build(kernel, base)?;
            let tool = build(kernel, tool)?;
            kernel.cut(base, tool)
        }
        ShapeRecipe::Group(parts) => {
            let mut solids = parts.iter().map(|part| realize(kernel, part));
            let first = solids
                .next()
                .ok_or_else(|| BridgeError::Geometry("empty shape group".to_string()))??;
            solids.try_fold(first, |acc, next| kernel.union(acc, next?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MeshKernel, Placement};

    #[test]
    fn test_group_mirrors_every_member_once() {
        let group = ShapeRecipe::Group(vec![
            ShapeRecipe::cuboid([0.0, 1.0, 0.0], [1.0, 2.0, 1.0]).at_origin(),
            ShapeRecipe::cuboid([2.0, 1.0, 0.0], [3.0, 2.0, 2.0]).at_origin(),
        ]);
        let shape = group.placed(Placement::translate(0.0, 0.0, 5.0).with_mirror(MirrorPlane::XZ));
        let mesh = realize(&MeshKernel::new(), &shape).unwrap();

        assert!((mesh.volume() - 2.0 * (1.0 + 2.0)).abs() < 1e-9);
        let bounds = mesh.bounding_box().unwrap();
        assert_eq!(bounds.min, Point3::new(0.0, -2.0, 5.0));
        assert_eq!(bounds.max, Point3::new(3.0, 2.0, 7.0));
    }

    #[test]
    fn test_empty_group_is_geometry_error() {
        let err = realize(&MeshKernel::new(), &ShapeRecipe::Group(Vec::new()).at_origin()).unwrap_err();
        assert!(matches!(err, BridgeError::Geometry(_)));
    }
}
