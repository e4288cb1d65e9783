//! @acp:module "Abutment Layout"
//! @acp:summary "Wing walls, back walls and approach slabs at both bridge ends"
//! @acp:domain dataset
//! @acp:layer service
//!
//! Each end is built at +X and mirrored through the YZ plane.

use crate::error::Result;
use crate::geometry::{MirrorPlane, PlacedShape, Placement, ShapeRecipe, SketchPlane};
use crate::model::BridgeConfig;

/// Girder seating width on the abutment (m)
pub const SEATING_WIDTH: f64 = 2.0;
/// Top edge length of a wing wall (m)
pub const WING_WALL_TOP_LENGTH: f64 = 4.0;
/// Bottom edge length of a wing wall (m)
pub const WING_WALL_BOTTOM_LENGTH: f64 = 2.0;
/// Retaining wall thickness along the bridge (m)
pub const BACK_WALL_THICKNESS: f64 = 2.0;
/// Closure wall thickness along the bridge (m)
pub const CLOSURE_WALL_THICKNESS: f64 = 0.5;
/// Approach slab length (m)
pub const APPROACH_SLAB_LENGTH: f64 = 10.0;

fn both_ends() -> Placement {
    Placement::mirrored(MirrorPlane::YZ)
}

/// Seven-point wing wall profile in the XZ plane at the +X end
pub fn wing_wall_profile(config: &BridgeConfig) -> [[f64; 2]; 7] {
    let depth = config.depth_of_girder;
    let clearance = config.bridge_clearance_height;
    let cap_height = 0.5 * clearance;

    let x0 = config.total_length_m / 2.0 - SEATING_WIDTH;
    let z0 = -clearance - depth;
    let top = z0 + depth + clearance;

    [
        [x0, z0],
        [x0 + WING_WALL_BOTTOM_LENGTH, z0],
        [x0 + WING_WALL_TOP_LENGTH + SEATING_WIDTH, top - cap_height],
        [x0 + WING_WALL_TOP_LENGTH + SEATING_WIDTH, top],
        [x0 + SEATING_WIDTH, top],
        [x0 + SEATING_WIDTH, top - depth],
        [x0, z0 + clearance],
    ]
}

/// @acp:summary "Four wing walls, one per deck corner"
pub fn layout_wing_walls(config: &BridgeConfig) -> Result<Vec<PlacedShape>> {
    let profile = wing_wall_profile(config);
    let half_w = config.width_m / 2.0;
    let t = config.wing_wall_thickness;

    let left = ShapeRecipe::prism(SketchPlane::XZ, &profile, (half_w - t, half_w));
    let right = ShapeRecipe::prism(SketchPlane::XZ, &profile, (-half_w, -half_w + t));
    Ok(vec![left.placed(both_ends()), right.placed(both_ends())])
}

/// @acp:summary "Retaining wall and girder closure wall at each end"
pub fn layout_back_walls(config: &BridgeConfig) -> Result<Vec<PlacedShape>> {
    let half_l = config.total_length_m / 2.0;
    let inner = config.width_m / 2.0 - config.wing_wall_thickness;
    let depth = config.depth_of_girder;
    let clearance = config.bridge_clearance_height;

    let retaining = ShapeRecipe::cuboid(
        [half_l - BACK_WALL_THICKNESS, -inner, -depth - clearance],
        [half_l, inner, -depth],
    );
    let closure = ShapeRecipe::cuboid(
        [half_l, -inner, -depth - clearance],
        [half_l + CLOSURE_WALL_THICKNESS, inner, 0.0],
    );
    Ok(vec![retaining.placed(both_ends()), closure.placed(both_ends())])
}

/// @acp:summary "Approach slabs abutting each deck end"
pub fn layout_approach_slabs(config: &BridgeConfig) -> Result<Vec<PlacedShape>> {
    let half_l = config.total_length_m / 2.0;
    let half_w = config.width_m / 2.0;
    let slab = ShapeRecipe::cuboid(
        [half_l, -half_w, 0.0],
        [half_l + APPROACH_SLAB_LENGTH, half_w, config.deck_thickness],
    );
    Ok(vec![slab.placed(both_ends())])
}
