//! @acp:module "Pier Layout"
//! @acp:summary "Multicolumn and hammerhead pier rows"
//! @acp:domain dataset
//! @acp:layer service

use crate::error::{BridgeError, Result};
use crate::geometry::{MirrorPlane, PlacedShape, Placement, ShapeRecipe, SketchPlane};
use crate::model::{BridgeConfig, PierCrossSection, PierType};
use crate::quantities::{box_girder_cell_layout, pier_grid, pier_positions};

/// Prismatic cap height on multicolumn piers (m)
pub const MULTICOLUMN_CAP_HEIGHT: f64 = 0.5;
/// Straight part of the hammerhead cap (m)
pub const HAMMERHEAD_STRAIGHT_HEIGHT: f64 = 1.0;
/// Flared part of the hammerhead cap (m)
pub const HAMMERHEAD_SLANT_HEIGHT: f64 = 1.0;
/// Half the cap thickness along the bridge (m)
pub const HAMMERHEAD_HALF_THICKNESS: f64 = 1.0;
/// Width of a rectangular hammerhead column across the bridge (m)
pub const HAMMERHEAD_RECT_WIDTH: f64 = 1.8;

/// @acp:summary "Pier parts for the configured pier family"
pub fn layout_piers(config: &BridgeConfig) -> Result<Vec<PlacedShape>> {
    let xs = pier_positions(config.total_length_m, config.num_spans)?;
    if xs.len() != config.number_of_piers_along_length as usize {
        return Err(BridgeError::invalid(
            "number_of_piers_along_length",
            format!(
                "{} spans place {} piers, got {}",
                config.num_spans,
                xs.len(),
                config.number_of_piers_along_length
            ),
        ));
    }
    let ys = pier_grid(config.width_m, config.number_of_piers_across_width)?;

    match config.pier_type {
        PierType::Multicolumn => Ok(multicolumn(config, &xs, &ys)),
        PierType::HammerHead => hammer_head(config, &xs, &ys),
    }
}

fn multicolumn(config: &BridgeConfig, xs: &[f64], ys: &[f64]) -> Vec<PlacedShape> {
    let r = config.radius_of_pier;
    let cap_bottom = -config.depth_of_girder - MULTICOLUMN_CAP_HEIGHT;
    let column_z = (cap_bottom - config.bridge_clearance_height, cap_bottom);
    let half_w = config.width_m / 2.0;

    let mut parts = Vec::with_capacity(xs.len() * (ys.len() + 1));
    for &x in xs {
        for &y in ys {
            let column = match config.pier_cross_section {
                PierCrossSection::Circular => ShapeRecipe::column(x, y, r, column_z),
                PierCrossSection::Rectangular => ShapeRecipe::cuboid(
                    [x - r / 2.0, y - r / 2.0, column_z.0],
                    [x + r / 2.0, y + r / 2.0, column_z.1],
                ),
            };
            parts.push(column.at_origin());
        }
        // one cap per row, under the girders, as thick as a column
        let cap = ShapeRecipe::cuboid(
            [x - r, -half_w, cap_bottom],
            [x + r, half_w, -config.depth_of_girder],
        );
        parts.push(cap.at_origin());
    }
    parts
}

fn hammer_head(config: &BridgeConfig, xs: &[f64], ys: &[f64]) -> Result<Vec<PlacedShape>> {
    // caps are sized from the box cells they carry
    config.box_section()?;
    let cells = box_girder_cell_layout(config.width_m, config.depth_of_girder)?;

    let r = config.radius_of_pier;
    let cap_height = HAMMERHEAD_STRAIGHT_HEIGHT + HAMMERHEAD_SLANT_HEIGHT;
    let lower_width = match config.pier_cross_section {
        PierCrossSection::Circular => 2.0 * r,
        PierCrossSection::Rectangular => HAMMERHEAD_RECT_WIDTH,
    };
    let cap_width = cells.cell_width;
    let column_top = -config.depth_of_girder - cap_height;
    let column_z = (column_top - config.bridge_clearance_height, column_top);
    let t = HAMMERHEAD_HALF_THICKNESS;

    let profile = [
        [cap_width / 2.0, 0.0],
        [cap_width / 2.0, -HAMMERHEAD_STRAIGHT_HEIGHT],
        [lower_width / 2.0, -cap_height],
        [0.0, -cap_height],
        [0.0, 0.0],
    ];

    let mut parts = Vec::with_capacity(xs.len() * ys.len() * 2);
    for &x in xs {
        for &y in ys {
            let column = match config.pier_cross_section {
                PierCrossSection::Circular => ShapeRecipe::column(x, y, r, column_z),
                PierCrossSection::Rectangular => ShapeRecipe::cuboid(
                    [x - t, y - lower_width / 2.0, column_z.0],
                    [x + t, y + lower_width / 2.0, column_z.1],
                ),
            };
            parts.push(column.at_origin());

            let cap = ShapeRecipe::prism(SketchPlane::YZ, &profile, (-t, t));
            let placement = Placement::translate(x, y, -config.depth_of_girder)
                .with_mirror(MirrorPlane::XZ);
            parts.push(cap.placed(placement));
        }
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::fixtures;

    #[test]
    fn test_multicolumn_counts() {
        let config = fixtures::beam_slab();
        let parts = layout_piers(&config).unwrap();
        // two rows of three columns plus a cap per row
        assert_eq!(parts.len(), 2 * 3 + 2);
    }

    #[test]
    fn test_multicolumn_columns_sit_under_caps() {
        let config = fixtures::beam_slab();
        let parts = layout_piers(&config).unwrap();
        match &parts[0].recipe {
            ShapeRecipe::Cylinder { extent, radius, .. } => {
                assert_eq!(*radius, 0.6);
                assert_eq!(extent.1, -1.5);
                assert_eq!(extent.0, -6.5);
            }
            other => panic!("unexpected recipe {:?}", other),
        }
    }

    #[test]
    fn test_hammer_head_parts() {
        let mut config = fixtures::box_girder(12.0, 2.16);
        config.pier_cross_section = PierCrossSection::Rectangular;
        let parts = layout_piers(&config).unwrap();
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().any(|p| p.placement.mirror == Some(MirrorPlane::XZ)));
    }

    #[test]
    fn test_hammer_head_needs_box_section() {
        let mut config = fixtures::beam_slab();
        config.pier_type = PierType::HammerHead;
        let err = layout_piers(&config).unwrap_err();
        assert!(matches!(err, BridgeError::MissingParameter { .. }));
    }

    #[test]
    fn test_two_spans_one_row() {
        let config = fixtures::box_girder(12.0, 2.16);
        let parts = layout_piers(&config).unwrap();
        assert_eq!(parts.len(), 4);
        let cap_rows: Vec<f64> = parts
            .iter()
            .filter(|p| p.placement.mirror.is_some())
            .map(|p| p.placement.translation.x)
            .collect();
        assert_eq!(cap_rows, vec![0.0, 0.0]);
    }
}
