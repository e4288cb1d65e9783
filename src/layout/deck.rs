//! @acp:module "Deck Layout"
//! @acp:summary "Beam-slab and box-girder deck cross-sections"
//! @acp:domain dataset
//! @acp:layer service

use crate::error::Result;
use crate::geometry::{MirrorPlane, PlacedShape, Placement, ShapeRecipe, SketchPlane};
use crate::model::{BoxGirderSection, BridgeConfig, DeckSection};
use crate::quantities::{
    box_girder_cell_layout, centred_positions, girder_spacing, BOX_CELL_EDGE_ALLOWANCE,
    MIN_GIRDER_SPACING,
};

/// Beam-slab girder web width (m)
pub const GIRDER_WIDTH: f64 = 0.5;
/// Chamfer on the bottom longitudinal edges (m)
pub const DECK_CHAMFER: f64 = 0.1;
/// Haunch depth where it meets the box (m)
pub const HAUNCH_INNER_DEPTH: f64 = 0.4;
/// Haunch depth at the slab edge (m)
pub const HAUNCH_OUTER_DEPTH: f64 = 0.2;
/// Solid end block closing each box cell (m)
pub const END_DIAPHRAGM_LENGTH: f64 = 0.5;

/// @acp:summary "Deck parts for the configured bridge type"
pub fn layout_deck(config: &BridgeConfig) -> Result<Vec<PlacedShape>> {
    match &config.deck {
        DeckSection::BeamSlab => beam_slab_deck(config),
        DeckSection::BoxGirder(section) => box_girder_deck(config, section),
    }
}

fn along_deck(config: &BridgeConfig) -> (f64, f64) {
    let half = config.total_length_m / 2.0;
    (-half, half)
}

fn beam_slab_deck(config: &BridgeConfig) -> Result<Vec<PlacedShape>> {
    let half_w = config.width_m / 2.0;
    let thk = config.deck_thickness;
    let depth = config.depth_of_girder;
    let extent = along_deck(config);

    let c = DECK_CHAMFER.min(thk / 2.0);
    let slab = ShapeRecipe::prism(
        SketchPlane::YZ,
        &[
            [-half_w + c, 0.0],
            [half_w - c, 0.0],
            [half_w, c],
            [half_w, thk],
            [-half_w, thk],
            [-half_w, c],
        ],
        extent,
    );

    let (count, spacing) = girder_spacing(config.width_m, MIN_GIRDER_SPACING)?;
    let g = GIRDER_WIDTH / 2.0;
    let gc = DECK_CHAMFER.min(depth / 2.0).min(g);

    let mut parts = vec![slab.at_origin()];
    for y in centred_positions(count, spacing) {
        let girder = ShapeRecipe::prism(
            SketchPlane::YZ,
            &[
                [y - g + gc, -depth],
                [y + g - gc, -depth],
                [y + g, -depth + gc],
                [y + g, 0.0],
                [y - g, 0.0],
                [y - g, -depth + gc],
            ],
            extent,
        );
        parts.push(girder.at_origin());
    }
    Ok(parts)
}

fn box_girder_deck(config: &BridgeConfig, section: &BoxGirderSection) -> Result<Vec<PlacedShape>> {
    let half_w = config.width_m / 2.0;
    let depth = config.depth_of_girder;
    let extent = along_deck(config);
    let (x0, x1) = extent;

    let cells = box_girder_cell_layout(config.width_m, depth)?;
    if cells.clamped {
        tracing::warn!(
            bridge_id = %config.bridge_id,
            ratio = depth / config.width_m,
            "girder depth exceeds 1/5 of the deck width, using a single box cell"
        );
    }

    let top_slab = ShapeRecipe::cuboid([x0, -half_w, 0.0], [x1, half_w, section.top_slab_thk]);
    let mut parts = vec![top_slab.at_origin()];

    let bw = cells.cell_width;
    let web = section.web_thk;
    // voids stop short of the deck ends so each one is fully enclosed
    let diaphragm = END_DIAPHRAGM_LENGTH.min(config.total_length_m / 4.0);
    for y in centred_positions(cells.num_cells, bw) {
        let outer = ShapeRecipe::cuboid([x0, y - bw / 2.0, -depth], [x1, y + bw / 2.0, 0.0]);
        let void = ShapeRecipe::cuboid(
            [x0 + diaphragm, y - bw / 2.0 + web, -depth + section.bottom_slab_thk],
            [x1 - diaphragm, y + bw / 2.0 - web, -section.top_slab_thk],
        );
        parts.push(ShapeRecipe::cut(outer, void).at_origin());
    }

    // haunch runs from the outermost web to the slab edge
    let edge = half_w - BOX_CELL_EDGE_ALLOWANCE / 2.0;
    let haunch = ShapeRecipe::prism(
        SketchPlane::YZ,
        &[
            [edge, -HAUNCH_INNER_DEPTH],
            [half_w, -HAUNCH_INNER_DEPTH + HAUNCH_OUTER_DEPTH],
            [half_w, 0.0],
            [edge, 0.0],
        ],
        extent,
    );
    parts.push(haunch.placed(Placement::mirrored(MirrorPlane::XZ)));
    Ok(parts)
}
