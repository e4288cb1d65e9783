//! @acp:module "Derived Quantities"
//! @acp:summary "Closed-form girder, cell, pier and deck-width formulas"
//! @acp:domain dataset
//! @acp:layer service
//!
//! Every function here is pure. Rounding happens at the same points the
//! persisted dataset expects, so positions computed here line up with the
//! numbers written to `bridge_summary.json`.

use serde::Serialize;

use crate::error::{BridgeError, Result};

/// Design lane width (m)
pub const LANE_WIDTH: f64 = 3.5;
/// Shoulder width on each side (m)
pub const SHOULDER_WIDTH: f64 = 3.0;
/// Barrier width on each side (m)
pub const BARRIER_WIDTH: f64 = 0.5;
/// Sidewalk width on each side (m)
pub const SIDEWALK_WIDTH: f64 = 1.5;
/// Minimum spacing between beam-slab girders (m)
pub const MIN_GIRDER_SPACING: f64 = 3.5;
/// Deck overhang left on each side of the box cells (m)
pub const BOX_CELL_EDGE_ALLOWANCE: f64 = 4.0;
/// End span length relative to an interior span
pub const END_SPAN_FACTOR: f64 = 0.7;

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// @acp:summary "Deck width from lane count and sidewalk flag"
pub fn pick_deck_width(lanes: u32, include_sidewalks: bool) -> f64 {
    let sidewalk = if include_sidewalks { SIDEWALK_WIDTH } else { 0.0 };
    let width = lanes as f64 * LANE_WIDTH + 2.0 * (SHOULDER_WIDTH + BARRIER_WIDTH) + 2.0 * sidewalk;
    round_to(width, 2)
}

/// @acp:summary "Number of girders and their spacing across a deck"
///
/// The girder count is `width / min_spacing` rounded half to even, never
/// fewer than two. The spacing is rounded to one decimal.
pub fn girder_spacing(width: f64, min_spacing: f64) -> Result<(u32, f64)> {
    if !(width > 0.0) {
        return Err(BridgeError::invalid("width_m", format!("must be positive, got {}", width)));
    }
    if !(min_spacing > 0.0) {
        return Err(BridgeError::invalid(
            "min_spacing",
            format!("must be positive, got {}", min_spacing),
        ));
    }
    let count = ((width / min_spacing).round_ties_even() as u32).max(2);
    Ok((count, round_to(width / count as f64, 1)))
}

/// @acp:summary "Box girder cell arrangement across the deck"
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellLayout {
    pub num_cells: u32,
    pub cell_width: f64,
    /// Set when depth/width exceeded 1/5 and the count was clamped to one
    pub clamped: bool,
}

/// @acp:summary "Pick one or two box cells from the depth to width ratio"
///
/// Ratios in [1/6, 1/5] give one cell and shallower sections give two.
/// Deeper sections are clamped to a single cell and flagged.
pub fn box_girder_cell_layout(width: f64, depth: f64) -> Result<CellLayout> {
    if width <= BOX_CELL_EDGE_ALLOWANCE {
        return Err(BridgeError::invalid(
            "width_m",
            format!(
                "box girder decks must be wider than {} m, got {}",
                BOX_CELL_EDGE_ALLOWANCE, width
            ),
        ));
    }
    if !(depth > 0.0) {
        return Err(BridgeError::invalid(
            "depth_of_girder",
            format!("must be positive, got {}", depth),
        ));
    }

    let ratio = depth / width;
    let (num_cells, clamped) = if ratio < 1.0 / 6.0 {
        (2, false)
    } else if ratio <= 1.0 / 5.0 {
        (1, false)
    } else {
        (1, true)
    };

    Ok(CellLayout {
        num_cells,
        cell_width: (width - BOX_CELL_EDGE_ALLOWANCE) / num_cells as f64,
        clamped,
    })
}

/// @acp:summary "Longitudinal pier coordinates relative to the bridge midpoint"
///
/// End spans are 0.7 of an interior span so that the spans sum back to
/// the total length.
pub fn pier_positions(total_length: f64, num_spans: u32) -> Result<Vec<f64>> {
    if num_spans < 2 {
        return Err(BridgeError::invalid(
            "num_spans",
            format!("must be at least 2, got {}", num_spans),
        ));
    }
    if !(total_length > 0.0) {
        return Err(BridgeError::invalid(
            "total_length_m",
            format!("must be positive, got {}", total_length),
        ));
    }

    // two end spans at 0.7 each stand in for 1.4 interior spans
    let interior = round_to(total_length / (num_spans as f64 - 0.6), 1);
    let end = round_to(interior * END_SPAN_FACTOR, 1);

    let mut spans = Vec::with_capacity(num_spans as usize);
    spans.push(end);
    spans.extend(std::iter::repeat(interior).take(num_spans as usize - 2));
    spans.push(end);

    let half = total_length / 2.0;
    let mut running = 0.0;
    let positions = spans[..spans.len() - 1]
        .iter()
        .map(|span| {
            running = round_to(running + span, 1);
            round_to(running - half, 1)
        })
        .collect();
    Ok(positions)
}

/// @acp:summary "Evenly spaced transverse coordinates centred on Y = 0"
pub fn pier_grid(width: f64, count: u32) -> Result<Vec<f64>> {
    if count == 0 {
        return Err(BridgeError::invalid("number_of_piers_across_width", "must be positive"));
    }
    if !(width > 0.0) {
        return Err(BridgeError::invalid("width_m", format!("must be positive, got {}", width)));
    }
    Ok(centred_positions(count, width / count as f64))
}

/// @acp:summary "Railing pole coordinates along a deck of the given length"
pub fn railing_pole_positions(length: f64, spacing: f64) -> Result<Vec<f64>> {
    if !(length > 0.0) || !(spacing > 0.0) {
        return Err(BridgeError::invalid(
            "total_length_m",
            format!("railing needs a positive length and spacing, got {} / {}", length, spacing),
        ));
    }
    let count = ((length / spacing).floor() as u32).max(2);
    Ok(centred_positions(count, spacing))
}

/// `count` positions `spacing` apart, symmetric about zero
pub fn centred_positions(count: u32, spacing: f64) -> Vec<f64> {
    let start = -spacing * (count as f64 - 1.0) / 2.0;
    (0..count).map(|i| start + spacing * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_deck_width() {
        assert_eq!(pick_deck_width(3, false), 17.5);
        assert_eq!(pick_deck_width(3, true), 20.5);
        assert_eq!(pick_deck_width(2, false), 14.0);
    }

    #[test]
    fn test_girder_spacing_examples() {
        assert_eq!(girder_spacing(8.0, 3.5).unwrap(), (2, 4.0));
        assert_eq!(girder_spacing(10.5, 3.5).unwrap(), (3, 3.5));
        assert_eq!(girder_spacing(17.5, 3.5).unwrap(), (5, 3.5));
    }

    #[test]
    fn test_girder_count_never_below_two() {
        assert_eq!(girder_spacing(1.0, 3.5).unwrap().0, 2);
    }

    #[test]
    fn test_girder_count_monotonic_in_width() {
        let mut last = 0;
        for step in 1..200 {
            let (count, _) = girder_spacing(step as f64 * 0.25, 3.5).unwrap();
            assert!(count >= last, "count dropped at width {}", step as f64 * 0.25);
            last = count;
        }
    }

    #[test]
    fn test_girder_spacing_rejects_non_positive() {
        assert_eq!(girder_spacing(0.0, 3.5).unwrap_err().field(), Some("width_m"));
        assert_eq!(girder_spacing(10.0, 0.0).unwrap_err().field(), Some("min_spacing"));
    }

    #[test]
    fn test_cell_layout_by_ratio() {
        let one = box_girder_cell_layout(10.0, 1.8).unwrap();
        assert_eq!(one.num_cells, 1);
        assert!(!one.clamped);
        assert!((one.cell_width - 6.0).abs() < EPS);

        let two = box_girder_cell_layout(10.0, 1.0).unwrap();
        assert_eq!(two.num_cells, 2);
        assert!((two.cell_width - 3.0).abs() < EPS);
    }

    #[test]
    fn test_cell_layout_deep_section_is_clamped() {
        let layout = box_girder_cell_layout(10.0, 3.0).unwrap();
        assert_eq!(layout.num_cells, 1);
        assert!(layout.clamped);
    }

    #[test]
    fn test_cell_layout_needs_edge_room() {
        let err = box_girder_cell_layout(4.0, 0.5).unwrap_err();
        assert_eq!(err.field(), Some("width_m"));
    }

    #[test]
    fn test_pier_positions_five_spans() {
        let positions = pier_positions(150.0, 5).unwrap();
        assert_eq!(positions, vec![-51.1, -17.0, 17.1, 51.2]);
        assert!(positions.windows(2).all(|w| w[1] > w[0]));

        let end_span = positions[0] + 75.0;
        let interior = positions[1] - positions[0];
        assert!((end_span / interior - 0.7).abs() < 1e-2);
    }

    #[test]
    fn test_pier_positions_two_spans() {
        let positions = pier_positions(62.0, 2).unwrap();
        assert_eq!(positions.len(), 1);
        assert!(positions[0].abs() < 1.0);
    }

    #[test]
    fn test_pier_positions_rejects_single_span() {
        assert!(pier_positions(40.0, 1).is_err());
        assert!(pier_positions(0.0, 3).is_err());
    }

    #[test]
    fn test_pier_grid_is_centred() {
        let ys = pier_grid(12.0, 3).unwrap();
        assert_eq!(ys, vec![-4.0, 0.0, 4.0]);
        assert_eq!(pier_grid(12.0, 1).unwrap(), vec![0.0]);
        assert!(pier_grid(12.0, 0).is_err());
    }

    #[test]
    fn test_railing_poles() {
        let poles = railing_pole_positions(47.0, 2.5).unwrap();
        assert_eq!(poles.len(), 18);
        assert!((poles[0] + poles[17]).abs() < EPS);
        assert_eq!(railing_pole_positions(3.0, 2.5).unwrap().len(), 2);
    }
}
