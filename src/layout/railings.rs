//! @acp:module "Railing Layout"
//! @acp:summary "Pole and bar safety railings along both deck edges"
//! @acp:domain dataset
//! @acp:layer service

use crate::error::Result;
use crate::geometry::{MirrorPlane, PlacedShape, Placement, ShapeRecipe};
use crate::model::BridgeConfig;
use crate::quantities::railing_pole_positions;

pub const POLE_HEIGHT: f64 = 1.0;
pub const POLE_SPACING: f64 = 2.5;
/// Square pole and bar section side (m)
pub const POLE_SIDE: f64 = 0.07;
pub const BARS_PER_SIDE: u32 = 3;

/// @acp:summary "One railing on the +Y edge, mirrored to the -Y edge"
///
/// Poles and bars form a single group so the mirror copy is made once
/// for the whole railing.
pub fn layout_railings(config: &BridgeConfig) -> Result<Vec<PlacedShape>> {
    let xs = railing_pole_positions(config.total_length_m, POLE_SPACING)?;
    let base = config.deck_top();
    let y_outer = config.width_m / 2.0;
    let y_inner = y_outer - POLE_SIDE;
    let h = POLE_SIDE / 2.0;

    let mut members: Vec<PlacedShape> = xs
        .iter()
        .map(|&x| {
            ShapeRecipe::cuboid([x - h, y_inner, base], [x + h, y_outer, base + POLE_HEIGHT])
                .at_origin()
        })
        .collect();

    if let (Some(&first), Some(&last)) = (xs.first(), xs.last()) {
        let gap = POLE_HEIGHT / BARS_PER_SIDE as f64;
        for i in 1..=BARS_PER_SIDE {
            let z = base + gap * i as f64;
            let bar = ShapeRecipe::cuboid([first, y_inner, z - h], [last, y_outer, z + h]);
            members.push(bar.at_origin());
        }
    }

    let railing = ShapeRecipe::Group(members);
    Ok(vec![railing.placed(Placement::mirrored(MirrorPlane::XZ))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::fixtures;

    fn members(config: &BridgeConfig) -> Vec<PlacedShape> {
        let mut parts = layout_railings(config).unwrap();
        assert_eq!(parts.len(), 1);
        let railing = parts.remove(0);
        assert_eq!(railing.placement.mirror, Some(MirrorPlane::XZ));
        match railing.recipe {
            ShapeRecipe::Group(members) => members,
            other => panic!("unexpected recipe {:?}", other),
        }
    }

    #[test]
    fn test_pole_and_bar_counts() {
        let members = members(&fixtures::beam_slab());
        // 47 m deck: 18 poles and 3 bars per side
        assert_eq!(members.len(), 18 + 3);
        assert!(members.iter().all(|p| p.placement == Placement::identity()));
    }

    #[test]
    fn test_railings_stand_on_deck_top() {
        let config = fixtures::box_girder(12.0, 2.16);
        let members = members(&config);
        match &members[0].recipe {
            ShapeRecipe::Cuboid { min, max } => {
                assert_eq!(min.z, config.deck_top());
                assert!((max.y - 6.0).abs() < 1e-12);
            }
            other => panic!("unexpected recipe {:?}", other),
        }
    }

    #[test]
    fn test_bars_span_end_poles() {
        let members = members(&fixtures::beam_slab());
        match &members.last().unwrap().recipe {
            ShapeRecipe::Cuboid { min, max } => {
                assert!((max.x - min.x - 2.5 * 17.0).abs() < 1e-9);
            }
            other => panic!("unexpected recipe {:?}", other),
        }
    }
}
