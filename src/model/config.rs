//! @acp:module "Bridge Configuration"
//! @acp:summary "Canonical immutable bridge configuration with per-deck extension"
//! @acp:domain dataset
//! @acp:layer model
//!
//! A [`BridgeConfig`] is a base record shared by every bridge plus a
//! [`DeckSection`] carrying the attributes only one deck family needs.
//! The bridge type is read off the deck variant, so the two cannot disagree.

use super::types::{BridgeType, PierCapType, PierCrossSection, PierType};
use crate::error::{BridgeError, Result};
use crate::quantities::box_girder_cell_layout;

/// Deck slab thickness (m)
pub const DEFAULT_DECK_THICKNESS: f64 = 0.3;
/// Wing wall thickness (m)
pub const DEFAULT_WING_WALL_THICKNESS: f64 = 0.5;
/// Ground to girder soffit (m)
pub const DEFAULT_CLEARANCE_HEIGHT: f64 = 5.0;
/// Oregon State standard column radius (m)
pub const DEFAULT_PIER_RADIUS: f64 = 0.6;
pub const DEFAULT_TOP_SLAB_THK: f64 = 0.25;
pub const DEFAULT_BOTTOM_SLAB_THK: f64 = 0.35;
pub const DEFAULT_WEB_THK: f64 = 0.5;

/// Upper bound on girder depth relative to span
pub const MAX_DEPTH_TO_SPAN: f64 = 0.1;

/// @acp:summary "Wall and slab thicknesses of a box girder section"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGirderSection {
    pub top_slab_thk: f64,
    pub bottom_slab_thk: f64,
    pub web_thk: f64,
}

impl Default for BoxGirderSection {
    fn default() -> Self {
        Self {
            top_slab_thk: DEFAULT_TOP_SLAB_THK,
            bottom_slab_thk: DEFAULT_BOTTOM_SLAB_THK,
            web_thk: DEFAULT_WEB_THK,
        }
    }
}

/// @acp:summary "Per-bridge-type extension of the base configuration"
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeckSection {
    BeamSlab,
    BoxGirder(BoxGirderSection),
}

impl DeckSection {
    /// Default extension for a bridge type
    pub fn for_type(bridge_type: BridgeType) -> Self {
        match bridge_type {
            BridgeType::BeamSlab => DeckSection::BeamSlab,
            BridgeType::BoxGirder => DeckSection::BoxGirder(BoxGirderSection::default()),
        }
    }

    pub fn bridge_type(&self) -> BridgeType {
        match self {
            DeckSection::BeamSlab => BridgeType::BeamSlab,
            DeckSection::BoxGirder(_) => BridgeType::BoxGirder,
        }
    }
}

/// @acp:summary "One generated bridge (immutable after creation)"
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    pub bridge_id: String,
    pub deck: DeckSection,
    pub pier_type: PierType,
    pub pier_cross_section: PierCrossSection,
    pub pier_cap_type: PierCapType,

    pub span_m: f64,
    pub num_spans: u32,
    pub total_length_m: f64,
    pub width_m: f64,
    pub depth_of_girder: f64,
    pub lanes: u32,
    pub include_sidewalks: bool,

    pub number_of_piers_along_length: u32,
    pub number_of_piers_across_width: u32,
    pub total_piers: u32,
    pub radius_of_pier: f64,

    pub deck_thickness: f64,
    pub wing_wall_thickness: f64,
    pub bridge_clearance_height: f64,
}

impl BridgeConfig {
    pub fn bridge_type(&self) -> BridgeType {
        self.deck.bridge_type()
    }

    /// Box section, or `MissingParameter` when the deck has none
    pub fn box_section(&self) -> Result<&BoxGirderSection> {
        match &self.deck {
            DeckSection::BoxGirder(section) => Ok(section),
            DeckSection::BeamSlab => Err(BridgeError::missing("web_thk", "box_girder")
                .for_bridge(&self.bridge_id)),
        }
    }

    /// Height of the deck top surface above the soffit plane
    pub fn deck_top(&self) -> f64 {
        match &self.deck {
            DeckSection::BeamSlab => self.deck_thickness,
            DeckSection::BoxGirder(section) => section.top_slab_thk,
        }
    }

    /// @acp:summary "Check every structural invariant, attaching the bridge id to failures"
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(|e| e.for_bridge(&self.bridge_id))
    }

    fn check(&self) -> Result<()> {
        if self.bridge_id.trim().is_empty() {
            return Err(BridgeError::invalid("bridge_id", "must not be empty"));
        }
        if self.num_spans < 2 {
            return Err(BridgeError::invalid(
                "num_spans",
                format!("must be at least 2, got {}", self.num_spans),
            ));
        }
        if self.lanes < 2 {
            return Err(BridgeError::invalid(
                "lanes",
                format!("must be at least 2, got {}", self.lanes),
            ));
        }
        positive("span_m", self.span_m)?;
        positive("width_m", self.width_m)?;
        positive("depth_of_girder", self.depth_of_girder)?;
        positive("radius_of_pier", self.radius_of_pier)?;
        positive("deck_thickness", self.deck_thickness)?;
        positive("wing_wall_thickness", self.wing_wall_thickness)?;
        positive("bridge_clearance_height", self.bridge_clearance_height)?;

        if self.total_length_m < self.span_m {
            return Err(BridgeError::invalid(
                "total_length_m",
                format!(
                    "{} is shorter than a single span of {}",
                    self.total_length_m, self.span_m
                ),
            ));
        }
        if self.depth_of_girder / self.span_m > MAX_DEPTH_TO_SPAN {
            return Err(BridgeError::invalid(
                "depth_of_girder",
                format!(
                    "{} exceeds {} of the {} m span",
                    self.depth_of_girder, MAX_DEPTH_TO_SPAN, self.span_m
                ),
            ));
        }
        if 2.0 * self.wing_wall_thickness >= self.width_m {
            return Err(BridgeError::invalid(
                "wing_wall_thickness",
                "two wing walls do not fit within the deck width",
            ));
        }

        if self.pier_type != self.bridge_type().pier_type() {
            return Err(BridgeError::invalid(
                "pier_type",
                format!(
                    "{} decks are carried on {} piers, got {}",
                    self.bridge_type(),
                    self.bridge_type().pier_type(),
                    self.pier_type
                ),
            ));
        }
        if self.number_of_piers_along_length != self.num_spans - 1 {
            return Err(BridgeError::invalid(
                "number_of_piers_along_length",
                format!(
                    "expected {} for {} spans, got {}",
                    self.num_spans - 1,
                    self.num_spans,
                    self.number_of_piers_along_length
                ),
            ));
        }
        if self.number_of_piers_across_width == 0 {
            return Err(BridgeError::invalid("number_of_piers_across_width", "must be positive"));
        }
        let expected_total = self
            .number_of_piers_along_length
            .checked_mul(self.number_of_piers_across_width)
            .ok_or_else(|| BridgeError::invalid("total_piers", "pier grid is too large"))?;
        if self.total_piers != expected_total {
            return Err(BridgeError::invalid(
                "total_piers",
                format!("expected {}, got {}", expected_total, self.total_piers),
            ));
        }

        if let DeckSection::BoxGirder(section) = &self.deck {
            positive("top_slab_thk", section.top_slab_thk)?;
            positive("bottom_slab_thk", section.bottom_slab_thk)?;
            positive("web_thk", section.web_thk)?;
            if section.top_slab_thk + section.bottom_slab_thk >= self.depth_of_girder {
                return Err(BridgeError::invalid(
                    "depth_of_girder",
                    "box cell has no void: slabs are thicker than the girder depth",
                ));
            }
            let cells = box_girder_cell_layout(self.width_m, self.depth_of_girder)?;
            if cells.cell_width <= 2.0 * section.web_thk {
                return Err(BridgeError::invalid(
                    "web_thk",
                    format!(
                        "box cell of width {:.2} m has no void between two {} m webs",
                        cells.cell_width, section.web_thk
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BridgeError::invalid(field, format!("must be positive, got {}", value)))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_fixtures_are_valid() {
        beam_slab().validate().unwrap();
        box_girder(12.0, 2.16).validate().unwrap();
    }

    #[test]
    fn test_single_span_rejected_with_bridge_id() {
        let mut cfg = beam_slab();
        cfg.num_spans = 1;
        cfg.number_of_piers_along_length = 0;
        let err = cfg.validate().unwrap_err();
        match err {
            BridgeError::InvalidConfiguration { bridge_id, field, .. } => {
                assert_eq!(bridge_id.as_deref(), Some("bridge_test"));
                assert_eq!(field, "num_spans");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_depth_bounded_by_span() {
        let mut cfg = beam_slab();
        cfg.depth_of_girder = 2.0;
        assert_eq!(cfg.validate().unwrap_err().field(), Some("depth_of_girder"));
    }

    #[test]
    fn test_pier_type_must_match_deck() {
        let mut cfg = beam_slab();
        cfg.pier_type = PierType::HammerHead;
        assert_eq!(cfg.validate().unwrap_err().field(), Some("pier_type"));
    }

    #[test]
    fn test_inconsistent_pier_totals() {
        let mut cfg = beam_slab();
        cfg.total_piers = 5;
        assert_eq!(cfg.validate().unwrap_err().field(), Some("total_piers"));
    }

    #[test]
    fn test_pier_grid_overflow_is_invalid() {
        let mut cfg = beam_slab();
        cfg.num_spans = 70_001;
        cfg.total_length_m = 15.0 * 70_001.0;
        cfg.number_of_piers_along_length = 70_000;
        cfg.number_of_piers_across_width = 70_000;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfiguration { .. }));
        assert_eq!(err.field(), Some("total_piers"));
    }

    #[test]
    fn test_webs_must_leave_a_void() {
        // 12 m deck, one cell of 8 m
        let mut cfg = box_girder(12.0, 2.16);
        if let DeckSection::BoxGirder(section) = &mut cfg.deck {
            section.web_thk = 4.0;
        }
        assert_eq!(cfg.validate().unwrap_err().field(), Some("web_thk"));

        if let DeckSection::BoxGirder(section) = &mut cfg.deck {
            section.web_thk = 3.9;
        }
        cfg.validate().unwrap();
    }

    #[test]
    fn test_box_section_access() {
        assert!(box_girder(12.0, 1.0).box_section().is_ok());
        let err = beam_slab().box_section().unwrap_err();
        assert!(matches!(err, BridgeError::MissingParameter { .. }));
    }

    #[test]
    fn test_deck_top_depends_on_section() {
        assert_eq!(beam_slab().deck_top(), DEFAULT_DECK_THICKNESS);
        assert_eq!(box_girder(12.0, 1.0).deck_top(), DEFAULT_TOP_SLAB_THK);
    }
}
