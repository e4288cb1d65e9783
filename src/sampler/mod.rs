//! @acp:module "Config Sampler"
//! @acp:summary "Seeded random sampling of structurally consistent bridge configurations"
//! @acp:domain dataset
//! @acp:layer service
//!
//! One RNG stream drives a whole batch. Each configuration consumes it in a
//! fixed order (type, lanes, span, depth ratio, span count, cross-section),
//! so a seed reproduces the same list on every platform.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::model::config::{
    BridgeConfig, DeckSection, DEFAULT_CLEARANCE_HEIGHT, DEFAULT_DECK_THICKNESS,
    DEFAULT_PIER_RADIUS, DEFAULT_WING_WALL_THICKNESS,
};
use crate::model::types::{BridgeType, PierCapType, PierCrossSection};
use crate::quantities::{pick_deck_width, round_to};

/// Piers placed across the width per traffic lane
pub const PIERS_PER_LANE: u32 = 1;
/// Span snapping step used by the fixed-range profile (m)
pub const FIXED_RANGE_STEP: f64 = 5.0;

/// @acp:summary "Per-type sampling ranges"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeRanges {
    pub span: (f64, f64),
    pub depth_ratio: (f64, f64),
}

impl TypeRanges {
    pub const fn for_type(bridge_type: BridgeType) -> Self {
        match bridge_type {
            BridgeType::BeamSlab => TypeRanges {
                span: (12.0, 18.0),
                depth_ratio: (0.06, 0.07),
            },
            BridgeType::BoxGirder => TypeRanges {
                span: (15.0, 37.0),
                depth_ratio: (0.05, 0.06),
            },
        }
    }

    /// Span bounds of the older generator, before lanes drove the width
    pub const fn fixed_range_span(bridge_type: BridgeType) -> (f64, f64) {
        match bridge_type {
            BridgeType::BeamSlab => (20.0, 50.0),
            BridgeType::BoxGirder => (50.0, 120.0),
        }
    }
}

/// @acp:summary "Which span derivation the sampler uses"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingProfile {
    /// Spans from the per-type table, width from the lane count
    #[default]
    LaneBased,
    /// Long spans snapped to 5 m steps, width still from the lane count
    FixedRange,
}

impl SamplingProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingProfile::LaneBased => "lane_based",
            SamplingProfile::FixedRange => "fixed_range",
        }
    }
}

impl fmt::Display for SamplingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplingProfile {
    type Err = BridgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "lane_based" => Ok(SamplingProfile::LaneBased),
            "fixed_range" => Ok(SamplingProfile::FixedRange),
            other => Err(BridgeError::invalid(
                "profile",
                format!("unsupported value '{}' (expected lane_based or fixed_range)", other),
            )),
        }
    }
}

/// @acp:summary "Sampler knobs that are not part of the fixed range tables"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerOptions {
    #[serde(default)]
    pub profile: SamplingProfile,

    #[serde(default = "default_include_sidewalks")]
    pub include_sidewalks: bool,

    /// Deck overhang beyond the end supports at each end (m)
    #[serde(default = "default_overhang")]
    pub overhang_m: f64,
}

fn default_include_sidewalks() -> bool {
    true
}

fn default_overhang() -> f64 {
    1.0
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            profile: SamplingProfile::default(),
            include_sidewalks: default_include_sidewalks(),
            overhang_m: default_overhang(),
        }
    }
}

/// @acp:summary "Draws batches of bridge configurations"
#[derive(Debug, Clone, Default)]
pub struct ConfigSampler {
    options: SamplerOptions,
}

impl ConfigSampler {
    pub fn new(options: SamplerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    /// @acp:summary "Sample `count` configurations, ids bridge_1..bridge_count"
    ///
    /// With `bridge_type` omitted every configuration draws its own type.
    /// Without a seed the stream is seeded from the OS.
    pub fn sample(
        &self,
        count: usize,
        bridge_type: Option<BridgeType>,
        seed: Option<u64>,
    ) -> Result<Vec<BridgeConfig>> {
        if count == 0 {
            return Err(BridgeError::invalid("num_bridges", "must be at least 1"));
        }
        if !(self.options.overhang_m >= 0.0) {
            return Err(BridgeError::invalid(
                "overhang_m",
                format!("must not be negative, got {}", self.options.overhang_m),
            ));
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut configs = Vec::with_capacity(count);
        for idx in 1..=count {
            let config = self.sample_one(&mut rng, format!("bridge_{}", idx), bridge_type)?;
            tracing::debug!(
                bridge_id = %config.bridge_id,
                bridge_type = %config.bridge_type(),
                span_m = config.span_m,
                num_spans = config.num_spans,
                "sampled configuration"
            );
            configs.push(config);
        }
        Ok(configs)
    }

    /// @acp:summary "Like `sample`, taking the bridge type as a string"
    pub fn sample_named(
        &self,
        count: usize,
        bridge_type: Option<&str>,
        seed: Option<u64>,
    ) -> Result<Vec<BridgeConfig>> {
        let bridge_type = bridge_type.map(str::parse::<BridgeType>).transpose()?;
        self.sample(count, bridge_type, seed)
    }

    fn sample_one<R: Rng>(
        &self,
        rng: &mut R,
        bridge_id: String,
        requested: Option<BridgeType>,
    ) -> Result<BridgeConfig> {
        let bridge_type = match requested {
            Some(t) => t,
            None => BridgeType::ALL[rng.random_range(0..BridgeType::ALL.len())],
        };
        let ranges = TypeRanges::for_type(bridge_type);

        let lanes: u32 = rng.random_range(2..=5);

        let raw_span = match self.options.profile {
            SamplingProfile::LaneBased => rng.random_range(ranges.span.0..=ranges.span.1),
            SamplingProfile::FixedRange => {
                let (lo, hi) = TypeRanges::fixed_range_span(bridge_type);
                let drawn: f64 = rng.random_range(lo..=hi);
                (drawn / FIXED_RANGE_STEP).round_ties_even() * FIXED_RANGE_STEP
            }
        };
        let depth_ratio = rng.random_range(ranges.depth_ratio.0..=ranges.depth_ratio.1);
        let num_spans: u32 = rng.random_range(2..=5);
        let cross_section =
            PierCrossSection::ALL[rng.random_range(0..PierCrossSection::ALL.len())];

        let include_sidewalks = self.options.include_sidewalks;
        let total_length = raw_span * num_spans as f64 + 2.0 * self.options.overhang_m;

        let along = num_spans - 1;
        let across = lanes * PIERS_PER_LANE;

        let config = BridgeConfig {
            bridge_id,
            deck: DeckSection::for_type(bridge_type),
            pier_type: bridge_type.pier_type(),
            pier_cross_section: cross_section,
            pier_cap_type: PierCapType::Prismatic,
            span_m: round_to(raw_span, 1),
            num_spans,
            total_length_m: round_to(total_length, 1),
            width_m: pick_deck_width(lanes, include_sidewalks),
            depth_of_girder: round_to(raw_span * depth_ratio, 1),
            lanes,
            include_sidewalks,
            number_of_piers_along_length: along,
            number_of_piers_across_width: across,
            total_piers: along * across,
            radius_of_pier: DEFAULT_PIER_RADIUS,
            deck_thickness: DEFAULT_DECK_THICKNESS,
            wing_wall_thickness: DEFAULT_WING_WALL_THICKNESS,
            bridge_clearance_height: DEFAULT_CLEARANCE_HEIGHT,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::PierType;
    use pretty_assertions::assert_eq;

    fn sampler() -> ConfigSampler {
        ConfigSampler::default()
    }

    #[test]
    fn test_same_seed_same_batch() {
        let a = sampler().sample(5, None, Some(42)).unwrap();
        let b = sampler().sample(5, None, Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ids_are_one_based() {
        let configs = sampler().sample(3, None, Some(7)).unwrap();
        let ids: Vec<_> = configs.iter().map(|c| c.bridge_id.as_str()).collect();
        assert_eq!(ids, vec!["bridge_1", "bridge_2", "bridge_3"]);
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = sampler().sample(0, None, Some(1)).unwrap_err();
        assert_eq!(err.field(), Some("num_bridges"));
    }

    #[test]
    fn test_unknown_type_name_rejected() {
        let err = sampler().sample_named(2, Some("suspension"), Some(1)).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_ranges_respected() {
        for config in sampler().sample(200, None, Some(9)).unwrap() {
            let ranges = TypeRanges::for_type(config.bridge_type());
            assert!(config.span_m >= ranges.span.0 - 0.05 && config.span_m <= ranges.span.1 + 0.05);
            assert!((2..=5).contains(&config.num_spans));
            assert!((2..=5).contains(&config.lanes));
            assert!(config.depth_of_girder / config.span_m <= 0.1);
            assert_eq!(config.pier_type, config.bridge_type().pier_type());
            assert_eq!(config.number_of_piers_across_width, config.lanes);
            assert_eq!(
                config.total_length_m,
                round_to(config.total_length_m, 1),
                "total length is rounded to one decimal"
            );
        }
    }

    #[test]
    fn test_requested_type_is_honoured() {
        let configs = sampler().sample(20, Some(BridgeType::BoxGirder), Some(3)).unwrap();
        assert!(configs.iter().all(|c| c.bridge_type() == BridgeType::BoxGirder));
        assert!(configs.iter().all(|c| c.pier_type == PierType::HammerHead));
        assert!(configs.iter().all(|c| c.box_section().is_ok()));
    }

    #[test]
    fn test_three_lanes_without_sidewalks() {
        let sampler = ConfigSampler::new(SamplerOptions {
            include_sidewalks: false,
            ..SamplerOptions::default()
        });
        let found = (0..100u64)
            .flat_map(|seed| sampler.sample(4, Some(BridgeType::BeamSlab), Some(seed)).unwrap())
            .find(|c| c.lanes == 3)
            .expect("some seed yields a three-lane bridge");
        assert_eq!(found.width_m, 17.5);
    }

    #[test]
    fn test_fixed_range_snaps_spans() {
        let sampler = ConfigSampler::new(SamplerOptions {
            profile: SamplingProfile::FixedRange,
            ..SamplerOptions::default()
        });
        for config in sampler.sample(50, None, Some(11)).unwrap() {
            assert_eq!(config.span_m % FIXED_RANGE_STEP, 0.0);
            let (lo, hi) = TypeRanges::fixed_range_span(config.bridge_type());
            assert!(config.span_m >= lo && config.span_m <= hi);
        }
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!("fixed-range".parse::<SamplingProfile>().unwrap(), SamplingProfile::FixedRange);
        assert!("random".parse::<SamplingProfile>().is_err());
    }
}
