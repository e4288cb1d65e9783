//! @acp:module "Model Types"
//! @acp:summary "Classification enums for bridges and piers"
//! @acp:domain dataset
//! @acp:layer types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// @acp:summary "Deck construction family"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeType {
    /// Flat slab over solid longitudinal ribs
    BeamSlab,
    /// Top slab over hollow box cells
    BoxGirder,
}

impl BridgeType {
    pub const ALL: [BridgeType; 2] = [BridgeType::BeamSlab, BridgeType::BoxGirder];

    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeType::BeamSlab => "beam_slab",
            BridgeType::BoxGirder => "box_girder",
        }
    }

    /// Pier family this deck is carried on
    pub fn pier_type(&self) -> PierType {
        match self {
            BridgeType::BeamSlab => PierType::Multicolumn,
            BridgeType::BoxGirder => PierType::HammerHead,
        }
    }
}

impl fmt::Display for BridgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BridgeType {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beam_slab" => Ok(BridgeType::BeamSlab),
            "box_girder" => Ok(BridgeType::BoxGirder),
            other => Err(BridgeError::invalid(
                "bridge_type",
                format!("unsupported value '{}' (expected beam_slab or box_girder)", other),
            )),
        }
    }
}

/// @acp:summary "Pier family"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PierType {
    /// Row of columns under a shared prismatic cap
    Multicolumn,
    /// Single columns under flared caps
    HammerHead,
}

impl PierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PierType::Multicolumn => "multicolumn",
            PierType::HammerHead => "hammer_head",
        }
    }
}

impl fmt::Display for PierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PierType {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multicolumn" => Ok(PierType::Multicolumn),
            "hammer_head" => Ok(PierType::HammerHead),
            other => Err(BridgeError::invalid(
                "pier_type",
                format!("unsupported value '{}' (expected multicolumn or hammer_head)", other),
            )),
        }
    }
}

/// @acp:summary "Column cross-section"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PierCrossSection {
    Circular,
    Rectangular,
}

impl PierCrossSection {
    pub const ALL: [PierCrossSection; 2] = [PierCrossSection::Circular, PierCrossSection::Rectangular];

    pub fn as_str(&self) -> &'static str {
        match self {
            PierCrossSection::Circular => "circular",
            PierCrossSection::Rectangular => "rectangular",
        }
    }
}

impl fmt::Display for PierCrossSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PierCrossSection {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "circular" => Ok(PierCrossSection::Circular),
            "rectangular" => Ok(PierCrossSection::Rectangular),
            other => Err(BridgeError::invalid(
                "pier_cross_section",
                format!("unsupported value '{}' (expected circular or rectangular)", other),
            )),
        }
    }
}

/// @acp:summary "Pier cap shape (only prismatic is supported)"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PierCapType {
    #[default]
    Prismatic,
}

impl PierCapType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PierCapType::Prismatic => "prismatic",
        }
    }
}

impl fmt::Display for PierCapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PierCapType {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prismatic" => Ok(PierCapType::Prismatic),
            other => Err(BridgeError::invalid(
                "pier_cap_type",
                format!("unsupported value '{}' (expected prismatic)", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_type_from_str() {
        assert_eq!("beam_slab".parse::<BridgeType>().unwrap(), BridgeType::BeamSlab);
        assert_eq!("BOX_GIRDER".parse::<BridgeType>().unwrap(), BridgeType::BoxGirder);
        let err = "suspension".parse::<BridgeType>().unwrap_err();
        assert_eq!(err.field(), Some("bridge_type"));
    }

    #[test]
    fn test_pier_type_follows_deck() {
        assert_eq!(BridgeType::BeamSlab.pier_type(), PierType::Multicolumn);
        assert_eq!(BridgeType::BoxGirder.pier_type(), PierType::HammerHead);
    }

    #[test]
    fn test_serialization_matches_display() {
        for t in BridgeType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t));
        }
        let json = serde_json::to_string(&PierType::HammerHead).unwrap();
        assert_eq!(json, "\"hammer_head\"");
    }

    #[test]
    fn test_unknown_cross_section() {
        assert!("hexagonal".parse::<PierCrossSection>().is_err());
        assert_eq!(
            "Rectangular".parse::<PierCrossSection>().unwrap(),
            PierCrossSection::Rectangular
        );
    }
}
