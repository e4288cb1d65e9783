//! @acp:module "Bridge Records"
//! @acp:summary "Flat persisted form of a bridge configuration (bridge_summary.json)"
//! @acp:domain dataset
//! @acp:layer model
//!
//! Field names are the durable contract read by the scan simulation and
//! segmentation stages. Do not rename them.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config::{
    BoxGirderSection, BridgeConfig, DeckSection, DEFAULT_CLEARANCE_HEIGHT, DEFAULT_DECK_THICKNESS,
    DEFAULT_PIER_RADIUS, DEFAULT_WING_WALL_THICKNESS,
};
use super::types::{BridgeType, PierCapType, PierCrossSection, PierType};
use crate::error::{BridgeError, Result};

/// Fixed name of the dataset summary file
pub const SUMMARY_FILE_NAME: &str = "bridge_summary.json";

/// @acp:summary "One bridge as a flat field-name to value mapping"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeRecord {
    pub bridge_id: String,
    pub bridge_type: String,
    pub span_m: f64,
    pub num_spans: u32,
    pub total_length_m: f64,
    pub width_m: f64,
    pub lanes: u32,
    pub include_sidewalks: bool,
    pub depth_of_girder: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_piers_along_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_piers_across_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_piers: Option<u32>,
    #[serde(default = "default_pier_radius")]
    pub radius_of_pier: f64,
    pub pier_type: String,
    #[serde(default = "default_pier_cap_type")]
    pub pier_cap_type: String,
    pub pier_cross_section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_slab_thk: Option<f64>,
    #[serde(default = "default_clearance")]
    pub bridge_clearance_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_slab_thk: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_thk: Option<f64>,
    #[serde(default = "default_deck_thickness")]
    pub deck_thickness: f64,
    #[serde(default = "default_wing_wall_thickness")]
    pub wing_wall_thickness: f64,
}

fn default_pier_radius() -> f64 {
    DEFAULT_PIER_RADIUS
}

fn default_pier_cap_type() -> String {
    PierCapType::Prismatic.as_str().to_string()
}

fn default_clearance() -> f64 {
    DEFAULT_CLEARANCE_HEIGHT
}

fn default_deck_thickness() -> f64 {
    DEFAULT_DECK_THICKNESS
}

fn default_wing_wall_thickness() -> f64 {
    DEFAULT_WING_WALL_THICKNESS
}

impl From<&BridgeConfig> for BridgeRecord {
    fn from(config: &BridgeConfig) -> Self {
        let section = match &config.deck {
            DeckSection::BoxGirder(section) => Some(*section),
            DeckSection::BeamSlab => None,
        };
        Self {
            bridge_id: config.bridge_id.clone(),
            bridge_type: config.bridge_type().as_str().to_string(),
            span_m: config.span_m,
            num_spans: config.num_spans,
            total_length_m: config.total_length_m,
            width_m: config.width_m,
            lanes: config.lanes,
            include_sidewalks: config.include_sidewalks,
            depth_of_girder: config.depth_of_girder,
            number_of_piers_along_length: Some(config.number_of_piers_along_length),
            number_of_piers_across_width: Some(config.number_of_piers_across_width),
            total_piers: Some(config.total_piers),
            radius_of_pier: config.radius_of_pier,
            pier_type: config.pier_type.as_str().to_string(),
            pier_cap_type: config.pier_cap_type.as_str().to_string(),
            pier_cross_section: config.pier_cross_section.as_str().to_string(),
            top_slab_thk: section.map(|s| s.top_slab_thk),
            bridge_clearance_height: config.bridge_clearance_height,
            bottom_slab_thk: section.map(|s| s.bottom_slab_thk),
            web_thk: section.map(|s| s.web_thk),
            deck_thickness: config.deck_thickness,
            wing_wall_thickness: config.wing_wall_thickness,
        }
    }
}

impl TryFrom<BridgeRecord> for BridgeConfig {
    type Error = BridgeError;

    fn try_from(record: BridgeRecord) -> Result<Self> {
        let id = record.bridge_id.clone();
        let config = build_config(record).map_err(|e| e.for_bridge(&id))?;
        config.validate()?;
        Ok(config)
    }
}

fn build_config(record: BridgeRecord) -> Result<BridgeConfig> {
    let bridge_type: BridgeType = record.bridge_type.parse()?;
    let pier_type: PierType = record.pier_type.parse()?;
    let pier_cross_section: PierCrossSection = record.pier_cross_section.parse()?;
    let pier_cap_type: PierCapType = record.pier_cap_type.parse()?;

    let deck = match bridge_type {
        BridgeType::BeamSlab => DeckSection::BeamSlab,
        BridgeType::BoxGirder => DeckSection::BoxGirder(BoxGirderSection {
            top_slab_thk: require(record.top_slab_thk, "top_slab_thk", bridge_type)?,
            bottom_slab_thk: require(record.bottom_slab_thk, "bottom_slab_thk", bridge_type)?,
            web_thk: require(record.web_thk, "web_thk", bridge_type)?,
        }),
    };

    let across = record
        .number_of_piers_across_width
        .ok_or_else(|| BridgeError::missing("number_of_piers_across_width", pier_type.as_str()))?;
    let along = record
        .number_of_piers_along_length
        .unwrap_or_else(|| record.num_spans.saturating_sub(1));
    let total_piers = match record.total_piers {
        Some(total) => total,
        None => along
            .checked_mul(across)
            .ok_or_else(|| BridgeError::invalid("total_piers", "pier grid is too large"))?,
    };

    Ok(BridgeConfig {
        bridge_id: record.bridge_id,
        deck,
        pier_type,
        pier_cross_section,
        pier_cap_type,
        span_m: record.span_m,
        num_spans: record.num_spans,
        total_length_m: record.total_length_m,
        width_m: record.width_m,
        depth_of_girder: record.depth_of_girder,
        lanes: record.lanes,
        include_sidewalks: record.include_sidewalks,
        number_of_piers_along_length: along,
        number_of_piers_across_width: across,
        total_piers,
        radius_of_pier: record.radius_of_pier,
        deck_thickness: record.deck_thickness,
        wing_wall_thickness: record.wing_wall_thickness,
        bridge_clearance_height: record.bridge_clearance_height,
    })
}

fn require(value: Option<f64>, field: &str, bridge_type: BridgeType) -> Result<f64> {
    value.ok_or_else(|| BridgeError::missing(field, bridge_type.as_str()))
}

impl BridgeConfig {
    /// @acp:summary "Flat persisted form of this configuration"
    pub fn to_record(&self) -> BridgeRecord {
        BridgeRecord::from(self)
    }
}

/// Convert a batch of configurations to records
pub fn configs_to_records(configs: &[BridgeConfig]) -> Vec<BridgeRecord> {
    configs.iter().map(BridgeRecord::from).collect()
}

/// @acp:summary "Write records as a pretty JSON array"
pub fn write_records<P: AsRef<Path>>(path: P, records: &[BridgeRecord]) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

/// @acp:summary "Read a summary file back into records"
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<BridgeRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
