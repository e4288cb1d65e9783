//! @acp:module "Component Layout"
//! @acp:summary "Translates a bridge configuration into placed component recipes"
//! @acp:domain dataset
//! @acp:layer service
//!
//! Coordinates: X runs along the bridge, Y across it, Z up. The bridge is
//! symmetric about X = 0 and Y = 0. Z = 0 is the deck soffit plane (top of
//! the girders) and the deck slab sits on it.

pub mod deck;
pub mod piers;
pub mod railings;
pub mod walls;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::geometry::PlacedShape;
use crate::model::BridgeConfig;

/// @acp:summary "Named bridge components, in build order"
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Deck,
    ApproachSlabs,
    Railings,
    Piers,
    WingWalls,
    BackWalls,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Deck,
        ComponentKind::ApproachSlabs,
        ComponentKind::Railings,
        ComponentKind::Piers,
        ComponentKind::WingWalls,
        ComponentKind::BackWalls,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Deck => "deck",
            ComponentKind::ApproachSlabs => "approach_slabs",
            ComponentKind::Railings => "railings",
            ComponentKind::Piers => "piers",
            ComponentKind::WingWalls => "wing_walls",
            ComponentKind::BackWalls => "back_walls",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ComponentKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                BridgeError::invalid("component", format!("unknown component '{}'", s.trim()))
            })
    }
}

/// @acp:summary "A named solid described as a list of placed recipes"
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub kind: ComponentKind,
    pub parts: Vec<PlacedShape>,
}

impl Component {
    pub fn new(kind: ComponentKind, parts: Vec<PlacedShape>) -> Self {
        Self { kind, parts }
    }

    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// @acp:summary "Caller-declared presence of optional components"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Safety railings along both deck edges
    #[serde(default = "default_railings_required")]
    pub railings_required: bool,

    /// Components declared absent for every bridge
    #[serde(default)]
    pub excluded: BTreeSet<ComponentKind>,
}

fn default_railings_required() -> bool {
    true
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            railings_required: default_railings_required(),
            excluded: BTreeSet::new(),
        }
    }
}

impl LayoutOptions {
    pub fn is_present(&self, kind: ComponentKind) -> bool {
        if self.excluded.contains(&kind) {
            return false;
        }
        kind != ComponentKind::Railings || self.railings_required
    }
}

/// @acp:summary "Builds component descriptions from a configuration"
#[derive(Debug, Clone, Default)]
pub struct ComponentLayoutEngine {
    options: LayoutOptions,
}

impl ComponentLayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// @acp:summary "Every present component, in build order"
    pub fn layout(&self, config: &BridgeConfig) -> Result<Vec<Component>> {
        let mut components = Vec::new();
        for kind in ComponentKind::ALL {
            if let Some(component) = self.layout_component(config, kind)? {
                components.push(component);
            }
        }
        Ok(components)
    }

    /// @acp:summary "One component, or None when it is absent"
    pub fn layout_component(
        &self,
        config: &BridgeConfig,
        kind: ComponentKind,
    ) -> Result<Option<Component>> {
        if !self.options.is_present(kind) {
            return Ok(None);
        }

        let parts = match kind {
            ComponentKind::Deck => deck::layout_deck(config),
            ComponentKind::ApproachSlabs => walls::layout_approach_slabs(config),
            ComponentKind::Railings => railings::layout_railings(config),
            ComponentKind::Piers => piers::layout_piers(config),
            ComponentKind::WingWalls => walls::layout_wing_walls(config),
            ComponentKind::BackWalls => walls::layout_back_walls(config),
        }
        .map_err(|e| e.for_bridge(&config.bridge_id))?;

        tracing::debug!(
            bridge_id = %config.bridge_id,
            component = kind.as_str(),
            parts = parts.len(),
            "laid out component"
        );

        if parts.is_empty() {
            return Ok(None);
        }
        Ok(Some(Component::new(kind, parts)))
    }
}
