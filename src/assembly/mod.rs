//! @acp:module "Assembly"
//! @acp:summary "Realizes laid-out components through a geometry kernel and unions them"
//! @acp:domain dataset
//! @acp:layer service

use std::collections::BTreeMap;

use crate::error::{BridgeError, Result};
use crate::geometry::{realize, Aabb, GeometryKernel};
use crate::layout::{Component, ComponentKind, ComponentLayoutEngine, LayoutOptions};
use crate::model::{BridgeConfig, BridgeType};

/// @acp:summary "One assembled bridge"
#[derive(Debug, Clone)]
pub struct BuiltBridge<S> {
    pub bridge_id: String,
    pub bridge_type: BridgeType,
    /// Union of every present component
    pub unified: S,
    /// Per-component solids, when requested
    pub components: Option<BTreeMap<ComponentKind, S>>,
    pub component_count: usize,
}

/// @acp:summary "Drives layout and kernel for one bridge at a time"
///
/// Holds no per-bridge state, so one orchestrator can serve a whole
/// thread pool.
pub struct AssemblyOrchestrator<K: GeometryKernel> {
    kernel: K,
    layout: ComponentLayoutEngine,
}

impl<K: GeometryKernel> AssemblyOrchestrator<K> {
    pub fn new(kernel: K, options: LayoutOptions) -> Self {
        Self {
            kernel,
            layout: ComponentLayoutEngine::new(options),
        }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn layout_engine(&self) -> &ComponentLayoutEngine {
        &self.layout
    }

    /// @acp:summary "Build the unified solid, plus components when asked"
    pub fn assemble(
        &self,
        config: &BridgeConfig,
        with_components: bool,
    ) -> Result<BuiltBridge<K::Solid>> {
        let _span = tracing::info_span!("assemble", bridge_id = %config.bridge_id).entered();

        config.validate()?;
        let record = serde_json::to_string(&config.to_record())?;
        tracing::info!(
            bridge_id = %config.bridge_id,
            bridge_type = %config.bridge_type(),
            record = %record,
            "building bridge"
        );

        let components = self.layout.layout(config)?;
        if components.is_empty() {
            return Err(BridgeError::EmptyAssembly {
                bridge_id: config.bridge_id.clone(),
            });
        }
        let component_count = components.len();

        let mut unified: Option<K::Solid> = None;
        let mut named = with_components.then(BTreeMap::new);
        for component in &components {
            let solid = self
                .realize_component(component)
                .map_err(|e| e.for_bridge(&config.bridge_id))?;
            if let Some(map) = named.as_mut() {
                map.insert(component.kind, solid.clone());
            }
            unified = Some(match unified {
                None => solid,
                Some(acc) => self.kernel.union(acc, solid)?,
            });
        }

        let unified = unified.ok_or_else(|| BridgeError::EmptyAssembly {
            bridge_id: config.bridge_id.clone(),
        })?;

        Ok(BuiltBridge {
            bridge_id: config.bridge_id.clone(),
            bridge_type: config.bridge_type(),
            unified,
            components: named,
            component_count,
        })
    }

    fn realize_component(&self, component: &Component) -> Result<K::Solid> {
        let mut solids = component.parts.iter().map(|part| realize(&self.kernel, part));
        let first = solids.next().ok_or_else(|| {
            BridgeError::Geometry(format!("component {} has no parts", component.name()))
        })??;
        solids.try_fold(first, |acc, next| self.kernel.union(acc, next?))
    }

    /// Bounding box of the unified solid
    pub fn bounding_box(&self, built: &BuiltBridge<K::Solid>) -> Option<Aabb> {
        self.kernel.bounding_box(&built.unified)
    }
}
