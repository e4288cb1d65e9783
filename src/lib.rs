#![forbid(unsafe_code)]

//! @acp:module "Bridgegen Library"
//! @acp:summary "Parametric bridge configuration sampling and component geometry assembly"
//! @acp:domain dataset
//! @acp:layer api
//! @acp:stability stable
//!
//! # bridgegen
//!
//! Generates synthetic highway bridge datasets: sampled configurations,
//! one triangle mesh per bridge and a JSON summary.
//!
//! ## Features
//!
//! - **Seeded sampling**: identical seeds give identical batches
//! - **Component layout**: deck, piers, walls, approach slabs, railings
//! - **Mesh export**: binary STL and Wavefront OBJ
//! - **Failure isolation**: one bad bridge never stops the batch
//!
//! ## Example
//!
//! ```rust,no_run
//! use bridgegen::{AssemblyOrchestrator, ConfigSampler, LayoutOptions, MeshKernel};
//!
//! fn main() -> bridgegen::Result<()> {
//!     let configs = ConfigSampler::default().sample(3, None, Some(42))?;
//!     let orchestrator = AssemblyOrchestrator::new(MeshKernel::new(), LayoutOptions::default());
//!
//!     for config in &configs {
//!         let built = orchestrator.assemble(config, false)?;
//!         println!("{}: {} triangles", built.bridge_id, built.unified.triangle_count());
//!     }
//!     Ok(())
//! }
//! ```

pub mod assembly;
pub mod commands;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod quantities;
pub mod sampler;
pub mod stats;

// Re-exports
pub use assembly::{AssemblyOrchestrator, BuiltBridge};
pub use config::Config;
pub use error::{BridgeError, Result};
pub use geometry::{
    GeometryKernel, MeshExporter, MeshKernel, PlacedShape, Placement, ShapeRecipe, StlObjExporter,
    TriangleMesh,
};
pub use layout::{Component, ComponentKind, ComponentLayoutEngine, LayoutOptions};
pub use model::{
    BoxGirderSection, BridgeConfig, BridgeRecord, BridgeType, DeckSection, PierCapType,
    PierCrossSection, PierType,
};
pub use pipeline::{BridgeOutcome, DatasetPipeline, PipelineOptions, RunInfo, RunManifest, RunReport};
pub use sampler::{ConfigSampler, SamplerOptions, SamplingProfile};
pub use stats::DatasetStats;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
