//! @acp:module "Dataset Pipeline"
//! @acp:summary "Batch build loop with per-bridge failure isolation and persistence"
//! @acp:domain dataset
//! @acp:layer service
//!
//! Configurations are sampled before the loop starts and never change, so
//! bridges can be built on a worker pool without sharing any mutable state.
//! Output paths are unique per bridge id.

pub mod manifest;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use uuid::Uuid;

use crate::assembly::{AssemblyOrchestrator, BuiltBridge};
use crate::error::{BridgeError, Result};
use crate::geometry::{GeometryKernel, MeshExporter};
use crate::model::record::{configs_to_records, write_records, SUMMARY_FILE_NAME};
use crate::model::BridgeConfig;
use crate::sampler::SamplingProfile;

pub use manifest::{BridgeOutcome, RunManifest, MANIFEST_FILE_NAME};

/// Sub-directory holding the exported meshes
pub const MODELS_DIR_NAME: &str = "BridgeModels";

/// @acp:summary "Where and how a batch is written"
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub output_dir: PathBuf,
    pub include_components: bool,
    pub keep_stl: bool,
    /// 1 builds sequentially on the calling thread
    pub workers: usize,
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("Generated_Bridges"),
            include_components: false,
            keep_stl: false,
            workers: 1,
            show_progress: false,
        }
    }
}

/// Provenance of the configurations handed to [`DatasetPipeline::run`]
#[derive(Debug, Clone, Default)]
pub struct RunInfo {
    pub seed: Option<u64>,
    pub profile: SamplingProfile,
    pub bridge_type: Option<String>,
}

/// @acp:summary "Everything a finished run produced"
#[derive(Debug, Clone)]
pub struct RunReport {
    pub manifest: RunManifest,
    pub summary_path: PathBuf,
    pub manifest_path: PathBuf,
}

impl RunReport {
    pub fn outcomes(&self) -> &[BridgeOutcome] {
        &self.manifest.outcomes
    }

    /// True when any bridge failed to build
    pub fn has_failures(&self) -> bool {
        self.manifest.failed > 0
    }
}

/// @acp:summary "Builds and exports a batch of bridges"
pub struct DatasetPipeline<K, E>
where
    K: GeometryKernel,
    E: MeshExporter<Solid = K::Solid>,
{
    orchestrator: AssemblyOrchestrator<K>,
    exporter: E,
    options: PipelineOptions,
}

impl<K, E> DatasetPipeline<K, E>
where
    K: GeometryKernel,
    E: MeshExporter<Solid = K::Solid>,
{
    pub fn new(orchestrator: AssemblyOrchestrator<K>, exporter: E, options: PipelineOptions) -> Self {
        Self {
            orchestrator,
            exporter,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn models_dir(&self) -> PathBuf {
        self.options.output_dir.join(MODELS_DIR_NAME)
    }

    /// @acp:summary "Build every configuration, then write the summary and manifest"
    pub fn run(&self, configs: &[BridgeConfig], info: RunInfo) -> Result<RunReport> {
        let started_at = Utc::now();
        let models_dir = self.models_dir();
        fs::create_dir_all(&models_dir)?;

        let progress = self.progress_bar(configs.len());
        let build = |config: &BridgeConfig| {
            let outcome = self.build_one(config, &models_dir);
            progress.inc(1);
            outcome
        };

        let outcomes: Vec<BridgeOutcome> = if self.options.workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.workers)
                .build()
                .map_err(|e| BridgeError::Other(format!("failed to start worker pool: {}", e)))?;
            pool.install(|| configs.par_iter().map(build).collect())
        } else {
            configs.iter().map(build).collect()
        };
        progress.finish_and_clear();

        let summary_path = self.options.output_dir.join(SUMMARY_FILE_NAME);
        write_records(&summary_path, &configs_to_records(configs))?;

        let built = outcomes.iter().filter(|o| o.built).count();
        let manifest = RunManifest {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            generator_version: crate::VERSION.to_string(),
            seed: info.seed,
            profile: info.profile.to_string(),
            bridge_type: info.bridge_type,
            include_components: self.options.include_components,
            requested: configs.len(),
            built,
            failed: outcomes.len() - built,
            outcomes,
        };
        let manifest_path = self.options.output_dir.join(MANIFEST_FILE_NAME);
        manifest.write_json(&manifest_path)?;

        tracing::info!(
            run_id = %manifest.run_id,
            built = manifest.built,
            failed = manifest.failed,
            "generation run finished"
        );

        Ok(RunReport {
            manifest,
            summary_path,
            manifest_path,
        })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message("bridges");
        bar
    }

    /// @acp:summary "Assemble and export one bridge, capturing any failure"
    pub fn build_one(&self, config: &BridgeConfig, models_dir: &Path) -> BridgeOutcome {
        let built = match self
            .orchestrator
            .assemble(config, self.options.include_components)
        {
            Ok(built) => built,
            Err(e) => {
                tracing::error!(bridge_id = %config.bridge_id, error = %e, "bridge build failed");
                return BridgeOutcome::failed(&config.bridge_id, &e);
            }
        };

        let mut outcome = BridgeOutcome::built(&config.bridge_id);
        // non-fatal export errors are already recorded as warnings
        if let Err(e) = self.export(&built, models_dir, &mut outcome) {
            tracing::error!(bridge_id = %config.bridge_id, error = %e, "bridge export failed");
            return BridgeOutcome::failed(&config.bridge_id, &e);
        }
        outcome
    }

    fn export(
        &self,
        built: &BuiltBridge<K::Solid>,
        models_dir: &Path,
        outcome: &mut BridgeOutcome,
    ) -> Result<()> {
        match self.export_unified(built, models_dir) {
            Ok(files) => outcome.files.extend(files),
            Err(e) if !e.is_fatal() => {
                tracing::warn!(
                    bridge_id = %built.bridge_id,
                    error = %e,
                    "skipping unified mesh export"
                );
                outcome.warnings.push(e.to_string());
            }
            Err(e) => return Err(e),
        }

        if let Some(components) = &built.components {
            let dir = models_dir.join(&built.bridge_id);
            fs::create_dir_all(&dir)?;
            for (kind, solid) in components {
                let path = dir.join(format!("{}.obj", kind.as_str()));
                match self.exporter.write_obj(solid, &path) {
                    Ok(()) => outcome.files.push(path),
                    Err(e) if !e.is_fatal() => {
                        tracing::warn!(
                            bridge_id = %built.bridge_id,
                            component = kind.as_str(),
                            error = %e,
                            "skipping component export"
                        );
                        outcome.warnings.push(e.to_string());
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(())
    }

    /// Write the STL, convert it to OBJ and drop the STL unless it is kept
    fn export_unified(&self, built: &BuiltBridge<K::Solid>, models_dir: &Path) -> Result<Vec<PathBuf>> {
        let stl = models_dir.join(format!("{}.stl", built.bridge_id));
        let obj = models_dir.join(format!("{}.obj", built.bridge_id));

        self.exporter.write_stl(&built.unified, &stl)?;
        if let Err(e) = self.exporter.convert_stl_to_obj(&stl, &obj) {
            if !self.options.keep_stl && stl.exists() {
                let _ = fs::remove_file(&stl);
            }
            return Err(e);
        }
        if self.options.keep_stl {
            Ok(vec![obj, stl])
        } else {
            fs::remove_file(&stl)?;
            Ok(vec![obj])
        }
    }
}
