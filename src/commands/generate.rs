//! @acp:module "Generate Command"
//! @acp:summary "Sample configurations and build a bridge dataset"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `bridgegen generate <num_bridges>`.

use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;

use crate::assembly::AssemblyOrchestrator;
use crate::config::Config;
use crate::geometry::{MeshKernel, StlObjExporter};
use crate::layout::{ComponentKind, LayoutOptions};
use crate::pipeline::{DatasetPipeline, PipelineOptions, RunInfo, RunReport};
use crate::sampler::{ConfigSampler, SamplerOptions, SamplingProfile};

/// Options for the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Number of bridges to sample and build
    pub num_bridges: usize,
    /// Restrict every bridge to this type (beam_slab, box_girder)
    pub bridge_type: Option<String>,
    /// Also export one OBJ per component
    pub include_components: bool,
    /// Seed for reproducible sampling
    pub seed: Option<u64>,
    /// Sampling profile override
    pub profile: Option<String>,
    /// Output directory override
    pub output: Option<PathBuf>,
    /// Worker count override
    pub workers: Option<usize>,
    /// Build without safety railings
    pub no_railings: bool,
    /// Components to leave out
    pub exclude: Vec<String>,
    /// Keep the STL next to each OBJ
    pub keep_stl: bool,
    /// Hide the progress bar
    pub quiet: bool,
}

/// Settings after merging the config file and command line
#[derive(Debug, Clone)]
struct ResolvedRun {
    bridge_type: Option<String>,
    seed: Option<u64>,
    sampler: SamplerOptions,
    layout: LayoutOptions,
    circle_segments: usize,
    pipeline: PipelineOptions,
}

fn resolve(options: &GenerateOptions, config: &Config) -> Result<ResolvedRun> {
    if options.num_bridges == 0 {
        bail!("num_bridges must be at least 1");
    }

    let mut sampler = config.sampling.options.clone();
    if let Some(profile) = options.profile.as_deref() {
        sampler.profile = profile.parse::<SamplingProfile>()?;
    }

    let mut layout = config.layout.clone();
    if options.no_railings {
        layout.railings_required = false;
    }
    for name in &options.exclude {
        layout.excluded.insert(name.parse::<ComponentKind>()?);
    }

    let workers = options.workers.unwrap_or(config.workers);
    if workers == 0 {
        bail!("workers must be at least 1");
    }

    Ok(ResolvedRun {
        bridge_type: options.bridge_type.clone(),
        seed: options.seed.or(config.sampling.seed),
        sampler,
        layout,
        circle_segments: config.export.circle_segments,
        pipeline: PipelineOptions {
            output_dir: options
                .output
                .clone()
                .unwrap_or_else(|| config.output_dir.clone()),
            include_components: options.include_components,
            keep_stl: options.keep_stl || config.export.keep_stl,
            workers,
            show_progress: !options.quiet,
        },
    })
}

/// Execute the generate command
pub fn execute_generate(options: GenerateOptions, config: Config) -> Result<()> {
    let run = resolve(&options, &config)?;

    println!(
        "{} Sampling {} bridge configuration(s) ({} profile)",
        style("→").cyan(),
        options.num_bridges,
        run.sampler.profile
    );
    let sampler = ConfigSampler::new(run.sampler.clone());
    let configs = sampler.sample_named(options.num_bridges, run.bridge_type.as_deref(), run.seed)?;
    // every config carries the requested type, in canonical spelling
    let bridge_type = run
        .bridge_type
        .as_ref()
        .and(configs.first())
        .map(|c| c.bridge_type().to_string());

    let pipeline = DatasetPipeline::new(
        AssemblyOrchestrator::new(MeshKernel::with_circle_segments(run.circle_segments), run.layout),
        StlObjExporter::new(),
        run.pipeline,
    );
    let report = pipeline.run(
        &configs,
        RunInfo {
            seed: run.seed,
            profile: run.sampler.profile,
            bridge_type,
        },
    )?;

    print_report(&report);

    if report.has_failures() {
        bail!(
            "{} of {} bridge(s) failed to build",
            report.manifest.failed,
            report.manifest.requested
        );
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    for outcome in report.outcomes() {
        if let Some(error) = &outcome.error {
            println!("{} {}: {}", style("✗").red(), outcome.bridge_id, error);
            continue;
        }
        println!(
            "{} {} ({} file(s))",
            style("✓").green(),
            outcome.bridge_id,
            outcome.files.len()
        );
        for warning in &outcome.warnings {
            println!("  {} {}", style("⚠").yellow(), warning);
        }
    }

    println!(
        "\n{} Built {}/{} bridges",
        style("✓").green(),
        report.manifest.built,
        report.manifest.requested
    );
    println!("  Summary:  {}", report.summary_path.display());
    println!("  Manifest: {}", report.manifest_path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{RunManifest, MANIFEST_FILE_NAME};

    fn options(n: usize) -> GenerateOptions {
        GenerateOptions {
            num_bridges: n,
            ..GenerateOptions::default()
        }
    }

    #[test]
    fn test_zero_bridges_rejected() {
        assert!(resolve(&options(0), &Config::default()).is_err());
    }

    #[test]
    fn test_unknown_bridge_type_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(2);
        opts.bridge_type = Some("suspension".to_string());
        opts.quiet = true;
        opts.output = Some(dir.path().to_path_buf());
        let err = execute_generate(opts, Config::default()).unwrap_err();
        assert!(err.to_string().contains("suspension"));
        assert!(!dir.path().join("bridge_summary.json").exists());
    }

    #[test]
    fn test_requested_type_recorded_in_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(2);
        opts.bridge_type = Some("Box_Girder".to_string());
        opts.seed = Some(8);
        opts.quiet = true;
        opts.output = Some(dir.path().to_path_buf());
        let mut config = Config::default();
        config.export.circle_segments = 12;
        execute_generate(opts, config).unwrap();

        let manifest = RunManifest::from_json(dir.path().join(MANIFEST_FILE_NAME)).unwrap();
        assert_eq!(manifest.bridge_type.as_deref(), Some("box_girder"));
    }

    #[test]
    fn test_command_line_overrides_config() {
        let mut config = Config::default();
        config.workers = 2;
        config.sampling.seed = Some(1);
        config.export.keep_stl = true;

        let mut opts = options(3);
        opts.seed = Some(42);
        opts.workers = Some(4);
        opts.profile = Some("fixed-range".to_string());
        opts.no_railings = true;
        opts.exclude = vec!["wing_walls".to_string()];
        opts.output = Some(PathBuf::from("elsewhere"));

        let run = resolve(&opts, &config).unwrap();
        assert_eq!(run.seed, Some(42));
        assert_eq!(run.pipeline.workers, 4);
        assert!(run.pipeline.keep_stl);
        assert_eq!(run.pipeline.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(run.sampler.profile, SamplingProfile::FixedRange);
        assert!(!run.layout.railings_required);
        assert!(run.layout.excluded.contains(&ComponentKind::WingWalls));
    }

    #[test]
    fn test_config_seed_used_when_flag_absent() {
        let mut config = Config::default();
        config.sampling.seed = Some(7);
        let run = resolve(&options(1), &config).unwrap();
        assert_eq!(run.seed, Some(7));
        assert_eq!(run.pipeline.workers, 1);
    }

    #[test]
    fn test_generate_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(2);
        opts.seed = Some(5);
        opts.quiet = true;
        opts.output = Some(dir.path().to_path_buf());
        execute_generate(opts, Config::default()).unwrap();

        assert!(dir.path().join("bridge_summary.json").exists());
        assert!(dir.path().join("BridgeModels").join("bridge_1.obj").exists());
        assert!(dir.path().join("BridgeModels").join("bridge_2.obj").exists());
    }
}
