//! End-to-end dataset generation tests
//!
//! Sampling, assembly, export and persistence through the public API.

use std::path::Path;

use bridgegen::geometry::export::read_stl;
use bridgegen::model::{read_records, SUMMARY_FILE_NAME};
use bridgegen::pipeline::{MANIFEST_FILE_NAME, MODELS_DIR_NAME};
use bridgegen::quantities::{box_girder_cell_layout, girder_spacing, pier_positions};
use bridgegen::{
    AssemblyOrchestrator, BridgeConfig, BridgeType, ComponentKind, ConfigSampler, DatasetPipeline,
    DatasetStats, DeckSection, LayoutOptions, MeshKernel, PipelineOptions, RunInfo, RunManifest,
    SamplerOptions, SamplingProfile, StlObjExporter,
};
use pretty_assertions::assert_eq;

fn pipeline(dir: &Path, options: PipelineOptions) -> DatasetPipeline<MeshKernel, StlObjExporter> {
    DatasetPipeline::new(
        AssemblyOrchestrator::new(MeshKernel::new(), LayoutOptions::default()),
        StlObjExporter::new(),
        PipelineOptions {
            output_dir: dir.to_path_buf(),
            ..options
        },
    )
}

// =============================================================================
// Sampling
// =============================================================================

mod sampling_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_same_seed_same_batch() {
        let sampler = ConfigSampler::default();
        let a = sampler.sample(5, None, Some(42)).unwrap();
        let b = sampler.sample(5, None, Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_sample_is_valid_and_consistent() {
        for profile in [SamplingProfile::LaneBased, SamplingProfile::FixedRange] {
            let sampler = ConfigSampler::new(SamplerOptions {
                profile,
                ..SamplerOptions::default()
            });
            for config in sampler.sample(40, None, Some(7)).unwrap() {
                config.validate().unwrap();
                assert_eq!(config.bridge_type().pier_type(), config.pier_type);
                assert_eq!(
                    pier_positions(config.total_length_m, config.num_spans).unwrap().len() as u32,
                    config.num_spans - 1
                );
                if let DeckSection::BoxGirder(_) = config.deck {
                    box_girder_cell_layout(config.width_m, config.depth_of_girder).unwrap();
                }
            }
        }
    }

    #[test]
    fn test_requested_type_only() {
        let configs = ConfigSampler::default()
            .sample(10, Some(BridgeType::BoxGirder), Some(3))
            .unwrap();
        assert!(configs.iter().all(|c| c.bridge_type() == BridgeType::BoxGirder));
    }
}

// =============================================================================
// Quantities
// =============================================================================

mod quantity_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_girder_spacing_examples() {
        assert_eq!(girder_spacing(8.0, 3.5).unwrap(), (2, 4.0));
        assert_eq!(girder_spacing(10.5, 3.5).unwrap(), (3, 3.5));
    }

    #[test]
    fn test_pier_positions_end_span_ratio() {
        let xs = pier_positions(150.0, 5).unwrap();
        assert_eq!(xs.len(), 4);
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
        let end_gap = xs[0] + 75.0;
        let interior_gap = xs[1] - xs[0];
        assert!((end_gap / interior_gap - 0.7).abs() < 1e-2);
    }

    #[test]
    fn test_cell_count_thresholds() {
        assert_eq!(box_girder_cell_layout(12.0, 2.16).unwrap().num_cells, 1);
        assert_eq!(box_girder_cell_layout(20.0, 2.0).unwrap().num_cells, 2);
    }
}

// =============================================================================
// Assembly and export
// =============================================================================

mod pipeline_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_batch_outputs_and_summary_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let configs = ConfigSampler::default().sample(4, None, Some(11)).unwrap();
        let report = pipeline(dir.path(), PipelineOptions::default())
            .run(
                &configs,
                RunInfo {
                    seed: Some(11),
                    ..RunInfo::default()
                },
            )
            .unwrap();

        assert!(!report.has_failures());
        let models = dir.path().join(MODELS_DIR_NAME);
        for config in &configs {
            assert!(models.join(format!("{}.obj", config.bridge_id)).exists());
        }

        let records = read_records(dir.path().join(SUMMARY_FILE_NAME)).unwrap();
        let restored: Vec<BridgeConfig> = records
            .into_iter()
            .map(|r| BridgeConfig::try_from(r).unwrap())
            .collect();
        assert_eq!(restored, configs);

        let manifest = RunManifest::from_json(dir.path().join(MANIFEST_FILE_NAME)).unwrap();
        assert_eq!(manifest.seed, Some(11));
        assert_eq!(manifest.requested, 4);
        assert_eq!(manifest.built, 4);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let configs = ConfigSampler::default().sample(4, None, Some(21)).unwrap();
        let seq_dir = tempfile::tempdir().unwrap();
        let par_dir = tempfile::tempdir().unwrap();

        pipeline(seq_dir.path(), PipelineOptions::default())
            .run(&configs, RunInfo::default())
            .unwrap();
        pipeline(
            par_dir.path(),
            PipelineOptions {
                workers: 3,
                ..PipelineOptions::default()
            },
        )
        .run(&configs, RunInfo::default())
        .unwrap();

        for config in &configs {
            let name = format!("{}.obj", config.bridge_id);
            let a = std::fs::read(seq_dir.path().join(MODELS_DIR_NAME).join(&name)).unwrap();
            let b = std::fs::read(par_dir.path().join(MODELS_DIR_NAME).join(&name)).unwrap();
            assert_eq!(a, b, "{}", name);
        }
    }

    #[test]
    fn test_kept_stl_matches_unified_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let configs = ConfigSampler::default()
            .sample(1, Some(BridgeType::BeamSlab), Some(2))
            .unwrap();
        pipeline(
            dir.path(),
            PipelineOptions {
                keep_stl: true,
                ..PipelineOptions::default()
            },
        )
        .run(&configs, RunInfo::default())
        .unwrap();

        let built = AssemblyOrchestrator::new(MeshKernel::new(), LayoutOptions::default())
            .assemble(&configs[0], false)
            .unwrap();
        let stl = read_stl(&dir.path().join(MODELS_DIR_NAME).join("bridge_1.stl")).unwrap();
        assert_eq!(stl.triangle_count(), built.unified.triangle_count());
    }

    #[test]
    fn test_excluding_railings_lowers_the_top() {
        let config = &ConfigSampler::default()
            .sample(1, Some(BridgeType::BeamSlab), Some(9))
            .unwrap()[0];
        let with = AssemblyOrchestrator::new(MeshKernel::new(), LayoutOptions::default());
        let without = AssemblyOrchestrator::new(
            MeshKernel::new(),
            LayoutOptions {
                railings_required: false,
                ..LayoutOptions::default()
            },
        );

        let a = with.assemble(config, true).unwrap();
        let b = without.assemble(config, true).unwrap();
        assert!(b.components.as_ref().unwrap().get(&ComponentKind::Railings).is_none());
        assert_eq!(a.component_count, b.component_count + 1);

        let top_a = with.bounding_box(&a).unwrap().max.z;
        let top_b = without.bounding_box(&b).unwrap().max.z;
        assert!(top_a > top_b + 0.9);
    }
}

// =============================================================================
// Statistics
// =============================================================================

mod stats_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stats_over_generated_summary() {
        let dir = tempfile::tempdir().unwrap();
        let configs = ConfigSampler::default().sample(6, None, Some(4)).unwrap();
        pipeline(dir.path(), PipelineOptions::default())
            .run(&configs, RunInfo::default())
            .unwrap();

        let records = read_records(dir.path().join(SUMMARY_FILE_NAME)).unwrap();
        let stats = DatasetStats::from_records(&records);
        assert_eq!(stats.count, 6);
        assert_eq!(stats.by_bridge_type.values().sum::<usize>(), 6);
        assert!(stats.mean_width_m > 0.0);
    }
}
