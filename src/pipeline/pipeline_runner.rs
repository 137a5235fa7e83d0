use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::artifact::GraphArtifact;
use crate::as_graph::{AsGraph, AsGraphBuilder, BuildStats};
use crate::shared::{AsGraphError, Result, SnapshotFormat};
use crate::sources::{create_path_source, RisSnapshotCollector};

use super::pipeline_config::PipelineConfig;

/// What a finished run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub snapshot: PathBuf,
    pub artifact_path: PathBuf,
    pub records: u64,
    pub node_count: usize,
    pub link_count: usize,
    pub stats: BuildStats,
}

/// Snapshot in, graph artifact out
pub struct PipelineRunner {
    pub config: PipelineConfig,
}

impl PipelineRunner {
    pub fn new(config: PipelineConfig) -> Self {
        PipelineRunner { config }
    }

    /// Acquire, parse, build, save. A downloaded snapshot is removed afterwards
    /// whether or not the later steps succeed.
    pub fn run(&self) -> Result<PipelineReport> {
        info!("--- Starting MRT Data Pipeline ---");
        let (snapshot, downloaded) = self.acquire_snapshot()?;

        let result = self.process_snapshot(&snapshot);

        if downloaded && !self.config.keep_snapshot {
            cleanup_file(&snapshot);
        }

        let report = result?;
        info!("--- MRT Data Pipeline Finished Successfully ---");
        Ok(report)
    }

    fn acquire_snapshot(&self) -> Result<(PathBuf, bool)> {
        if let Some(local) = &self.config.local_snapshot {
            if !local.exists() {
                return Err(AsGraphError::NoSnapshotFound(local.display().to_string()));
            }
            info!("Using local snapshot {:?}", local);
            return Ok((local.clone(), false));
        }

        let collector = RisSnapshotCollector::new(
            &self.config.collector,
            self.config.date,
            &self.config.cache_dir,
        )
        .with_base_url(&self.config.base_url);
        Ok((collector.run()?, true))
    }

    fn process_snapshot(&self, snapshot: &Path) -> Result<PipelineReport> {
        let (graph, records) = self.build_graph(snapshot)?;

        if graph.is_empty() {
            warn!("No AS adjacencies found in {:?}; writing an empty graph.", snapshot);
        }
        info!(
            "Generated graph has {} nodes and {} links.",
            graph.node_count(),
            graph.link_count()
        );
        if graph.exceeds(self.config.max_nodes, self.config.max_links) {
            warn!(
                "Graph size exceeds suggested limits ({} nodes, {} links). Visualization might be slow.",
                self.config.max_nodes, self.config.max_links
            );
        }

        GraphArtifact::from_graph(&graph).save(&self.config.output_path)?;

        Ok(PipelineReport {
            snapshot: snapshot.to_path_buf(),
            artifact_path: self.config.output_path.clone(),
            records,
            node_count: graph.node_count(),
            link_count: graph.link_count(),
            stats: graph.stats(),
        })
    }

    /// Stream every record of the snapshot through the graph builder.
    pub fn build_graph(&self, snapshot: &Path) -> Result<(AsGraph, u64)> {
        let file_name = snapshot
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = SnapshotFormat::detect(&file_name);
        let source = create_path_source(format)?;
        info!("Parsing {} file using the {} reader: {:?}", format, source.name(), snapshot);

        let pb = if self.config.show_progress {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} [{elapsed_precise}] {pos} RIB entries")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        let mut builder = AsGraphBuilder::new();
        let mut records = 0u64;
        for record in source.records(snapshot)? {
            builder.add_record(&record?);
            records += 1;
            pb.inc(1);
            if records % 100_000 == 0 {
                info!("  Parsed {} RIB entries...", records);
            }
        }
        pb.finish_and_clear();

        let stats = builder.stats();
        info!("Finished parsing. Total RIB entries found: {}", records);
        if stats.paths_too_short > 0 {
            info!(
                "Skipped {} entries without an AS adjacency.",
                stats.paths_too_short
            );
        }
        if stats.elements_dropped > 0 {
            info!("Dropped {} malformed AS path elements.", stats.elements_dropped);
        }

        Ok((builder.build(), records))
    }
}

fn cleanup_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => info!("Removed temporary file: {:?}", path),
        Err(e) => warn!("Error removing file {:?}: {}", path, e),
    }
}
