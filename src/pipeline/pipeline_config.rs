use std::env;
use std::path::PathBuf;

use crate::shared::{DefaultPaths, Result, SizeLimits};
use crate::sources::ris::RIS_BASE_URL;
use crate::sources::SnapshotDate;

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// RIS route collector to download from, e.g. `rrc00`
    pub collector: String,

    pub date: SnapshotDate,

    /// RIS archive root, overridable for mirrors
    pub base_url: String,

    /// Where downloaded snapshots are kept until the run finishes
    pub cache_dir: PathBuf,

    /// Where the graph artifact is written
    pub output_path: PathBuf,

    /// Use this snapshot instead of downloading one. Never deleted.
    pub local_snapshot: Option<PathBuf>,

    /// Keep the downloaded snapshot after a run
    pub keep_snapshot: bool,

    pub max_nodes: usize,
    pub max_links: usize,

    /// Draw a spinner while parsing
    pub show_progress: bool,
}

impl PipelineConfig {
    pub fn new() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("asgraph");

        PipelineConfig {
            collector: "rrc00".to_string(),
            date: SnapshotDate::default_fixed(),
            base_url: RIS_BASE_URL.to_string(),
            cache_dir,
            output_path: PathBuf::from(DefaultPaths::ARTIFACT),
            local_snapshot: None,
            keep_snapshot: false,
            max_nodes: SizeLimits::MAX_NODES,
            max_links: SizeLimits::MAX_LINKS,
            show_progress: true,
        }
    }

    /// Defaults, overridden by `ASGRAPH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        if let Some(collector) = lookup("ASGRAPH_COLLECTOR") {
            config = config.with_collector(collector.trim());
        }
        if let Some(date) = lookup("ASGRAPH_DATE") {
            config = config.with_date(SnapshotDate::parse(&date)?);
        }
        if let Some(url) = lookup("ASGRAPH_RIS_URL") {
            config = config.with_base_url(url.trim());
        }
        if let Some(dir) = lookup("ASGRAPH_CACHE_DIR") {
            config = config.with_cache_dir(PathBuf::from(dir));
        }
        if let Some(output) = lookup("ASGRAPH_OUTPUT") {
            config = config.with_output_path(PathBuf::from(output));
        }
        if let Some(snapshot) = lookup("ASGRAPH_SNAPSHOT") {
            config = config.with_local_snapshot(PathBuf::from(snapshot));
        }
        if let Some(keep) = lookup("ASGRAPH_KEEP_SNAPSHOT") {
            config = config.with_keep_snapshot(matches!(keep.trim(), "1" | "true" | "yes"));
        }
        Ok(config)
    }

    pub fn with_collector(mut self, collector: &str) -> Self {
        self.collector = collector.to_string();
        self
    }

    pub fn with_date(mut self, date: SnapshotDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = dir;
        self
    }

    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.output_path = path;
        self
    }

    pub fn with_local_snapshot(mut self, path: PathBuf) -> Self {
        self.local_snapshot = Some(path);
        self
    }

    pub fn with_keep_snapshot(mut self, keep: bool) -> Self {
        self.keep_snapshot = keep;
        self
    }

    pub fn with_show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_size_limits(mut self, max_nodes: usize, max_links: usize) -> Self {
        self.max_nodes = max_nodes;
        self.max_links = max_links;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}
