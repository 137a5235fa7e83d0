use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type ASN = u32;

/// Output locations shared by both binaries
pub struct DefaultPaths;

impl DefaultPaths {
    pub const ARTIFACT: &'static str = "site/data/as_graph.json";
    pub const PAGE: &'static str = "site/index.html";
}

/// Graphs above these sizes still get written, but the browser layout gets sluggish.
pub struct SizeLimits;

impl SizeLimits {
    pub const MAX_NODES: usize = 10_000;
    pub const MAX_LINKS: usize = 20_000;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotFormat {
    Mrt,
    Bgpdump,
}

impl SnapshotFormat {
    /// Guess the format from the file name. Anything that isn't obviously
    /// `bgpdump -m` text is handed to the MRT parser.
    pub fn detect(file_name: &str) -> Self {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".txt") || lower.ends_with(".txt.bz2") || lower.ends_with(".bgpdump") {
            SnapshotFormat::Bgpdump
        } else {
            SnapshotFormat::Mrt
        }
    }
}

impl fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SnapshotFormat::Mrt => "MRT",
            SnapshotFormat::Bgpdump => "BGPDUMP",
        };
        write!(f, "{}", s)
    }
}

/// Why a single AS path element was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAsn {
    #[error("non-numeric AS path element {0:?}")]
    NotNumeric(String),
    #[error("AS number {0} does not fit in 32 bits")]
    OutOfRange(String),
    #[error("AS number 0 is reserved")]
    Reserved,
}

#[derive(Debug, Error)]
pub enum AsGraphError {
    #[cfg(feature = "native")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse snapshot {path:?}: {reason}")]
    SnapshotParse { path: PathBuf, reason: String },

    #[error("no snapshot found at {0}")]
    NoSnapshotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AsGraphError>;
