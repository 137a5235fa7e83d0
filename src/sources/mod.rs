pub mod bgpdump;
#[cfg(feature = "mrt")]
pub mod mrt;
pub mod ris;

use std::path::Path;

use crate::as_path::AsPathRecord;
use crate::shared::{Result, SnapshotFormat};

pub use bgpdump::BgpdumpSource;
#[cfg(feature = "mrt")]
pub use mrt::MrtSource;
pub use ris::{RisSnapshotCollector, SnapshotDate};

pub type RecordIter = Box<dyn Iterator<Item = Result<AsPathRecord>>>;

/// Turns a local snapshot file into a stream of AS path records.
///
/// The graph builder never looks at the snapshot's layout; everything it
/// needs comes through this trait.
pub trait AsPathSource {
    fn records(&self, path: &Path) -> Result<RecordIter>;

    fn name(&self) -> &str;
}

/// Pick the path source for a snapshot format
pub fn create_path_source(format: SnapshotFormat) -> Result<Box<dyn AsPathSource>> {
    match format {
        SnapshotFormat::Bgpdump => Ok(Box::new(BgpdumpSource)),
        #[cfg(feature = "mrt")]
        SnapshotFormat::Mrt => Ok(Box::new(MrtSource)),
        #[cfg(not(feature = "mrt"))]
        SnapshotFormat::Mrt => Err(crate::shared::AsGraphError::Config(
            "MRT snapshots need the `mrt` cargo feature".to_string(),
        )),
    }
}
