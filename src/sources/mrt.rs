use std::path::Path;

use bgpkit_parser::BgpkitParser;
use ipnetwork::IpNetwork;

use crate::as_path::AsPathRecord;
use crate::shared::{AsGraphError, Result};
use crate::sources::{AsPathSource, RecordIter};

/// MRT snapshots (RIS `bview` TABLE_DUMP_V2 dumps, BGP4MP updates) parsed
/// with bgpkit-parser. Compression is detected by the parser itself.
pub struct MrtSource;

impl AsPathSource for MrtSource {
    fn records(&self, path: &Path) -> Result<RecordIter> {
        let path_str = path.to_str().ok_or_else(|| AsGraphError::SnapshotParse {
            path: path.to_path_buf(),
            reason: "path is not valid UTF-8".to_string(),
        })?;

        let parser = BgpkitParser::new(path_str).map_err(|e| AsGraphError::SnapshotParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Box::new(parser.into_iter().filter_map(|elem| {
            // Withdrawals carry no path
            let as_path = elem.as_path?;
            let prefix = elem.prefix.to_string().parse::<IpNetwork>().ok();
            let record = AsPathRecord::from_path_str(prefix, &as_path.to_string());
            (!record.is_empty()).then_some(Ok(record))
        })))
    }

    fn name(&self) -> &str {
        "mrt"
    }
}
