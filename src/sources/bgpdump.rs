use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use bzip2::read::BzDecoder;
use ipnetwork::IpNetwork;
use log::debug;

use crate::as_path::AsPathRecord;
use crate::sources::{AsPathSource, RecordIter};
use crate::shared::Result;

const PREFIX_FIELD: usize = 5;
const AS_PATH_FIELD: usize = 6;

/// Reader for `bgpdump -m` output, one route per line:
///
/// ```text
/// TABLE_DUMP2|1696118400|B|192.0.2.1|64496|203.0.113.0/24|64496 3356 15169|IGP|...
/// ```
///
/// Files ending in `.bz2` are decompressed on the fly.
pub struct BgpdumpSource;

impl BgpdumpSource {
    /// Parse one line. Withdrawals, truncated lines and empty paths yield `None`.
    pub fn parse_line(line: &str) -> Option<AsPathRecord> {
        let fields: Vec<&str> = line.trim_end().split('|').collect();
        if fields.len() <= AS_PATH_FIELD {
            return None;
        }
        if fields[2] == "W" {
            return None;
        }

        let prefix = fields[PREFIX_FIELD].parse::<IpNetwork>().ok();
        let record = AsPathRecord::from_path_str(prefix, fields[AS_PATH_FIELD]);
        if record.is_empty() {
            debug!("skipping route without AS path: {}", fields[PREFIX_FIELD]);
            return None;
        }
        Some(record)
    }

    /// Records from every usable line. Lines that are not valid UTF-8 are
    /// skipped like any other malformed entry; only read errors surface.
    pub fn from_reader<R: BufRead + 'static>(reader: R) -> RecordIter {
        Box::new(reader.split(b'\n').filter_map(|line| match line {
            Ok(bytes) => match std::str::from_utf8(&bytes) {
                Ok(line) => Self::parse_line(line).map(Ok),
                Err(e) => {
                    debug!("skipping line that is not valid UTF-8: {}", e);
                    None
                }
            },
            Err(e) => Some(Err(e.into())),
        }))
    }
}

impl AsPathSource for BgpdumpSource {
    fn records(&self, path: &Path) -> Result<RecordIter> {
        let file = File::open(path)?;
        let is_bz2 = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("bz2"));

        if is_bz2 {
            Ok(Self::from_reader(BufReader::new(BzDecoder::new(file))))
        } else {
            Ok(Self::from_reader(BufReader::new(file)))
        }
    }

    fn name(&self) -> &str {
        "bgpdump"
    }
}
