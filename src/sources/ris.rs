use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc};
use log::{info, warn};
use reqwest::blocking::{Client, Response};
use scraper::{Html, Selector};

use crate::shared::{AsGraphError, Result};

pub const RIS_BASE_URL: &str = "https://data.ris.ripe.net";
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Which RIB dump to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotDate {
    /// The midnight dump of that day
    Fixed(NaiveDate),
    /// Newest dump listed for the current month, or the month before
    Latest,
}

impl SnapshotDate {
    pub fn default_fixed() -> Self {
        SnapshotDate::Fixed(NaiveDate::from_ymd_opt(2023, 10, 1).unwrap_or_default())
    }

    /// Accepts `YYYY-MM-DD` or `latest`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(SnapshotDate::Latest);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(SnapshotDate::Fixed)
            .map_err(|e| AsGraphError::Config(format!("bad snapshot date {:?}: {}", s, e)))
    }
}

/// Downloads one RIB snapshot from a RIPE RIS route collector into a cache
/// directory. A file already present in the cache is reused as is.
pub struct RisSnapshotCollector {
    collector: String,
    date: SnapshotDate,
    cache_dir: PathBuf,
    base_url: String,
    timeout: Duration,
}

impl RisSnapshotCollector {
    pub fn new(collector: &str, date: SnapshotDate, cache_dir: &Path) -> Self {
        RisSnapshotCollector {
            collector: collector.to_string(),
            date,
            cache_dir: cache_dir.to_path_buf(),
            base_url: RIS_BASE_URL.to_string(),
            timeout: DOWNLOAD_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn run(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.cache_dir)?;
        let client = Client::builder().timeout(self.timeout).build()?;

        let url = match self.date {
            SnapshotDate::Fixed(date) => self.snapshot_url(date),
            SnapshotDate::Latest => self.resolve_latest(&client)?,
        };

        let cached_path = self.cached_path(&url);
        if cached_path.exists() {
            info!("Using cached snapshot from {:?}", cached_path);
            return Ok(cached_path);
        }

        self.download(&client, &url, &cached_path)?;
        Ok(cached_path)
    }

    pub fn month_url(&self, date: NaiveDate) -> String {
        format!("{}/{}/{}/", self.base_url, self.collector, date.format("%Y.%m"))
    }

    pub fn snapshot_file_name(date: NaiveDate) -> String {
        format!("bview.{}.0000.gz", date.format("%Y%m%d"))
    }

    pub fn snapshot_url(&self, date: NaiveDate) -> String {
        format!("{}{}", self.month_url(date), Self::snapshot_file_name(date))
    }

    /// Cache file for a snapshot URL, prefixed with the collector so dumps
    /// of the same day from different collectors don't collide.
    pub fn cached_path(&self, url: &str) -> PathBuf {
        let file_name = url.rsplit('/').next().unwrap_or(url);
        self.cache_dir.join(format!("{}.{}", self.collector, file_name))
    }

    /// Newest `bview.*.gz` linked from a RIS directory listing.
    pub fn latest_bview_in_listing(html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("a[href]").ok()?;
        document
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .map(|href| href.rsplit('/').next().unwrap_or(href))
            .filter(|name| name.starts_with("bview.") && name.ends_with(".gz"))
            .max()
            .map(str::to_string)
    }

    fn resolve_latest(&self, client: &Client) -> Result<String> {
        let this_month = Utc::now().date_naive();
        let last_month = this_month
            .with_day(1)
            .and_then(|first| first.pred_opt())
            .unwrap_or(this_month);

        for month in [this_month, last_month] {
            let listing_url = self.month_url(month);
            info!("Looking for the newest snapshot in {}", listing_url);
            let body = client.get(&listing_url).send()?.error_for_status()?.text()?;
            if let Some(name) = Self::latest_bview_in_listing(&body) {
                return Ok(format!("{}{}", listing_url, name));
            }
            warn!("No bview snapshots listed in {}", listing_url);
        }

        Err(AsGraphError::NoSnapshotFound(self.month_url(last_month)))
    }

    fn download(&self, client: &Client, url: &str, dest: &Path) -> Result<()> {
        info!("Attempting to download MRT file from: {}", url);
        let mut response = client.get(url).send()?.error_for_status()?;

        // Write to a side file first so an interrupted download never looks cached
        let partial = dest.with_extension("part");
        match Self::write_body(&mut response, &partial, dest) {
            Ok(bytes) => {
                info!("Successfully downloaded {:?} ({} bytes)", dest, bytes);
                Ok(())
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&partial) {
                    warn!("Error removing partial download {:?}: {}", partial, cleanup);
                }
                Err(e)
            }
        }
    }

    fn write_body(response: &mut Response, partial: &Path, dest: &Path) -> Result<u64> {
        let mut file = File::create(partial)?;
        let bytes = response.copy_to(&mut file)?;
        drop(file);
        fs::rename(partial, dest)?;
        Ok(bytes)
    }
}
