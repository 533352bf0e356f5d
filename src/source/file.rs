use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{parse_payload, SeatStatusSource};
use crate::domain::{SeatQuery, SeatStatusMap};
use crate::Result;

/// Reads `<dir>/<bus_id>_<YYYY-MM-DD>.json` snapshots exported from the booking service.
#[derive(Debug, Clone)]
pub struct FileSeatStatusSource {
    dir: PathBuf,
}

impl FileSeatStatusSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn snapshot_path(&self, query: &SeatQuery) -> PathBuf {
        self.dir.join(format!("{}.json", query.key()))
    }
}

#[async_trait]
impl SeatStatusSource for FileSeatStatusSource {
    async fn fetch(&self, query: &SeatQuery) -> Result<SeatStatusMap> {
        let path = self.snapshot_path(query);
        debug!("Reading seat snapshot {:?}", path);
        let bytes = tokio::fs::read(&path).await?;
        parse_payload(&bytes)
    }
}
