pub mod file;
pub mod http;

pub use file::FileSeatStatusSource;
pub use http::HttpSeatStatusSource;

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::config::SourceConfig;
use crate::domain::{SeatQuery, SeatStatusMap};
use crate::{Result, SeatLayoutError};

/// Supplies seat status snapshots for a bus on a travel date.
#[async_trait]
pub trait SeatStatusSource: Send + Sync {
    async fn fetch(&self, query: &SeatQuery) -> Result<SeatStatusMap>;
}

#[async_trait]
impl<S: SeatStatusSource + ?Sized> SeatStatusSource for Arc<S> {
    async fn fetch(&self, query: &SeatQuery) -> Result<SeatStatusMap> {
        (**self).fetch(query).await
    }
}

#[async_trait]
impl<S: SeatStatusSource + ?Sized> SeatStatusSource for Box<S> {
    async fn fetch(&self, query: &SeatQuery) -> Result<SeatStatusMap> {
        (**self).fetch(query).await
    }
}

/// The booking service answers either with the bare map or wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SeatStatusPayload {
    Wrapped {
        #[serde(rename = "seatStatus")]
        seat_status: SeatStatusMap,
    },
    Bare(SeatStatusMap),
}

impl From<SeatStatusPayload> for SeatStatusMap {
    fn from(payload: SeatStatusPayload) -> Self {
        match payload {
            SeatStatusPayload::Wrapped { seat_status } => seat_status,
            SeatStatusPayload::Bare(seats) => seats,
        }
    }
}

pub(crate) fn parse_payload(bytes: &[u8]) -> Result<SeatStatusMap> {
    let payload: SeatStatusPayload = serde_json::from_slice(bytes)?;
    Ok(payload.into())
}

pub fn source_from_config(config: &SourceConfig) -> Result<Box<dyn SeatStatusSource>> {
    if let Some(base_url) = &config.base_url {
        info!("Using HTTP seat source at {}", base_url);
        return Ok(Box::new(HttpSeatStatusSource::from_config(config)?));
    }
    if let Some(dir) = &config.snapshot_dir {
        info!("Using seat snapshots from {}", dir);
        return Ok(Box::new(FileSeatStatusSource::new(dir)));
    }
    Err(SeatLayoutError::InvalidArgument(
        "Either seat.source.url or seat.source.snapshot.dir must be set".to_string(),
    ))
}
