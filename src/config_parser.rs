use crate::{AppConfig, Result, SeatLayoutError};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

const HEADER_PREFIX: &str = "http.header.";

fn read_properties<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let file = File::open(&path).map_err(|e| {
        SeatLayoutError::InvalidArgument(format!("Failed to open config file {:?}: {}", path.as_ref(), e))
    })?;

    let reader = BufReader::new(file);
    java_properties::read(reader)
        .map_err(|e| SeatLayoutError::InvalidArgument(format!("Failed to parse properties: {}", e)))
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        SeatLayoutError::InvalidArgument(format!("Invalid value for {}: {}", key, value))
    })
}

fn apply_properties(config: &mut AppConfig, properties: HashMap<String, String>) -> Result<()> {
    for (key, value) in properties {
        match key.as_str() {
            "seat.source.url" => config.source.base_url = Some(value),
            "seat.source.snapshot.dir" => config.source.snapshot_dir = Some(value),
            "seat.source.timeout.ms" => {
                config.source.request_timeout_ms = parse_value(&key, &value)?;
            }
            "seat.source.retry.attempts" => {
                config.source.retry_attempts = parse_value(&key, &value)?;
            }
            "seat.source.breaker.threshold" => {
                config.source.failure_threshold = parse_value(&key, &value)?;
            }
            "seat.source.breaker.recovery.secs" => {
                config.source.recovery_timeout_secs = parse_value(&key, &value)?;
            }
            "layout.seat.count.policy" => {
                config.layout.seat_count_policy = value.parse()?;
            }
            "layout.legend" => config.layout.show_legend = parse_value(&key, &value)?,
            _ => {
                if let Some(header) = key.strip_prefix(HEADER_PREFIX) {
                    config.source.headers.insert(header.to_string(), value);
                } else {
                    config.additional_properties.insert(key, value);
                }
            }
        }
    }
    Ok(())
}

/// Parse a Java properties file into AppConfig
pub fn parse_properties_file<P: AsRef<Path>>(path: P, application_id: &str) -> Result<AppConfig> {
    let properties = read_properties(path)?;

    let mut config = AppConfig {
        application_id: application_id.to_string(),
        ..AppConfig::default()
    };
    apply_properties(&mut config, properties)?;

    Ok(config)
}

/// Parse an override properties file and merge it over an existing config
pub fn merge_properties<P: AsRef<Path>>(mut config: AppConfig, path: P) -> Result<AppConfig> {
    let properties = read_properties(path)?;
    apply_properties(&mut config, properties)?;
    Ok(config)
}
