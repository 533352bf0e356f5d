use chrono::NaiveDate;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::{Result, SeatLayoutError};

/// Highest seat number a status map accepts.
pub const MAX_SEAT_NUMBER: u32 = 200;

/// Booking state of a single seat.
///
/// Parsing is total: any token other than the four recognised ones,
/// including `null` or a missing value, becomes `Available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeatStatus {
    #[default]
    Available,
    Reserved,
    Processing,
    Frozen,
    Cancelled,
}

impl SeatStatus {
    pub const ALL: [SeatStatus; 5] = [
        SeatStatus::Available,
        SeatStatus::Reserved,
        SeatStatus::Processing,
        SeatStatus::Frozen,
        SeatStatus::Cancelled,
    ];

    /// Case-sensitive match on the booking service's status tokens.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("reserved") => SeatStatus::Reserved,
            Some("processing") => SeatStatus::Processing,
            Some("freezed") => SeatStatus::Frozen,
            Some("cancelled") => SeatStatus::Cancelled,
            _ => SeatStatus::Available,
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Reserved => "reserved",
            SeatStatus::Processing => "processing",
            SeatStatus::Frozen => "freezed",
            SeatStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SeatStatus::Available)
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl Serialize for SeatStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

struct SeatStatusVisitor;

impl<'de> Visitor<'de> for SeatStatusVisitor {
    type Value = SeatStatus;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a seat status token")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<SeatStatus, E> {
        Ok(SeatStatus::from_token(Some(v)))
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<SeatStatus, E> {
        Ok(SeatStatus::Available)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<SeatStatus, E> {
        Ok(SeatStatus::Available)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<SeatStatus, D::Error> {
        d.deserialize_any(SeatStatusVisitor)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<SeatStatus, E> {
        Ok(SeatStatus::Available)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<SeatStatus, E> {
        Ok(SeatStatus::Available)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<SeatStatus, E> {
        Ok(SeatStatus::Available)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<SeatStatus, E> {
        Ok(SeatStatus::Available)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<SeatStatus, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(SeatStatus::Available)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> std::result::Result<SeatStatus, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(SeatStatus::Available)
    }
}

impl<'de> Deserialize<'de> for SeatStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        d.deserialize_any(SeatStatusVisitor)
    }
}

/// How many seats a status map describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatCountPolicy {
    /// Number of entries in the map. Sparse data under-renders the bus.
    #[default]
    KeyCardinality,
    /// Largest seat number present in the map.
    HighestSeatNumber,
}

impl FromStr for SeatCountPolicy {
    type Err = SeatLayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "key_cardinality" => Ok(SeatCountPolicy::KeyCardinality),
            "highest_seat_number" => Ok(SeatCountPolicy::HighestSeatNumber),
            other => Err(SeatLayoutError::InvalidArgument(format!(
                "Unknown seat count policy: {}",
                other
            ))),
        }
    }
}

/// Seat number to status, as delivered for one (bus, date) pair.
///
/// Values are snapshots: updates go through [`SeatStatusMap::with_status`],
/// which returns a new map. Seat numbers lie in `1..=MAX_SEAT_NUMBER`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, SeatStatus>")]
pub struct SeatStatusMap {
    seats: BTreeMap<u32, SeatStatus>,
}

impl SeatStatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, SeatStatus)>,
    {
        let mut seats = BTreeMap::new();
        for (seat, status) in entries {
            check_seat_number(seat)?;
            seats.insert(seat, status);
        }
        Ok(Self { seats })
    }

    /// Builds a map from raw service tokens, normalising unknown ones.
    pub fn from_tokens<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, Option<&'a str>)>,
    {
        Self::from_entries(
            entries
                .into_iter()
                .map(|(seat, token)| (seat, SeatStatus::from_token(token))),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn status(&self, seat: u32) -> SeatStatus {
        self.seats.get(&seat).copied().unwrap_or_default()
    }

    pub fn contains(&self, seat: u32) -> bool {
        self.seats.contains_key(&seat)
    }

    pub fn with_status(&self, seat: u32, status: SeatStatus) -> Result<Self> {
        check_seat_number(seat)?;
        let mut seats = self.seats.clone();
        seats.insert(seat, status);
        Ok(Self { seats })
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn highest_seat(&self) -> Option<u32> {
        self.seats.keys().next_back().copied()
    }

    pub fn seat_count(&self, policy: SeatCountPolicy) -> u32 {
        match policy {
            SeatCountPolicy::KeyCardinality => self.seats.len() as u32,
            SeatCountPolicy::HighestSeatNumber => self.highest_seat().unwrap_or(0),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, SeatStatus)> + '_ {
        self.seats.iter().map(|(seat, status)| (*seat, *status))
    }

    pub fn count_by_status(&self, status: SeatStatus) -> usize {
        self.seats.values().filter(|s| **s == status).count()
    }
}

fn check_seat_number(seat: u32) -> Result<()> {
    if seat == 0 || seat > MAX_SEAT_NUMBER {
        return Err(SeatLayoutError::InvalidSeatNumber(seat.to_string()));
    }
    Ok(())
}

/// Payload keys that are not seat numbers in range are dropped, not fatal.
impl From<BTreeMap<String, SeatStatus>> for SeatStatusMap {
    fn from(raw: BTreeMap<String, SeatStatus>) -> Self {
        let mut seats = BTreeMap::new();
        for (key, status) in raw {
            match key.trim().parse::<u32>() {
                Ok(seat) if check_seat_number(seat).is_ok() => {
                    seats.insert(seat, status);
                }
                _ => warn!("Skipping seat entry with invalid key {:?}", key),
            }
        }
        Self { seats }
    }
}

impl Serialize for SeatStatusMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.seats.iter().map(|(seat, status)| (seat.to_string(), status)))
    }
}

/// Identifies one seat status snapshot in the booking service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatQuery {
    pub bus_id: String,
    pub travel_date: NaiveDate,
}

impl SeatQuery {
    pub fn new(bus_id: impl Into<String>, travel_date: NaiveDate) -> Self {
        Self {
            bus_id: bus_id.into(),
            travel_date,
        }
    }

    /// `<bus_id>_<YYYY-MM-DD>`, used for snapshot file names and log lines.
    pub fn key(&self) -> String {
        format!("{}_{}", self.bus_id, self.travel_date.format("%Y-%m-%d"))
    }
}
