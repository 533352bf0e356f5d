use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::seat::{SeatCountPolicy, SeatStatus, SeatStatusMap};
use crate::{Result, SeatLayoutError};

pub const DEFAULT_HOLD_MINUTES: u32 = 15;

/// State of the seat-freeze form. Only [`reduce`] produces new states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FreezeForm {
    #[validate(custom(function = "not_blank", message = "bus is required"))]
    pub bus_id: String,
    #[validate(required(message = "travel date is required"))]
    pub travel_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "select at least one seat"))]
    pub seats: BTreeSet<u32>,
    #[validate(length(max = 200, message = "reason must be at most 200 characters"))]
    pub reason: String,
    #[validate(range(min = 1, max = 1440, message = "hold must be between 1 and 1440 minutes"))]
    pub hold_minutes: u32,
}

impl Default for FreezeForm {
    fn default() -> Self {
        Self {
            bus_id: String::new(),
            travel_date: None,
            seats: BTreeSet::new(),
            reason: String::new(),
            hold_minutes: DEFAULT_HOLD_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreezeAction {
    SelectBus(String),
    SelectDate(NaiveDate),
    ToggleSeat(u32),
    ClearSeats,
    SetReason(String),
    SetHoldMinutes(u32),
    Reset,
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Next form state. A different bus or date invalidates the seat selection.
pub fn reduce(state: &FreezeForm, action: FreezeAction) -> FreezeForm {
    let mut next = state.clone();
    match action {
        FreezeAction::SelectBus(bus_id) => {
            let bus_id = bus_id.trim().to_string();
            if bus_id != state.bus_id {
                next.seats.clear();
            }
            next.bus_id = bus_id;
        }
        FreezeAction::SelectDate(date) => {
            if Some(date) != state.travel_date {
                next.seats.clear();
            }
            next.travel_date = Some(date);
        }
        FreezeAction::ToggleSeat(seat) => {
            if !next.seats.remove(&seat) {
                next.seats.insert(seat);
            }
        }
        FreezeAction::ClearSeats => next.seats.clear(),
        FreezeAction::SetReason(reason) => next.reason = reason,
        FreezeAction::SetHoldMinutes(minutes) => next.hold_minutes = minutes,
        FreezeAction::Reset => next = FreezeForm::default(),
    }
    next
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeRequest {
    pub request_id: Uuid,
    pub bus_id: String,
    pub travel_date: NaiveDate,
    pub seats: Vec<u32>,
    pub status: SeatStatus,
    pub reason: String,
    pub hold_minutes: u32,
}

impl FreezeForm {
    /// Validates the form against the seats currently shown and builds the request.
    pub fn submit(&self, current: &SeatStatusMap, policy: SeatCountPolicy) -> Result<FreezeRequest> {
        self.validate()?;

        let travel_date = self.travel_date.ok_or_else(|| {
            SeatLayoutError::InvalidArgument("travel date is required".to_string())
        })?;

        let seat_count = current.seat_count(policy);
        for &seat in &self.seats {
            if seat == 0 || seat > seat_count {
                return Err(SeatLayoutError::InvalidSeatNumber(seat.to_string()));
            }
            let status = current.status(seat);
            if !status.is_available() {
                return Err(SeatLayoutError::SeatNotAvailable { seat, status });
            }
        }

        Ok(FreezeRequest {
            request_id: Uuid::new_v4(),
            bus_id: self.bus_id.trim().to_string(),
            travel_date,
            seats: self.seats.iter().copied().collect(),
            status: SeatStatus::Frozen,
            reason: self.reason.trim().to_string(),
            hold_minutes: self.hold_minutes,
        })
    }
}

impl FreezeRequest {
    /// The map as it looks once the freeze is accepted.
    pub fn apply_to(&self, current: &SeatStatusMap) -> Result<SeatStatusMap> {
        self.seats
            .iter()
            .try_fold(current.clone(), |seats, &seat| seats.with_status(seat, self.status))
    }
}
