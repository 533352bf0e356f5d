use serde::Serialize;

/// Seats laid out in 4-wide rows with an aisle; the rest go to the overflow row.
pub const MAIN_BLOCK_SEATS: u32 = 40;
pub const SEATS_PER_ROW: u32 = 4;
/// Number of seats left of the aisle in a main row.
pub const AISLE_AFTER: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowSpec {
    /// Ascending seat numbers, aisle after slot [`AISLE_AFTER`].
    Main { seats: Vec<u32> },
    /// Every seat above [`MAIN_BLOCK_SEATS`], highest first, no aisle.
    Overflow { seats: Vec<u32> },
}

impl RowSpec {
    pub fn seats(&self) -> &[u32] {
        match self {
            RowSpec::Main { seats } | RowSpec::Overflow { seats } => seats,
        }
    }

    pub fn aisle_after(&self) -> Option<usize> {
        match self {
            RowSpec::Main { .. } => Some(AISLE_AFTER),
            RowSpec::Overflow { .. } => None,
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, RowSpec::Overflow { .. })
    }
}

pub fn build_floorplan(seat_count: u32) -> Vec<RowSpec> {
    let main_count = seat_count.min(MAIN_BLOCK_SEATS);
    let mut rows = Vec::with_capacity(main_count.div_ceil(SEATS_PER_ROW) as usize + 1);

    let mut first = 1;
    while first <= main_count {
        let last = (first + SEATS_PER_ROW - 1).min(main_count);
        rows.push(RowSpec::Main {
            seats: (first..=last).collect(),
        });
        first += SEATS_PER_ROW;
    }

    if seat_count > MAIN_BLOCK_SEATS {
        rows.push(RowSpec::Overflow {
            seats: (MAIN_BLOCK_SEATS + 1..=seat_count).rev().collect(),
        });
    }

    rows
}

/// Every seat number in floorplan order.
pub fn seat_order(rows: &[RowSpec]) -> impl Iterator<Item = u32> + '_ {
    rows.iter().flat_map(|row| row.seats().iter().copied())
}
