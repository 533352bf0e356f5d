pub mod text;

pub use text::*;

use serde::Serialize;
use tracing::debug;

use crate::domain::{SeatCountPolicy, SeatStatus, SeatStatusMap};
use crate::layout::{build_floorplan, classify_status, RowSpec};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatCell {
    pub seat_number: u32,
    pub category: SeatStatus,
    pub is_dark: bool,
    pub fill_color: &'static str,
    pub text_color: &'static str,
}

impl SeatCell {
    fn new(seat_number: u32, status: SeatStatus) -> Self {
        let classification = classify_status(status);
        Self {
            seat_number,
            category: classification.category,
            is_dark: classification.is_dark,
            fill_color: classification.fill_color(),
            text_color: classification.text_color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub overflow: bool,
    pub cells: Vec<SeatCell>,
    /// Index of the first cell right of the aisle, `None` for the overflow row.
    pub aisle_after: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LayoutView {
    Loading,
    Empty,
    Grid { rows: Vec<RenderedRow> },
}

impl LayoutView {
    pub fn rows(&self) -> &[RenderedRow] {
        match self {
            LayoutView::Grid { rows } => rows,
            _ => &[],
        }
    }

    pub fn cell(&self, seat_number: u32) -> Option<&SeatCell> {
        self.rows()
            .iter()
            .flat_map(|row| row.cells.iter())
            .find(|cell| cell.seat_number == seat_number)
    }
}

/// Projects one immutable status snapshot onto the bus floorplan.
pub fn render_layout(
    seats: &SeatStatusMap,
    is_loading: bool,
    policy: SeatCountPolicy,
) -> LayoutView {
    if is_loading {
        return LayoutView::Loading;
    }
    if seats.is_empty() {
        return LayoutView::Empty;
    }

    let seat_count = seats.seat_count(policy);
    let rows: Vec<RenderedRow> = build_floorplan(seat_count)
        .iter()
        .map(|spec| render_row(spec, seats))
        .collect();

    debug!(
        "Rendered {} rows for {} seats ({} entries, {:?})",
        rows.len(),
        seat_count,
        seats.len(),
        policy
    );

    LayoutView::Grid { rows }
}

fn render_row(spec: &RowSpec, seats: &SeatStatusMap) -> RenderedRow {
    RenderedRow {
        overflow: spec.is_overflow(),
        cells: spec
            .seats()
            .iter()
            .map(|&seat| SeatCell::new(seat, seats.status(seat)))
            .collect(),
        aisle_after: spec.aisle_after(),
    }
}
