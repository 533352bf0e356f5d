use crate::config::LayoutConfig;
use crate::domain::SeatStatus;

use super::{LayoutView, RenderedRow, SeatCell};

pub const LOADING_TEXT: &str = "Loading seat layout...";
pub const EMPTY_TEXT: &str = "No seat data. Select a bus and travel date.";

const AISLE: &str = "   ";

#[derive(Debug, Clone, Copy, Default)]
pub struct TextStyle {
    pub show_legend: bool,
}

impl From<&LayoutConfig> for TextStyle {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            show_legend: config.show_legend,
        }
    }
}

pub fn status_code(status: SeatStatus) -> char {
    match status {
        SeatStatus::Available => '.',
        SeatStatus::Reserved => 'R',
        SeatStatus::Processing => 'P',
        SeatStatus::Frozen => 'F',
        SeatStatus::Cancelled => 'C',
    }
}

/// Terminal rendering of a layout, one line per row.
pub fn render_text(view: &LayoutView, style: TextStyle) -> String {
    let mut out = match view {
        LayoutView::Loading => return LOADING_TEXT.to_string(),
        LayoutView::Empty => return EMPTY_TEXT.to_string(),
        LayoutView::Grid { rows } => rows.iter().map(row_line).collect::<Vec<_>>().join("\n"),
    };

    if style.show_legend {
        out.push_str("\n\n");
        out.push_str(&legend());
    }
    out
}

fn row_line(row: &RenderedRow) -> String {
    let cells: Vec<String> = row.cells.iter().map(cell_text).collect();
    match row.aisle_after {
        Some(split) if split < cells.len() => {
            format!("{}{}{}", cells[..split].join(" "), AISLE, cells[split..].join(" "))
        }
        _ => cells.join(" "),
    }
}

fn cell_text(cell: &SeatCell) -> String {
    format!("{:>3}{}", cell.seat_number, status_code(cell.category))
}

fn legend() -> String {
    SeatStatus::ALL
        .iter()
        .map(|status| format!("{} {}", status_code(*status), status))
        .collect::<Vec<_>>()
        .join("  ")
}
