use serde::Serialize;

use crate::domain::SeatStatus;

const DARK_TEXT: &str = "#111827";
const LIGHT_TEXT: &str = "#ffffff";

/// Presentation category of a seat plus its text contrast.
///
/// `is_dark` means a dark fill with light text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: SeatStatus,
    pub is_dark: bool,
}

impl Classification {
    pub fn fill_color(&self) -> &'static str {
        match self.category {
            SeatStatus::Available => "#f3f4f6",
            SeatStatus::Reserved => "#b91c1c",
            SeatStatus::Processing => "#b45309",
            SeatStatus::Frozen => "#1d4ed8",
            SeatStatus::Cancelled => "#4b5563",
        }
    }

    pub fn text_color(&self) -> &'static str {
        if self.is_dark {
            LIGHT_TEXT
        } else {
            DARK_TEXT
        }
    }
}

/// Classifies a raw status token. Unknown or missing tokens are `Available`.
pub fn classify(token: Option<&str>) -> Classification {
    classify_status(SeatStatus::from_token(token))
}

pub fn classify_status(status: SeatStatus) -> Classification {
    Classification {
        category: status,
        is_dark: !status.is_available(),
    }
}
