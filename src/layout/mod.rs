pub mod classify;
pub mod floorplan;

pub use classify::*;
pub use floorplan::*;
