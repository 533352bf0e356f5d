pub mod freeze;
pub mod seat;

pub use freeze::*;
pub use seat::*;
