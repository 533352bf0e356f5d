pub mod config;
pub mod config_parser;
pub mod domain;
pub mod error;
pub mod layout;
pub mod render;
pub mod retry;
pub mod source;
pub mod store;

pub use crate::config::*;
pub use config_parser::*;
pub use domain::*;
pub use error::*;
pub use layout::*;
pub use render::*;
pub use retry::*;
pub use source::*;
pub use store::*;
