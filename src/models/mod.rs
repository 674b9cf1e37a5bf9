pub mod document;
pub mod enums;
pub mod project;

pub use document::*;
pub use enums::*;
pub use project::*;

use thiserror::Error;

/// Returned when a string does not name a known enum variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field} value: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}
