pub mod adapt;
pub mod classify;
pub mod decode;
pub mod extract;
pub mod validate;

pub use adapt::*;
pub use classify::*;
pub use decode::*;
pub use extract::*;
pub use validate::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no decoder registered for extension: {0}")]
    UnsupportedExtension(String),

    #[error("file has no extension: {0}")]
    MissingExtension(PathBuf),

    #[error("decoder failed on {filename}: {reason}")]
    Malformed { filename: String, reason: String },
}
