use crate::error::Error;

/// Result type alias used across all axle crates.
pub type Result<T> = std::result::Result<T, Error>;
