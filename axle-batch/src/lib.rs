//! Device-resident columnar batches.
//!
//! This crate maps a logical Arrow schema onto device vectors and keeps the
//! data on the device while presenting the familiar columnar-batch surface:
//! [`DeviceColumn`] adapts one vector to the logical column interface,
//! [`DeviceBatch`] groups equal-length columns with a row count,
//! [`BatchBuilder`] assembles a batch incrementally from host input, and the
//! bridge methods on [`DeviceBatch`] convert to and from the engine's
//! positional [`Table`](axle_vector::Table) form.
//!
//! Ownership follows the vector engine's reference counting: every
//! constructor documents whether it transfers, clones, or borrows references,
//! and dropping a batch releases exactly one reference per column.

#![forbid(unsafe_code)]

pub mod batch;
pub mod bridge;
pub mod builder;
pub mod column;
pub mod types;

pub use axle_result::{Error, Result};
pub use batch::DeviceBatch;
pub use bridge::{dictionary_columns, to_dictionary_batch};
pub use builder::BatchBuilder;
pub use column::DeviceColumn;
pub use types::{is_supported, time_resolution_of, to_device_type, to_logical_type};
