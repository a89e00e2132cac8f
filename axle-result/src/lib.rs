//! Error types and result definitions for the axle device-execution stack.
//!
//! This crate provides the unified error type ([`Error`]) and result type alias
//! ([`Result<T>`]) used throughout all axle crates. Every fallible operation
//! returns `Result<T>` and propagates upward with the `?` operator; no layer
//! retries internally or swallows a failure after cleaning up its own state.
//!
//! # Error Categories
//!
//! - **Kernel/allocation errors** ([`Error::Arrow`]): the underlying vector
//!   engine failed to allocate, grow, or compute over a buffer
//! - **Type routing errors** ([`Error::UnsupportedType`]): a logical type has
//!   no device counterpart; the plan should not have taken the device path
//! - **Capability gaps** ([`Error::Unsupported`]): a per-row access pattern the
//!   device representation cannot serve at all
//! - **Sizing errors** ([`Error::RowCountOverflow`]): a table is wider than a
//!   batch can represent
//! - **Malformed expression trees** ([`Error::ShapeMismatch`])
//! - **User input errors** ([`Error::InvalidArgumentError`])
//! - **Internal errors** ([`Error::Internal`]): bugs or violated invariants

#![forbid(unsafe_code)]

mod error;
mod result;

pub use error::Error;
pub use result::Result;
