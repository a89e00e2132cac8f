//! The native vector engine boundary.
//!
//! Everything the device-execution layers above need from the vector engine
//! lives here: the device type system ([`DType`], [`TimeResolution`]), typed
//! scalars ([`Scalar`]), the reference-counted vector handle ([`Vector`]), the
//! growable per-column builder ([`VectorBuilder`]), the positional [`Table`],
//! and elementwise kernels keyed by operation code ([`kernels`]).
//!
//! This build is host-backed: buffers are Arrow arrays and kernels delegate to
//! `arrow::compute`. An accelerator backend replaces the storage and kernel
//! internals behind the same handle API.
//!
//! # Ownership
//!
//! A [`Vector`] is one reference to a shared allocation. [`Vector::inc_ref`]
//! vends an additional owned handle, dropping a handle releases its reference,
//! and the last drop frees the buffer. Every operation that returns a `Vector`
//! hands the caller exactly one release obligation.

#![forbid(unsafe_code)]

pub mod builder;
pub mod dtype;
pub mod kernels;
pub mod scalar;
pub mod table;
pub mod vector;

pub use axle_result::{Error, Result};
pub use builder::VectorBuilder;
pub use dtype::{DType, TimeResolution};
pub use kernels::{BinaryOp, Operand, UnaryOp};
pub use scalar::Scalar;
pub use table::Table;
pub use vector::Vector;
