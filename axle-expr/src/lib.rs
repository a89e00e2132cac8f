//! Typed expression evaluation over device batches.
//!
//! An [`Expr`] tree is built once per query stage by the planner, bound to
//! input column positions, and evaluated once per incoming batch. Evaluation
//! walks the tree with [`Expr::columnar_eval`], producing a vector or scalar
//! [`EvalResult`] per node; [`evaluate_bound`] runs a whole projection list
//! and materializes one device column per expression.
//!
//! Every intermediate result is owned by exactly one scope and is released on
//! every exit path, success or failure; no evaluation path leaks a vector
//! reference or releases one twice.

#![forbid(unsafe_code)]

pub mod eval;
pub mod expr;

pub use axle_result::{Error, Result};
pub use eval::{evaluate_bound, EvalResult};
pub use expr::Expr;
