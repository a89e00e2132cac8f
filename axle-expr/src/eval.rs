//! Per-node evaluation and batch-level projection.

use axle_batch::{DeviceBatch, DeviceColumn};
use axle_result::{Error, Result};
use axle_vector::{kernels, BinaryOp, DType, Operand, Scalar, UnaryOp};

use crate::expr::Expr;

/// The result of evaluating one expression node.
///
/// Ownership moves with the value: the receiver either passes it to its own
/// parent, wraps it into an output, or drops it. A column result owns one
/// reference to its vector.
#[derive(Debug)]
pub enum EvalResult {
    Column(DeviceColumn),
    Scalar(Scalar),
}

impl EvalResult {
    /// Device type of this result.
    pub fn dtype(&self) -> DType {
        match self {
            EvalResult::Column(c) => c.device().dtype(),
            EvalResult::Scalar(s) => s.dtype(),
        }
    }

    pub fn is_column(&self) -> bool {
        matches!(self, EvalResult::Column(_))
    }
}

impl Expr {
    /// Evaluate this node against a batch.
    ///
    /// The caller owns the returned result. Child results and fix-up
    /// intermediates are consumed by the node on every path, including error
    /// exits from kernel evaluation.
    pub fn columnar_eval(&self, batch: &DeviceBatch) -> Result<EvalResult> {
        match self {
            Expr::ColumnRef(index) => {
                let column = batch.columns().get(*index).ok_or_else(|| {
                    Error::InvalidArgumentError(format!(
                        "expression references column {index} of a {}-column batch",
                        batch.num_columns()
                    ))
                })?;
                Ok(EvalResult::Column(column.inc_ref()))
            }
            Expr::Literal(scalar) => Ok(EvalResult::Scalar(scalar.clone())),
            Expr::Unary { op, output, child } => eval_unary(*op, *output, child, batch),
            Expr::Binary {
                op,
                output,
                lhs,
                rhs,
            } => eval_binary(*op, *output, lhs, rhs, batch),
        }
    }
}

fn eval_unary(
    op: UnaryOp,
    output: Option<DType>,
    child: &Expr,
    batch: &DeviceBatch,
) -> Result<EvalResult> {
    let column = match child.columnar_eval(batch)? {
        EvalResult::Column(c) => c,
        EvalResult::Scalar(_) => {
            return Err(Error::ShapeMismatch(
                "unary operator input must evaluate to a column".into(),
            ))
        }
    };
    let vector = kernels::unary(op, column.device())?;
    let vector = match output {
        Some(out) if out != vector.dtype() => vector.cast(out)?,
        _ => vector,
    };
    Ok(EvalResult::Column(DeviceColumn::from_vector(vector)))
}

/// Give one side of a kernel-backed binary node the representation its
/// operator needs. The default is a plain additional reference; comparison
/// operators promote text to the dictionary representation first.
fn fixed_up(op: BinaryOp, column: &DeviceColumn) -> Result<DeviceColumn> {
    if op.requires_dictionary_input() {
        column.to_dictionary_if_needed()
    } else {
        Ok(column.inc_ref())
    }
}

fn eval_binary(
    op: BinaryOp,
    output: Option<DType>,
    lhs: &Expr,
    rhs: &Expr,
    batch: &DeviceBatch,
) -> Result<EvalResult> {
    let left = lhs.columnar_eval(batch)?;
    let right = rhs.columnar_eval(batch)?;

    let out = match output {
        Some(t) => t,
        None => op.output_for(DType::promote(left.dtype(), right.dtype())?),
    };

    match (left, right) {
        (EvalResult::Scalar(l), EvalResult::Scalar(r)) => {
            if l.is_null() || r.is_null() {
                return Ok(EvalResult::Scalar(Scalar::null_of(out)));
            }
            Ok(EvalResult::Scalar(Scalar::binary_op(op, &l, &r)?))
        }
        (EvalResult::Column(l), EvalResult::Column(r)) => {
            let l_fixed = fixed_up(op, &l)?;
            let r_fixed = fixed_up(op, &r)?;
            let vector = kernels::binary(
                op,
                Operand::Column(l_fixed.device()),
                Operand::Column(r_fixed.device()),
                out,
            )?;
            Ok(EvalResult::Column(DeviceColumn::from_vector(vector)))
        }
        (EvalResult::Column(l), EvalResult::Scalar(s)) => {
            if s.is_null() {
                return Ok(EvalResult::Scalar(Scalar::null_of(out)));
            }
            let l_fixed = fixed_up(op, &l)?;
            let vector = kernels::binary(
                op,
                Operand::Column(l_fixed.device()),
                Operand::Scalar(&s),
                out,
            )?;
            Ok(EvalResult::Column(DeviceColumn::from_vector(vector)))
        }
        (EvalResult::Scalar(s), EvalResult::Column(r)) => {
            if s.is_null() {
                return Ok(EvalResult::Scalar(Scalar::null_of(out)));
            }
            let r_fixed = fixed_up(op, &r)?;
            let vector = kernels::binary(
                op,
                Operand::Scalar(&s),
                Operand::Column(r_fixed.device()),
                out,
            )?;
            Ok(EvalResult::Column(DeviceColumn::from_vector(vector)))
        }
    }
}

/// Evaluate a projection list against a batch, in list order.
///
/// Scalar results broadcast to the batch's row count, so the output is one
/// owned column per expression. If any evaluation fails partway, every
/// already-produced column is released and no partial sequence is returned.
pub fn evaluate_bound(batch: &DeviceBatch, exprs: &[Expr]) -> Result<Vec<DeviceColumn>> {
    let mut out = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let column = match expr.columnar_eval(batch)? {
            EvalResult::Column(c) => c,
            EvalResult::Scalar(s) => DeviceColumn::from_scalar(&s, batch.num_rows() as usize),
        };
        out.push(column);
    }
    tracing::trace!(
        expressions = exprs.len(),
        rows = batch.num_rows(),
        "evaluated bound expression list"
    );
    Ok(out)
}
