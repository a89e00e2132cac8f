//! Elementwise kernels keyed by operation code.
//!
//! Kernels take vector or scalar operands, coerce both sides to the implicit
//! common type, and produce a new vector; nothing is ever mutated in place.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Datum, Scalar as ArrowScalar};
use arrow::compute::kernels::{boolean, cmp, numeric};
use arrow::compute::{cast, is_null};
use axle_result::{Error, Result};

use crate::dtype::DType;
use crate::scalar::Scalar;
use crate::vector::Vector;

/// Binary elementwise operation codes understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    #[inline]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }

    /// Result type of this operation over operands of the given common type.
    #[inline]
    pub fn output_for(self, common: DType) -> DType {
        match self {
            BinaryOp::And | BinaryOp::Or => DType::Bool8,
            _ if self.is_comparison() => DType::Bool8,
            _ => common,
        }
    }

    /// Whether text operands of this operation must be dictionary-encoded
    /// before the kernel runs.
    #[inline]
    pub fn requires_dictionary_input(self) -> bool {
        self.is_comparison()
    }
}

/// Unary elementwise operation codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    IsNull,
}

impl UnaryOp {
    /// Result type of this operation over an input of the given type.
    #[inline]
    pub fn output_for(self, input: DType) -> DType {
        match self {
            UnaryOp::Not | UnaryOp::IsNull => DType::Bool8,
            UnaryOp::Negate => input,
        }
    }
}

/// One side of a binary kernel call.
#[derive(Clone, Copy)]
pub enum Operand<'a> {
    Column(&'a Vector),
    Scalar(&'a Scalar),
}

impl Operand<'_> {
    #[inline]
    pub fn dtype(&self) -> DType {
        match self {
            Operand::Column(v) => v.dtype(),
            Operand::Scalar(s) => s.dtype(),
        }
    }
}

enum Prepared {
    Array(ArrayRef),
    Scalar(ArrowScalar<ArrayRef>),
}

impl Prepared {
    fn datum(&self) -> &dyn Datum {
        match self {
            Prepared::Array(a) => a,
            Prepared::Scalar(s) => s,
        }
    }
}

fn prepare(operand: Operand<'_>, common: DType) -> Result<Prepared> {
    match operand {
        Operand::Column(v) => {
            let arr = if v.dtype() == common {
                Arc::clone(v.data())
            } else {
                cast(v.data(), &common.arrow_type())?
            };
            Ok(Prepared::Array(arr))
        }
        Operand::Scalar(s) => {
            let one = s.broadcast_array(1);
            let one = if s.dtype() == common {
                one
            } else {
                cast(&one, &common.arrow_type())?
            };
            Ok(Prepared::Scalar(ArrowScalar::new(one)))
        }
    }
}

fn bool_storage(arr: &ArrayRef) -> Result<&BooleanArray> {
    arr.as_any()
        .downcast_ref::<BooleanArray>()
        .ok_or_else(|| Error::Internal("boolean kernel over non-boolean storage".into()))
}

/// Materialize an operand as a full-length array of the common type. Used for
/// the boolean connectives, whose kernels have no scalar form.
fn materialize(operand: Operand<'_>, common: DType, len: usize) -> Result<ArrayRef> {
    let arr = match operand {
        Operand::Column(v) => Arc::clone(v.data()),
        Operand::Scalar(s) => s.broadcast_array(len),
    };
    if operand.dtype() == common {
        Ok(arr)
    } else {
        Ok(cast(&arr, &common.arrow_type())?)
    }
}

/// Apply `lhs op rhs` elementwise, producing a vector of type `out`.
///
/// Both sides are implicitly promoted to their common type before the kernel
/// runs; `out` then overrides the natural result type when the caller asks for
/// one (the extra cast is skipped when it would be the identity). At least one
/// operand must be a column; scalar/scalar folding is the caller's business.
pub fn binary(op: BinaryOp, lhs: Operand<'_>, rhs: Operand<'_>, out: DType) -> Result<Vector> {
    let len = match (&lhs, &rhs) {
        (Operand::Column(v), _) => v.len(),
        (_, Operand::Column(v)) => v.len(),
        _ => {
            return Err(Error::Internal(
                "binary kernel requires at least one column operand".into(),
            ))
        }
    };
    let common = DType::promote(lhs.dtype(), rhs.dtype())?;

    let result: ArrayRef = match op {
        BinaryOp::And | BinaryOp::Or => {
            if common != DType::Bool8 {
                return Err(Error::InvalidArgumentError(format!(
                    "{op:?} requires boolean operands, got {common:?}"
                )));
            }
            let l = materialize(lhs, common, len)?;
            let r = materialize(rhs, common, len)?;
            let (l, r) = (bool_storage(&l)?, bool_storage(&r)?);
            match op {
                BinaryOp::And => Arc::new(boolean::and_kleene(l, r)?),
                _ => Arc::new(boolean::or_kleene(l, r)?),
            }
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            let l = prepare(lhs, common)?;
            let r = prepare(rhs, common)?;
            match op {
                BinaryOp::Add => numeric::add(l.datum(), r.datum())?,
                BinaryOp::Sub => numeric::sub(l.datum(), r.datum())?,
                BinaryOp::Mul => numeric::mul(l.datum(), r.datum())?,
                BinaryOp::Div => numeric::div(l.datum(), r.datum())?,
                _ => numeric::rem(l.datum(), r.datum())?,
            }
        }
        _ => {
            let l = prepare(lhs, common)?;
            let r = prepare(rhs, common)?;
            let bools = match op {
                BinaryOp::Eq => cmp::eq(l.datum(), r.datum())?,
                BinaryOp::NotEq => cmp::neq(l.datum(), r.datum())?,
                BinaryOp::Lt => cmp::lt(l.datum(), r.datum())?,
                BinaryOp::LtEq => cmp::lt_eq(l.datum(), r.datum())?,
                BinaryOp::Gt => cmp::gt(l.datum(), r.datum())?,
                _ => cmp::gt_eq(l.datum(), r.datum())?,
            };
            Arc::new(bools)
        }
    };

    let natural = op.output_for(common);
    let result = if out == natural {
        result
    } else {
        cast(&result, &out.arrow_type())?
    };
    Ok(Vector::from_parts(out, result))
}

/// Apply a unary operation elementwise.
pub fn unary(op: UnaryOp, input: &Vector) -> Result<Vector> {
    let result: ArrayRef = match op {
        UnaryOp::Not => {
            if input.dtype() != DType::Bool8 {
                return Err(Error::InvalidArgumentError(format!(
                    "NOT requires a boolean column, got {:?}",
                    input.dtype()
                )));
            }
            Arc::new(boolean::not(bool_storage(input.data())?)?)
        }
        UnaryOp::Negate => numeric::neg(input.data().as_ref())?,
        UnaryOp::IsNull => Arc::new(is_null(input.data().as_ref())?),
    };
    Ok(Vector::from_parts(op.output_for(input.dtype()), result))
}

/// Cast a vector to another device type, producing a new vector.
pub fn cast_to(input: &Vector, to: DType) -> Result<Vector> {
    let result = cast(input.data(), &to.arrow_type())?;
    Ok(Vector::from_parts(to, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::VectorBuilder;

    fn int32_vector(values: &[i32]) -> Vector {
        let mut b = VectorBuilder::with_capacity(DType::Int32, values.len()).unwrap();
        for v in values {
            b.append_i32(*v).unwrap();
        }
        b.finish()
    }

    #[test]
    fn add_promotes_to_widest_type() {
        let lhs = int32_vector(&[1, 2, 3]);
        let rhs = Scalar::from(10i64);
        let out = binary(
            BinaryOp::Add,
            Operand::Column(&lhs),
            Operand::Scalar(&rhs),
            DType::Int64,
        )
        .unwrap();
        assert_eq!(out.dtype(), DType::Int64);
        assert_eq!(out.i64_value(1).unwrap(), 12);
    }

    #[test]
    fn comparison_produces_bool8() {
        let lhs = int32_vector(&[1, 5, 3]);
        let rhs = int32_vector(&[2, 2, 3]);
        let out = binary(
            BinaryOp::Lt,
            Operand::Column(&lhs),
            Operand::Column(&rhs),
            DType::Bool8,
        )
        .unwrap();
        assert_eq!(out.dtype(), DType::Bool8);
        assert!(out.bool_value(0).unwrap());
        assert!(!out.bool_value(1).unwrap());
        assert!(!out.bool_value(2).unwrap());
    }

    #[test]
    fn two_scalar_operands_are_rejected() {
        let l = Scalar::from(1i32);
        let r = Scalar::from(2i32);
        let err = binary(BinaryOp::Add, Operand::Scalar(&l), Operand::Scalar(&r), DType::Int32);
        assert!(err.is_err());
    }

    #[test]
    fn negate_preserves_type() {
        let v = int32_vector(&[1, -2, 3]);
        let out = unary(UnaryOp::Negate, &v).unwrap();
        assert_eq!(out.dtype(), DType::Int32);
        assert_eq!(out.i32_value(1).unwrap(), 2);
    }

    #[test]
    fn explicit_output_override_casts() {
        let lhs = int32_vector(&[1, 2, 3]);
        let rhs = int32_vector(&[10, 20, 30]);
        let out = binary(
            BinaryOp::Add,
            Operand::Column(&lhs),
            Operand::Column(&rhs),
            DType::Float64,
        )
        .unwrap();
        assert_eq!(out.dtype(), DType::Float64);
        assert_eq!(out.f64_value(2).unwrap(), 33.0);
    }
}
