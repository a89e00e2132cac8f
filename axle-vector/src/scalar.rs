//! Typed, nullable device scalars.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Float32Array, Float64Array, Int8Array, Int16Array,
    Int32Array, Int64Array, StringArray, TimestampMicrosecondArray,
};
use axle_result::{Error, Result};

use crate::dtype::DType;
use crate::kernels::BinaryOp;

/// A single typed value, possibly null, as the engine represents one.
///
/// Scalars appear as literal operands of kernel calls and as the broadcast
/// source when a constant column is materialized.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Bool(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Date32(Option<i32>),
    TimestampMicros(Option<i64>),
    Utf8(Option<String>),
}

macro_rules! impl_from_for_scalar {
    ($variant:ident, $($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar::$variant(Some(v.into()))
                }
            }
        )*
    };
}

impl_from_for_scalar!(Bool, bool);
impl_from_for_scalar!(Int8, i8);
impl_from_for_scalar!(Int16, i16);
impl_from_for_scalar!(Int32, i32);
impl_from_for_scalar!(Int64, i64);
impl_from_for_scalar!(Float32, f32);
impl_from_for_scalar!(Float64, f64);
impl_from_for_scalar!(Utf8, String);

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Utf8(Some(v.to_string()))
    }
}

impl Scalar {
    /// Device type of this scalar. Text scalars are always plain `Utf8`; the
    /// dictionary representation exists only for vectors.
    pub fn dtype(&self) -> DType {
        match self {
            Scalar::Bool(_) => DType::Bool8,
            Scalar::Int8(_) => DType::Int8,
            Scalar::Int16(_) => DType::Int16,
            Scalar::Int32(_) => DType::Int32,
            Scalar::Int64(_) => DType::Int64,
            Scalar::Float32(_) => DType::Float32,
            Scalar::Float64(_) => DType::Float64,
            Scalar::Date32(_) => DType::Date32,
            Scalar::TimestampMicros(_) => DType::Timestamp,
            Scalar::Utf8(_) => DType::Utf8,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Scalar::Bool(v) => v.is_none(),
            Scalar::Int8(v) => v.is_none(),
            Scalar::Int16(v) => v.is_none(),
            Scalar::Int32(v) => v.is_none(),
            Scalar::Int64(v) => v.is_none(),
            Scalar::Float32(v) => v.is_none(),
            Scalar::Float64(v) => v.is_none(),
            Scalar::Date32(v) => v.is_none(),
            Scalar::TimestampMicros(v) => v.is_none(),
            Scalar::Utf8(v) => v.is_none(),
        }
    }

    /// The null scalar of the given device type. Dictionary-encoded text has
    /// no scalar form, so it nulls as plain text.
    pub fn null_of(dtype: DType) -> Scalar {
        match dtype {
            DType::Bool8 => Scalar::Bool(None),
            DType::Int8 => Scalar::Int8(None),
            DType::Int16 => Scalar::Int16(None),
            DType::Int32 => Scalar::Int32(None),
            DType::Int64 => Scalar::Int64(None),
            DType::Float32 => Scalar::Float32(None),
            DType::Float64 => Scalar::Float64(None),
            DType::Date32 => Scalar::Date32(None),
            DType::Timestamp => Scalar::TimestampMicros(None),
            DType::Utf8 | DType::Dict32 => Scalar::Utf8(None),
        }
    }

    /// Materialize `len` copies of this scalar as an Arrow array.
    pub(crate) fn broadcast_array(&self, len: usize) -> ArrayRef {
        match self {
            Scalar::Bool(v) => Arc::new(BooleanArray::from(vec![*v; len])),
            Scalar::Int8(v) => Arc::new(Int8Array::from(vec![*v; len])),
            Scalar::Int16(v) => Arc::new(Int16Array::from(vec![*v; len])),
            Scalar::Int32(v) => Arc::new(Int32Array::from(vec![*v; len])),
            Scalar::Int64(v) => Arc::new(Int64Array::from(vec![*v; len])),
            Scalar::Float32(v) => Arc::new(Float32Array::from(vec![*v; len])),
            Scalar::Float64(v) => Arc::new(Float64Array::from(vec![*v; len])),
            Scalar::Date32(v) => Arc::new(Date32Array::from(vec![*v; len])),
            Scalar::TimestampMicros(v) => {
                Arc::new(TimestampMicrosecondArray::from(vec![*v; len]))
            }
            Scalar::Utf8(v) => Arc::new(StringArray::from(vec![v.as_deref(); len])),
        }
    }

    fn integer_value(&self) -> Option<i64> {
        match self {
            Scalar::Int8(v) => v.map(i64::from),
            Scalar::Int16(v) => v.map(i64::from),
            Scalar::Int32(v) => v.map(i64::from),
            Scalar::Int64(v) => *v,
            _ => None,
        }
    }

    fn float_value(&self) -> Option<f64> {
        match self {
            Scalar::Float32(v) => v.map(f64::from),
            Scalar::Float64(v) => *v,
            _ => self.integer_value().map(|v| v as f64),
        }
    }

    fn text_value(&self) -> Option<&str> {
        match self {
            Scalar::Utf8(v) => v.as_deref(),
            _ => None,
        }
    }

    fn from_integer(value: i64, dtype: DType) -> Result<Scalar> {
        let out_of_range =
            || Error::InvalidArgumentError(format!("scalar result {value} out of range for {dtype:?}"));
        Ok(match dtype {
            DType::Int8 => Scalar::Int8(Some(i8::try_from(value).map_err(|_| out_of_range())?)),
            DType::Int16 => Scalar::Int16(Some(i16::try_from(value).map_err(|_| out_of_range())?)),
            DType::Int32 => Scalar::Int32(Some(i32::try_from(value).map_err(|_| out_of_range())?)),
            DType::Int64 => Scalar::Int64(Some(value)),
            _ => return Err(Error::Internal(format!("{dtype:?} is not an integer type"))),
        })
    }

    /// Evaluate `lhs op rhs` over two non-null scalars.
    ///
    /// Operands are implicitly promoted with [`DType::promote`] first, the
    /// same rule kernel evaluation uses for vectors. Callers are expected to
    /// have short-circuited null operands already.
    pub fn binary_op(op: BinaryOp, lhs: &Scalar, rhs: &Scalar) -> Result<Scalar> {
        if lhs.is_null() || rhs.is_null() {
            return Err(Error::Internal(
                "null scalar operands must short-circuit before scalar evaluation".into(),
            ));
        }
        let common = DType::promote(lhs.dtype(), rhs.dtype())?;
        match common {
            DType::Bool8 => {
                let (l, r) = match (lhs, rhs) {
                    (Scalar::Bool(Some(l)), Scalar::Bool(Some(r))) => (*l, *r),
                    _ => unreachable!("promotion guarantees boolean operands"),
                };
                match op {
                    BinaryOp::And => Ok(Scalar::Bool(Some(l && r))),
                    BinaryOp::Or => Ok(Scalar::Bool(Some(l || r))),
                    BinaryOp::Eq => Ok(Scalar::Bool(Some(l == r))),
                    BinaryOp::NotEq => Ok(Scalar::Bool(Some(l != r))),
                    _ => Err(Error::InvalidArgumentError(format!(
                        "{op:?} is not defined for boolean scalars"
                    ))),
                }
            }
            DType::Utf8 | DType::Dict32 => {
                let (l, r) = (
                    lhs.text_value().expect("non-null text scalar"),
                    rhs.text_value().expect("non-null text scalar"),
                );
                if op.is_comparison() {
                    Ok(Scalar::Bool(Some(compare_with(op, l.cmp(r)))))
                } else {
                    Err(Error::InvalidArgumentError(format!(
                        "{op:?} is not defined for text scalars"
                    )))
                }
            }
            DType::Float32 | DType::Float64 => {
                let (l, r) = (
                    lhs.float_value().expect("non-null numeric scalar"),
                    rhs.float_value().expect("non-null numeric scalar"),
                );
                if op.is_comparison() {
                    return Ok(Scalar::Bool(Some(compare_with(
                        op,
                        l.partial_cmp(&r).unwrap_or(std::cmp::Ordering::Equal),
                    ))));
                }
                let v = match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                    BinaryOp::Mod => l % r,
                    _ => {
                        return Err(Error::InvalidArgumentError(format!(
                            "{op:?} is not defined for float scalars"
                        )))
                    }
                };
                Ok(match common {
                    DType::Float32 => Scalar::Float32(Some(v as f32)),
                    _ => Scalar::Float64(Some(v)),
                })
            }
            DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64 => {
                let (l, r) = (
                    lhs.integer_value().expect("non-null integer scalar"),
                    rhs.integer_value().expect("non-null integer scalar"),
                );
                if op.is_comparison() {
                    return Ok(Scalar::Bool(Some(compare_with(op, l.cmp(&r)))));
                }
                let overflow =
                    || Error::InvalidArgumentError(format!("integer overflow in {l} {op:?} {r}"));
                let div_by_zero = || Error::InvalidArgumentError("division by zero".into());
                let v = match op {
                    BinaryOp::Add => l.checked_add(r).ok_or_else(overflow)?,
                    BinaryOp::Sub => l.checked_sub(r).ok_or_else(overflow)?,
                    BinaryOp::Mul => l.checked_mul(r).ok_or_else(overflow)?,
                    BinaryOp::Div => l.checked_div(r).ok_or_else(div_by_zero)?,
                    BinaryOp::Mod => l.checked_rem(r).ok_or_else(div_by_zero)?,
                    _ => {
                        return Err(Error::InvalidArgumentError(format!(
                            "{op:?} is not defined for integer scalars"
                        )))
                    }
                };
                Scalar::from_integer(v, common)
            }
            DType::Date32 | DType::Timestamp => {
                let (l, r) = match (lhs, rhs) {
                    (Scalar::Date32(Some(l)), Scalar::Date32(Some(r))) => {
                        (i64::from(*l), i64::from(*r))
                    }
                    (Scalar::TimestampMicros(Some(l)), Scalar::TimestampMicros(Some(r))) => {
                        (*l, *r)
                    }
                    _ => unreachable!("promotion guarantees matching temporal operands"),
                };
                if op.is_comparison() {
                    Ok(Scalar::Bool(Some(compare_with(op, l.cmp(&r)))))
                } else {
                    Err(Error::InvalidArgumentError(format!(
                        "{op:?} is not defined for temporal scalars"
                    )))
                }
            }
        }
    }
}

fn compare_with(op: BinaryOp, ord: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match op {
        BinaryOp::Eq => ord == Equal,
        BinaryOp::NotEq => ord != Equal,
        BinaryOp::Lt => ord == Less,
        BinaryOp::LtEq => ord != Greater,
        BinaryOp::Gt => ord == Greater,
        BinaryOp::GtEq => ord != Less,
        _ => unreachable!("not a comparison operator"),
    }
}
