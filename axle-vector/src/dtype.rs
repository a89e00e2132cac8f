//! Device value types and the engine's implicit promotion order.

use arrow::datatypes::{DataType, TimeUnit as ArrowTimeUnit};
use axle_result::{Error, Result};

/// Value type of a device vector.
///
/// This is the engine's own type system, distinct from the logical schema
/// types presented to the query layer. `Dict32` is dictionary-encoded text:
/// the same logical values as `Utf8`, re-expressed as a dictionary of distinct
/// strings plus 32-bit per-row codes, which some kernels require in place of
/// plain variable-length text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    Bool8,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Date32,
    Timestamp,
    Utf8,
    Dict32,
}

/// Resolution tag carried by temporal vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeResolution {
    None,
    Microseconds,
}

impl DType {
    /// Resolution of values of this type. Timestamps are fixed at microsecond
    /// resolution; every other type has none.
    #[inline]
    pub fn time_resolution(self) -> TimeResolution {
        match self {
            DType::Timestamp => TimeResolution::Microseconds,
            _ => TimeResolution::None,
        }
    }

    /// Whether this type participates in numeric promotion.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            DType::Int8
                | DType::Int16
                | DType::Int32
                | DType::Int64
                | DType::Float32
                | DType::Float64
        )
    }

    /// Whether values of this type are text, in either representation.
    #[inline]
    pub fn is_text(self) -> bool {
        matches!(self, DType::Utf8 | DType::Dict32)
    }

    /// The Arrow storage type backing vectors of this type.
    pub(crate) fn arrow_type(self) -> DataType {
        match self {
            DType::Bool8 => DataType::Boolean,
            DType::Int8 => DataType::Int8,
            DType::Int16 => DataType::Int16,
            DType::Int32 => DataType::Int32,
            DType::Int64 => DataType::Int64,
            DType::Float32 => DataType::Float32,
            DType::Float64 => DataType::Float64,
            DType::Date32 => DataType::Date32,
            DType::Timestamp => DataType::Timestamp(ArrowTimeUnit::Microsecond, None),
            DType::Utf8 => DataType::Utf8,
            DType::Dict32 => {
                DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8))
            }
        }
    }

    fn numeric_rank(self) -> u8 {
        match self {
            DType::Int8 => 1,
            DType::Int16 => 2,
            DType::Int32 => 3,
            DType::Int64 => 4,
            DType::Float32 => 5,
            DType::Float64 => 6,
            _ => 0,
        }
    }

    /// The engine's implicit conversion rule for binary operands: the
    /// widest common type of the two inputs.
    ///
    /// This ordering is the single source of truth for output types of
    /// kernel-backed binary operators; layers above consume it rather than
    /// deriving their own. Text operands promote toward the dictionary
    /// representation so that a fixed-up column can combine with a plain
    /// text scalar.
    pub fn promote(lhs: DType, rhs: DType) -> Result<DType> {
        if lhs == rhs {
            return Ok(lhs);
        }
        if lhs.is_numeric() && rhs.is_numeric() {
            return Ok(if lhs.numeric_rank() >= rhs.numeric_rank() {
                lhs
            } else {
                rhs
            });
        }
        if lhs.is_text() && rhs.is_text() {
            return Ok(DType::Dict32);
        }
        Err(Error::InvalidArgumentError(format!(
            "no implicit conversion between {lhs:?} and {rhs:?}"
        )))
    }
}
