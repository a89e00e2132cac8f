//! Mapping between logical schema types and device vector types.
//!
//! The mapping is a finite lookup over the supported subset. A logical type
//! outside it is a configuration error surfaced before any data moves: the
//! planner should not have routed the operator to the device path.

use arrow::datatypes::{DataType, Field, TimeUnit as ArrowTimeUnit};
use axle_result::{Error, Result};
use axle_vector::{DType, TimeResolution};

/// Device type for a logical type, or `None` when there is no counterpart.
pub fn device_type_or_none(logical: &DataType) -> Option<DType> {
    match logical {
        DataType::Boolean => Some(DType::Bool8),
        DataType::Int8 => Some(DType::Int8),
        DataType::Int16 => Some(DType::Int16),
        DataType::Int32 => Some(DType::Int32),
        DataType::Int64 => Some(DType::Int64),
        DataType::Float32 => Some(DType::Float32),
        DataType::Float64 => Some(DType::Float64),
        DataType::Date32 => Some(DType::Date32),
        DataType::Timestamp(ArrowTimeUnit::Microsecond, None) => Some(DType::Timestamp),
        DataType::Utf8 => Some(DType::Utf8),
        _ => None,
    }
}

/// Whether the device path can represent this logical type. Pure; used by the
/// planner to decide routing before any work is done.
#[inline]
pub fn is_supported(logical: &DataType) -> bool {
    device_type_or_none(logical).is_some()
}

/// Device type for a logical type, failing on unsupported types.
pub fn to_device_type(logical: &DataType) -> Result<DType> {
    device_type_or_none(logical).ok_or_else(|| Error::unsupported_type(logical))
}

/// Device type for a schema field.
#[inline]
pub fn field_device_type(field: &Field) -> Result<DType> {
    to_device_type(field.data_type())
}

/// The logical type a device vector presents as.
///
/// Total over the device type system: dictionary-encoded text presents as
/// plain text, since the two representations carry the same logical values.
pub fn to_logical_type(dtype: DType) -> DataType {
    match dtype {
        DType::Bool8 => DataType::Boolean,
        DType::Int8 => DataType::Int8,
        DType::Int16 => DataType::Int16,
        DType::Int32 => DataType::Int32,
        DType::Int64 => DataType::Int64,
        DType::Float32 => DataType::Float32,
        DType::Float64 => DataType::Float64,
        DType::Date32 => DataType::Date32,
        DType::Timestamp => DataType::Timestamp(ArrowTimeUnit::Microsecond, None),
        DType::Utf8 | DType::Dict32 => DataType::Utf8,
    }
}

/// Resolution tag for a logical type: microseconds for timestamps, none
/// otherwise.
pub fn time_resolution_of(logical: &DataType) -> TimeResolution {
    match logical {
        DataType::Timestamp(_, _) => TimeResolution::Microseconds,
        _ => TimeResolution::None,
    }
}
