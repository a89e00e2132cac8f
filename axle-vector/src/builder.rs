//! Incremental, growable construction of a single vector.

use std::sync::Arc;

use arrow::array::{
    ArrayBuilder, ArrayRef, BooleanBuilder, Date32Builder, Float32Builder, Float64Builder,
    Int8Builder, Int16Builder, Int32Builder, Int64Builder, StringBuilder,
    TimestampMicrosecondBuilder,
};
use axle_result::{Error, Result};

use crate::dtype::DType;
use crate::vector::Vector;

/// Growable builder for one device vector.
///
/// Capacity arguments are estimates: appending past them grows the underlying
/// buffers transparently, and a failure to grow is a fatal allocation error.
/// Dropping an unfinished builder releases everything it allocated.
pub struct VectorBuilder {
    dtype: DType,
    inner: Inner,
}

enum Inner {
    Bool(BooleanBuilder),
    Int8(Int8Builder),
    Int16(Int16Builder),
    Int32(Int32Builder),
    Int64(Int64Builder),
    Float32(Float32Builder),
    Float64(Float64Builder),
    Date32(Date32Builder),
    Timestamp(TimestampMicrosecondBuilder),
    Utf8(StringBuilder),
}

impl VectorBuilder {
    /// A builder for `dtype` sized to `rows` values.
    ///
    /// Text builders need a byte-size estimate as well; use
    /// [`VectorBuilder::with_string_capacity`] for those. Dictionary-encoded
    /// vectors cannot be built directly; build plain text and convert.
    pub fn with_capacity(dtype: DType, rows: usize) -> Result<VectorBuilder> {
        let inner = match dtype {
            DType::Bool8 => Inner::Bool(BooleanBuilder::with_capacity(rows)),
            DType::Int8 => Inner::Int8(Int8Builder::with_capacity(rows)),
            DType::Int16 => Inner::Int16(Int16Builder::with_capacity(rows)),
            DType::Int32 => Inner::Int32(Int32Builder::with_capacity(rows)),
            DType::Int64 => Inner::Int64(Int64Builder::with_capacity(rows)),
            DType::Float32 => Inner::Float32(Float32Builder::with_capacity(rows)),
            DType::Float64 => Inner::Float64(Float64Builder::with_capacity(rows)),
            DType::Date32 => Inner::Date32(Date32Builder::with_capacity(rows)),
            DType::Timestamp => Inner::Timestamp(TimestampMicrosecondBuilder::with_capacity(rows)),
            DType::Utf8 => {
                return Err(Error::InvalidArgumentError(
                    "text builders need a byte-size estimate; use with_string_capacity".into(),
                ))
            }
            DType::Dict32 => {
                return Err(Error::InvalidArgumentError(
                    "dictionary vectors cannot be built directly; build text and convert".into(),
                ))
            }
        };
        Ok(VectorBuilder { dtype, inner })
    }

    /// A text builder sized to `rows` values and `data_bytes` total bytes.
    pub fn with_string_capacity(rows: usize, data_bytes: usize) -> VectorBuilder {
        VectorBuilder {
            dtype: DType::Utf8,
            inner: Inner::Utf8(StringBuilder::with_capacity(rows, data_bytes)),
        }
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Number of values appended so far.
    pub fn len(&self) -> usize {
        match &self.inner {
            Inner::Bool(b) => b.len(),
            Inner::Int8(b) => b.len(),
            Inner::Int16(b) => b.len(),
            Inner::Int32(b) => b.len(),
            Inner::Int64(b) => b.len(),
            Inner::Float32(b) => b.len(),
            Inner::Float64(b) => b.len(),
            Inner::Date32(b) => b.len(),
            Inner::Timestamp(b) => b.len(),
            Inner::Utf8(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn append_null(&mut self) {
        match &mut self.inner {
            Inner::Bool(b) => b.append_null(),
            Inner::Int8(b) => b.append_null(),
            Inner::Int16(b) => b.append_null(),
            Inner::Int32(b) => b.append_null(),
            Inner::Int64(b) => b.append_null(),
            Inner::Float32(b) => b.append_null(),
            Inner::Float64(b) => b.append_null(),
            Inner::Date32(b) => b.append_null(),
            Inner::Timestamp(b) => b.append_null(),
            Inner::Utf8(b) => b.append_null(),
        }
    }

    fn append_error(&self, kind: &str) -> Error {
        Error::InvalidArgumentError(format!(
            "cannot append {kind} to a {:?} builder",
            self.dtype
        ))
    }

    pub fn append_bool(&mut self, v: bool) -> Result<()> {
        match &mut self.inner {
            Inner::Bool(b) => Ok(b.append_value(v)),
            _ => Err(self.append_error("bool")),
        }
    }

    pub fn append_i8(&mut self, v: i8) -> Result<()> {
        match &mut self.inner {
            Inner::Int8(b) => Ok(b.append_value(v)),
            _ => Err(self.append_error("i8")),
        }
    }

    pub fn append_i16(&mut self, v: i16) -> Result<()> {
        match &mut self.inner {
            Inner::Int16(b) => Ok(b.append_value(v)),
            _ => Err(self.append_error("i16")),
        }
    }

    /// Append a 32-bit value; accepted by integer and date builders.
    pub fn append_i32(&mut self, v: i32) -> Result<()> {
        match &mut self.inner {
            Inner::Int32(b) => Ok(b.append_value(v)),
            Inner::Date32(b) => Ok(b.append_value(v)),
            _ => Err(self.append_error("i32")),
        }
    }

    /// Append a 64-bit value; accepted by integer and timestamp builders.
    pub fn append_i64(&mut self, v: i64) -> Result<()> {
        match &mut self.inner {
            Inner::Int64(b) => Ok(b.append_value(v)),
            Inner::Timestamp(b) => Ok(b.append_value(v)),
            _ => Err(self.append_error("i64")),
        }
    }

    pub fn append_f32(&mut self, v: f32) -> Result<()> {
        match &mut self.inner {
            Inner::Float32(b) => Ok(b.append_value(v)),
            _ => Err(self.append_error("f32")),
        }
    }

    pub fn append_f64(&mut self, v: f64) -> Result<()> {
        match &mut self.inner {
            Inner::Float64(b) => Ok(b.append_value(v)),
            _ => Err(self.append_error("f64")),
        }
    }

    pub fn append_str(&mut self, v: &str) -> Result<()> {
        match &mut self.inner {
            Inner::Utf8(b) => Ok(b.append_value(v)),
            _ => Err(self.append_error("text")),
        }
    }

    /// Finish the builder into a vector, consuming it. The caller owns the
    /// returned handle.
    pub fn finish(mut self) -> Vector {
        let data: ArrayRef = match &mut self.inner {
            Inner::Bool(b) => Arc::new(b.finish()) as _,
            Inner::Int8(b) => Arc::new(b.finish()) as _,
            Inner::Int16(b) => Arc::new(b.finish()) as _,
            Inner::Int32(b) => Arc::new(b.finish()) as _,
            Inner::Int64(b) => Arc::new(b.finish()) as _,
            Inner::Float32(b) => Arc::new(b.finish()) as _,
            Inner::Float64(b) => Arc::new(b.finish()) as _,
            Inner::Date32(b) => Arc::new(b.finish()) as _,
            Inner::Timestamp(b) => Arc::new(b.finish()) as _,
            Inner::Utf8(b) => Arc::new(b.finish()) as _,
        };
        Vector::from_parts(self.dtype, data)
    }
}
