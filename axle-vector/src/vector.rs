//! Reference-counted handles to typed device vectors.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, DictionaryArray, Float32Array, Float64Array,
    Int8Array, Int16Array, Int32Array, Int64Array, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::Int32Type;
use axle_result::{Error, Result};

use crate::dtype::{DType, TimeResolution};
use crate::kernels;
use crate::scalar::Scalar;

/// A handle to a typed vector owned by the engine.
///
/// Each `Vector` is one reference to a shared allocation: [`Vector::inc_ref`]
/// vends an additional owned handle, dropping a handle releases its reference,
/// and the drop of the last handle frees the underlying buffer. Handles move
/// rather than copy, so releasing the same reference twice does not compile,
/// and any scope that obtains a handle releases it on every exit path.
///
/// Contents are immutable; every transform allocates a new vector.
pub struct Vector {
    inner: Arc<VectorData>,
}

struct VectorData {
    dtype: DType,
    data: ArrayRef,
}

impl Vector {
    pub(crate) fn from_parts(dtype: DType, data: ArrayRef) -> Vector {
        Vector {
            inner: Arc::new(VectorData { dtype, data }),
        }
    }

    /// Materialize a constant vector of `len` copies of `scalar`.
    pub fn from_scalar(scalar: &Scalar, len: usize) -> Vector {
        Vector::from_parts(scalar.dtype(), scalar.broadcast_array(len))
    }

    /// Acquire an additional owned reference to this vector.
    ///
    /// The returned handle must be dropped independently of `self`.
    #[inline]
    pub fn inc_ref(&self) -> Vector {
        Vector {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of live references to the underlying allocation. Exposed so
    /// callers can audit the ownership contracts of the layers above.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Whether two handles refer to the same underlying allocation.
    #[inline]
    pub fn same_buffer(&self, other: &Vector) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.inner.dtype
    }

    #[inline]
    pub fn time_resolution(&self) -> TimeResolution {
        self.inner.dtype.time_resolution()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.data.is_empty()
    }

    #[inline]
    pub fn null_count(&self) -> usize {
        self.inner.data.null_count()
    }

    #[inline]
    pub fn has_nulls(&self) -> bool {
        self.null_count() > 0
    }

    /// Whether the value at `row` is null.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    #[inline]
    pub fn is_null(&self, row: usize) -> bool {
        self.inner.data.is_null(row)
    }

    pub(crate) fn data(&self) -> &ArrayRef {
        &self.inner.data
    }

    fn storage<T: 'static>(&self) -> Result<&T> {
        self.inner
            .data
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| {
                Error::Internal(format!(
                    "vector storage does not match its {:?} type tag",
                    self.inner.dtype
                ))
            })
    }

    fn type_error(&self, wanted: &str) -> Error {
        Error::InvalidArgumentError(format!(
            "cannot read {wanted} values from a {:?} vector",
            self.inner.dtype
        ))
    }

    pub fn bool_value(&self, row: usize) -> Result<bool> {
        match self.dtype() {
            DType::Bool8 => Ok(self.storage::<BooleanArray>()?.value(row)),
            _ => Err(self.type_error("boolean")),
        }
    }

    pub fn i8_value(&self, row: usize) -> Result<i8> {
        match self.dtype() {
            DType::Int8 => Ok(self.storage::<Int8Array>()?.value(row)),
            _ => Err(self.type_error("int8")),
        }
    }

    pub fn i16_value(&self, row: usize) -> Result<i16> {
        match self.dtype() {
            DType::Int16 => Ok(self.storage::<Int16Array>()?.value(row)),
            _ => Err(self.type_error("int16")),
        }
    }

    /// 32-bit value at `row`; serves both integer and date vectors, which
    /// share a 32-bit representation.
    pub fn i32_value(&self, row: usize) -> Result<i32> {
        match self.dtype() {
            DType::Int32 => Ok(self.storage::<Int32Array>()?.value(row)),
            DType::Date32 => Ok(self.storage::<Date32Array>()?.value(row)),
            _ => Err(self.type_error("int32")),
        }
    }

    /// 64-bit value at `row`; serves both integer and timestamp vectors.
    pub fn i64_value(&self, row: usize) -> Result<i64> {
        match self.dtype() {
            DType::Int64 => Ok(self.storage::<Int64Array>()?.value(row)),
            DType::Timestamp => Ok(self.storage::<TimestampMicrosecondArray>()?.value(row)),
            _ => Err(self.type_error("int64")),
        }
    }

    pub fn f32_value(&self, row: usize) -> Result<f32> {
        match self.dtype() {
            DType::Float32 => Ok(self.storage::<Float32Array>()?.value(row)),
            _ => Err(self.type_error("float32")),
        }
    }

    pub fn f64_value(&self, row: usize) -> Result<f64> {
        match self.dtype() {
            DType::Float64 => Ok(self.storage::<Float64Array>()?.value(row)),
            _ => Err(self.type_error("float64")),
        }
    }

    /// Text value at `row`, transparently decoding the dictionary
    /// representation. Copies the value out of device memory.
    pub fn utf8_value(&self, row: usize) -> Result<String> {
        match self.dtype() {
            DType::Utf8 => Ok(self.storage::<StringArray>()?.value(row).to_string()),
            DType::Dict32 => {
                let dict = self.storage::<DictionaryArray<Int32Type>>()?;
                let values = dict
                    .values()
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .ok_or_else(|| {
                        Error::Internal("dictionary values are not text".into())
                    })?;
                let key = dict.keys().value(row) as usize;
                Ok(values.value(key).to_string())
            }
            _ => Err(self.type_error("text")),
        }
    }

    /// Re-express a plain text vector as dictionary-encoded text.
    ///
    /// The returned vector is a new allocation over the same logical values;
    /// the input is untouched.
    pub fn as_dictionary(&self) -> Result<Vector> {
        if self.dtype() != DType::Utf8 {
            return Err(Error::InvalidArgumentError(format!(
                "dictionary conversion requires a text vector, got {:?}",
                self.dtype()
            )));
        }
        kernels::cast_to(self, DType::Dict32)
    }

    /// Cast this vector to another device type, producing a new vector.
    pub fn cast(&self, to: DType) -> Result<Vector> {
        kernels::cast_to(self, to)
    }
}

impl std::fmt::Debug for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vector")
            .field("dtype", &self.inner.dtype)
            .field("len", &self.len())
            .field("null_count", &self.null_count())
            .field("ref_count", &self.ref_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::VectorBuilder;

    #[test]
    fn inc_ref_and_drop_balance() {
        let v = Vector::from_scalar(&Scalar::from(7i32), 4);
        assert_eq!(v.ref_count(), 1);
        let extra = v.inc_ref();
        assert_eq!(v.ref_count(), 2);
        assert!(extra.same_buffer(&v));
        drop(extra);
        assert_eq!(v.ref_count(), 1);
    }

    #[test]
    fn from_scalar_broadcasts_nulls() {
        let v = Vector::from_scalar(&Scalar::Int64(None), 3);
        assert_eq!(v.len(), 3);
        assert_eq!(v.null_count(), 3);
        assert!(v.is_null(2));
    }

    #[test]
    fn dictionary_round_trips_values() {
        let mut b = VectorBuilder::with_string_capacity(3, 16);
        b.append_str("a").unwrap();
        b.append_str("bb").unwrap();
        b.append_str("a").unwrap();
        let plain = b.finish();

        let dict = plain.as_dictionary().unwrap();
        assert_eq!(dict.dtype(), DType::Dict32);
        assert_eq!(dict.len(), 3);
        for row in 0..3 {
            assert_eq!(dict.utf8_value(row).unwrap(), plain.utf8_value(row).unwrap());
        }
        // The source vector is untouched.
        assert_eq!(plain.dtype(), DType::Utf8);
        assert_eq!(plain.ref_count(), 1);
    }

    #[test]
    fn typed_access_is_checked() {
        let v = Vector::from_scalar(&Scalar::from(1.5f64), 2);
        assert!(v.i32_value(0).is_err());
        assert_eq!(v.f64_value(0).unwrap(), 1.5);
    }
}
