//! The per-column adapter over a device vector.

use arrow::datatypes::DataType;
use axle_result::{Error, Result};
use axle_vector::{DType, Scalar, Vector};

use crate::types;

/// One column of a device batch: a vector handle plus the logical type it is
/// presented as.
///
/// The adapter owns exactly one reference to its vector and releases it when
/// dropped. [`DeviceColumn::inc_ref`] vends an additional adapter over the
/// same vector; the two are then released independently. The adapter never
/// mutates the vector's contents, only its logical veneer and reference
/// count.
///
/// Most row accessors exist for interface compatibility with host columns and
/// copy single values out of device memory; bulk work should stay on the
/// device via kernels.
#[derive(Debug)]
pub struct DeviceColumn {
    logical: DataType,
    device: Vector,
}

impl DeviceColumn {
    /// Wrap a vector under an explicit logical type. The caller guarantees
    /// the pairing is consistent with the type mapping.
    pub(crate) fn new(logical: DataType, device: Vector) -> DeviceColumn {
        debug_assert!(
            types::to_logical_type(device.dtype()) == logical,
            "logical type {logical:?} does not match device type {:?}",
            device.dtype()
        );
        DeviceColumn { logical, device }
    }

    /// Adapt a bare vector, deriving the logical type from its device type.
    ///
    /// No reference count changes: ownership of the incoming handle transfers
    /// to the adapter.
    pub fn from_vector(device: Vector) -> DeviceColumn {
        DeviceColumn {
            logical: types::to_logical_type(device.dtype()),
            device,
        }
    }

    /// Materialize a constant column of `len` copies of `scalar`. The caller
    /// owns the returned adapter.
    pub fn from_scalar(scalar: &Scalar, len: usize) -> DeviceColumn {
        DeviceColumn::from_vector(Vector::from_scalar(scalar, len))
    }

    #[inline]
    pub fn logical_type(&self) -> &DataType {
        &self.logical
    }

    /// The underlying vector, borrowed with no reference-count change.
    #[inline]
    pub fn device(&self) -> &Vector {
        &self.device
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.device.len()
    }

    /// Acquire an additional owned adapter over the same vector.
    pub fn inc_ref(&self) -> DeviceColumn {
        DeviceColumn {
            logical: self.logical.clone(),
            device: self.device.inc_ref(),
        }
    }

    #[inline]
    pub fn has_nulls(&self) -> bool {
        self.device.has_nulls()
    }

    #[inline]
    pub fn null_count(&self) -> usize {
        self.device.null_count()
    }

    /// Whether the value at `row` is null.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    #[inline]
    pub fn is_null(&self, row: usize) -> bool {
        self.device.is_null(row)
    }

    pub fn bool_value(&self, row: usize) -> Result<bool> {
        self.device.bool_value(row)
    }

    pub fn i8_value(&self, row: usize) -> Result<i8> {
        self.device.i8_value(row)
    }

    pub fn i16_value(&self, row: usize) -> Result<i16> {
        self.device.i16_value(row)
    }

    pub fn i32_value(&self, row: usize) -> Result<i32> {
        self.device.i32_value(row)
    }

    pub fn i64_value(&self, row: usize) -> Result<i64> {
        self.device.i64_value(row)
    }

    pub fn f32_value(&self, row: usize) -> Result<f32> {
        self.device.f32_value(row)
    }

    pub fn f64_value(&self, row: usize) -> Result<f64> {
        self.device.f64_value(row)
    }

    pub fn utf8_value(&self, row: usize) -> Result<String> {
        self.device.utf8_value(row)
    }

    /// Variable-length binary access has no device representation.
    pub fn binary_value(&self, _row: usize) -> Result<Vec<u8>> {
        Err(Error::Unsupported("binary data access".into()))
    }

    /// Decimal access has no device representation.
    pub fn decimal_value(&self, _row: usize, _precision: u8, _scale: i8) -> Result<i128> {
        Err(Error::Unsupported("decimal access".into()))
    }

    /// Struct-like child access has no device representation.
    pub fn child(&self, _ordinal: usize) -> Result<&DeviceColumn> {
        Err(Error::Unsupported("struct and struct-like child access".into()))
    }

    /// Re-express this column as dictionary-encoded text if it is plain text.
    ///
    /// The returned adapter is either a new vector (text input) or an
    /// additional reference to this one (everything else); in both cases the
    /// caller owns it and releases it independently of `self`.
    pub fn to_dictionary_if_needed(&self) -> Result<DeviceColumn> {
        if self.device.dtype() == DType::Utf8 {
            let _span =
                tracing::debug_span!("dictionary_encode", rows = self.row_count()).entered();
            Ok(DeviceColumn {
                logical: self.logical.clone(),
                device: self.device.as_dictionary()?,
            })
        } else {
            Ok(self.inc_ref())
        }
    }
}
