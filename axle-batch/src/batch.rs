//! Batches of device columns.

use arrow::datatypes::Schema;
use axle_result::{Error, Result};
use axle_vector::Vector;

use crate::builder::BatchBuilder;
use crate::column::DeviceColumn;

/// An ordered collection of equal-length device columns plus a row count.
///
/// A batch owns one reference per column and releases each exactly once when
/// dropped. Row counts are bounded to `u32`; the bridge enforces the bound
/// when converting from wider tables.
#[derive(Debug)]
pub struct DeviceBatch {
    columns: Vec<DeviceColumn>,
    num_rows: u32,
}

impl DeviceBatch {
    /// Assemble a batch, taking ownership of the columns.
    ///
    /// Every column must have exactly `num_rows` rows. A batch with no
    /// columns is permitted and keeps the stated row count.
    pub fn try_new(columns: Vec<DeviceColumn>, num_rows: u32) -> Result<DeviceBatch> {
        for (i, col) in columns.iter().enumerate() {
            if col.row_count() != num_rows as usize {
                return Err(Error::InvalidArgumentError(format!(
                    "batch column {i} has {} rows, expected {num_rows}",
                    col.row_count()
                )));
            }
        }
        Ok(DeviceBatch { columns, num_rows })
    }

    /// A zero-row batch with the given schema.
    ///
    /// Returning an empty batch from an operator is almost always the wrong
    /// thing to do; this exists for the rare edge cases that need one.
    pub fn empty(schema: &Schema) -> Result<DeviceBatch> {
        BatchBuilder::new(schema, 0, None)?.finish(0)
    }

    #[inline]
    pub fn num_rows(&self) -> u32 {
        self.num_rows
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column at `index`, borrowed with no reference-count change.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn column(&self, index: usize) -> &DeviceColumn {
        &self.columns[index]
    }

    #[inline]
    pub fn columns(&self) -> &[DeviceColumn] {
        &self.columns
    }

    /// The underlying vector handles, borrowed with no reference-count
    /// change. Retain any of them past the batch's life with
    /// [`Vector::inc_ref`].
    pub fn handles(&self) -> impl Iterator<Item = &Vector> {
        self.columns.iter().map(|c| c.device())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field};
    use axle_vector::Scalar;

    #[test]
    fn rejects_mismatched_row_counts() {
        let a = DeviceColumn::from_scalar(&Scalar::from(1i32), 3);
        let b = DeviceColumn::from_scalar(&Scalar::from(2i64), 4);
        assert!(DeviceBatch::try_new(vec![a, b], 3).is_err());
    }

    #[test]
    fn empty_batch_matches_its_schema() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, true),
        ]);
        let batch = DeviceBatch::empty(&schema).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 2);
        assert_eq!(batch.column(1).logical_type(), &DataType::Utf8);
    }

    #[test]
    fn columnless_batch_keeps_its_row_count() {
        let batch = DeviceBatch::try_new(vec![], 17).unwrap();
        assert_eq!(batch.num_rows(), 17);
        assert_eq!(batch.num_columns(), 0);
    }
}
