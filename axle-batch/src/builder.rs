//! Incremental construction of a whole batch from a target schema.

use arrow::array::{Array, StringArray};
use arrow::datatypes::{Fields, Schema};
use arrow::record_batch::RecordBatch;
use axle_result::Result;
use axle_vector::{DType, VectorBuilder};

use crate::batch::DeviceBatch;
use crate::column::DeviceColumn;
use crate::types;

/// Bytes assumed per text value when no better estimate is available.
const DEFAULT_STRING_BYTES_PER_ROW: usize = 8;

/// A collection of per-field builders for assembling one batch.
///
/// Construction is all-or-nothing: if any field's builder cannot be created,
/// the ones already allocated are released before the error propagates, and a
/// builder dropped before [`BatchBuilder::finish`] releases everything it
/// holds.
pub struct BatchBuilder {
    fields: Fields,
    builders: Vec<VectorBuilder>,
}

impl BatchBuilder {
    /// One builder per schema field, each sized to `rows` values.
    ///
    /// Text fields also need a byte-size estimate. When `host_hint` carries
    /// the host batch this one is about to copy, and its corresponding column
    /// is plain (non-dictionary) text, the exact byte length of that column
    /// is used; otherwise text is assumed small and gets 8 bytes per row.
    /// Either way the buffer grows if the estimate turns out short.
    pub fn new(schema: &Schema, rows: usize, host_hint: Option<&RecordBatch>) -> Result<BatchBuilder> {
        let fields = schema.fields().clone();
        let mut builders = Vec::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            let dtype = types::field_device_type(field)?;
            let builder = match dtype {
                DType::Utf8 => {
                    let bytes = string_capacity_hint(rows, host_hint, i);
                    VectorBuilder::with_string_capacity(rows, bytes)
                }
                _ => VectorBuilder::with_capacity(dtype, rows)?,
            };
            builders.push(builder);
        }
        Ok(BatchBuilder { fields, builders })
    }

    #[inline]
    pub fn num_fields(&self) -> usize {
        self.builders.len()
    }

    /// The builder for field `index`, for direct appends.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn builder_mut(&mut self, index: usize) -> &mut VectorBuilder {
        &mut self.builders[index]
    }

    /// Finish every builder and assemble the batch.
    ///
    /// Each builder slot is consumed exactly once; columns are presented
    /// under their field's logical type. Every column must come out with
    /// exactly `rows` rows, or the batch (and every vector built so far) is
    /// released and an error returned.
    pub fn finish(self, rows: u32) -> Result<DeviceBatch> {
        let mut columns = Vec::with_capacity(self.builders.len());
        for (field, builder) in self.fields.iter().zip(self.builders) {
            let vector = builder.finish();
            columns.push(DeviceColumn::new(field.data_type().clone(), vector));
        }
        tracing::trace!(
            columns = columns.len(),
            rows,
            "assembled device batch from builders"
        );
        DeviceBatch::try_new(columns, rows)
    }
}

/// Byte-size estimate for text field `index`: the exact total byte length of
/// the hint batch's column when it is plain text, the default estimate
/// otherwise.
fn string_capacity_hint(rows: usize, host_hint: Option<&RecordBatch>, index: usize) -> usize {
    if let Some(batch) = host_hint {
        if index < batch.num_columns() {
            if let Some(strings) = batch.column(index).as_any().downcast_ref::<StringArray>() {
                let offsets = strings.value_offsets();
                return (offsets[strings.len()] - offsets[0]) as usize;
            }
        }
    }
    rows * DEFAULT_STRING_BYTES_PER_ROW
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int32Array};
    use arrow::datatypes::{DataType, Field};
    use axle_result::Error;
    use std::sync::Arc;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("name", DataType::Utf8, true),
        ])
    }

    #[test]
    fn unsupported_field_fails_construction() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("blob", DataType::Binary, true),
        ]);
        assert!(matches!(
            BatchBuilder::new(&schema, 4, None),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn string_hint_uses_exact_bytes_from_plain_text() {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int32Array::from(vec![1, 2, 3])),
            Arc::new(StringArray::from(vec!["a", "bb", "ccc"])),
        ];
        let host = RecordBatch::try_new(Arc::new(schema()), columns).unwrap();
        assert_eq!(string_capacity_hint(3, Some(&host), 1), 6);
        // A non-text column falls back to the per-row default.
        assert_eq!(string_capacity_hint(3, Some(&host), 0), 24);
        assert_eq!(string_capacity_hint(3, None, 1), 24);
    }

    #[test]
    fn finish_checks_row_counts() {
        let schema = schema();
        let mut b = BatchBuilder::new(&schema, 2, None).unwrap();
        b.builder_mut(0).append_i32(1).unwrap();
        b.builder_mut(1).append_str("only one row here").unwrap();
        b.builder_mut(0).append_i32(2).unwrap();
        assert!(b.finish(2).is_err());
    }
}
