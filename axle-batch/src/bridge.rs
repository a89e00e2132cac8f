//! Conversions between batches and the engine's positional tables.
//!
//! The table conversions deliberately double ownership: converting a batch to
//! a table (or back) clones every column handle, so the source and the result
//! must each be dropped on their own. Downstream callers rely on retaining a
//! table independently of the batch it came from, so this is contract, not
//! accident.

use axle_result::{Error, Result};
use axle_vector::Table;

use crate::batch::DeviceBatch;
use crate::column::DeviceColumn;

impl DeviceBatch {
    /// Convert this batch to a positional table.
    ///
    /// Every column's reference count is incremented: the returned table owns
    /// one reference per column and this batch keeps its own. Drop both to
    /// release everything.
    pub fn to_table(&self) -> Table {
        let columns = self.handles().map(|v| v.inc_ref()).collect();
        Table::try_new(columns).expect("batch columns are equal-length by construction")
    }

    /// Convert a whole table to a batch. See
    /// [`from_table_range`](DeviceBatch::from_table_range).
    pub fn from_table(table: &Table) -> Result<DeviceBatch> {
        DeviceBatch::from_table_range(table, 0, table.num_columns())
    }

    /// Build a batch from the table columns in `[start_col, until_col)`.
    ///
    /// Each converted column's reference count is incremented, so the table
    /// is unaffected and must still be dropped independently of the returned
    /// batch. Fails if the range is out of bounds or the table's row count
    /// exceeds what a batch can represent; any adapters created before a
    /// failure are released before the error propagates.
    pub fn from_table_range(
        table: &Table,
        start_col: usize,
        until_col: usize,
    ) -> Result<DeviceBatch> {
        if start_col > until_col || until_col > table.num_columns() {
            return Err(Error::InvalidArgumentError(format!(
                "column range {start_col}..{until_col} out of bounds for a {}-column table",
                table.num_columns()
            )));
        }
        let rows = table.row_count();
        let rows = u32::try_from(rows).map_err(|_| Error::RowCountOverflow(rows))?;

        let mut columns = Vec::with_capacity(until_col - start_col);
        for i in start_col..until_col {
            columns.push(DeviceColumn::from_vector(table.column(i).inc_ref()));
        }
        tracing::trace!(columns = columns.len(), rows, "built batch from table range");
        DeviceBatch::try_new(columns, rows)
    }
}

/// Convert every column of `batch` to its dictionary representation where
/// needed, returning one new owned adapter per column.
///
/// Adapters already created are released if a conversion fails partway. The
/// input batch is never consumed; close it independently of the results.
pub fn dictionary_columns(batch: &DeviceBatch) -> Result<Vec<DeviceColumn>> {
    let mut out = Vec::with_capacity(batch.num_columns());
    for col in batch.columns() {
        out.push(col.to_dictionary_if_needed()?);
    }
    Ok(out)
}

/// Batch-level form of [`dictionary_columns`]: a new batch whose text columns
/// are dictionary-encoded. Both batches must be dropped independently.
pub fn to_dictionary_batch(batch: &DeviceBatch) -> Result<DeviceBatch> {
    DeviceBatch::try_new(dictionary_columns(batch)?, batch.num_rows())
}
