//! Positional tables of device vectors.

use axle_result::{Error, Result};

use crate::vector::Vector;

/// An unnamed, positional collection of equal-length vectors.
///
/// Tables are the engine-side shape of a batch: kernels that operate on whole
/// batches consume and produce tables, and the named/typed batch surface is
/// layered on top. A table owns one reference to each of its columns and
/// releases them all when dropped.
///
/// Row counts are 64-bit here; the batch layer imposes its narrower bound
/// when converting back.
pub struct Table {
    columns: Vec<Vector>,
    row_count: u64,
}

impl Table {
    /// Assemble a table from columns, taking ownership of each handle.
    ///
    /// All columns must have the same length.
    pub fn try_new(columns: Vec<Vector>) -> Result<Table> {
        let row_count = columns.first().map(|c| c.len() as u64).unwrap_or(0);
        for (i, col) in columns.iter().enumerate() {
            if col.len() as u64 != row_count {
                return Err(Error::InvalidArgumentError(format!(
                    "table column {i} has {} rows, expected {row_count}",
                    col.len()
                )));
            }
        }
        Ok(Table { columns, row_count })
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Column at `index`, borrowed from the table with no reference-count
    /// change. Use [`Vector::inc_ref`] to retain it past the table's life.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn column(&self, index: usize) -> &Vector {
        &self.columns[index]
    }

    #[inline]
    pub fn columns(&self) -> &[Vector] {
        &self.columns
    }
}
