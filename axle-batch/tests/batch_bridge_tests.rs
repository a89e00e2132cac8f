use arrow::datatypes::{DataType, Field, Schema};
use axle_batch::{BatchBuilder, DeviceBatch, DeviceColumn};
use axle_vector::{Scalar, Vector};

fn int_text_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("name", DataType::Utf8, true),
    ])
}

fn build_sample_batch() -> DeviceBatch {
    let schema = int_text_schema();
    let mut builder = BatchBuilder::new(&schema, 3, None).unwrap();
    for v in [1, 2, 3] {
        builder.builder_mut(0).append_i32(v).unwrap();
    }
    for s in ["a", "bb", "ccc"] {
        builder.builder_mut(1).append_str(s).unwrap();
    }
    builder.finish(3).unwrap()
}

#[test]
fn builder_produces_the_appended_values() {
    let batch = build_sample_batch();
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(batch.num_columns(), 2);

    let ids = batch.column(0);
    let names = batch.column(1);
    assert_eq!(ids.logical_type(), &DataType::Int32);
    assert_eq!(names.logical_type(), &DataType::Utf8);
    for row in 0..3 {
        assert!(!ids.is_null(row));
        assert!(!names.is_null(row));
    }
    assert_eq!(
        (0..3).map(|r| ids.i32_value(r).unwrap()).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(
        (0..3)
            .map(|r| names.utf8_value(r).unwrap())
            .collect::<Vec<_>>(),
        vec!["a", "bb", "ccc"]
    );
}

#[test]
fn dropping_a_batch_releases_one_reference_per_column() {
    let batch = build_sample_batch();
    let watchers: Vec<Vector> = batch.handles().map(|v| v.inc_ref()).collect();
    let before: Vec<usize> = watchers.iter().map(|v| v.ref_count()).collect();
    drop(batch);
    for (watcher, before) in watchers.iter().zip(before) {
        assert_eq!(watcher.ref_count(), before - 1);
    }
}

#[test]
fn to_table_doubles_ownership_and_both_drops_balance() {
    let batch = build_sample_batch();
    let watchers: Vec<Vector> = batch.handles().map(|v| v.inc_ref()).collect();
    let baseline: Vec<usize> = watchers.iter().map(|v| v.ref_count()).collect();

    let table = batch.to_table();
    assert_eq!(table.num_columns(), 2);
    assert_eq!(table.row_count(), 3);
    for (watcher, base) in watchers.iter().zip(&baseline) {
        assert_eq!(watcher.ref_count(), base + 1);
    }

    // The table and the batch are released independently; together they
    // restore every count to where it started.
    drop(table);
    for (watcher, base) in watchers.iter().zip(&baseline) {
        assert_eq!(watcher.ref_count(), *base);
    }
    drop(batch);
    for (watcher, base) in watchers.iter().zip(&baseline) {
        assert_eq!(watcher.ref_count(), base - 1);
    }
}

#[test]
fn from_table_range_slices_and_retains() {
    let columns: Vec<DeviceColumn> = (0..4)
        .map(|i| DeviceColumn::from_scalar(&Scalar::from(i as i64), 5))
        .collect();
    let source = DeviceBatch::try_new(columns, 5).unwrap();
    let table = source.to_table();
    let counts_before: Vec<usize> = table.columns().iter().map(|v| v.ref_count()).collect();

    let sliced = DeviceBatch::from_table_range(&table, 1, 3).unwrap();
    assert_eq!(sliced.num_columns(), 2);
    assert_eq!(sliced.num_rows(), 5);
    assert_eq!(sliced.column(0).i64_value(0).unwrap(), 1);
    assert_eq!(sliced.column(1).i64_value(0).unwrap(), 2);

    // Only the sliced columns picked up a reference; the table still owns
    // everything it did before and must be dropped independently.
    let counts_after: Vec<usize> = table.columns().iter().map(|v| v.ref_count()).collect();
    assert_eq!(counts_after[0], counts_before[0]);
    assert_eq!(counts_after[1], counts_before[1] + 1);
    assert_eq!(counts_after[2], counts_before[2] + 1);
    assert_eq!(counts_after[3], counts_before[3]);

    drop(sliced);
    let counts_restored: Vec<usize> = table.columns().iter().map(|v| v.ref_count()).collect();
    assert_eq!(counts_restored, counts_before);
}

#[test]
fn from_table_range_rejects_bad_ranges() {
    let col = DeviceColumn::from_scalar(&Scalar::from(0i32), 2);
    let table = DeviceBatch::try_new(vec![col], 2).unwrap().to_table();
    assert!(DeviceBatch::from_table_range(&table, 0, 2).is_err());
    assert!(DeviceBatch::from_table_range(&table, 1, 0).is_err());
}

#[test]
fn full_table_round_trip_preserves_values() {
    let batch = build_sample_batch();
    let table = batch.to_table();
    let back = DeviceBatch::from_table(&table).unwrap();

    assert_eq!(back.num_rows(), batch.num_rows());
    assert_eq!(back.num_columns(), batch.num_columns());
    for row in 0..3 {
        assert_eq!(
            back.column(0).i32_value(row).unwrap(),
            batch.column(0).i32_value(row).unwrap()
        );
        assert_eq!(
            back.column(1).utf8_value(row).unwrap(),
            batch.column(1).utf8_value(row).unwrap()
        );
    }
    // Round-tripped columns are the same buffers, not copies.
    assert!(back.column(0).device().same_buffer(batch.column(0).device()));
}

#[test]
fn dictionary_batch_conversion_owns_new_references() {
    let batch = build_sample_batch();
    let converted = axle_batch::to_dictionary_batch(&batch).unwrap();

    // Text columns are re-expressed; others share the original buffer.
    assert!(!converted.column(1).device().same_buffer(batch.column(1).device()));
    assert!(converted.column(0).device().same_buffer(batch.column(0).device()));
    assert_eq!(converted.column(1).utf8_value(2).unwrap(), "ccc");

    let watcher = batch.column(0).device().inc_ref();
    let before = watcher.ref_count();
    drop(converted);
    assert_eq!(watcher.ref_count(), before - 1);
}
