use arrow::datatypes::{DataType, Field, Schema};
use axle_batch::{BatchBuilder, DeviceBatch};
use axle_expr::{evaluate_bound, EvalResult, Expr};
use axle_vector::{BinaryOp, DType, Scalar, UnaryOp, Vector};

fn two_int_columns() -> DeviceBatch {
    let schema = Schema::new(vec![
        Field::new("a", DataType::Int32, false),
        Field::new("b", DataType::Int32, false),
    ]);
    let mut builder = BatchBuilder::new(&schema, 3, None).unwrap();
    for v in [1, 2, 3] {
        builder.builder_mut(0).append_i32(v).unwrap();
    }
    for v in [10, 20, 30] {
        builder.builder_mut(1).append_i32(v).unwrap();
    }
    builder.finish(3).unwrap()
}

fn text_batch(values: &[&str]) -> DeviceBatch {
    let schema = Schema::new(vec![Field::new("s", DataType::Utf8, true)]);
    let mut builder = BatchBuilder::new(&schema, values.len(), None).unwrap();
    for v in values {
        builder.builder_mut(0).append_str(v).unwrap();
    }
    builder.finish(values.len() as u32).unwrap()
}

fn column_values_i32(batch: &DeviceBatch, expr: &Expr) -> Vec<i32> {
    match expr.columnar_eval(batch).unwrap() {
        EvalResult::Column(col) => (0..col.row_count())
            .map(|r| col.i32_value(r).unwrap())
            .collect(),
        EvalResult::Scalar(_) => panic!("expected a column result"),
    }
}

#[test]
fn add_of_two_columns_leaves_input_references_unchanged() {
    let batch = two_int_columns();
    let watchers: Vec<Vector> = batch.handles().map(|v| v.inc_ref()).collect();
    let baseline: Vec<usize> = watchers.iter().map(|v| v.ref_count()).collect();

    let expr = Expr::binary(BinaryOp::Add, Expr::column(0), Expr::column(1));
    assert_eq!(column_values_i32(&batch, &expr), vec![11, 22, 33]);

    let after: Vec<usize> = watchers.iter().map(|v| v.ref_count()).collect();
    assert_eq!(after, baseline);
}

#[test]
fn add_of_column_and_scalar_broadcasts_the_scalar() {
    let batch = two_int_columns();
    let watcher = batch.column(0).device().inc_ref();
    let baseline = watcher.ref_count();

    let expr = Expr::binary(BinaryOp::Add, Expr::column(0), Expr::literal(100i32));
    assert_eq!(column_values_i32(&batch, &expr), vec![101, 102, 103]);
    assert_eq!(watcher.ref_count(), baseline);

    // Scalar on the left of a non-commutative operator.
    let expr = Expr::binary(BinaryOp::Sub, Expr::literal(100i32), Expr::column(0));
    assert_eq!(column_values_i32(&batch, &expr), vec![99, 98, 97]);
}

#[test]
fn promotion_widens_mixed_operands() {
    let batch = two_int_columns();
    let expr = Expr::binary(BinaryOp::Mul, Expr::column(0), Expr::literal(2i64));
    match expr.columnar_eval(&batch).unwrap() {
        EvalResult::Column(col) => {
            assert_eq!(col.device().dtype(), DType::Int64);
            assert_eq!(col.i64_value(2).unwrap(), 6);
        }
        _ => panic!("expected a column result"),
    }
}

#[test]
fn explicit_output_override_wins_over_promotion() {
    let batch = two_int_columns();
    let expr = Expr::binary(BinaryOp::Add, Expr::column(0), Expr::column(1))
        .with_output(DType::Float64);
    match expr.columnar_eval(&batch).unwrap() {
        EvalResult::Column(col) => {
            assert_eq!(col.device().dtype(), DType::Float64);
            assert_eq!(col.f64_value(0).unwrap(), 11.0);
        }
        _ => panic!("expected a column result"),
    }
}

#[test]
fn text_comparison_promotes_through_dictionary_encoding() {
    let batch = text_batch(&["apple", "pear", "apple"]);
    let watcher = batch.column(0).device().inc_ref();
    let baseline = watcher.ref_count();

    let expr = Expr::binary(BinaryOp::Eq, Expr::column(0), Expr::literal("apple"));
    match expr.columnar_eval(&batch).unwrap() {
        EvalResult::Column(col) => {
            assert_eq!(col.device().dtype(), DType::Bool8);
            let got: Vec<bool> = (0..3).map(|r| col.bool_value(r).unwrap()).collect();
            assert_eq!(got, vec![true, false, true]);
        }
        _ => panic!("expected a column result"),
    }
    // The fix-up vector was an intermediate; nothing held onto the input
    // column beyond its own reference.
    assert_eq!(watcher.ref_count(), baseline);
}

#[test]
fn nested_trees_release_every_intermediate() {
    let batch = two_int_columns();
    let watchers: Vec<Vector> = batch.handles().map(|v| v.inc_ref()).collect();
    let baseline: Vec<usize> = watchers.iter().map(|v| v.ref_count()).collect();

    // (a + b) * (b - a), negated.
    let sum = Expr::binary(BinaryOp::Add, Expr::column(0), Expr::column(1));
    let diff = Expr::binary(BinaryOp::Sub, Expr::column(1), Expr::column(0));
    let expr = Expr::unary(UnaryOp::Negate, Expr::binary(BinaryOp::Mul, sum, diff));
    assert_eq!(column_values_i32(&batch, &expr), vec![-99, -396, -891]);

    let after: Vec<usize> = watchers.iter().map(|v| v.ref_count()).collect();
    assert_eq!(after, baseline);
}

#[test]
fn evaluate_bound_preserves_list_order_and_broadcasts_scalars() {
    let batch = two_int_columns();
    let exprs = vec![
        Expr::column(1),
        Expr::binary(BinaryOp::Add, Expr::column(0), Expr::column(1)),
        Expr::literal(7i32),
    ];
    let columns = evaluate_bound(&batch, &exprs).unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].i32_value(0).unwrap(), 10);
    assert_eq!(columns[1].i32_value(1).unwrap(), 22);
    assert_eq!(columns[2].row_count(), 3);
    assert_eq!(columns[2].i32_value(2).unwrap(), 7);
}

#[test]
fn evaluate_bound_failure_releases_partial_results() {
    let batch = two_int_columns();
    let watchers: Vec<Vector> = batch.handles().map(|v| v.inc_ref()).collect();
    let baseline: Vec<usize> = watchers.iter().map(|v| v.ref_count()).collect();

    let exprs = vec![
        Expr::column(0),
        Expr::binary(BinaryOp::Add, Expr::column(0), Expr::column(1)),
        // Malformed: a unary kernel over a scalar child.
        Expr::unary(UnaryOp::Negate, Expr::literal(1i32)),
    ];
    let err = evaluate_bound(&batch, &exprs);
    assert!(err.is_err());

    // The two already-produced columns were released; nothing leaked.
    let after: Vec<usize> = watchers.iter().map(|v| v.ref_count()).collect();
    assert_eq!(after, baseline);
}

#[test]
fn null_literal_yields_a_null_column_through_evaluate_bound() {
    let batch = two_int_columns();
    let exprs = vec![Expr::binary(
        BinaryOp::Add,
        Expr::column(0),
        Expr::Literal(Scalar::Int32(None)),
    )];
    let columns = evaluate_bound(&batch, &exprs).unwrap();
    assert_eq!(columns[0].row_count(), 3);
    assert_eq!(columns[0].null_count(), 3);
    assert_eq!(columns[0].device().dtype(), DType::Int32);
}

#[test]
fn logical_connectives_follow_sql_semantics() {
    let schema = Schema::new(vec![
        Field::new("p", DataType::Boolean, true),
        Field::new("q", DataType::Boolean, true),
    ]);
    let mut builder = BatchBuilder::new(&schema, 3, None).unwrap();
    builder.builder_mut(0).append_bool(true).unwrap();
    builder.builder_mut(0).append_bool(false).unwrap();
    builder.builder_mut(0).append_null();
    builder.builder_mut(1).append_bool(true).unwrap();
    builder.builder_mut(1).append_bool(true).unwrap();
    builder.builder_mut(1).append_bool(false).unwrap();
    let batch = builder.finish(3).unwrap();

    let expr = Expr::binary(BinaryOp::And, Expr::column(0), Expr::column(1));
    match expr.columnar_eval(&batch).unwrap() {
        EvalResult::Column(col) => {
            assert!(col.bool_value(0).unwrap());
            assert!(!col.bool_value(1).unwrap());
            // null AND false is false under Kleene logic.
            assert!(!col.is_null(2));
            assert!(!col.bool_value(2).unwrap());
        }
        _ => panic!("expected a column result"),
    }
}
