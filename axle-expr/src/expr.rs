//! Expression trees bound to batch column positions.

use axle_vector::{BinaryOp, DType, Scalar, UnaryOp};

/// A typed operator tree evaluated against device batches.
///
/// Nodes are closed over the shapes evaluation dispatches on: leaves (a bound
/// column reference or a literal), unary operators, and kernel-backed binary
/// operators. A unary or binary node may carry an explicit output type that
/// overrides the implicit promotion of its operand types.
///
/// Trees are immutable once built; evaluation never mutates them, so one tree
/// can serve every batch of a stage.
#[derive(Clone, Debug)]
pub enum Expr {
    /// Reference to an input batch column by position.
    ColumnRef(usize),
    /// A constant operand.
    Literal(Scalar),
    /// A unary elementwise operator over one child.
    Unary {
        op: UnaryOp,
        output: Option<DType>,
        child: Box<Expr>,
    },
    /// A kernel-backed binary operator over two children.
    Binary {
        op: BinaryOp,
        output: Option<DType>,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Reference to input column `index`.
    #[inline]
    pub fn column(index: usize) -> Expr {
        Expr::ColumnRef(index)
    }

    /// A literal operand.
    #[inline]
    pub fn literal(value: impl Into<Scalar>) -> Expr {
        Expr::Literal(value.into())
    }

    /// A unary node over `child`.
    #[inline]
    pub fn unary(op: UnaryOp, child: Expr) -> Expr {
        Expr::Unary {
            op,
            output: None,
            child: Box::new(child),
        }
    }

    /// A binary node over `lhs` and `rhs`.
    #[inline]
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            output: None,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Declare an explicit output type on this node, replacing implicit
    /// promotion. Leaves have no output type; they are returned unchanged.
    pub fn with_output(self, dtype: DType) -> Expr {
        match self {
            Expr::Unary { op, child, .. } => Expr::Unary {
                op,
                output: Some(dtype),
                child,
            },
            Expr::Binary { op, lhs, rhs, .. } => Expr::Binary {
                op,
                output: Some(dtype),
                lhs,
                rhs,
            },
            leaf => leaf,
        }
    }
}
