//! Workload expression tree.
//!
//! A tagged sum, pattern-matched by the materializer. Nodes are built by
//! the parser, walked once, and discarded. `Display` pretty-prints a tree
//! back to DSL text that reparses to the same tree (modulo positions).

use std::fmt;

use crate::token::Position;

/// Arithmetic operators over workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Multiply,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(IntLit),
    Str(StrLit),
    Arith(Box<ArithExpr>),
    Pod(PodExpr),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntLit {
    pub value: i64,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrLit {
    pub value: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArithExpr {
    pub op: Op,
    pub lhs: Expr,
    pub rhs: Expr,
    pub position: Position,
}

/// A single pod spec. Fields hold literals only; the field production
/// never accepts a nested expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodExpr {
    pub cpu: Option<Literal>,
    pub memory: Option<Literal>,
    pub gpu: Option<Literal>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(IntLit),
    Str(StrLit),
}

impl Expr {
    pub fn arith(op: Op, lhs: Expr, rhs: Expr, position: Position) -> Expr {
        Expr::Arith(Box::new(ArithExpr {
            op,
            lhs,
            rhs,
            position,
        }))
    }

    fn is_int(&self) -> bool {
        matches!(self, Expr::Int(_))
    }

    fn is_factor(&self) -> bool {
        matches!(self, Expr::Pod(_))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(lit) => write!(f, "{}", lit.value),
            Expr::Str(lit) => write!(f, "\"{}\"", lit.value),
            Expr::Pod(pod) => write!(f, "{pod}"),
            Expr::Arith(arith) => match arith.op {
                Op::Add => {
                    write!(f, "{} + ", arith.lhs)?;
                    // A right-nested add needs parens to survive the
                    // left-associative reparse.
                    if matches!(&arith.rhs, Expr::Arith(a) if a.op == Op::Add) {
                        write!(f, "({})", arith.rhs)
                    } else {
                        write!(f, "{}", arith.rhs)
                    }
                }
                Op::Multiply => {
                    // The integer side stays bare; the other side must
                    // reparse as a factor, so anything but a bare pod
                    // gets parenthesized.
                    write_mul_operand(f, &arith.lhs)?;
                    write!(f, " * ")?;
                    write_mul_operand(f, &arith.rhs)
                }
            },
        }
    }
}

fn write_mul_operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    if expr.is_int() || expr.is_factor() {
        write!(f, "{expr}")
    } else {
        write!(f, "({expr})")
    }
}

impl fmt::Display for PodExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pod(")?;
        let mut first = true;
        for (key, literal) in [
            ("cpu", &self.cpu),
            ("memory", &self.memory),
            ("gpu", &self.gpu),
        ] {
            if let Some(literal) = literal {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{key}: {literal}")?;
                first = false;
            }
        }
        write!(f, ")")
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(lit) => write!(f, "{}", lit.value),
            Literal::Str(lit) => write!(f, "\"{}\"", lit.value),
        }
    }
}
