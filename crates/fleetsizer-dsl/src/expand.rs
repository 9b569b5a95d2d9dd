//! Expression-tree expansion into schedulable units.
//!
//! One pod spec becomes one unit. Add concatenates; multiply re-walks the
//! non-integer side n times, so every repetition mints fresh units. Names
//! come from a single counter and are dense in expansion order.

use std::fmt;

use fleet_core::{Axis, PodUnit, Quantity, Resources};

use crate::ast::{ArithExpr, Expr, Literal, Op, PodExpr};
use crate::token::Position;

/// One diagnostic from the materializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandError {
    pub message: String,
    pub position: Position,
}

impl ExpandError {
    fn new(message: impl Into<String>, position: Position) -> ExpandError {
        ExpandError {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, char {}",
            self.message,
            self.position.line + 1,
            self.position.column + 1
        )
    }
}

impl std::error::Error for ExpandError {}

/// Expand an expression tree into a flat unit list.
///
/// Diagnostics are collected, never fail-fast; a unit whose quantity
/// string fails to parse is still emitted, without the bad axis.
pub fn expand(expr: &Expr) -> (Vec<PodUnit>, Vec<ExpandError>) {
    let mut materializer = Materializer::default();
    materializer.walk(expr);
    (materializer.units, materializer.errors)
}

#[derive(Default)]
struct Materializer {
    units: Vec<PodUnit>,
    errors: Vec<ExpandError>,
    next_index: u64,
}

impl Materializer {
    fn walk(&mut self, expr: &Expr) {
        match expr {
            Expr::Pod(pod) => self.emit(pod),
            Expr::Arith(arith) => self.walk_arith(arith),
            // Stray literals cannot reach here from an error-free parse.
            Expr::Int(_) | Expr::Str(_) => {}
        }
    }

    fn walk_arith(&mut self, node: &ArithExpr) {
        match node.op {
            Op::Add => {
                self.walk(&node.lhs);
                self.walk(&node.rhs);
            }
            Op::Multiply => {
                let (count, body) = match (&node.lhs, &node.rhs) {
                    (Expr::Int(n), body) => (n.value, body),
                    (body, Expr::Int(n)) => (n.value, body),
                    _ => {
                        self.errors.push(ExpandError::new(
                            "one of [lhs, rhs] must be an integer in a multiply expression",
                            node.position,
                        ));
                        return;
                    }
                };
                for _ in 0..count {
                    self.walk(body);
                }
            }
        }
    }

    fn emit(&mut self, pod: &PodExpr) {
        let mut requests = Resources::default();
        for (axis, literal) in [
            (Axis::Cpu, &pod.cpu),
            (Axis::Memory, &pod.memory),
            (Axis::Gpu, &pod.gpu),
        ] {
            if let Some(literal) = literal {
                if let Some(quantity) = self.quantity(literal) {
                    requests.set(axis, quantity);
                }
            }
        }
        self.units.push(PodUnit::new(self.next_index, requests));
        self.next_index += 1;
    }

    fn quantity(&mut self, literal: &Literal) -> Option<Quantity> {
        match literal {
            Literal::Int(lit) => Some(Quantity::from_whole(lit.value)),
            Literal::Str(lit) => match lit.value.parse() {
                Ok(quantity) => Some(quantity),
                Err(error) => {
                    self.errors
                        .push(ExpandError::new(error.to_string(), lit.position));
                    None
                }
            },
        }
    }
}
