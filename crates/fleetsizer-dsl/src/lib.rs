//! fleetsizer-dsl — the workload description language.
//!
//! A compact algebra over pod specs:
//!
//! ```text
//! pod(cpu: "500m", memory: "2Gi") * 10 +
//! (pod(cpu: 4, gpu: 1) + pod(memory: "64Gi")) * 3
//! ```
//!
//! Three stages, each collecting every diagnostic instead of stopping at
//! the first:
//!
//! - [`Lexer`] — characters → tokens with source positions
//! - [`Parser`] — tokens → expression tree
//! - [`expand`] — expression tree → flat list of schedulable units
//!
//! Any diagnostic from any stage aborts the pipeline before the search
//! runs; the caller reports the whole batch at once.

pub mod ast;
pub mod error;
pub mod expand;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{ArithExpr, Expr, IntLit, Literal, Op, PodExpr, StrLit};
pub use error::ParseError;
pub use expand::{expand, ExpandError};
pub use lexer::Lexer;
pub use parser::{parse, Parser};
pub use token::{Position, Token, TokenKind};
