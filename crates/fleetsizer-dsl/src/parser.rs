//! Recursive-descent parser.
//!
//! Single-token lookahead over [`Lexer`]. Grammar:
//!
//! ```text
//! expression := term ( "+" term )*
//! term       := integer "*" factor ( "*" factor )*
//!             | factor ( "*" integer )*
//! factor     := "(" expression ")" | pod
//! pod        := "pod" "(" [ field ( "," field )* ] ")"
//! field      := ( "cpu" | "memory" | "gpu" ) ":" ( string | integer )
//! ```
//!
//! `*` binds tighter than `+`; both are left-associative. Within a term,
//! once an integer operand is seen the remaining `*` operands are read
//! from the factor production and vice versa, which rejects `5 * 10` and
//! `pod() * pod()` shapes without a separate type-check pass.
//!
//! Errors never abort the parse. They accumulate, deduplicated by source
//! position so one defect does not cascade into noise, and the caller
//! gets the partial tree alongside the list.

use std::mem;

use crate::ast::{Expr, IntLit, Literal, Op, PodExpr, StrLit};
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Parse a whole DSL program.
pub fn parse(input: &str) -> (Option<Expr>, Vec<ParseError>) {
    let mut parser = Parser::new(Lexer::new(input));
    let expr = parser.parse_expression();
    (expr, parser.into_errors())
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Token,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Parser<'a> {
        let lookahead = lexer.scan();
        Parser {
            lexer,
            lookahead,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    pub fn parse_expression(&mut self) -> Option<Expr> {
        let mut result = self.parse_term();
        while self.lookahead.kind == TokenKind::Add {
            let position = self.lookahead.position;
            self.advance();
            let rhs = self.parse_term();
            result = join(result, rhs, Op::Add, position);
        }
        result
    }

    fn parse_term(&mut self) -> Option<Expr> {
        let lhs_is_integer = self.lookahead.kind == TokenKind::Integer;
        let mut result = if lhs_is_integer {
            let lit = self.parse_integer();
            // A bare integer is not a workload; it only makes sense as
            // a multiplier.
            if self.lookahead.kind != TokenKind::Mul {
                self.record(ParseError::unexpected(&self.lookahead, &["*"]));
            }
            lit
        } else {
            self.parse_factor()
        };

        while self.lookahead.kind == TokenKind::Mul {
            let position = self.lookahead.position;
            self.advance();
            let rhs = if lhs_is_integer {
                self.parse_factor()
            } else {
                self.parse_integer()
            };
            result = join(result, rhs, Op::Multiply, position);
        }
        result
    }

    fn parse_factor(&mut self) -> Option<Expr> {
        match self.lookahead.kind {
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression();
                if self.lookahead.kind == TokenKind::RParen {
                    self.advance();
                } else {
                    self.record(ParseError::unexpected(&self.lookahead, &[")"]));
                }
                expr
            }
            TokenKind::Pod => self.parse_pod(),
            _ => {
                self.record(ParseError::unexpected(&self.lookahead, &["(", "pod"]));
                None
            }
        }
    }

    fn parse_pod(&mut self) -> Option<Expr> {
        let pod_token = self.advance();
        if self.lookahead.kind == TokenKind::LParen {
            self.advance();
        } else {
            self.record(ParseError::unexpected(&self.lookahead, &["("]));
        }

        let mut pod = PodExpr {
            position: pod_token.position,
            ..PodExpr::default()
        };

        loop {
            match self.lookahead.kind {
                TokenKind::RParen => {
                    self.advance();
                    return Some(Expr::Pod(pod));
                }
                TokenKind::Cpu => {
                    self.advance();
                    self.expect_colon();
                    pod.cpu = self.parse_literal();
                }
                TokenKind::Memory => {
                    self.advance();
                    self.expect_colon();
                    pod.memory = self.parse_literal();
                }
                TokenKind::Gpu => {
                    self.advance();
                    self.expect_colon();
                    pod.gpu = self.parse_literal();
                }
                _ => {
                    self.record(ParseError::unexpected(
                        &self.lookahead,
                        &["cpu", "memory", "gpu", ")"],
                    ));
                    return Some(Expr::Pod(pod));
                }
            }

            match self.lookahead.kind {
                TokenKind::RParen => {
                    self.advance();
                    return Some(Expr::Pod(pod));
                }
                TokenKind::Comma => {
                    self.advance();
                }
                _ => {
                    self.record(ParseError::unexpected(&self.lookahead, &[",", ")"]));
                    return Some(Expr::Pod(pod));
                }
            }
        }
    }

    fn parse_literal(&mut self) -> Option<Literal> {
        match self.lookahead.kind {
            TokenKind::Str => {
                let token = self.advance();
                Some(Literal::Str(StrLit {
                    value: token.lexeme,
                    position: token.position,
                }))
            }
            TokenKind::Integer => self.parse_int_literal().map(Literal::Int),
            _ => {
                self.record(ParseError::unexpected(
                    &self.lookahead,
                    &["STRING", "INTEGER"],
                ));
                None
            }
        }
    }

    fn parse_integer(&mut self) -> Option<Expr> {
        self.parse_int_literal().map(Expr::Int)
    }

    fn parse_int_literal(&mut self) -> Option<IntLit> {
        if self.lookahead.kind != TokenKind::Integer {
            self.record(ParseError::unexpected(&self.lookahead, &["INTEGER"]));
            return None;
        }
        let token = self.advance();
        match token.lexeme.parse::<i64>() {
            Ok(value) => Some(IntLit {
                value,
                position: token.position,
            }),
            Err(_) => {
                self.record(ParseError::message(
                    format!("{} is not number", token.lexeme),
                    token.position,
                ));
                None
            }
        }
    }

    fn expect_colon(&mut self) {
        if self.lookahead.kind == TokenKind::Colon {
            self.advance();
        } else {
            self.record(ParseError::unexpected(&self.lookahead, &[":"]));
        }
    }

    fn advance(&mut self) -> Token {
        let next = self.lexer.scan();
        mem::replace(&mut self.lookahead, next)
    }

    /// At most one diagnostic per source position.
    fn record(&mut self, error: ParseError) {
        if self.errors.iter().any(|e| e.position == error.position) {
            return;
        }
        self.errors.push(error);
    }
}

fn join(lhs: Option<Expr>, rhs: Option<Expr>, op: Op, position: crate::token::Position) -> Option<Expr> {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => Some(Expr::arith(op, lhs, rhs, position)),
        (Some(side), None) | (None, Some(side)) => Some(side),
        (None, None) => None,
    }
}
