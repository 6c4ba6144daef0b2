//! Filter/matcher expression parser (spec.md §4.5 "conditional" entry
//! point, §4.3 "Filters"): field references and constants combined by
//! comparisons and `AND`/`OR`/`NOT`.
//!
//! ```text
//! expr     := or_expr
//! or_expr  := and_expr ("OR" and_expr)*
//! and_expr := unary ("AND" unary)*
//! unary    := "NOT" unary | primary
//! primary  := "(" expr ")" | value cmp_op value
//! value    := field | string | integer
//! cmp_op   := "=" | "!=" | "<" | "<=" | ">" | ">="
//! ```

use std::str::FromStr;

use sysdb_core::{Datum, Field};
use sysdb_store::{CmpOp, Filter, ValueExpr};

use crate::token::{Cursor, Lexer, Token};

pub fn tokenize_all(src: &str) -> Result<Vec<Token>, String> {
    let mut lexer = Lexer::new(src);
    let mut out = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        if tok == Token::Eof {
            break;
        }
        out.push(tok);
    }
    Ok(out)
}

pub fn parse_filter(tokens: &[Token]) -> Result<Filter, String> {
    let mut cursor = Cursor::new(tokens);
    let filter = parse_or(&mut cursor)?;
    if cursor.peek() != &Token::Eof {
        return Err(format!("unexpected trailing token {:?}", cursor.peek()));
    }
    Ok(filter)
}

pub(crate) fn parse_or(c: &mut Cursor) -> Result<Filter, String> {
    let mut lhs = parse_and(c)?;
    while c.is_keyword("OR") {
        c.advance();
        let rhs = parse_and(c)?;
        lhs = Filter::Or(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
}

fn parse_and(c: &mut Cursor) -> Result<Filter, String> {
    let mut lhs = parse_unary(c)?;
    while c.is_keyword("AND") {
        c.advance();
        let rhs = parse_unary(c)?;
        lhs = Filter::And(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
}

fn parse_unary(c: &mut Cursor) -> Result<Filter, String> {
    if c.is_keyword("NOT") {
        c.advance();
        return Ok(Filter::Not(Box::new(parse_unary(c)?)));
    }
    parse_primary(c)
}

fn parse_primary(c: &mut Cursor) -> Result<Filter, String> {
    if c.peek() == &Token::Symbol('(') {
        c.advance();
        let inner = parse_or(c)?;
        c.expect_symbol(')')?;
        return Ok(inner);
    }
    let lhs = parse_value(c)?;
    let op = parse_cmp_op(c)?;
    let rhs = parse_value(c)?;
    Ok(Filter::Cmp(op, lhs, rhs))
}

fn parse_value(c: &mut Cursor) -> Result<ValueExpr, String> {
    match c.advance() {
        Token::Ident(name) => match Field::from_str(&name) {
            Ok(field) => Ok(ValueExpr::Field(field)),
            Err(()) => Err(format!("unknown field '{name}'")),
        },
        Token::String(s) => Ok(ValueExpr::Const(Datum::String(s))),
        Token::Integer(v) => Ok(ValueExpr::Const(Datum::Integer(v))),
        other => Err(format!("expected a field or constant, found {other:?}")),
    }
}

fn parse_cmp_op(c: &mut Cursor) -> Result<CmpOp, String> {
    match c.advance() {
        Token::Symbol('=') => Ok(CmpOp::Eq),
        Token::Symbol('#') => Ok(CmpOp::Ne),
        Token::Symbol('<') => Ok(CmpOp::Lt),
        Token::Symbol('l') => Ok(CmpOp::Le),
        Token::Symbol('>') => Ok(CmpOp::Gt),
        Token::Symbol('g') => Ok(CmpOp::Ge),
        other => Err(format!("expected a comparison operator, found {other:?}")),
    }
}

/// The parser's "conditional" entry point (spec.md §4.5): parses just a
/// filter/matcher expression.
pub fn parse_conditional(text: &str) -> Result<Filter, String> {
    let tokens = tokenize_all(text)?;
    parse_filter(&tokens)
}
