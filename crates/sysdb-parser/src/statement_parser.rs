//! Statement-level parser for `QUERY` payload text (spec.md §4.5): yields
//! an ordered list of AST nodes, or an error on the first malformed
//! statement. Supports `LIST`, `FETCH`, and `LOOKUP`; `STORE` arrives only
//! over the dedicated `STORE` wire command (§4.2), never as query text, so
//! it has no surface syntax here.
//!
//! ```text
//! query     := stmt (";" stmt)* ";"?
//! stmt      := "LIST" type? filter_clause?
//!            | "FETCH" type string string? filter_clause?
//!            | "LOOKUP" type "MATCHING" expr filter_clause?
//! filter_clause := "FILTER" expr
//! ```

use sysdb_ast::{Fetch, List, Lookup, Node};
use sysdb_core::ObjectType;
use sysdb_store::Filter;

use crate::filter_parser::{parse_or, tokenize_all};
use crate::token::{Cursor, Token};

fn parse_object_type(c: &mut Cursor) -> Result<ObjectType, String> {
    match c.advance() {
        Token::Ident(s) => match s.to_ascii_uppercase().as_str() {
            "HOST" => Ok(ObjectType::HOST),
            "SERVICE" => Ok(ObjectType::SERVICE),
            "METRIC" => Ok(ObjectType::METRIC),
            "ATTRIBUTE" => Ok(ObjectType::ATTRIBUTE),
            other => Err(format!("unknown object type '{other}'")),
        },
        other => Err(format!("expected an object type, found {other:?}")),
    }
}

fn parse_string(c: &mut Cursor) -> Result<String, String> {
    match c.advance() {
        Token::String(s) => Ok(s),
        other => Err(format!("expected a quoted string, found {other:?}")),
    }
}

/// Parses a `FILTER <expr>` clause if present, else `None`.
fn parse_optional_filter_clause(c: &mut Cursor) -> Result<Option<Filter>, String> {
    if !c.is_keyword("FILTER") {
        return Ok(None);
    }
    c.advance();
    parse_or(c).map(Some)
}

fn parse_list(c: &mut Cursor) -> Result<Node, String> {
    let object_type = if matches!(c.peek(), Token::Ident(s) if !s.eq_ignore_ascii_case("FILTER"))
    {
        parse_object_type(c)?
    } else {
        ObjectType::HOST
    };
    let filter = parse_optional_filter_clause(c)?;
    Ok(Node::List(List {
        object_type,
        filter,
    }))
}

fn parse_fetch(c: &mut Cursor) -> Result<Node, String> {
    let object_type = parse_object_type(c)?;
    let first = parse_string(c)?;
    let (hostname, name) = if object_type == ObjectType::HOST {
        (None, first)
    } else if matches!(c.peek(), Token::String(_)) {
        (Some(first), parse_string(c)?)
    } else {
        (Some(first.clone()), first)
    };
    let filter = parse_optional_filter_clause(c)?;
    Ok(Node::Fetch(Fetch {
        object_type,
        hostname,
        name: Some(name),
        filter,
    }))
}

fn parse_lookup(c: &mut Cursor) -> Result<Node, String> {
    let object_type = parse_object_type(c)?;
    if !c.is_keyword("MATCHING") {
        return Err(format!("expected MATCHING, found {:?}", c.peek()));
    }
    c.advance();
    let matcher = parse_or(c)?;
    let filter = parse_optional_filter_clause(c)?;
    Ok(Node::Lookup(Lookup {
        object_type,
        matcher,
        filter,
    }))
}

fn parse_statement(c: &mut Cursor) -> Result<Node, String> {
    match c.advance() {
        Token::Ident(keyword) => match keyword.to_ascii_uppercase().as_str() {
            "LIST" => parse_list(c),
            "FETCH" => parse_fetch(c),
            "LOOKUP" => parse_lookup(c),
            other => Err(format!("unknown statement '{other}'")),
        },
        other => Err(format!("expected a statement keyword, found {other:?}")),
    }
}

/// Parses `text` into an ordered list of statements (spec.md §4.5). Empty
/// input (no statements at all) is a failure, matching the parser
/// contract's "yields ... an ordered list of AST nodes or nothing on
/// failure".
pub fn parse(text: &str) -> Result<Vec<Node>, String> {
    let tokens = tokenize_all(text)?;
    let mut cursor = Cursor::new(&tokens);
    let mut nodes = Vec::new();
    loop {
        if cursor.peek() == &Token::Eof {
            break;
        }
        nodes.push(parse_statement(&mut cursor)?);
        if cursor.peek() == &Token::Symbol(';') {
            cursor.advance();
        } else {
            break;
        }
    }
    if cursor.peek() != &Token::Eof {
        return Err(format!("unexpected trailing token {:?}", cursor.peek()));
    }
    if nodes.is_empty() {
        return Err("empty query".to_string());
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_default_host_type() {
        let nodes = parse("LIST").unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(matches!(
            &nodes[0],
            Node::List(List {
                object_type,
                filter: None
            }) if *object_type == ObjectType::HOST
        ));
    }

    #[test]
    fn parses_fetch_host() {
        let nodes = parse("FETCH HOST 'web01'").unwrap();
        match &nodes[0] {
            Node::Fetch(f) => {
                assert_eq!(f.object_type, ObjectType::HOST);
                assert_eq!(f.hostname, None);
                assert_eq!(f.name.as_deref(), Some("web01"));
            }
            other => panic!("expected Fetch, got {other:?}"),
        }
    }

    #[test]
    fn parses_fetch_service_with_hostname() {
        let nodes = parse("FETCH SERVICE 'web01' 'httpd'").unwrap();
        match &nodes[0] {
            Node::Fetch(f) => {
                assert_eq!(f.hostname.as_deref(), Some("web01"));
                assert_eq!(f.name.as_deref(), Some("httpd"));
            }
            other => panic!("expected Fetch, got {other:?}"),
        }
    }

    #[test]
    fn parses_lookup_with_matcher() {
        let nodes = parse("LOOKUP HOST MATCHING name = 'web01'").unwrap();
        assert!(matches!(&nodes[0], Node::Lookup(_)));
    }

    #[test]
    fn s6_multi_statement_query_yields_both_nodes() {
        let nodes = parse("LIST HOST; LIST SERVICE").unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn empty_query_is_an_error() {
        assert!(parse("").is_err());
    }
}
