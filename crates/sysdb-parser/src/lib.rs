//! Parser interface (spec.md §4.5): an opaque producer of AST nodes from
//! query text, plus a "conditional" entry point that parses just a filter
//! expression. Grammar internals are not part of the contract the rest of
//! the system depends on — only `(text) -> [Node] | diagnostic` and
//! `(text) -> Filter | diagnostic` are.

mod filter_parser;
mod statement_parser;
mod token;

use sysdb_ast::Node;
use sysdb_core::Diagnostic;
use sysdb_store::Filter;

/// Parses `text` into an ordered list of statements. On failure, writes a
/// single-line diagnostic to `errbuf` and returns `None` — the out-param
/// style spec.md's `(text, length, errbuf)` contract describes.
pub fn parse(text: &str, errbuf: &mut Option<Diagnostic>) -> Option<Vec<Node>> {
    match statement_parser::parse(text) {
        Ok(nodes) => Some(nodes),
        Err(message) => {
            *errbuf = Some(Diagnostic::new(message));
            None
        }
    }
}

/// The "conditional" entry point: parses just a filter/matcher expression.
pub fn parse_conditional(text: &str, errbuf: &mut Option<Diagnostic>) -> Option<Filter> {
    match filter_parser::parse_conditional(text) {
        Ok(filter) => Some(filter),
        Err(message) => {
            *errbuf = Some(Diagnostic::new(message));
            None
        }
    }
}
