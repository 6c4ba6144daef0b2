//! AST nodes and semantic analysis for FETCH/LIST/LOOKUP/STORE/TIMESERIES
//! statements (spec.md §4.4).

pub mod analyzer;
pub mod node;

pub use analyzer::analyze;
pub use node::{Fetch, List, Lookup, Node, Store, Timeseries};
