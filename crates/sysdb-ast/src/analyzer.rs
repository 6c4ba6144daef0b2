//! Semantic analysis (spec.md §4.4 "Analyzer"): validates an AST node
//! before it reaches an executor, writing a single-line diagnostic on
//! failure rather than a structured error tree — the wire protocol only
//! ever carries the message text back to a client (spec.md §7).

use sysdb_core::{Diagnostic, ObjectType};

use crate::node::{Node, Store};

/// Object types a query command (FETCH/LIST/LOOKUP) may legally request:
/// a bare kind, or `ATTRIBUTE` composed with at most one parent kind.
/// Field-level qualification inside a matcher/filter expression (e.g.
/// disallowing `service.name` inside a `LOOKUP{METRIC}`) is a parser-era
/// concern this crate doesn't see — the parser (§4.5) is unspecified
/// beyond its `(text) -> [Node]` contract, so this is the coarsest check
/// actually available at this layer.
fn is_valid_query_type(t: ObjectType) -> bool {
    t == ObjectType::HOST
        || t == ObjectType::SERVICE
        || t == ObjectType::METRIC
        || t == ObjectType::ATTRIBUTE
        || t == ObjectType::ATTRIBUTE | ObjectType::SERVICE
        || t == ObjectType::ATTRIBUTE | ObjectType::METRIC
}

fn analyze_store(st: &Store) -> Result<(), Diagnostic> {
    if st.obj_type.contains(ObjectType::ATTRIBUTE) {
        let valid_parent = st.parent_type == 0
            || st.parent_type == ObjectType::SERVICE.bits()
            || st.parent_type == ObjectType::METRIC.bits();
        if !valid_parent {
            return Err(Diagnostic::new(format!(
                "store: invalid parent type in STORE: 0x{:02x}",
                st.parent_type
            )));
        }
        return Ok(());
    }
    if st.obj_type != ObjectType::HOST
        && st.obj_type != ObjectType::SERVICE
        && st.obj_type != ObjectType::METRIC
    {
        return Err(Diagnostic::new(format!(
            "store: invalid object type in STORE: {}",
            st.obj_type
        )));
    }
    Ok(())
}

/// Validate `node`, returning a single-line diagnostic on the first
/// failure (spec.md §4.4).
pub fn analyze(node: &Node) -> Result<(), Diagnostic> {
    match node {
        Node::Fetch(f) => {
            if !is_valid_query_type(f.object_type) {
                return Err(Diagnostic::new(format!(
                    "fetch: unsupported object type {}",
                    f.object_type
                )));
            }
            Ok(())
        }
        Node::List(l) => {
            if !is_valid_query_type(l.object_type) {
                return Err(Diagnostic::new(format!(
                    "list: unsupported object type {}",
                    l.object_type
                )));
            }
            Ok(())
        }
        Node::Lookup(l) => {
            if !is_valid_query_type(l.object_type) {
                return Err(Diagnostic::new(format!(
                    "lookup: unsupported object type {}",
                    l.object_type
                )));
            }
            Ok(())
        }
        Node::Store(st) => analyze_store(st),
        Node::Timeseries(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Fetch, List};
    use sysdb_core::Datum;
    use sysdb_core::Time;

    #[test]
    fn fetch_with_unknown_type_fails() {
        let node = Node::Fetch(Fetch {
            object_type: ObjectType(0xff),
            hostname: None,
            name: None,
            filter: None,
        });
        assert!(analyze(&node).is_err());
    }

    #[test]
    fn list_with_valid_type_passes() {
        let node = Node::List(List {
            object_type: ObjectType::SERVICE,
            filter: None,
        });
        assert!(analyze(&node).is_ok());
    }

    #[test]
    fn store_attribute_requires_valid_parent_type() {
        let bad = Node::Store(Store {
            obj_type: ObjectType::ATTRIBUTE,
            hostname: Some("h".into()),
            parent_type: ObjectType::HOST.bits(),
            parent: None,
            name: "k".into(),
            last_update: Time(1),
            metric_store: None,
            value: Datum::Integer(1),
        });
        assert!(analyze(&bad).is_err());

        let good = Node::Store(Store {
            obj_type: ObjectType::ATTRIBUTE | ObjectType::METRIC,
            hostname: Some("h".into()),
            parent_type: ObjectType::METRIC.bits(),
            parent: Some("cpu".into()),
            name: "unit".into(),
            last_update: Time(1),
            metric_store: None,
            value: Datum::String("percent".into()),
        });
        assert!(analyze(&good).is_ok());
    }

    #[test]
    fn store_bare_type_must_be_host_service_or_metric() {
        let node = Node::Store(Store {
            obj_type: ObjectType(0),
            hostname: None,
            parent_type: 0,
            parent: None,
            name: "x".into(),
            last_update: Time(1),
            metric_store: None,
            value: Datum::Null,
        });
        assert!(analyze(&node).is_err());
    }
}
