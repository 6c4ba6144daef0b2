//! Command executors (spec.md §4.7): translate a `STORE` wire payload, or
//! a parsed AST node, into store calls and a reply [`Frame`].

use sysdb_ast::{self, Node, Store as StoreNode};
use sysdb_core::{Datum, ObjectType, Time};
use sysdb_store::{Filter, JsonFlags, Store, UpdateResult};
use sysdb_wire::{response, Frame, StoreObject};

/// Builds a [`StoreNode`] from a decoded `STORE` wire payload
/// (SPEC_FULL.md supplemental item 2, grounded on `query.c`'s
/// `sdb_conn_store`): `obj_type` stays a bare HOST/SERVICE/METRIC/
/// ATTRIBUTE tag, never composed with the attribute's parent kind — the
/// parent kind travels separately in `parent_type`.
pub fn store_object_to_ast(obj: StoreObject) -> StoreNode {
    match obj {
        StoreObject::Host(h) => StoreNode {
            obj_type: ObjectType::HOST,
            hostname: None,
            parent_type: 0,
            parent: None,
            name: h.name,
            last_update: h.last_update,
            metric_store: None,
            value: Datum::Null,
        },
        StoreObject::Service(s) => StoreNode {
            obj_type: ObjectType::SERVICE,
            hostname: Some(s.hostname),
            parent_type: 0,
            parent: None,
            name: s.name,
            last_update: s.last_update,
            metric_store: None,
            value: Datum::Null,
        },
        StoreObject::Metric(m) => StoreNode {
            obj_type: ObjectType::METRIC,
            hostname: Some(m.hostname),
            parent_type: 0,
            parent: None,
            name: m.name,
            last_update: m.last_update,
            metric_store: m.store_ref,
            value: Datum::Null,
        },
        StoreObject::Attribute(a) => {
            // `parent_type == 0` (host attribute): the wire's `parent`
            // field names the host; there is no separate parent segment.
            // Otherwise `hostname` names the host and `parent` names the
            // service/metric (see `AttributePayload`'s doc comment).
            let (hostname, parent) = if a.parent_type == 0 {
                (a.parent, None)
            } else {
                (a.hostname, Some(a.parent))
            };
            StoreNode {
                obj_type: ObjectType::ATTRIBUTE,
                hostname: Some(hostname),
                parent_type: a.parent_type,
                parent,
                name: a.key,
                last_update: a.last_update,
                metric_store: None,
                value: a.value,
            }
        }
    }
}

/// The name used in success/"already up to date" reply text
/// (SPEC_FULL.md supplemental item 4): an upper-case constant name for
/// "Successfully stored", the same name with only its first letter
/// capitalized for "already up to date".
fn type_label(obj_type: ObjectType) -> &'static str {
    if obj_type == ObjectType::HOST {
        "HOST"
    } else if obj_type == ObjectType::SERVICE {
        "SERVICE"
    } else if obj_type == ObjectType::METRIC {
        "METRIC"
    } else {
        "ATTRIBUTE"
    }
}

fn title_case(upper: &str) -> String {
    let mut chars = upper.chars();
    match chars.next() {
        Some(first) => {
            first.to_string() + &chars.as_str().to_lowercase()
        }
        None => String::new(),
    }
}

fn store_reply(obj_type: ObjectType, qualified_name: &str, result: UpdateResult) -> Frame {
    let label = type_label(obj_type);
    let message = match result {
        UpdateResult::Created | UpdateResult::Updated => {
            format!("Successfully stored {label} {qualified_name}")
        }
        UpdateResult::AlreadyUpToDate => {
            format!("{} {qualified_name} already up to date", title_case(label))
        }
    };
    response::ok(message)
}

/// Executes an already-analyzed `STORE` AST node (spec.md §4.7
/// `exec_store`), dispatching to the matching `store_X` call and
/// formatting the reply.
pub fn exec_store(store: &Store, node: &StoreNode) -> Frame {
    let qualified_name = node.qualified_name();

    let result = if node.obj_type == ObjectType::HOST {
        Ok(store.store_host(&node.name, node.last_update))
    } else if node.obj_type == ObjectType::SERVICE {
        let hostname = node.hostname.as_deref().unwrap_or_default();
        store.store_service(hostname, &node.name, node.last_update)
    } else if node.obj_type == ObjectType::METRIC {
        let hostname = node.hostname.as_deref().unwrap_or_default();
        store.store_metric(
            hostname,
            &node.name,
            node.metric_store.clone(),
            node.last_update,
        )
    } else if node.obj_type.contains(ObjectType::ATTRIBUTE) {
        let hostname = node.hostname.as_deref().unwrap_or_default();
        match node.parent_type {
            0 => store.store_attribute(hostname, &node.name, node.value.clone(), node.last_update),
            bits if bits == ObjectType::SERVICE.bits() => store.store_service_attr(
                hostname,
                node.parent.as_deref().unwrap_or_default(),
                &node.name,
                node.value.clone(),
                node.last_update,
            ),
            bits if bits == ObjectType::METRIC.bits() => store.store_metric_attr(
                hostname,
                node.parent.as_deref().unwrap_or_default(),
                &node.name,
                node.value.clone(),
                node.last_update,
            ),
            other => {
                return response::error(format!(
                    "store: invalid parent type in STORE: 0x{other:02x}"
                ));
            }
        }
    } else {
        return response::error(format!(
            "STORE: Invalid object type in STORE: {}",
            node.obj_type
        ));
    };

    match result {
        Ok(update) => store_reply(node.obj_type, &qualified_name, update),
        Err(err) => response::error(format!("STORE: {err}")),
    }
}

/// Renders `LIST`/`LOOKUP` results as a whole-store filtered walk (spec.md
/// §4.7, the "query plugin" boundary is this implementation's own
/// `tojson`-based renderer rather than an external plugin). Returns a
/// `DATA` frame on success.
fn query_reply(store: &Store, object_type: ObjectType, filter: Option<&Filter>, now: Time) -> Frame {
    let json = store.tojson(filter, JsonFlags::NONE, now);
    response::data(object_type.bits(), &json)
}

/// Executes a non-`Store` AST node (spec.md §4.7): `FETCH` resolves a
/// single named object directly; `LIST`/`LOOKUP` walk the whole store
/// filtered; `TIMESERIES` is reserved but unimplemented (spec.md §9 Open
/// Questions).
pub fn exec_query(store: &Store, node: &Node, now: Time) -> Frame {
    match node {
        Node::Store(st) => exec_store(store, st),
        Node::List(l) => query_reply(store, l.object_type, l.filter.as_ref(), now),
        Node::Fetch(f) => {
            let name = f.name.as_deref().unwrap_or_default();
            let json = store.fetch_json(
                f.object_type,
                f.hostname.as_deref(),
                name,
                f.filter.as_ref(),
                JsonFlags::NONE,
                now,
            );
            response::data(f.object_type.bits(), &json)
        }
        Node::Lookup(l) => {
            let combined = match &l.filter {
                Some(extra) => Filter::And(Box::new(l.matcher.clone()), Box::new(extra.clone())),
                None => l.matcher.clone(),
            };
            query_reply(store, l.object_type, Some(&combined), now)
        }
        Node::Timeseries(_) => response::error("not implemented"),
    }
}

/// Runs one already-parsed statement through the analyzer and an
/// executor, following the single-statement contract `exec_query`
/// expects (multi-statement fan-out is the connection layer's job —
/// spec.md §4.7 "Multi-statement queries").
pub fn analyze_and_execute(store: &Store, node: &Node, now: Time) -> Frame {
    match sysdb_ast::analyze(node) {
        Ok(()) => exec_query(store, node, now),
        Err(diag) => response::error(diag.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysdb_wire::object_codec::HostPayload;

    #[test]
    fn store_host_created_message() {
        let store = Store::new();
        let node = store_object_to_ast(StoreObject::Host(HostPayload {
            last_update: Time(1),
            name: "web01".into(),
        }));
        let frame = exec_store(&store, &node);
        assert_eq!(frame.code, sysdb_wire::Code::Ok.as_u32());
        assert_eq!(frame.payload, b"Successfully stored HOST web01");
    }

    #[test]
    fn store_host_already_up_to_date_message() {
        let store = Store::new();
        store.store_host("web01", Time(5));
        let node = store_object_to_ast(StoreObject::Host(HostPayload {
            last_update: Time(1),
            name: "web01".into(),
        }));
        let frame = exec_store(&store, &node);
        assert_eq!(frame.payload, b"Host web01 already up to date");
    }

    #[test]
    fn store_service_attribute_requires_service_to_exist() {
        let store = Store::new();
        store.store_host("web01", Time(1));
        let node = StoreNode {
            obj_type: ObjectType::ATTRIBUTE,
            hostname: Some("web01".into()),
            parent_type: ObjectType::SERVICE.bits(),
            parent: Some("httpd".into()),
            name: "port".into(),
            last_update: Time(1),
            metric_store: None,
            value: Datum::Integer(80),
        };
        let frame = exec_store(&store, &node);
        assert_eq!(frame.code, sysdb_wire::Code::Error.as_u32());
    }

    #[test]
    fn unimplemented_timeseries_reports_error() {
        let store = Store::new();
        let node = Node::Timeseries(sysdb_ast::Timeseries {
            hostname: "web01".into(),
            metric: "cpu".into(),
            start: None,
            end: None,
        });
        let frame = analyze_and_execute(&store, &node, Time(1));
        assert_eq!(frame.code, sysdb_wire::Code::Error.as_u32());
        assert_eq!(frame.payload, b"not implemented");
    }
}
