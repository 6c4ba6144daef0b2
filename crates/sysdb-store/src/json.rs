//! Filtered JSON serialization (spec.md §4.3 "JSON serialization"): an
//! array of host objects, name-sorted at every level by construction
//! (children live in `BTreeMap`s keyed by folded name), with flags to
//! omit whole child arrays and an optional filter applied independently
//! at each level.

use serde_json::{Map, Value};

use sysdb_core::{ObjectType, Time};

use crate::entity::{fold, Attribute, Host, Metric, Service};
use crate::filter::Filter;
use crate::store::Store;

/// Which child arrays to omit from every host object (spec.md §4.3
/// "flags may skip services, metrics, or attributes at every level").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonFlags {
    pub skip_services: bool,
    pub skip_metrics: bool,
    pub skip_attributes: bool,
}

impl JsonFlags {
    pub const NONE: JsonFlags = JsonFlags {
        skip_services: false,
        skip_metrics: false,
        skip_attributes: false,
    };

    pub const SKIP_ALL: JsonFlags = JsonFlags {
        skip_services: true,
        skip_metrics: true,
        skip_attributes: true,
    };
}

impl Store {
    /// Render all hosts as a JSON array. `flags` decides which child keys
    /// appear at all; `filter`, if given, decides which objects at each
    /// level are included — "a parent is emitted whenever any descendant
    /// passes or the parent itself passes" (spec.md §4.3), independent of
    /// whether that descendant's array is actually shown per `flags`.
    pub fn tojson(&self, filter: Option<&Filter>, flags: JsonFlags, now: Time) -> String {
        let hosts = self.hosts.read();
        let rendered: Vec<Value> = hosts
            .values()
            .filter_map(|host_lock| host_to_json(&host_lock.read(), filter, flags, now))
            .collect();
        serde_json::to_string(&Value::Array(rendered))
            .expect("store entities always serialize to valid JSON")
    }

    /// Renders a single named object as a one-(or zero-)element JSON array
    /// (spec.md §4.6 `FETCH`). `hostname` scopes `SERVICE`/`METRIC`/
    /// host-`ATTRIBUTE` lookups; ignored for `HOST`.
    pub fn fetch_json(
        &self,
        object_type: ObjectType,
        hostname: Option<&str>,
        name: &str,
        filter: Option<&Filter>,
        flags: JsonFlags,
        now: Time,
    ) -> String {
        let hosts = self.hosts.read();
        let rendered: Vec<Value> = if object_type == ObjectType::HOST {
            hosts
                .get(&fold(name))
                .and_then(|h| host_to_json(&h.read(), filter, flags, now))
                .into_iter()
                .collect()
        } else if object_type == ObjectType::SERVICE {
            hostname
                .and_then(|hn| hosts.get(&fold(hn)))
                .and_then(|h| {
                    let guard = h.read();
                    guard
                        .services
                        .get(&fold(name))
                        .and_then(|s| service_to_json(s, filter, flags, now))
                })
                .into_iter()
                .collect()
        } else if object_type == ObjectType::METRIC {
            hostname
                .and_then(|hn| hosts.get(&fold(hn)))
                .and_then(|h| {
                    let guard = h.read();
                    guard
                        .metrics
                        .get(&fold(name))
                        .and_then(|m| metric_to_json(m, filter, flags, now))
                })
                .into_iter()
                .collect()
        } else if object_type.contains(ObjectType::ATTRIBUTE) {
            hostname
                .and_then(|hn| hosts.get(&fold(hn)))
                .and_then(|h| {
                    let guard = h.read();
                    guard
                        .attributes
                        .get(&fold(name))
                        .and_then(|a| attribute_to_json(a, filter, now))
                })
                .into_iter()
                .collect()
        } else {
            Vec::new()
        };
        serde_json::to_string(&Value::Array(rendered))
            .expect("store entities always serialize to valid JSON")
    }
}

fn header_fields(map: &mut Map<String, Value>, h: &Host) {
    header_fields_common(map, &h.header.name, h.header.last_update, h.header.interval, &h.header.backends);
}

fn header_fields_common(
    map: &mut Map<String, Value>,
    name: &str,
    last_update: Time,
    interval: u64,
    backends: &[String],
) {
    map.insert("name".into(), Value::String(name.to_string()));
    map.insert(
        "last_update".into(),
        Value::String(last_update.to_string()),
    );
    map.insert("update_interval".into(), Value::from(interval));
    map.insert(
        "backends".into(),
        Value::Array(backends.iter().cloned().map(Value::String).collect()),
    );
}

fn attribute_to_json(a: &Attribute, filter: Option<&Filter>, now: Time) -> Option<Value> {
    if let Some(f) = filter {
        if !f.eval(a, now) {
            return None;
        }
    }
    let mut obj = Map::new();
    header_fields_common(
        &mut obj,
        &a.header.name,
        a.header.last_update,
        a.header.interval,
        &a.header.backends,
    );
    obj.insert("value".into(), Value::String(a.value.to_canonical_string()));
    Some(Value::Object(obj))
}

fn service_to_json(s: &Service, filter: Option<&Filter>, flags: JsonFlags, now: Time) -> Option<Value> {
    let include = match filter {
        None => true,
        Some(f) => f.eval(s, now) || s.attributes.values().any(|a| f.eval(a, now)),
    };
    if !include {
        return None;
    }
    let mut obj = Map::new();
    header_fields_common(
        &mut obj,
        &s.header.name,
        s.header.last_update,
        s.header.interval,
        &s.header.backends,
    );
    if !flags.skip_attributes {
        let attrs: Vec<Value> = s
            .attributes
            .values()
            .filter_map(|a| attribute_to_json(a, filter, now))
            .collect();
        obj.insert("attributes".into(), Value::Array(attrs));
    }
    Some(Value::Object(obj))
}

fn metric_to_json(m: &Metric, filter: Option<&Filter>, flags: JsonFlags, now: Time) -> Option<Value> {
    let include = match filter {
        None => true,
        Some(f) => f.eval(m, now) || m.attributes.values().any(|a| f.eval(a, now)),
    };
    if !include {
        return None;
    }
    let mut obj = Map::new();
    header_fields_common(
        &mut obj,
        &m.header.name,
        m.header.last_update,
        m.header.interval,
        &m.header.backends,
    );
    if !flags.skip_attributes {
        let attrs: Vec<Value> = m
            .attributes
            .values()
            .filter_map(|a| attribute_to_json(a, filter, now))
            .collect();
        obj.insert("attributes".into(), Value::Array(attrs));
    }
    Some(Value::Object(obj))
}

fn host_to_json(h: &Host, filter: Option<&Filter>, flags: JsonFlags, now: Time) -> Option<Value> {
    let include = match filter {
        None => true,
        Some(f) => {
            f.eval(h, now)
                || h.attributes.values().any(|a| f.eval(a, now))
                || h.services
                    .values()
                    .any(|s| f.eval(s, now) || s.attributes.values().any(|a| f.eval(a, now)))
                || h.metrics
                    .values()
                    .any(|m| f.eval(m, now) || m.attributes.values().any(|a| f.eval(a, now)))
        }
    };
    if !include {
        return None;
    }

    let mut obj = Map::new();
    header_fields(&mut obj, h);

    if !flags.skip_attributes {
        let attrs: Vec<Value> = h
            .attributes
            .values()
            .filter_map(|a| attribute_to_json(a, filter, now))
            .collect();
        obj.insert("attributes".into(), Value::Array(attrs));
    }
    if !flags.skip_services {
        let services: Vec<Value> = h
            .services
            .values()
            .filter_map(|s| service_to_json(s, filter, flags, now))
            .collect();
        obj.insert("services".into(), Value::Array(services));
    }
    if !flags.skip_metrics {
        let metrics: Vec<Value> = h
            .metrics
            .values()
            .filter_map(|m| metric_to_json(m, filter, flags, now))
            .collect();
        obj.insert("metrics".into(), Value::Array(metrics));
    }
    Some(Value::Object(obj))
}
