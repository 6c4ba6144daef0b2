//! AST nodes (spec.md §4.4): a neutral, tagged representation of a parsed
//! statement. The parser (§4.5) is the only producer of these; this crate
//! only defines the shape and validates it.

use sysdb_core::{Datum, ObjectType, Time};
use sysdb_store::Filter;

#[derive(Debug, Clone, PartialEq)]
pub struct Fetch {
    pub object_type: ObjectType,
    pub hostname: Option<String>,
    pub name: Option<String>,
    pub filter: Option<Filter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub object_type: ObjectType,
    pub filter: Option<Filter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub object_type: ObjectType,
    pub matcher: Filter,
    pub filter: Option<Filter>,
}

/// `parent_type` is `0` (host attribute), `SERVICE`, or `METRIC` — never
/// `ATTRIBUTE` itself. See [`crate::analyzer::analyze`] for the validity
/// check and `examples/original_source/src/frontend/query.c`'s
/// `exec_store` for the precedence this mirrors.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    pub obj_type: ObjectType,
    pub hostname: Option<String>,
    pub parent_type: u32,
    pub parent: Option<String>,
    pub name: String,
    pub last_update: Time,
    pub metric_store: Option<(String, String)>,
    pub value: Datum,
}

impl Store {
    /// The name used in reply/log messages (spec.md §4.7 "Qualified name
    /// rules"). Computed independently of whether `obj_type`/`parent_type`
    /// are actually valid — `query.c` builds this string before checking
    /// validity, so a STORE with a bad `parent_type` still gets a
    /// best-effort name in its error log line.
    pub fn qualified_name(&self) -> String {
        let host = self.hostname.as_deref().unwrap_or("");
        if self.obj_type == ObjectType::HOST {
            return self.name.clone();
        }
        if self.obj_type.contains(ObjectType::ATTRIBUTE) {
            return match &self.parent {
                Some(parent) => format!("{host}.{parent}.{}", self.name),
                None => format!("{host}.{}", self.name),
            };
        }
        format!("{host}.{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeseries {
    pub hostname: String,
    pub metric: String,
    pub start: Option<Time>,
    pub end: Option<Time>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Fetch(Fetch),
    List(List),
    Lookup(Lookup),
    Store(Store),
    Timeseries(Timeseries),
}
