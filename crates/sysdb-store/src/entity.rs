//! Store entities (spec.md §3 "Store entities", §9 "Polymorphism across
//! entity kinds"): a common header shared by every entity kind, with
//! per-kind extra fields held alongside it rather than via a class
//! hierarchy. Children are kept in `BTreeMap`s keyed by a case-folded name
//! so iteration is name-sorted for free (§3 "Identity and ordering").

use std::collections::BTreeMap;

use sysdb_core::{Datum, Field, Time};

/// Case-fold a name for use as a map key. Display always uses the
/// originally-stored casing from [`Header::name`]; only lookups fold.
pub fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Fields common to every entity kind (spec.md §9's "common header
/// `{name,last_update,interval,backends}`").
#[derive(Debug, Clone)]
pub struct Header {
    pub name: String,
    pub last_update: Time,
    pub interval: u64,
    pub backends: Vec<String>,
}

impl Header {
    /// A brand-new entity: `last_update = ts`, `interval = 0` (spec.md §3
    /// "The very first update sets interval = 0").
    pub fn created(name: impl Into<String>, ts: Time) -> Self {
        Header {
            name: name.into(),
            last_update: ts,
            interval: 0,
            backends: Vec::new(),
        }
    }
}

/// Resolves the shared [`Field`] set (spec.md §4.3 `get_field`) against an
/// entity's header. Every entity kind has every field — `AGE`/`INTERVAL`
/// are always present — so unlike a per-kind field set, resolution here
/// never actually misses; the spec's "comparing a missing field yields
/// false" is for filter expressions built over fields this store does not
/// define at all, handled in [`crate::filter`].
pub trait Fielded {
    fn header(&self) -> &Header;

    fn field(&self, field: Field, now: Time) -> Datum {
        let h = self.header();
        match field {
            Field::Name => Datum::String(h.name.clone()),
            Field::LastUpdate => Datum::Datetime(h.last_update),
            Field::Age => {
                let age_ns = now.as_nanos().saturating_sub(h.last_update.as_nanos());
                Datum::Integer(age_ns as i64)
            }
            Field::Interval => Datum::Integer(h.interval as i64),
            Field::Backend => {
                Datum::Array(h.backends.iter().cloned().map(Datum::String).collect())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub header: Header,
    pub value: Datum,
}

impl Attribute {
    pub fn created(name: impl Into<String>, value: Datum, ts: Time) -> Self {
        Attribute {
            header: Header::created(name, ts),
            value,
        }
    }
}

impl Fielded for Attribute {
    fn header(&self) -> &Header {
        &self.header
    }
}

#[derive(Debug, Clone)]
pub struct Metric {
    pub header: Header,
    pub store_ref: Option<(String, String)>,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Metric {
    pub fn created(name: impl Into<String>, ts: Time, store_ref: Option<(String, String)>) -> Self {
        Metric {
            header: Header::created(name, ts),
            store_ref,
            attributes: BTreeMap::new(),
        }
    }
}

impl Fielded for Metric {
    fn header(&self) -> &Header {
        &self.header
    }
}

#[derive(Debug, Clone)]
pub struct Service {
    pub header: Header,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Service {
    pub fn created(name: impl Into<String>, ts: Time) -> Self {
        Service {
            header: Header::created(name, ts),
            attributes: BTreeMap::new(),
        }
    }
}

impl Fielded for Service {
    fn header(&self) -> &Header {
        &self.header
    }
}

#[derive(Debug, Clone)]
pub struct Host {
    pub header: Header,
    pub attributes: BTreeMap<String, Attribute>,
    pub services: BTreeMap<String, Service>,
    pub metrics: BTreeMap<String, Metric>,
}

impl Host {
    pub fn created(name: impl Into<String>, ts: Time) -> Self {
        Host {
            header: Header::created(name, ts),
            attributes: BTreeMap::new(),
            services: BTreeMap::new(),
            metrics: BTreeMap::new(),
        }
    }
}

impl Fielded for Host {
    fn header(&self) -> &Header {
        &self.header
    }
}
