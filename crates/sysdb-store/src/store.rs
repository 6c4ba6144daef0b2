//! The top-level [`Store`] (spec.md §4.3): a concurrent, versioned catalog
//! of hosts and their children. Locking follows §5 "Shared-resource
//! policy" — a single top-level lock over the host map, plus one lock per
//! host guarding that host's own header and children, so a write to one
//! host never blocks readers or writers of another.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use sysdb_core::{Datum, Time};

use crate::entity::{fold, Attribute, Header, Host, Metric, Service};
use crate::error::{IterateError, StoreError};

/// Outcome of a single `store_X` call (spec.md §4.3 contract table and
/// update-merge algorithm). `Created` and `Updated` both map to wire code
/// `0`; `AlreadyUpToDate` maps to `1`. Kept distinct here because
/// `exec_store`'s reply text ("Successfully stored ..." vs "... already up
/// to date") depends on which of the two zero-cases happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    Created,
    Updated,
    AlreadyUpToDate,
}

impl UpdateResult {
    /// The integer status code the wire protocol actually carries.
    pub fn code(self) -> i32 {
        match self {
            UpdateResult::Created | UpdateResult::Updated => 0,
            UpdateResult::AlreadyUpToDate => 1,
        }
    }
}

/// `0.9 * old + 0.1 * delta`, truncated (spec.md §3, §9 "Interval
/// calculation corner case" — this implementation commits to truncation).
/// The very first applied delta primes `interval` directly rather than
/// blending from zero (`examples/original_source/t/unit/core/store_test.c`'s
/// `test_interval`: four updates 10 ns apart yield `interval == 10`, not
/// `0.9*0 + 0.1*10 == 1`).
fn merge_update(header: &mut Header, ts: Time) -> UpdateResult {
    if ts > header.last_update {
        let delta = ts.as_nanos() - header.last_update.as_nanos();
        header.interval = if header.interval == 0 {
            delta
        } else {
            Time::exponential_interval(header.interval, delta)
        };
        header.last_update = ts;
        UpdateResult::Updated
    } else {
        UpdateResult::AlreadyUpToDate
    }
}

fn store_attr_in(
    map: &mut BTreeMap<String, Attribute>,
    key: &str,
    value: Datum,
    ts: Time,
) -> UpdateResult {
    let k = fold(key);
    if let Some(existing) = map.get_mut(&k) {
        let result = merge_update(&mut existing.header, ts);
        if result == UpdateResult::Updated {
            existing.value = value;
        }
        result
    } else {
        map.insert(k, Attribute::created(key, value, ts));
        UpdateResult::Created
    }
}

#[derive(Default)]
pub struct Store {
    pub(crate) hosts: RwLock<BTreeMap<String, Arc<RwLock<Host>>>>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Create or refresh a host (spec.md §4.3 `store_host`). Looks up
    /// under the top-level read lock first; only takes the write lock if
    /// the host doesn't exist yet, re-checking after acquiring it in case
    /// another writer raced us to the insert.
    pub fn store_host(&self, name: &str, ts: Time) -> UpdateResult {
        let key = fold(name);
        if let Some(host) = self.hosts.read().get(&key).cloned() {
            return merge_update(&mut host.write().header, ts);
        }
        let mut hosts = self.hosts.write();
        match hosts.get(&key) {
            Some(host) => merge_update(&mut host.write().header, ts),
            None => {
                hosts.insert(key, Arc::new(RwLock::new(Host::created(name, ts))));
                UpdateResult::Created
            }
        }
    }

    pub fn store_service(
        &self,
        host: &str,
        name: &str,
        ts: Time,
    ) -> Result<UpdateResult, StoreError> {
        let host_arc = self
            .get_host(host)
            .ok_or_else(|| StoreError::UnknownHost(host.to_string()))?;
        let mut h = host_arc.write();
        let key = fold(name);
        if let Some(existing) = h.services.get_mut(&key) {
            Ok(merge_update(&mut existing.header, ts))
        } else {
            h.services.insert(key, Service::created(name, ts));
            Ok(UpdateResult::Created)
        }
    }

    /// `store_ref` overwrites the stored pointer only when the update is
    /// actually applied (spec.md §4.3 step 3 "refresh any payload fields");
    /// an already-up-to-date call leaves it untouched even if provided.
    pub fn store_metric(
        &self,
        host: &str,
        name: &str,
        store_ref: Option<(String, String)>,
        ts: Time,
    ) -> Result<UpdateResult, StoreError> {
        let host_arc = self
            .get_host(host)
            .ok_or_else(|| StoreError::UnknownHost(host.to_string()))?;
        let mut h = host_arc.write();
        let key = fold(name);
        if let Some(existing) = h.metrics.get_mut(&key) {
            let result = merge_update(&mut existing.header, ts);
            if result == UpdateResult::Updated {
                if let Some(reference) = store_ref {
                    existing.store_ref = Some(reference);
                }
            }
            Ok(result)
        } else {
            h.metrics
                .insert(key, Metric::created(name, ts, store_ref));
            Ok(UpdateResult::Created)
        }
    }

    pub fn store_attribute(
        &self,
        host: &str,
        key: &str,
        value: Datum,
        ts: Time,
    ) -> Result<UpdateResult, StoreError> {
        let host_arc = self
            .get_host(host)
            .ok_or_else(|| StoreError::UnknownHost(host.to_string()))?;
        let mut h = host_arc.write();
        Ok(store_attr_in(&mut h.attributes, key, value, ts))
    }

    pub fn store_service_attr(
        &self,
        host: &str,
        service: &str,
        key: &str,
        value: Datum,
        ts: Time,
    ) -> Result<UpdateResult, StoreError> {
        let host_arc = self
            .get_host(host)
            .ok_or_else(|| StoreError::UnknownHost(host.to_string()))?;
        let mut h = host_arc.write();
        let svc = h
            .services
            .get_mut(&fold(service))
            .ok_or_else(|| StoreError::UnknownParent {
                host: host.to_string(),
                parent_kind: "service",
                parent: service.to_string(),
            })?;
        Ok(store_attr_in(&mut svc.attributes, key, value, ts))
    }

    pub fn store_metric_attr(
        &self,
        host: &str,
        metric: &str,
        key: &str,
        value: Datum,
        ts: Time,
    ) -> Result<UpdateResult, StoreError> {
        let host_arc = self
            .get_host(host)
            .ok_or_else(|| StoreError::UnknownHost(host.to_string()))?;
        let mut h = host_arc.write();
        let met = h
            .metrics
            .get_mut(&fold(metric))
            .ok_or_else(|| StoreError::UnknownParent {
                host: host.to_string(),
                parent_kind: "metric",
                parent: metric.to_string(),
            })?;
        Ok(store_attr_in(&mut met.attributes, key, value, ts))
    }

    pub fn has_host(&self, name: &str) -> bool {
        self.hosts.read().contains_key(&fold(name))
    }

    /// A shared handle to the host, playing the role of the original's
    /// refcounted reference (spec.md §5 "Reference counts on entities"):
    /// cloning the `Arc` is the increment, dropping it is the release.
    pub fn get_host(&self, name: &str) -> Option<Arc<RwLock<Host>>> {
        self.hosts.read().get(&fold(name)).cloned()
    }

    /// Visit each host in name order (spec.md §4.3 `iterate`, §8 invariant
    /// 7). The top-level lock is held in read mode for the whole walk so
    /// the host set is stable; each host's own lock is then taken in read
    /// mode one at a time, matching §5's snapshot-then-per-host-lock
    /// ordering so a concurrent per-host writer can't deadlock the walk.
    pub fn iterate<F>(&self, mut f: F) -> Result<(), IterateError>
    where
        F: FnMut(&Host) -> bool,
    {
        let hosts = self.hosts.read();
        if hosts.is_empty() {
            return Err(IterateError::Empty);
        }
        for host in hosts.values() {
            let guard = host.read();
            if !f(&guard) {
                return Err(IterateError::Stopped);
            }
        }
        Ok(())
    }

    pub fn clear(&self) {
        self.hosts.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_basic_host_upsert() {
        let store = Store::new();
        assert_eq!(store.store_host("a", Time(2)).code(), 0);
        assert_eq!(store.store_host("a", Time(3)).code(), 0);
        assert_eq!(store.store_host("a", Time(1)).code(), 1);
        assert_eq!(store.store_host("b", Time(2)).code(), 0);
        assert_eq!(store.store_host("b", Time(1)).code(), 1);
        assert_eq!(store.store_host("A", Time(1)).code(), 1);
        assert_eq!(store.store_host("A", Time(4)).code(), 0);

        assert!(store.has_host("a"));
        assert!(store.has_host("A"));
        assert!(!store.has_host("c"));
        assert_eq!(store.get_host("a").unwrap().read().header.last_update, Time(4));
    }

    #[test]
    fn s2_parent_required() {
        let store = Store::new();
        assert_eq!(
            store.store_attribute("k", "k", Datum::String("v".into()), Time(1)),
            Err(StoreError::UnknownHost("k".into()))
        );

        store.store_host("l", Time(1));
        assert_eq!(
            store
                .store_attribute("l", "k1", Datum::String("v1".into()), Time(1))
                .unwrap()
                .code(),
            0
        );
        assert_eq!(
            store
                .store_attribute("l", "k1", Datum::String("v2".into()), Time(2))
                .unwrap()
                .code(),
            0
        );
        assert_eq!(
            store
                .store_attribute("l", "k1", Datum::String("v3".into()), Time(1))
                .unwrap()
                .code(),
            1
        );
        let host = store.get_host("l").unwrap();
        let guard = host.read();
        assert_eq!(
            guard.attributes.get("k1").unwrap().value,
            Datum::String("v2".into())
        );
    }

    // spec.md §8 S3, matching `test_interval` in
    // `examples/original_source/t/unit/core/store_test.c`: the first
    // applied delta (10) primes `interval` directly; later deltas blend in
    // at 0.9/0.1, truncated.
    #[test]
    fn s3_interval_estimation() {
        let store = Store::new();
        store.store_host("h", Time(10));
        store.store_host("h", Time(20));
        store.store_host("h", Time(30));
        store.store_host("h", Time(40));
        assert_eq!(store.get_host("h").unwrap().read().header.interval, 10);

        for _ in 0..4 {
            assert_eq!(store.store_host("h", Time(40)).code(), 1);
        }
        for _ in 0..4 {
            assert_eq!(store.store_host("h", Time(20)).code(), 1);
        }
        assert_eq!(store.get_host("h").unwrap().read().header.interval, 10);

        // new delta: 20 ns -> 0.9*10 + 0.1*20 = 11
        store.store_host("h", Time(60));
        assert_eq!(store.get_host("h").unwrap().read().header.interval, 11);

        // new delta: 40 ns -> 0.9*11 + 0.1*40 = 13.9, truncated to 13
        store.store_host("h", Time(100));
        assert_eq!(store.get_host("h").unwrap().read().header.interval, 13);
    }

    #[test]
    fn store_service_requires_host() {
        let store = Store::new();
        assert_eq!(
            store.store_service("missing", "svc", Time(1)),
            Err(StoreError::UnknownHost("missing".into()))
        );
        assert_eq!(
            store.store_service("missing", "svc", Time(1)),
            Err(StoreError::UnknownHost("missing".into()))
        );
    }

    #[test]
    fn store_service_attr_requires_service() {
        let store = Store::new();
        store.store_host("h", Time(1));
        assert_eq!(
            store.store_service_attr("h", "svc", "k", Datum::Integer(1), Time(1)),
            Err(StoreError::UnknownParent {
                host: "h".into(),
                parent_kind: "service",
                parent: "svc".into(),
            })
        );
    }

    #[test]
    fn metric_store_ref_only_updates_on_applied_update() {
        let store = Store::new();
        store.store_host("h", Time(1));
        store
            .store_metric("h", "cpu", None, Time(1))
            .unwrap();
        store
            .store_metric(
                "h",
                "cpu",
                Some(("rrdtool".into(), "/var/rrd/cpu.rrd".into())),
                Time(0),
            )
            .unwrap();
        let host = store.get_host("h").unwrap();
        assert_eq!(host.read().metrics.get("cpu").unwrap().store_ref, None);

        store
            .store_metric(
                "h",
                "cpu",
                Some(("rrdtool".into(), "/var/rrd/cpu.rrd".into())),
                Time(2),
            )
            .unwrap();
        assert_eq!(
            host.read().metrics.get("cpu").unwrap().store_ref,
            Some(("rrdtool".into(), "/var/rrd/cpu.rrd".into()))
        );
    }

    #[test]
    fn iterate_empty_store_errors() {
        let store = Store::new();
        assert_eq!(store.iterate(|_| true), Err(IterateError::Empty));
    }

    #[test]
    fn iterate_visits_in_name_order_and_honors_stop() {
        let store = Store::new();
        store.store_host("charlie", Time(1));
        store.store_host("alpha", Time(1));
        store.store_host("bravo", Time(1));

        let mut seen = Vec::new();
        store
            .iterate(|h| {
                seen.push(h.header.name.clone());
                true
            })
            .unwrap();
        assert_eq!(seen, vec!["alpha", "bravo", "charlie"]);

        let mut visited = 0;
        let result = store.iterate(|_| {
            visited += 1;
            false
        });
        assert_eq!(result, Err(IterateError::Stopped));
        assert_eq!(visited, 1);
    }
}
