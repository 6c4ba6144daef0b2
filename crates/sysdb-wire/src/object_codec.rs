//! Payload encoders/decoders for host/service/metric/attribute objects
//! (spec.md §4.2).

use sysdb_core::{Datum, Time};

use crate::datum_codec::{read_cstr, unmarshal_datum, write_cstr};
use crate::error::WireError;

fn need(bytes: &[u8], n: usize) -> Result<(), WireError> {
    if bytes.len() < n {
        Err(WireError::Truncated {
            needed: n,
            available: bytes.len(),
        })
    } else {
        Ok(())
    }
}

fn read_u64(bytes: &[u8]) -> Result<(u64, usize), WireError> {
    need(bytes, 8)?;
    Ok((u64::from_be_bytes(bytes[0..8].try_into().unwrap()), 8))
}

fn read_u32(bytes: &[u8]) -> Result<(u32, usize), WireError> {
    need(bytes, 4)?;
    Ok((u32::from_be_bytes(bytes[0..4].try_into().unwrap()), 4))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPayload {
    pub last_update: Time,
    pub name: String,
}

pub fn marshal_host(host: &HostPayload) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&host.last_update.as_nanos().to_be_bytes());
    write_cstr(&mut out, &host.name);
    out
}

pub fn unmarshal_host(bytes: &[u8]) -> Result<HostPayload, WireError> {
    let (last_update, n) = read_u64(bytes)?;
    let (name, _) = read_cstr(&bytes[n..])?;
    Ok(HostPayload {
        last_update: Time(last_update),
        name,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePayload {
    pub last_update: Time,
    pub hostname: String,
    pub name: String,
}

pub fn marshal_service(svc: &ServicePayload) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&svc.last_update.as_nanos().to_be_bytes());
    write_cstr(&mut out, &svc.hostname);
    write_cstr(&mut out, &svc.name);
    out
}

pub fn unmarshal_service(bytes: &[u8]) -> Result<ServicePayload, WireError> {
    let (last_update, n) = read_u64(bytes)?;
    let (hostname, n2) = read_cstr(&bytes[n..])?;
    let (name, _) = read_cstr(&bytes[n + n2..])?;
    Ok(ServicePayload {
        last_update: Time(last_update),
        hostname,
        name,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricPayload {
    pub last_update: Time,
    pub hostname: String,
    pub name: String,
    pub store_ref: Option<(String, String)>,
}

pub fn marshal_metric(metric: &MetricPayload) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&metric.last_update.as_nanos().to_be_bytes());
    write_cstr(&mut out, &metric.hostname);
    write_cstr(&mut out, &metric.name);
    if let Some((store_type, store_id)) = &metric.store_ref {
        write_cstr(&mut out, store_type);
        write_cstr(&mut out, store_id);
    }
    out
}

pub fn unmarshal_metric(bytes: &[u8]) -> Result<MetricPayload, WireError> {
    let (last_update, n) = read_u64(bytes)?;
    let (hostname, n2) = read_cstr(&bytes[n..])?;
    let rest = &bytes[n + n2..];
    let (name, n3) = read_cstr(rest)?;
    let rest = &rest[n3..];
    let store_ref = if rest.is_empty() {
        None
    } else {
        let (store_type, m) = read_cstr(rest)?;
        let (store_id, _) = read_cstr(&rest[m..])?;
        Some((store_type, store_id))
    };
    Ok(MetricPayload {
        last_update: Time(last_update),
        hostname,
        name,
        store_ref,
    })
}

/// `hostname` and `parent` are both always present on the wire, following
/// `sdb_proto_attribute_t` in `examples/original_source/src/frontend/
/// query.c`: for a host attribute (`parent_type == 0`) `parent` itself
/// names the host and `hostname` is unused; for a service/metric attribute
/// `hostname` names the host and `parent` names the service/metric.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributePayload {
    pub last_update: Time,
    pub parent_type: u32,
    pub hostname: String,
    pub parent: String,
    pub key: String,
    pub value: Datum,
}

pub fn marshal_attribute(attr: &AttributePayload) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&attr.last_update.as_nanos().to_be_bytes());
    out.extend_from_slice(&attr.parent_type.to_be_bytes());
    write_cstr(&mut out, &attr.hostname);
    write_cstr(&mut out, &attr.parent);
    write_cstr(&mut out, &attr.key);
    crate::datum_codec::marshal_datum(&attr.value, &mut out);
    out
}

pub fn unmarshal_attribute(bytes: &[u8]) -> Result<AttributePayload, WireError> {
    let (last_update, n) = read_u64(bytes)?;
    let (parent_type, n2) = read_u32(&bytes[n..])?;
    let rest = &bytes[n + n2..];
    let (hostname, n3) = read_cstr(rest)?;
    let rest = &rest[n3..];
    let (parent, n4) = read_cstr(rest)?;
    let rest = &rest[n4..];
    let (key, n5) = read_cstr(rest)?;
    let rest = &rest[n5..];
    let (value, _) = unmarshal_datum(rest)?;
    Ok(AttributePayload {
        last_update: Time(last_update),
        parent_type,
        hostname,
        parent,
        key,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_host() {
        let host = HostPayload {
            last_update: Time(9),
            name: "web01".into(),
        };
        assert_eq!(unmarshal_host(&marshal_host(&host)).unwrap(), host);
    }

    #[test]
    fn roundtrips_service() {
        let svc = ServicePayload {
            last_update: Time(9),
            hostname: "web01".into(),
            name: "httpd".into(),
        };
        assert_eq!(unmarshal_service(&marshal_service(&svc)).unwrap(), svc);
    }

    #[test]
    fn roundtrips_metric_without_store_ref() {
        let metric = MetricPayload {
            last_update: Time(9),
            hostname: "web01".into(),
            name: "cpu.idle".into(),
            store_ref: None,
        };
        assert_eq!(unmarshal_metric(&marshal_metric(&metric)).unwrap(), metric);
    }

    #[test]
    fn roundtrips_metric_with_store_ref() {
        let metric = MetricPayload {
            last_update: Time(9),
            hostname: "web01".into(),
            name: "cpu.idle".into(),
            store_ref: Some(("rrdtool".into(), "/var/rrd/cpu.rrd".into())),
        };
        assert_eq!(unmarshal_metric(&marshal_metric(&metric)).unwrap(), metric);
    }

    #[test]
    fn roundtrips_attribute() {
        let attr = AttributePayload {
            last_update: Time(9),
            parent_type: 0,
            hostname: String::new(),
            parent: "web01".into(),
            key: "arch".into(),
            value: Datum::String("x86_64".into()),
        };
        assert_eq!(unmarshal_attribute(&marshal_attribute(&attr)).unwrap(), attr);
    }

    #[test]
    fn roundtrips_service_attribute_with_distinct_hostname_and_parent() {
        let attr = AttributePayload {
            last_update: Time(9),
            parent_type: sysdb_core::ObjectType::SERVICE.bits(),
            hostname: "web01".into(),
            parent: "httpd".into(),
            key: "port".into(),
            value: Datum::Integer(80),
        };
        assert_eq!(unmarshal_attribute(&marshal_attribute(&attr)).unwrap(), attr);
    }
}
