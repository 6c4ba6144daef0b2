//! Request bodies for `FETCH`, `LIST`, `LOOKUP`, and `STORE` (spec.md §4.2,
//! §4.6 dispatch table). These are thin: the type tag plus whatever text or
//! object payload the command needs. Everything past the leading `type: u32`
//! is treated as raw UTF-8 text rather than a null-terminated C string —
//! the original protocol sizes it from the frame's `cmd_len`, not a nul
//! byte, so this implementation follows that rather than re-imposing a
//! terminator the wire format doesn't actually require here.

use sysdb_core::ObjectType;

use crate::error::WireError;
use crate::object_codec::{
    self, AttributePayload, HostPayload, MetricPayload, ServicePayload,
};

fn read_u32(bytes: &[u8]) -> Result<(u32, usize), WireError> {
    if bytes.len() < 4 {
        return Err(WireError::Truncated {
            needed: 4,
            available: bytes.len(),
        });
    }
    Ok((u32::from_be_bytes(bytes[0..4].try_into().unwrap()), 4))
}

fn rest_as_text(bytes: &[u8]) -> Result<String, WireError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| WireError::InvalidUtf8)
}

/// `FETCH` / `LOOKUP` request body: `type: u32, text` where `text` is a
/// plain object name for FETCH or a matcher expression for LOOKUP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedTextRequest {
    pub object_type: ObjectType,
    pub text: String,
}

pub fn decode_typed_text(bytes: &[u8]) -> Result<TypedTextRequest, WireError> {
    let (bits, n) = read_u32(bytes)?;
    let text = rest_as_text(&bytes[n..])?;
    Ok(TypedTextRequest {
        object_type: ObjectType(bits),
        text,
    })
}

/// `LIST` request body: `type: u32` or empty, defaulting to `HOST`.
pub fn decode_list(bytes: &[u8]) -> Result<ObjectType, WireError> {
    if bytes.is_empty() {
        return Ok(ObjectType::HOST);
    }
    let (bits, _) = read_u32(bytes)?;
    Ok(ObjectType(bits))
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreObject {
    Host(HostPayload),
    Service(ServicePayload),
    Metric(MetricPayload),
    Attribute(AttributePayload),
}

/// `STORE` request body: `type: u32` followed by the object encoding for
/// that type. The `type` field is inspected first to select host/service/
/// metric, and the `ATTRIBUTE` bit is checked independently afterwards —
/// preserving the precedence of the original implementation
/// (`examples/original_source/src/frontend/query.c`'s `sdb_conn_store`),
/// per spec.md's Open Questions.
pub fn decode_store(bytes: &[u8]) -> Result<StoreObject, WireError> {
    let (bits, n) = read_u32(bytes)?;
    let object_type = ObjectType(bits);
    let body = &bytes[n..];

    if object_type == ObjectType::HOST {
        return Ok(StoreObject::Host(object_codec::unmarshal_host(body)?));
    }
    if object_type == ObjectType::SERVICE {
        return Ok(StoreObject::Service(object_codec::unmarshal_service(body)?));
    }
    if object_type == ObjectType::METRIC {
        return Ok(StoreObject::Metric(object_codec::unmarshal_metric(body)?));
    }
    if object_type.contains(ObjectType::ATTRIBUTE) {
        return Ok(StoreObject::Attribute(object_codec::unmarshal_attribute(
            body,
        )?));
    }
    Err(WireError::UnknownObjectType(bits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysdb_core::Time;

    #[test]
    fn decode_list_defaults_to_host() {
        assert_eq!(decode_list(&[]).unwrap(), ObjectType::HOST);
    }

    #[test]
    fn decode_store_host() {
        let host = HostPayload {
            last_update: Time(1),
            name: "a".into(),
        };
        let mut body = ObjectType::HOST.bits().to_be_bytes().to_vec();
        body.extend(object_codec::marshal_host(&host));
        assert_eq!(decode_store(&body).unwrap(), StoreObject::Host(host));
    }

    #[test]
    fn decode_store_host_attribute_uses_attribute_bit() {
        let attr = AttributePayload {
            last_update: Time(1),
            parent_type: 0,
            hostname: String::new(),
            parent: "a".into(),
            key: "k".into(),
            value: sysdb_core::Datum::Integer(1),
        };
        let mut body = ObjectType::ATTRIBUTE.bits().to_be_bytes().to_vec();
        body.extend(object_codec::marshal_attribute(&attr));
        assert_eq!(decode_store(&body).unwrap(), StoreObject::Attribute(attr));
    }

    #[test]
    fn decode_store_unknown_type_errors() {
        let body = 0xAAAAu32.to_be_bytes().to_vec();
        assert!(matches!(
            decode_store(&body),
            Err(WireError::UnknownObjectType(_))
        ));
    }
}
