//! Marshal/unmarshal for [`Datum`] (spec.md §4.2 "datum"):
//! `type: u32, body` where body depends on type. The array flag is a bit
//! composed onto the scalar type tag rather than a distinct tag, matching
//! "An array flag may be composed with any scalar tag".

use sysdb_core::{Datum, Time};

use crate::error::WireError;

const TYPE_NULL: u32 = 0;
const TYPE_INTEGER: u32 = 1;
const TYPE_DECIMAL: u32 = 2;
const TYPE_STRING: u32 = 3;
const TYPE_DATETIME: u32 = 4;
const TYPE_BINARY: u32 = 5;
const ARRAY_FLAG: u32 = 0x100;

pub fn write_cstr(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

pub fn read_cstr(bytes: &[u8]) -> Result<(String, usize), WireError> {
    let nul = bytes
        .iter()
        .position(|&b| b == 0)
        .ok_or(WireError::UnterminatedString)?;
    let s = std::str::from_utf8(&bytes[..nul]).map_err(|_| WireError::InvalidUtf8)?;
    Ok((s.to_string(), nul + 1))
}

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

/// Encode a datum's `type` tag and body, appending to `out`. Returns
/// nothing: callers encoding a full object payload just keep appending.
pub fn marshal_datum(datum: &Datum, out: &mut Vec<u8>) {
    match datum {
        Datum::Null => out.extend_from_slice(&TYPE_NULL.to_be_bytes()),
        Datum::Integer(v) => {
            out.extend_from_slice(&TYPE_INTEGER.to_be_bytes());
            out.extend_from_slice(&v.to_be_bytes());
        }
        Datum::Decimal(v) => {
            out.extend_from_slice(&TYPE_DECIMAL.to_be_bytes());
            out.extend_from_slice(&v.to_bits().to_be_bytes());
        }
        Datum::String(s) => {
            out.extend_from_slice(&TYPE_STRING.to_be_bytes());
            write_cstr(out, s);
        }
        Datum::Datetime(t) => {
            out.extend_from_slice(&TYPE_DATETIME.to_be_bytes());
            out.extend_from_slice(&t.as_nanos().to_be_bytes());
        }
        Datum::Binary(bytes) => {
            out.extend_from_slice(&TYPE_BINARY.to_be_bytes());
            out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            out.extend_from_slice(bytes);
        }
        Datum::Array(items) => {
            let base = items.first().map(scalar_tag).unwrap_or(TYPE_NULL);
            out.extend_from_slice(&(base | ARRAY_FLAG).to_be_bytes());
            out.extend_from_slice(&(items.len() as u32).to_be_bytes());
            for item in items {
                marshal_scalar_body(item, out);
            }
        }
    }
}

fn scalar_tag(d: &Datum) -> u32 {
    match d {
        Datum::Null => TYPE_NULL,
        Datum::Integer(_) => TYPE_INTEGER,
        Datum::Decimal(_) => TYPE_DECIMAL,
        Datum::String(_) => TYPE_STRING,
        Datum::Datetime(_) => TYPE_DATETIME,
        Datum::Binary(_) => TYPE_BINARY,
        Datum::Array(_) => unreachable!("array elements are never arrays"),
    }
}

fn marshal_scalar_body(d: &Datum, out: &mut Vec<u8>) {
    match d {
        Datum::Null => {}
        Datum::Integer(v) => out.extend_from_slice(&v.to_be_bytes()),
        Datum::Decimal(v) => out.extend_from_slice(&v.to_bits().to_be_bytes()),
        Datum::String(s) => write_cstr(out, s),
        Datum::Datetime(t) => out.extend_from_slice(&t.as_nanos().to_be_bytes()),
        Datum::Binary(bytes) => {
            out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            out.extend_from_slice(bytes);
        }
        Datum::Array(_) => unreachable!("array elements are never arrays"),
    }
}

fn unmarshal_scalar_body(tag: u32, bytes: &[u8]) -> Result<(Datum, usize), WireError> {
    match tag {
        TYPE_NULL => Ok((Datum::Null, 0)),
        TYPE_INTEGER => {
            need(bytes, 8)?;
            Ok((
                Datum::Integer(i64::from_be_bytes(bytes[0..8].try_into().unwrap())),
                8,
            ))
        }
        TYPE_DECIMAL => {
            need(bytes, 8)?;
            let bits = u64::from_be_bytes(bytes[0..8].try_into().unwrap());
            Ok((Datum::Decimal(f64::from_bits(bits)), 8))
        }
        TYPE_STRING => {
            let (s, n) = read_cstr(bytes)?;
            Ok((Datum::String(s), n))
        }
        TYPE_DATETIME => {
            need(bytes, 8)?;
            let nanos = u64::from_be_bytes(bytes[0..8].try_into().unwrap());
            Ok((Datum::Datetime(Time(nanos)), 8))
        }
        TYPE_BINARY => {
            need(bytes, 4)?;
            let len = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as usize;
            need(&bytes[4..], len)?;
            Ok((Datum::Binary(bytes[4..4 + len].to_vec()), 4 + len))
        }
        other => Err(WireError::UnknownDatumType(other)),
    }
}

/// Decode a `type, body` datum from the front of `bytes`. Returns the value
/// and the number of bytes consumed.
pub fn unmarshal_datum(bytes: &[u8]) -> Result<(Datum, usize), WireError> {
    need(bytes, 4)?;
    let tag = u32::from_be_bytes(bytes[0..4].try_into().unwrap());
    let mut consumed = 4;
    if tag & ARRAY_FLAG != 0 {
        let base = tag & !ARRAY_FLAG;
        need(&bytes[consumed..], 4)?;
        let count =
            u32::from_be_bytes(bytes[consumed..consumed + 4].try_into().unwrap()) as usize;
        consumed += 4;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let (item, n) = unmarshal_scalar_body(base, &bytes[consumed..])?;
            consumed += n;
            items.push(item);
        }
        Ok((Datum::Array(items), consumed))
    } else {
        let (scalar, n) = unmarshal_scalar_body(tag, &bytes[consumed..])?;
        consumed += n;
        Ok((scalar, consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(d: Datum) {
        let mut buf = Vec::new();
        marshal_datum(&d, &mut buf);
        let (decoded, consumed) = unmarshal_datum(&buf).unwrap();
        assert_eq!(decoded, d);
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn roundtrips_every_scalar_kind() {
        roundtrip(Datum::Null);
        roundtrip(Datum::Integer(-42));
        roundtrip(Datum::Decimal(3.5));
        roundtrip(Datum::String("hello \"world\"".into()));
        roundtrip(Datum::Datetime(Time(123_456_789)));
        roundtrip(Datum::Binary(vec![1, 2, 3, 255]));
    }

    #[test]
    fn roundtrips_array() {
        roundtrip(Datum::Array(vec![Datum::Integer(1), Datum::Integer(2)]));
        roundtrip(Datum::Array(vec![]));
    }

    #[test]
    fn truncated_frame_is_an_error() {
        let mut buf = Vec::new();
        marshal_datum(&Datum::Integer(7), &mut buf);
        buf.truncate(buf.len() - 1);
        assert!(matches!(
            unmarshal_datum(&buf),
            Err(WireError::Truncated { .. })
        ));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let mut buf = TYPE_STRING.to_be_bytes().to_vec();
        buf.extend_from_slice(b"no nul here");
        assert!(matches!(
            unmarshal_datum(&buf),
            Err(WireError::UnterminatedString)
        ));
    }
}
