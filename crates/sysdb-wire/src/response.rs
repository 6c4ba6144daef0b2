//! Reply-frame builders (spec.md §6 "Reply-payload conventions"): thin
//! helpers that wrap an already-rendered payload in the right `code`, so
//! the connection layer never hand-assembles a [`Frame`] by code number.

use crate::code::Code;
use crate::frame::Frame;

/// `OK` with a UTF-8 status string, possibly empty (§6).
pub fn ok(status: impl AsRef<str>) -> Frame {
    Frame::new(Code::Ok.as_u32(), status.as_ref().as_bytes().to_vec())
}

/// `ERROR` with a UTF-8 diagnostic (§6, §7).
pub fn error(message: impl AsRef<str>) -> Frame {
    Frame::new(Code::Error.as_u32(), message.as_ref().as_bytes().to_vec())
}

/// `LOG` with a UTF-8 diagnostic — used for non-fatal warnings such as the
/// multi-statement-query notice (spec.md §4.7, S6).
pub fn log(message: impl AsRef<str>) -> Frame {
    Frame::new(Code::Log.as_u32(), message.as_ref().as_bytes().to_vec())
}

/// `DATA` with a leading `u32` sub-type echoing the request (HOST/SERVICE/
/// METRIC bits for LIST/FETCH/LOOKUP, or `0` for QUERY) followed by UTF-8
/// JSON (spec.md §6).
pub fn data(subtype: u32, json: &str) -> Frame {
    let mut payload = Vec::with_capacity(4 + json.len());
    payload.extend_from_slice(&subtype.to_be_bytes());
    payload.extend_from_slice(json.as_bytes());
    Frame::new(Code::Data.as_u32(), payload)
}

/// `SERVER_VERSION` reply: a bare UTF-8 version string (SPEC_FULL.md
/// "Supplemental features", item 1).
pub fn server_version(version: impl AsRef<str>) -> Frame {
    Frame::new(
        Code::ServerVersion.as_u32(),
        version.as_ref().as_bytes().to_vec(),
    )
}
