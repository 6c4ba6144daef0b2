//! Wire codec (spec.md §4.2): frame header constants, command/code bits,
//! and marshal/unmarshal of typed values and object payloads.

pub mod code;
pub mod datum_codec;
pub mod error;
pub mod frame;
pub mod object_codec;
pub mod request;
pub mod response;

pub use code::Code;
pub use error::WireError;
pub use frame::{Frame, FrameDecoder, HEADER_LEN};
pub use request::{StoreObject, TypedTextRequest};
