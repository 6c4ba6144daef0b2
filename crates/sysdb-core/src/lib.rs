//! Core value types shared by the wire codec, the store, and the query
//! pipeline: the tagged [`Datum`] value, field identifiers used by filters
//! and field accessors, and the object/command type constants from the wire
//! protocol.

pub mod datum;
pub mod error;
pub mod field;
pub mod object;
pub mod time;

pub use datum::Datum;
pub use error::Diagnostic;
pub use field::Field;
pub use object::ObjectType;
pub use time::Time;
