//! Field identifiers used by filters (§4.3 "Filters") and by
//! [`crate::object::ObjectType`]-scoped field accessors (§4.3 `get_field`).

/// A field reference resolvable on any store entity (host, service, metric,
/// or attribute). `Backend` yields an array-of-strings datum; every other
/// variant yields a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Field {
    Name,
    LastUpdate,
    Age,
    Interval,
    Backend,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::LastUpdate => "last_update",
            Field::Age => "age",
            Field::Interval => "interval",
            Field::Backend => "backend",
        }
    }
}

impl std::str::FromStr for Field {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for field in [
            Field::Name,
            Field::LastUpdate,
            Field::Age,
            Field::Interval,
            Field::Backend,
        ] {
            if s.eq_ignore_ascii_case(field.as_str()) {
                return Ok(field);
            }
        }
        Err(())
    }
}
