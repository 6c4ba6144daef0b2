//! Object type bits (§6 "Object type constants").
//!
//! `Attribute` composes with a parent kind via bitwise OR on the wire
//! (`ATTRIBUTE | SERVICE`, `ATTRIBUTE | METRIC`, or bare `ATTRIBUTE` for a
//! host attribute), so this is a bitflags-shaped `u32` newtype rather than a
//! plain enum.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectType(pub u32);

impl ObjectType {
    pub const HOST: ObjectType = ObjectType(0x01);
    pub const SERVICE: ObjectType = ObjectType(0x02);
    pub const METRIC: ObjectType = ObjectType(0x04);
    pub const ATTRIBUTE: ObjectType = ObjectType(0x10);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: ObjectType) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn parent_type(self) -> Option<ObjectType> {
        if !self.contains(ObjectType::ATTRIBUTE) {
            return None;
        }
        match self.0 & !ObjectType::ATTRIBUTE.0 {
            0 => Some(ObjectType::HOST),
            bits if bits == ObjectType::SERVICE.0 => Some(ObjectType::SERVICE),
            bits if bits == ObjectType::METRIC.0 => Some(ObjectType::METRIC),
            _ => None,
        }
    }

    /// Name used in log/reply messages: `HOST`, `SERVICE`, `METRIC`,
    /// `ATTRIBUTE`, `SERVICE|ATTRIBUTE`, `METRIC|ATTRIBUTE`.
    pub fn type_name(self) -> String {
        match self {
            ObjectType::HOST => "HOST".to_string(),
            ObjectType::SERVICE => "SERVICE".to_string(),
            ObjectType::METRIC => "METRIC".to_string(),
            ObjectType::ATTRIBUTE => "ATTRIBUTE".to_string(),
            other => match other.parent_type() {
                Some(ObjectType::SERVICE) => "SERVICE|ATTRIBUTE".to_string(),
                Some(ObjectType::METRIC) => "METRIC|ATTRIBUTE".to_string(),
                _ => format!("UNKNOWN(0x{:02x})", other.0),
            },
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

impl std::ops::BitOr for ObjectType {
    type Output = ObjectType;

    fn bitor(self, rhs: ObjectType) -> ObjectType {
        ObjectType(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_parent_type() {
        assert_eq!(ObjectType::ATTRIBUTE.parent_type(), Some(ObjectType::HOST));
        assert_eq!(
            (ObjectType::ATTRIBUTE | ObjectType::SERVICE).parent_type(),
            Some(ObjectType::SERVICE)
        );
        assert_eq!(ObjectType::HOST.parent_type(), None);
    }
}
