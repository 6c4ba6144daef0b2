//! Datum: the tagged value carried by attributes, wire payloads, and filter
//! constants (spec.md §4.1).

use std::cmp::Ordering;
use std::fmt;

use crate::time::Time;

/// A tagged value of one of five scalar kinds, `Null`, or an array of a
/// single scalar kind. Arrays are not nestable: an `Array` never contains
/// `Array` or `Null` elements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Datum {
    Null,
    Integer(i64),
    Decimal(f64),
    String(String),
    Datetime(Time),
    Binary(Vec<u8>),
    Array(Vec<Datum>),
}

/// Ordinal used to order values of different types; mirrors the
/// `SDB_TYPE_*` discriminants of the original C implementation
/// (`examples/original_source/src/include/core/data.h`), with `Array`
/// ordered last since it has no equivalent there.
fn type_ordinal(d: &Datum) -> u8 {
    match d {
        Datum::Null => 0,
        Datum::Integer(_) => 1,
        Datum::Decimal(_) => 2,
        Datum::String(_) => 3,
        Datum::Datetime(_) => 4,
        Datum::Binary(_) => 5,
        Datum::Array(_) => 6,
    }
}

impl Datum {
    /// A conservative estimate of the number of bytes `format` will write,
    /// not counting a terminating nul. Used to pre-size reply buffers.
    pub fn strlen_estimate(&self) -> usize {
        match self {
            Datum::Null => 0,
            Datum::Integer(v) => v.to_string().len(),
            Datum::Decimal(v) => v.to_string().len().max(24),
            Datum::String(s) => s.len() + 2 + s.matches(['"', '\\']).count(),
            Datum::Datetime(_) => "YYYY-MM-DD HH:MM:SS +0000".len(),
            Datum::Binary(b) => b.len() * 2 + 3,
            Datum::Array(items) => {
                2 + items
                    .iter()
                    .map(|d| d.strlen_estimate() + 2)
                    .sum::<usize>()
            }
        }
    }

    /// Canonical textual form: integers plain, decimals via Rust's
    /// shortest round-trippable `Display`, strings double-quoted and
    /// escaped, datetimes as UTC `YYYY-MM-DD HH:MM:SS +0000`, binary as
    /// hex prefixed `x"..."`, arrays as `[e1,e2,...]`.
    pub fn format(&self, out: &mut String) {
        match self {
            Datum::Null => out.push_str("NULL"),
            Datum::Integer(v) => out.push_str(&v.to_string()),
            Datum::Decimal(v) => out.push_str(&format_decimal(*v)),
            Datum::String(s) => format_quoted_string(s, out),
            Datum::Datetime(t) => out.push_str(&t.to_string()),
            Datum::Binary(bytes) => {
                out.push_str("x\"");
                out.push_str(&hex::encode(bytes));
                out.push('"');
            }
            Datum::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.format(out);
                }
                out.push(']');
            }
        }
    }

    pub fn to_canonical_string(&self) -> String {
        let mut s = String::with_capacity(self.strlen_estimate());
        self.format(&mut s);
        s
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }
}

fn format_decimal(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        return format!("{v:.1}");
    }
    // Rust's `{}` Display for f64 already produces the shortest string
    // that round-trips; that satisfies "%g with enough precision to
    // round-trip (17 significant digits)" without reimplementing grisu.
    format!("{v}")
}

fn format_quoted_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

impl PartialOrd for Datum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total, type-aware ordering: `Null` is less than any other value;
/// same-type values compare by value; different non-null types fall back
/// to the type ordinal.
impl Eq for Datum {}

impl Ord for Datum {
    fn cmp(&self, other: &Self) -> Ordering {
        use Datum::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Decimal(a), Decimal(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (String(a), String(b)) => a.cmp(b),
            (Datetime(a), Datetime(b)) => a.cmp(b),
            (Binary(a), Binary(b)) => a.cmp(b),
            (Array(a), Array(b)) => a.cmp(b),
            (a, b) => type_ordinal(a).cmp(&type_ordinal(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_less_than_everything() {
        assert!(Datum::Null < Datum::Integer(i64::MIN));
        assert!(Datum::Integer(0) > Datum::Null);
    }

    #[test]
    fn mixed_type_compare_uses_ordinal() {
        assert!(Datum::Integer(1_000_000) < Datum::String("a".into()));
    }

    #[test]
    fn string_escaping() {
        let d = Datum::String("a\"b\\c\n".into());
        assert_eq!(d.to_canonical_string(), "\"a\\\"b\\\\c\\n\"");
    }

    #[test]
    fn binary_is_hex_prefixed() {
        let d = Datum::Binary(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(d.to_canonical_string(), "x\"deadbeef\"");
    }

    #[test]
    fn array_join() {
        let d = Datum::Array(vec![Datum::Integer(1), Datum::Integer(2)]);
        assert_eq!(d.to_canonical_string(), "[1, 2]");
    }

    #[test]
    fn datetime_format() {
        let d = Datum::Datetime(Time(0));
        assert_eq!(d.to_canonical_string(), "1970-01-01 00:00:00 +0000");
    }
}
