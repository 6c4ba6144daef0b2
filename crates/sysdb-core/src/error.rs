//! A one-line diagnostic, the shared currency of the parser/analyzer error
//! buffer (spec.md §4.4, §4.5, §7): parsing and analysis fail by producing
//! exactly one of these rather than a structured error tree, because the
//! wire protocol only ever carries the message text back to the client.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic(pub String);

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Diagnostic(message.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Diagnostic {}

impl From<String> for Diagnostic {
    fn from(value: String) -> Self {
        Diagnostic(value)
    }
}

impl From<&str> for Diagnostic {
    fn from(value: &str) -> Self {
        Diagnostic(value.to_string())
    }
}
