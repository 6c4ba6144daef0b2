use thiserror::Error;

/// A required parent is missing (spec.md §4.3 invariant 1, update-merge
/// step 5): "do not create anything", surfaced to the caller rather than
/// silently auto-creating the parent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("host '{0}' does not exist")]
    UnknownHost(String),

    #[error("{parent_kind} '{parent}' does not exist on host '{host}'")]
    UnknownParent {
        host: String,
        parent_kind: &'static str,
        parent: String,
    },
}

/// `iterate`'s two non-success outcomes (spec.md §4.3 `iterate`, §8
/// invariant 7): an empty store, or a callback that asked to stop early.
/// Both map to the contract's single `-1` return; this distinguishes them
/// for callers/tests that care which happened.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IterateError {
    #[error("store is empty")]
    Empty,
    #[error("callback requested early stop")]
    Stopped,
}
