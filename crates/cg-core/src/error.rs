//! Errors raised by the grid engine

use thiserror::Error;

/// Contract violations reported by the grid engine.
///
/// Data-shape problems (missing fields, out-of-range pages on a slice,
/// duplicate identities) never produce one of these; they degrade to
/// well-defined fallback values instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("page size must be at least 1 (got {0})")]
    InvalidPageSize(usize),

    #[error("duplicate column key '{0}'")]
    DuplicateColumnKey(String),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("action '{label}' is disabled for this record")]
    ActionDisabled { label: String },

    #[error("action '{label}' is not offered for this record")]
    ActionHidden { label: String },

    #[error("no action at index {0}")]
    ActionIndexOutOfRange(usize),

    #[error("already at first page")]
    AtFirstPage,

    #[error("already at last page")]
    AtLastPage,
}

pub type GridResult<T> = Result<T, GridError>;
