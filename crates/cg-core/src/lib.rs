//! Core grid engine for the case dashboard
//!
//! This crate provides the renderer-agnostic building blocks of a data
//! table: record access, column schema, predicate composition, sorting,
//! pagination and per-row action resolution.

pub mod action;
pub mod cache;
pub mod column;
pub mod error;
pub mod events;
pub mod grid;
pub mod pagination;
pub mod predicate;
pub mod record;
pub mod selection;
pub mod sort;
pub mod value;

// Re-export commonly used types
pub use action::{
    partition, resolve_for_record, trigger, ActionOutcome, ActionVariant, ResolvedAction,
    RowAction,
};
pub use cache::{fingerprint, ViewCache};
pub use column::{ColumnSet, ColumnSpec, Renderer, Tone, ViewFragment};
pub use error::{GridError, GridResult};
pub use events::{Event, EventBus, SubscriptionId};
pub use grid::{DataGrid, GridRow, GridView};
pub use pagination::{
    describe, slice, total_pages, windowed_page_numbers, PageItem, Pager, PaginationDescriptor,
    PaginationState,
};
pub use predicate::{Condition, Predicate, PredicateSet};
pub use record::{Record, RecordAccessor, RowKey};
pub use selection::{ExpandedRows, RowMarks, RowSelection};
pub use sort::{locale_cmp, sort, sort_by_state, SortDirection, SortState};
pub use value::FieldValue;
