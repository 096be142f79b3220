//! Data grid: sort, paginate and annotate records into a view model

use std::fmt;

use serde::Serialize;

use crate::action::{resolve_for_record, ResolvedAction, RowAction};
use crate::column::{ColumnSet, ViewFragment};
use crate::error::{GridError, GridResult};
use crate::pagination::{describe, page_bounds, PaginationDescriptor};
use crate::record::{Record, RecordAccessor};
use crate::sort::{sort_by_state, SortState};

/// One visible row, ready for a renderer
#[derive(Debug, Clone, Serialize)]
pub struct GridRow<'a, R> {
    /// Stable identity from the row key, or the position fallback
    pub key: String,
    /// Position within the sorted (unpaginated) collection
    pub position: usize,
    #[serde(skip)]
    pub record: &'a R,
    pub cells: Vec<ViewFragment>,
    pub actions: Vec<ResolvedAction>,
    /// Checkbox state, set by [`RowMarks::apply`](crate::selection::RowMarks::apply)
    pub selected: bool,
    /// Detail panel open
    pub expanded: bool,
}

/// Output of [`DataGrid::view`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView<'a, R> {
    pub rows: Vec<GridRow<'a, R>>,
    pub pagination: Option<PaginationDescriptor>,
    pub total_items: usize,
}

/// Column schema, row actions and identity rule for one table
pub struct DataGrid<R> {
    columns: ColumnSet<R>,
    actions: Vec<RowAction<R>>,
    accessor: RecordAccessor<R>,
}

impl<R> Clone for DataGrid<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            actions: self.actions.clone(),
            accessor: self.accessor.clone(),
        }
    }
}

impl<R> fmt::Debug for DataGrid<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataGrid")
            .field("columns", &self.columns)
            .field("actions", &self.actions)
            .field("accessor", &self.accessor)
            .finish()
    }
}

impl<R: Record> DataGrid<R> {
    pub fn new(columns: ColumnSet<R>) -> Self {
        Self {
            columns,
            actions: Vec::new(),
            accessor: RecordAccessor::default(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<RowAction<R>>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_accessor(mut self, accessor: RecordAccessor<R>) -> Self {
        self.accessor = accessor;
        self
    }

    pub fn columns(&self) -> &ColumnSet<R> {
        &self.columns
    }

    pub fn actions(&self) -> &[RowAction<R>] {
        &self.actions
    }

    pub fn accessor(&self) -> &RecordAccessor<R> {
        &self.accessor
    }

    /// Sort, then optionally paginate, then annotate the visible rows.
    ///
    /// Without `paging` every record is shown and no descriptor is produced.
    /// An active sort on a non-sortable or unknown column is rejected.
    pub fn view<'a>(
        &self,
        records: &'a [R],
        sort: &SortState,
        paging: Option<(usize, usize)>,
    ) -> GridResult<GridView<'a, R>> {
        if let Some(key) = sort.key.as_deref().filter(|_| sort.is_active()) {
            self.columns.sortable(key)?;
        }
        let total_items = records.len();
        let sorted = sort_by_state(records.iter().collect(), sort, &self.columns);

        let (rows, pagination) = match paging {
            Some((_, 0)) => return Err(GridError::InvalidPageSize(0)),
            Some((page, page_size)) => {
                let (start, end) = page_bounds(page, page_size, total_items);
                (
                    self.annotate(&sorted[start..end], start),
                    Some(describe(page, page_size, total_items)),
                )
            }
            None => (self.annotate(&sorted, 0), None),
        };

        tracing::debug!(
            total_items,
            visible = rows.len(),
            sort_key = ?sort.key,
            "grid view built"
        );
        Ok(GridView {
            rows,
            pagination,
            total_items,
        })
    }

    /// Annotate already ordered records; `offset` is the position of the
    /// first one within the full collection
    pub fn annotate<'a>(&self, records: &[&'a R], offset: usize) -> Vec<GridRow<'a, R>> {
        records
            .iter()
            .enumerate()
            .map(|(i, &record)| {
                let position = offset + i;
                GridRow {
                    key: self.accessor.identity(record, position),
                    position,
                    record,
                    cells: self.columns.render_row(record, position),
                    actions: resolve_for_record(&self.actions, record),
                    selected: false,
                    expanded: false,
                }
            })
            .collect()
    }
}
