//! Dashboard aggregation: summary, charts and one page of the case list

use cg_core::pagination::page_bounds;
use cg_core::{
    describe, sort_by_state, DataGrid, GridError, PaginationDescriptor, ResolvedAction, RowMarks,
    SortState, ViewFragment,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::columns::case_grid;
use crate::config::DashboardConfig;
use crate::filter::{apply_filters, CaseFilters};
use crate::model::CaseRecord;
use crate::stats::{aggregate, CaseStats, ChartSeries, StatsDescriptor};
use crate::CasesResult;

/// Everything that selects which cases are listed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub filters: CaseFilters,
    pub sort: SortState,
    pub page: usize,
    pub page_size: usize,
}

impl DashboardQuery {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            filters: CaseFilters::default(),
            sort: config.default_sort.clone(),
            page: 1,
            page_size: config.page_size,
        }
    }
}

/// One listed case with its rendered cells and actions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub key: String,
    pub position: usize,
    pub case: CaseRecord,
    pub cells: Vec<ViewFragment>,
    pub actions: Vec<ResolvedAction>,
    pub selected: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Counts over every loaded case, regardless of filters
    pub stats: CaseStats,
    pub summary: StatsDescriptor,
    pub charts: ChartSeries,
    pub rows: Vec<DashboardRow>,
    /// Derived from the filtered total
    pub pagination: PaginationDescriptor,
    pub filters: CaseFilters,
    pub sort: SortState,
}

struct CasePage<'a> {
    cases: Vec<&'a CaseRecord>,
    offset: usize,
    total_items: usize,
}

/// Builds dashboard views from a raw case collection
#[derive(Debug, Clone)]
pub struct DashboardAggregator {
    grid: DataGrid<CaseRecord>,
    recent_window: Duration,
    chart_days: u32,
}

impl DashboardAggregator {
    pub fn new(config: &DashboardConfig) -> CasesResult<Self> {
        config.validate()?;
        Ok(Self {
            grid: case_grid(config.current_user)?,
            recent_window: config.recent_window()?,
            chart_days: config.chart_days,
        })
    }

    pub fn grid(&self) -> &DataGrid<CaseRecord> {
        &self.grid
    }

    /// Build the view for `query` at instant `now`.
    ///
    /// Summary and charts cover all of `raw`; filtering narrows the list
    /// only. The page is used as given: a page past the end lists nothing.
    pub fn build(
        &self,
        raw: &[CaseRecord],
        query: &DashboardQuery,
        now: DateTime<Utc>,
    ) -> CasesResult<DashboardView> {
        self.build_marked(raw, query, &RowMarks::default(), now)
    }

    /// [`build`](Self::build), with rows flagged from `marks`
    pub fn build_marked(
        &self,
        raw: &[CaseRecord],
        query: &DashboardQuery,
        marks: &RowMarks,
        now: DateTime<Utc>,
    ) -> CasesResult<DashboardView> {
        let page = self.page_of(raw, query)?;
        let stats = aggregate(raw, now, self.recent_window);
        let charts = ChartSeries::compute(raw, now, self.chart_days);

        let total_items = page.total_items;
        let mut grid_rows = self.grid.annotate(&page.cases, page.offset);
        marks.apply(&mut grid_rows);
        let rows = grid_rows
            .into_iter()
            .map(|row| DashboardRow {
                key: row.key,
                position: row.position,
                case: row.record.clone(),
                cells: row.cells,
                actions: row.actions,
                selected: row.selected,
                expanded: row.expanded,
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            raw = raw.len(),
            filtered = total_items,
            page = query.page,
            rows = rows.len(),
            "dashboard view built"
        );

        Ok(DashboardView {
            summary: StatsDescriptor::from(&stats),
            stats,
            charts,
            rows,
            pagination: describe(query.page, query.page_size, total_items),
            filters: query.filters.clone(),
            sort: query.sort.clone(),
        })
    }

    /// Row keys of the cases listed on `query`'s page, in display order
    pub fn page_keys(&self, raw: &[CaseRecord], query: &DashboardQuery) -> CasesResult<Vec<String>> {
        let page = self.page_of(raw, query)?;
        Ok(page
            .cases
            .iter()
            .enumerate()
            .map(|(i, case)| self.grid.accessor().identity(case, page.offset + i))
            .collect())
    }

    /// Filter, sort and slice `raw` down to the cases on `query`'s page
    fn page_of<'a>(&self, raw: &'a [CaseRecord], query: &DashboardQuery) -> CasesResult<CasePage<'a>> {
        if query.page_size == 0 {
            return Err(GridError::InvalidPageSize(0).into());
        }
        if let Some(key) = query.sort.key.as_deref().filter(|_| query.sort.is_active()) {
            self.grid.columns().sortable(key)?;
        }
        let filtered = apply_filters(raw, &query.filters);
        let total_items = filtered.len();
        let sorted = sort_by_state(filtered, &query.sort, self.grid.columns());
        let (start, end) = page_bounds(query.page, query.page_size, total_items);
        Ok(CasePage {
            cases: sorted[start..end].to_vec(),
            offset: start,
            total_items,
        })
    }
}
