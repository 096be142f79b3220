//! Stateful dashboard controller with memoized views

use std::sync::Arc;

use cg_core::events::{FiltersChanged, PageChanged, RecordsReplaced, SortChanged};
use cg_core::{fingerprint, EventBus, GridResult, Pager, RowMarks, RowSelection, SortState, ViewCache};
use chrono::{DateTime, Utc};

use crate::config::DashboardConfig;
use crate::dashboard::{DashboardAggregator, DashboardQuery, DashboardView};
use crate::filter::{apply_filters, CaseFilters, PriorityFilter, PrimaryType, StatusFilter};
use crate::model::CaseRecord;
use crate::CasesResult;

/// Holds the loaded cases and the user's current query.
///
/// Filter changes reset the page to 1; sort changes keep it. Selected and
/// expanded rows are tracked by case key. Views are memoized on (records
/// version, query, marks version, now).
pub struct DashboardSession {
    records: Vec<CaseRecord>,
    version: u64,
    query: DashboardQuery,
    marks: RowMarks,
    marks_version: u64,
    aggregator: DashboardAggregator,
    cache: ViewCache<DashboardView>,
    events: EventBus,
}

impl DashboardSession {
    pub fn new(records: Vec<CaseRecord>, config: &DashboardConfig) -> CasesResult<Self> {
        Ok(Self {
            records,
            version: 0,
            query: DashboardQuery::from_config(config),
            marks: RowMarks::new(),
            marks_version: 0,
            aggregator: DashboardAggregator::new(config)?,
            cache: ViewCache::new(config.cache_capacity),
            events: EventBus::new(),
        })
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn query(&self) -> &DashboardQuery {
        &self.query
    }

    pub fn filters(&self) -> &CaseFilters {
        &self.query.filters
    }

    pub fn page(&self) -> usize {
        self.query.page
    }

    /// Bus carrying this session's change notifications
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn selection(&self) -> &RowSelection {
        &self.marks.selection
    }

    /// Swap in a freshly loaded collection. Selection and expansion are
    /// dropped and the page is clamped to the new filtered total.
    pub fn replace_records(&mut self, records: Vec<CaseRecord>) {
        let count = records.len();
        self.records = records;
        self.version += 1;
        self.update_marks(RowMarks::clear);
        self.cache.clear();
        self.events.publish(RecordsReplaced { count });
        self.set_page(self.query.page);
    }

    /// Summary tile click: selects `status`, or clears it when it is
    /// already selected
    pub fn card_click(&mut self, status: StatusFilter) {
        let next = if self.query.filters.status == status {
            StatusFilter::All
        } else {
            status
        };
        self.update_filters(|filters| filters.status = next);
    }

    pub fn set_primary_type(&mut self, primary_type: PrimaryType) {
        self.update_filters(|filters| filters.primary_type = primary_type);
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.update_filters(|filters| filters.status = status);
    }

    pub fn set_priority(&mut self, priority: PriorityFilter) {
        self.update_filters(|filters| filters.priority = priority);
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.update_filters(|filters| filters.search = search);
    }

    pub fn set_assigned_to(&mut self, user: Option<u64>) {
        self.update_filters(|filters| filters.assigned_to = user);
    }

    pub fn set_filters(&mut self, filters: CaseFilters) {
        self.update_filters(|current| *current = filters);
    }

    fn update_filters(&mut self, change: impl FnOnce(&mut CaseFilters)) {
        change(&mut self.query.filters);
        let from = self.query.page;
        self.query.page = 1;
        self.events.publish(FiltersChanged {
            description: self.query.filters.describe(),
        });
        if from != 1 {
            self.events.publish(PageChanged { from, to: 1 });
        }
    }

    /// Header click: the same key flips direction, a new key starts
    /// descending. The page is kept.
    pub fn change_sort(&mut self, key: &str) -> CasesResult<()> {
        self.aggregator.grid().columns().sortable(key)?;
        let next = self.query.sort.toggled(key);
        self.apply_sort(next);
        Ok(())
    }

    /// Replace the sort outright. The page is kept.
    pub fn set_sort(&mut self, sort: SortState) -> CasesResult<()> {
        if let Some(key) = sort.key.as_deref() {
            self.aggregator.grid().columns().sortable(key)?;
        }
        self.apply_sort(sort);
        Ok(())
    }

    fn apply_sort(&mut self, sort: SortState) {
        self.query.sort = sort;
        self.events.publish(SortChanged {
            key: self.query.sort.key.clone(),
            direction: self.query.sort.direction,
        });
    }

    /// Row checkbox; returns whether the case is now selected
    pub fn toggle_selected(&mut self, key: &str) -> bool {
        let mut selected = false;
        self.update_marks(|marks| selected = marks.selection.toggle(key));
        selected
    }

    /// Header checkbox: select every case on the current page, or deselect
    /// them when all already are. Returns whether the page is now selected.
    pub fn toggle_page_selected(&mut self) -> CasesResult<bool> {
        let keys = self.aggregator.page_keys(&self.records, &self.query)?;
        let mut all = false;
        self.update_marks(|marks| {
            marks.selection.toggle_all(keys.iter().map(String::as_str));
            all = marks.selection.is_all_selected(keys.iter().map(String::as_str));
        });
        Ok(all)
    }

    pub fn clear_selection(&mut self) {
        self.update_marks(|marks| marks.selection.clear());
    }

    /// Open or close a case's detail panel; returns whether it is now open
    pub fn toggle_expanded(&mut self, key: &str) -> bool {
        let mut expanded = false;
        self.update_marks(|marks| expanded = marks.expanded.toggle(key));
        expanded
    }

    /// Loaded cases whose key is selected, in load order
    pub fn selected_cases(&self) -> Vec<&CaseRecord> {
        let accessor = self.aggregator.grid().accessor();
        self.records
            .iter()
            .enumerate()
            .filter(|(i, case)| self.marks.selection.is_selected(&accessor.identity(case, *i)))
            .map(|(_, case)| case)
            .collect()
    }

    fn update_marks(&mut self, change: impl FnOnce(&mut RowMarks)) {
        change(&mut self.marks);
        self.marks_version += 1;
    }

    /// Cases passing the current filters
    pub fn filtered_total(&self) -> usize {
        apply_filters(&self.records, &self.query.filters).len()
    }

    fn pager(&self) -> GridResult<Pager> {
        let mut pager = Pager::new(self.query.page_size)?;
        pager.set_total_items(self.filtered_total());
        pager.seek_to(self.query.page);
        Ok(pager)
    }

    fn move_to(&mut self, to: usize) {
        let from = self.query.page;
        self.query.page = to;
        if from != to {
            self.events.publish(PageChanged { from, to });
        }
    }

    /// Jump to `page`, clamped into the filtered page range. Returns the
    /// page landed on.
    pub fn set_page(&mut self, page: usize) -> usize {
        let landed = match self.pager() {
            Ok(mut pager) => pager.seek_to(page),
            Err(_) => 1,
        };
        if landed != page {
            tracing::warn!(requested = page, landed, "page request clamped");
        }
        self.move_to(landed);
        landed
    }

    pub fn next_page(&mut self) -> CasesResult<usize> {
        let page = self.pager()?.next()?;
        self.move_to(page);
        Ok(page)
    }

    pub fn previous_page(&mut self) -> CasesResult<usize> {
        let page = self.pager()?.previous()?;
        self.move_to(page);
        Ok(page)
    }

    /// Change rows per page, keeping the first visible case on screen
    pub fn set_page_size(&mut self, page_size: usize) -> CasesResult<()> {
        let mut pager = self.pager()?;
        pager.set_page_size(page_size)?;
        self.query.page_size = page_size;
        self.move_to(pager.page());
        Ok(())
    }

    /// Current view at instant `now`, recomputed only when an input changed
    pub fn view(&self, now: DateTime<Utc>) -> CasesResult<Arc<DashboardView>> {
        let key = fingerprint(&(
            self.version,
            &self.query,
            self.marks_version,
            now.timestamp_millis(),
        ));
        if let Some(view) = self.cache.get(key) {
            tracing::trace!(key, "dashboard view served from cache");
            return Ok(view);
        }
        let view = self
            .aggregator
            .build_marked(&self.records, &self.query, &self.marks, now)?;
        Ok(self.cache.put(key, view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{case, HOUR_MS};
    use crate::model::{CasePriority, CaseStatus};
    use crate::CasesError;
    use cg_core::{GridError, SortDirection};
    use chrono::TimeZone;
    use parking_lot::Mutex;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn session(n: u64) -> DashboardSession {
        let now_ms = now().timestamp_millis();
        let records = (1..=n)
            .map(|i| {
                let priority = if i % 4 == 0 { CasePriority::High } else { CasePriority::Low };
                case(i, CaseStatus::ALL[(i % 5) as usize], priority, now_ms - i as i64 * HOUR_MS)
            })
            .collect();
        DashboardSession::new(records, &DashboardConfig::default()).unwrap()
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut session = session(45);
        assert_eq!(session.set_page(3), 3);
        session.set_priority(PriorityFilter::Only(CasePriority::Low));
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_sort_change_keeps_page() {
        let mut session = session(45);
        session.set_page(3);
        session.change_sort("created").unwrap();
        assert_eq!(session.page(), 3);
        assert_eq!(session.query().sort, SortState::ascending("created"));
        session.change_sort("status").unwrap();
        assert_eq!(session.query().sort.direction, Some(SortDirection::Descending));
        assert!(matches!(
            session.change_sort("entityId"),
            Err(CasesError::Grid(GridError::UnknownColumn(_)))
        ));

        session.set_sort(SortState::ascending("priority")).unwrap();
        assert_eq!(session.page(), 3);
        session.set_sort(SortState::none()).unwrap();
        assert!(!session.query().sort.is_active());
    }

    #[test]
    fn test_card_click_toggles() {
        let mut session = session(10);
        session.card_click(StatusFilter::HighPriorityOnly);
        assert_eq!(session.filters().status, StatusFilter::HighPriorityOnly);
        session.card_click(StatusFilter::HighPriorityOnly);
        assert_eq!(session.filters().status, StatusFilter::All);
    }

    #[test]
    fn test_set_page_clamps_to_filtered_total() {
        let mut session = session(45);
        assert_eq!(session.set_page(99), 5);
        assert_eq!(session.set_page(0), 1);
        session.set_status(StatusFilter::HighPriorityOnly); // 11 cases
        assert_eq!(session.set_page(3), 2);
        assert_eq!(session.next_page().unwrap_err().to_string(), "already at last page");
        assert_eq!(session.previous_page().unwrap(), 1);
    }

    #[test]
    fn test_page_size_change_keeps_first_row() {
        let mut session = session(45);
        session.set_page(3); // rows 21..=30
        session.set_page_size(20).unwrap();
        assert_eq!(session.page(), 2);
        assert!(session.set_page_size(0).is_err());
    }

    #[test]
    fn test_view_is_memoized() {
        let mut session = session(30);
        let first = session.view(now()).unwrap();
        let again = session.view(now()).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        let later = session.view(now() + chrono::Duration::minutes(1)).unwrap();
        assert!(!Arc::ptr_eq(&first, &later));

        session.set_page(2);
        let paged = session.view(now()).unwrap();
        assert_eq!(paged.pagination.page, 2);

        session.replace_records(Vec::new());
        let empty = session.view(now()).unwrap();
        assert_eq!(empty.stats.total, 0);
        assert_eq!(empty.pagination.page, 1);
    }

    #[test]
    fn test_selection_shows_in_view() {
        let mut session = session(30);
        let first = session.view(now()).unwrap();
        assert!(first.rows.iter().all(|r| !r.selected));

        assert!(session.toggle_selected("2"));
        assert!(session.toggle_expanded("3"));
        let marked = session.view(now()).unwrap();
        assert!(!Arc::ptr_eq(&first, &marked));
        assert!(marked.rows[1].selected);
        assert!(marked.rows[2].expanded);
        assert_eq!(session.selected_cases().iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);

        // Selection survives paging
        session.set_page(2);
        session.set_page(1);
        assert!(session.view(now()).unwrap().rows[1].selected);

        assert!(!session.toggle_selected("2"));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_page_selection_toggle() {
        let mut session = session(30);
        session.set_page(2);
        assert!(session.toggle_page_selected().unwrap());
        assert_eq!(session.selection().len(), 10);
        assert!(session.view(now()).unwrap().rows.iter().all(|r| r.selected));
        session.set_page(1);
        assert!(session.view(now()).unwrap().rows.iter().all(|r| !r.selected));

        session.set_page(2);
        assert!(!session.toggle_page_selected().unwrap());
        assert!(session.selection().is_empty());

        session.toggle_selected("5");
        session.replace_records(Vec::new());
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_events_published() {
        let mut session = session(45);
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        session
            .events()
            .subscribe(move |change: &PageChanged| sink.lock().push((change.from, change.to)));

        session.set_page(4);
        session.set_search(Some("1".into()));
        session.change_sort("priority").unwrap();

        assert_eq!(*log.lock(), vec![(1, 4), (4, 1)]);
    }
}
