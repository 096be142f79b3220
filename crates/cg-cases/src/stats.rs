//! Summary statistics and chart series over the unfiltered case collection

use chrono::{DateTime, Duration, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{CasePriority, CaseRecord, CaseStatus};

/// One count per status; every case lands in exactly one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub new: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub escalated: usize,
    pub closed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: CaseStatus) -> usize {
        match status {
            CaseStatus::New => self.new,
            CaseStatus::InProgress => self.in_progress,
            CaseStatus::Resolved => self.resolved,
            CaseStatus::Escalated => self.escalated,
            CaseStatus::Closed => self.closed,
        }
    }

    fn bump(&mut self, status: CaseStatus) {
        let slot = match status {
            CaseStatus::New => &mut self.new,
            CaseStatus::InProgress => &mut self.in_progress,
            CaseStatus::Resolved => &mut self.resolved,
            CaseStatus::Escalated => &mut self.escalated,
            CaseStatus::Closed => &mut self.closed,
        };
        *slot += 1;
    }

    pub fn sum(&self) -> usize {
        self.new + self.in_progress + self.resolved + self.escalated + self.closed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: CasePriority) -> usize {
        match priority {
            CasePriority::High => self.high,
            CasePriority::Medium => self.medium,
            CasePriority::Low => self.low,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStats {
    pub total: usize,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
    pub high_priority: usize,
    /// Cases created within the recent window ending at the aggregation instant
    pub created_recently: usize,
}

/// Count cases in a single pass.
///
/// `now` is the aggregation instant; a case counts as recently created when
/// `created_at >= now - recent_window`. A window reaching past the earliest
/// representable instant counts every case.
pub fn aggregate<'a>(
    records: impl IntoIterator<Item = &'a CaseRecord>,
    now: DateTime<Utc>,
    recent_window: Duration,
) -> CaseStats {
    let cutoff = now
        .checked_sub_signed(recent_window)
        .map_or(i64::MIN, |start| start.timestamp_millis());
    let mut stats = CaseStats::default();

    for record in records {
        stats.total += 1;
        stats.by_status.bump(record.status);
        match record.priority {
            CasePriority::High => {
                stats.by_priority.high += 1;
                stats.high_priority += 1;
            }
            CasePriority::Medium => stats.by_priority.medium += 1,
            CasePriority::Low => stats.by_priority.low += 1,
        }
        if record.created_at >= cutoff {
            stats.created_recently += 1;
        }
    }
    stats
}

/// Numbers shown on the dashboard summary tiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDescriptor {
    pub total: usize,
    /// Recently created cases, not the NEW status bucket
    pub new: usize,
    pub high_priority: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub escalated: usize,
}

impl From<&CaseStats> for StatsDescriptor {
    fn from(stats: &CaseStats) -> Self {
        Self {
            total: stats.total,
            new: stats.created_recently,
            high_priority: stats.high_priority,
            in_progress: stats.by_status.in_progress,
            resolved: stats.by_status.resolved,
            escalated: stats.by_status.escalated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSlice {
    pub status: CaseStatus,
    pub label: String,
    pub count: usize,
    /// Share of all cases, rounded to a whole percent
    pub percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Data behind the dashboard charts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Statuses present in the data, in order of first appearance
    pub status_distribution: Vec<StatusSlice>,
    /// Cases created per UTC day, oldest first, ending on the day of `now`
    pub daily_created: Vec<DailyCount>,
}

impl ChartSeries {
    pub fn compute(records: &[CaseRecord], now: DateTime<Utc>, days: u32) -> Self {
        let mut by_status: IndexMap<CaseStatus, usize> = IndexMap::new();
        for record in records {
            *by_status.entry(record.status).or_default() += 1;
        }
        let total = records.len();
        let status_distribution = by_status
            .into_iter()
            .map(|(status, count)| StatusSlice {
                status,
                label: status.label().to_string(),
                count,
                percent: ((count as f64 / total as f64) * 100.0).round() as u32,
            })
            .collect();

        let today = now.date_naive();
        let mut daily: IndexMap<NaiveDate, usize> = (0..days)
            .rev()
            .filter_map(|back| today.checked_sub_days(chrono::Days::new(u64::from(back))))
            .map(|date| (date, 0))
            .collect();
        for date in records.iter().filter_map(|r| r.created()).map(|t| t.date_naive()) {
            if let Some(count) = daily.get_mut(&date) {
                *count += 1;
            }
        }
        let daily_created = daily
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect();

        Self {
            status_distribution,
            daily_created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{case, HOUR_MS};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_collection() {
        let stats = aggregate(&Vec::<CaseRecord>::new(),now(), Duration::hours(24));
        assert_eq!(stats, CaseStats::default());
        assert_eq!(stats.by_status.sum(), stats.total);
        let charts = ChartSeries::compute(&[], now(), 7);
        assert!(charts.status_distribution.is_empty());
        assert_eq!(charts.daily_created.len(), 7);
    }

    #[test]
    fn test_seven_record_scenario() {
        use CasePriority::*;
        use CaseStatus::*;
        let statuses = [New, New, InProgress, Resolved, Resolved, Escalated, New];
        let priorities = [High, Low, Medium, Low, High, High, Medium];
        let now_ms = now().timestamp_millis();
        let records: Vec<_> = statuses
            .iter()
            .zip(priorities)
            .enumerate()
            .map(|(i, (&status, priority))| case(i as u64 + 1, status, priority, now_ms - (i as i64) * 10 * HOUR_MS))
            .collect();

        let stats = aggregate(&records, now(), Duration::hours(24));
        assert_eq!(stats.total, 7);
        assert_eq!(stats.by_status.new, 3);
        assert_eq!(stats.by_status.in_progress, 1);
        assert_eq!(stats.by_status.resolved, 2);
        assert_eq!(stats.by_status.escalated, 1);
        assert_eq!(stats.by_status.closed, 0);
        assert_eq!(stats.high_priority, 3);
        assert_eq!(stats.by_priority.get(Medium), 2);
        // created 0, 10 and 20 hours ago
        assert_eq!(stats.created_recently, 3);

        let tiles = StatsDescriptor::from(&stats);
        assert_eq!(tiles.new, 3);
        assert_eq!(tiles.escalated, 1);
    }

    #[test]
    fn test_recent_window_is_relative_to_now() {
        let now_ms = now().timestamp_millis();
        let records = vec![case(1, CaseStatus::Resolved, CasePriority::Low, now_ms - 30 * HOUR_MS)];
        assert_eq!(aggregate(&records, now(), Duration::hours(24)).created_recently, 0);
        let earlier = now() - Duration::hours(10);
        assert_eq!(aggregate(&records, earlier, Duration::hours(24)).created_recently, 1);
    }

    #[test]
    fn test_window_past_earliest_instant_counts_everything() {
        let now_ms = now().timestamp_millis();
        let records = vec![
            case(1, CaseStatus::New, CasePriority::Low, now_ms),
            case(2, CaseStatus::New, CasePriority::Low, i64::MIN),
        ];
        let huge = Duration::try_hours(2_000_000_000_000).unwrap();
        assert_eq!(aggregate(&records, now(), huge).created_recently, 2);
    }

    #[test]
    fn test_chart_series() {
        let now_ms = now().timestamp_millis();
        let records = vec![
            case(1, CaseStatus::Resolved, CasePriority::Low, now_ms),
            case(2, CaseStatus::New, CasePriority::Low, now_ms - 24 * HOUR_MS),
            case(3, CaseStatus::Resolved, CasePriority::Low, now_ms - 24 * HOUR_MS),
            case(4, CaseStatus::Closed, CasePriority::Low, now_ms - 30 * 24 * HOUR_MS),
        ];
        let charts = ChartSeries::compute(&records, now(), 7);

        let labels: Vec<_> = charts.status_distribution.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Resolved", "New", "Closed"]);
        assert_eq!(charts.status_distribution[0].count, 2);
        assert_eq!(charts.status_distribution[0].percent, 50);

        assert_eq!(charts.daily_created.len(), 7);
        assert_eq!(charts.daily_created[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(charts.daily_created[6].count, 1);
        assert_eq!(charts.daily_created[5].count, 2);
        assert_eq!(charts.daily_created.iter().map(|d| d.count).sum::<usize>(), 3);
    }

    proptest! {
        #[test]
        fn prop_status_buckets_sum_to_total(
            statuses in prop::collection::vec(prop::sample::select(CaseStatus::ALL.to_vec()), 0..60)
        ) {
            let records: Vec<_> = statuses
                .into_iter()
                .enumerate()
                .map(|(i, status)| case(i as u64, status, CasePriority::Medium, 0))
                .collect();
            let stats = aggregate(&records, now(), Duration::hours(24));
            prop_assert_eq!(stats.by_status.sum(), stats.total);
            prop_assert_eq!(stats.total, records.len());
        }
    }
}
