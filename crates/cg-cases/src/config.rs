//! Dashboard configuration

use std::fs;
use std::path::Path;

use cg_core::SortState;
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::columns::case_columns;
use crate::{CasesError, CasesResult};

/// Upper bound for `recent_window_hours` (one hundred years)
pub const MAX_RECENT_WINDOW_HOURS: i64 = 24 * 365 * 100;

/// Upper bound for `chart_days`
pub const MAX_CHART_DAYS: u32 = 366;

/// Tunables of the dashboard pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows per page of the case list
    pub page_size: usize,

    /// Window for the "new cases" tile, in hours before the aggregation instant
    pub recent_window_hours: i64,

    /// Number of days in the created-per-day chart
    pub chart_days: u32,

    /// Sort applied when a session starts
    pub default_sort: SortState,

    /// Memoized views kept per session; 0 disables memoization
    pub cache_capacity: usize,

    /// User id behind "Assign to me" and the my-cases filter
    pub current_user: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            recent_window_hours: 24,
            chart_days: 7,
            default_sort: SortState::descending("created"),
            cache_capacity: 32,
            current_user: None,
        }
    }
}

impl DashboardConfig {
    /// Load and validate a configuration file. Missing keys take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> CasesResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), ?config, "loaded dashboard config");
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> CasesResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and that the default sort names a sortable column
    pub fn validate(&self) -> CasesResult<()> {
        if self.page_size == 0 {
            return Err(CasesError::InvalidConfig("page_size must be at least 1".into()));
        }
        if !(1..=MAX_RECENT_WINDOW_HOURS).contains(&self.recent_window_hours) {
            return Err(CasesError::InvalidConfig(format!(
                "recent_window_hours must be between 1 and {MAX_RECENT_WINDOW_HOURS}"
            )));
        }
        if !(1..=MAX_CHART_DAYS).contains(&self.chart_days) {
            return Err(CasesError::InvalidConfig(format!(
                "chart_days must be between 1 and {MAX_CHART_DAYS}"
            )));
        }
        if let Some(key) = &self.default_sort.key {
            case_columns()?.sortable(key).map_err(|_| {
                CasesError::InvalidConfig(format!("default_sort key '{key}' is not sortable"))
            })?;
        }
        Ok(())
    }

    pub fn recent_window(&self) -> CasesResult<Duration> {
        Duration::try_hours(self.recent_window_hours).ok_or_else(|| {
            CasesError::InvalidConfig(format!(
                "recent_window_hours {} is out of range",
                self.recent_window_hours
            ))
        })
    }

    pub fn to_json_pretty(&self) -> CasesResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_core::SortDirection;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.recent_window().unwrap(), Duration::hours(24));
        assert_eq!(config.default_sort.direction, Some(SortDirection::Descending));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = DashboardConfig::from_json_str(
            r#"{"page_size": 25, "default_sort": {"key": "priority", "direction": "asc"}}"#,
        )
        .unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.chart_days, 7);
        assert_eq!(config.default_sort, SortState::ascending("priority"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{"page_size": 0}"#,
            r#"{"recent_window_hours": 0}"#,
            r#"{"chart_days": 0}"#,
            r#"{"chart_days": 4000000000}"#,
            r#"{"recent_window_hours": 2000000000000}"#,
            r#"{"recent_window_hours": 9000000000000000000}"#,
            r#"{"default_sort": {"key": "entityId", "direction": "asc"}}"#,
        ] {
            assert!(
                matches!(DashboardConfig::from_json_str(json), Err(CasesError::InvalidConfig(_))),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn test_window_outside_chrono_range_is_an_error() {
        let config = DashboardConfig {
            recent_window_hours: 9_000_000_000_000_000_000,
            ..Default::default()
        };
        assert!(matches!(config.recent_window(), Err(CasesError::InvalidConfig(_))));

        let longest = DashboardConfig {
            recent_window_hours: MAX_RECENT_WINDOW_HOURS,
            ..Default::default()
        };
        assert!(longest.validate().is_ok());
        assert_eq!(
            longest.recent_window().unwrap(),
            Duration::hours(MAX_RECENT_WINDOW_HOURS)
        );
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("casegrid-config-{}.json", std::process::id()));
        let config = DashboardConfig {
            current_user: Some(3),
            ..Default::default()
        };
        fs::write(&path, config.to_json_pretty().unwrap()).unwrap();
        let loaded = DashboardConfig::from_json_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
