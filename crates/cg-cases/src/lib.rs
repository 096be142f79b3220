//! Case domain for the fraud-review dashboard
//!
//! Case records, the list API contract, dashboard filters, summary
//! statistics and the dashboard view pipeline built on `cg-core`.

pub mod api;
pub mod columns;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod format;
pub mod model;
pub mod session;
pub mod stats;

use cg_core::GridError;
use thiserror::Error;

// Re-exports
pub use api::{load_cases, parse_cases, CaseListParams, CaseListResponse, PageInfo};
pub use columns::{case_actions, case_columns, case_grid};
pub use config::DashboardConfig;
pub use dashboard::{DashboardAggregator, DashboardQuery, DashboardRow, DashboardView};
pub use filter::{apply_filters, CaseFilters, PriorityFilter, PrimaryType, StatusFilter};
pub use model::{CardType, CasePriority, CaseRecord, CaseStatus};
pub use session::DashboardSession;
pub use stats::{aggregate, CaseStats, ChartSeries, StatsDescriptor};

/// Errors that can occur in case operations
#[derive(Error, Debug)]
pub enum CasesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid filter value '{0}'")]
    InvalidFilter(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub type CasesResult<T> = Result<T, CasesError>;
