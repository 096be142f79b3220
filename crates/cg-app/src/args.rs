use std::path::PathBuf;

use cg_cases::{PriorityFilter, PrimaryType, StatusFilter};
use cg_core::SortDirection;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "casegrid")]
#[command(about = "Filter, sort and page fraud-review case lists", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dashboard configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show summary tiles, charts and one page of the case list
    #[command(alias = "d")]
    Dashboard(DashboardArgs),

    /// Show summary counts only
    Stats {
        /// Case list JSON (response document or bare array)
        file: PathBuf,

        /// Aggregation instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Case list JSON (response document or bare array)
    pub file: PathBuf,

    /// Card type tab: all, debit_card, credit_card, wallet
    #[arg(long = "type", default_value = "all")]
    pub primary_type: PrimaryType,

    /// Status filter: all, high_priority, or a status such as in_progress
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// Priority filter: all, high, medium, low
    #[arg(long, default_value = "all")]
    pub priority: PriorityFilter,

    /// Match case id, entity id or assignee
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only cases assigned to this user id
    #[arg(long, conflicts_with = "mine")]
    pub assignee: Option<u64>,

    /// Only cases assigned to the configured current user
    #[arg(long)]
    pub mine: bool,

    /// Sort column: created, status, priority
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction
    #[arg(long, value_enum, default_value_t = Order::Desc, requires = "sort")]
    pub order: Order,

    /// Page to show (clamped into range)
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page; defaults to the configured page size
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Mark a case as selected (repeatable)
    #[arg(long = "select", value_name = "CASE_ID")]
    pub selected: Vec<String>,

    /// Select every case on the shown page
    #[arg(long)]
    pub select_page: bool,

    /// Show the detail line of a case (repeatable)
    #[arg(long = "expand", value_name = "CASE_ID")]
    pub expanded: Vec<String>,

    /// Aggregation instant (RFC 3339); defaults to the current time
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl From<Order> for SortDirection {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => SortDirection::Ascending,
            Order::Desc => SortDirection::Descending,
        }
    }
}
