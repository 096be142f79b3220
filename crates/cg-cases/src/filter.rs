//! Dashboard filters and the case predicates behind them

use std::fmt;
use std::str::FromStr;

use cg_core::{Predicate, PredicateSet};
use serde::{Deserialize, Serialize};

use crate::model::{CardType, CasePriority, CaseRecord, CaseStatus};
use crate::CasesError;

/// Card-type tab selected at the top of the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryType {
    #[default]
    All,
    DebitCard,
    CreditCard,
    Wallet,
}

impl PrimaryType {
    pub fn card_type(self) -> Option<CardType> {
        match self {
            PrimaryType::All => None,
            PrimaryType::DebitCard => Some(CardType::DebitCard),
            PrimaryType::CreditCard => Some(CardType::CreditCard),
            PrimaryType::Wallet => Some(CardType::Wallet),
        }
    }
}

impl FromStr for PrimaryType {
    type Err = CasesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "ALL" => Ok(PrimaryType::All),
            "DEBIT_CARD" | "DEBIT" => Ok(PrimaryType::DebitCard),
            "CREDIT_CARD" | "CREDIT" => Ok(PrimaryType::CreditCard),
            "WALLET" => Ok(PrimaryType::Wallet),
            _ => Err(CasesError::InvalidFilter(s.to_string())),
        }
    }
}

/// Status dimension of the filter, including the high-priority pseudo-status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    #[default]
    All,
    /// Matches on priority, not status
    HighPriorityOnly,
    Status(CaseStatus),
}

impl StatusFilter {
    pub fn matches(self, record: &CaseRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::HighPriorityOnly => record.priority == CasePriority::High,
            StatusFilter::Status(status) => record.status == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::HighPriorityOnly => f.write_str("HIGH_PRIORITY"),
            StatusFilter::Status(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CasesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        if s.trim().eq_ignore_ascii_case("high_priority") {
            return Ok(StatusFilter::HighPriorityOnly);
        }
        CaseStatus::parse(s)
            .map(StatusFilter::Status)
            .ok_or_else(|| CasesError::InvalidFilter(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriorityFilter {
    #[default]
    All,
    Only(CasePriority),
}

impl PriorityFilter {
    pub fn matches(self, record: &CaseRecord) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(priority) => record.priority == priority,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = CasesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        CasePriority::parse(s)
            .map(PriorityFilter::Only)
            .ok_or_else(|| CasesError::InvalidFilter(s.to_string()))
    }
}

/// Every filter dimension of the case list
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseFilters {
    pub primary_type: PrimaryType,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    /// Case-insensitive substring of id, entity id or assignee
    pub search: Option<String>,
    /// Only cases assigned to this user
    pub assigned_to: Option<u64>,
}

impl CaseFilters {
    pub fn is_empty(&self) -> bool {
        *self == CaseFilters::default()
    }

    /// The active dimensions as a conjunctive predicate set
    pub fn predicate_set(&self) -> PredicateSet<CaseRecord> {
        let mut set = PredicateSet::new()
            .with("type", TypePredicate(self.primary_type))
            .with("status", self.status)
            .with("priority", self.priority);
        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            set.push("search", SearchPredicate::new(needle));
        }
        if let Some(user) = self.assigned_to {
            set.push("assignee", move |record: &CaseRecord| record.assigned_to == Some(user));
        }
        set
    }

    /// Short description for logs and events
    pub fn describe(&self) -> String {
        let mut parts = vec![
            format!("type={:?}", self.primary_type),
            format!("status={}", self.status),
            format!("priority={:?}", self.priority),
        ];
        if let Some(search) = &self.search {
            parts.push(format!("search={search:?}"));
        }
        if let Some(user) = self.assigned_to {
            parts.push(format!("assignee={user}"));
        }
        parts.join(" ")
    }
}

/// Card type of the record equals the selected tab. Records without a card
/// type only pass `All`.
#[derive(Debug, Clone, Copy)]
pub struct TypePredicate(pub PrimaryType);

impl Predicate<CaseRecord> for TypePredicate {
    fn evaluate(&self, record: &CaseRecord) -> bool {
        match self.0.card_type() {
            None => true,
            Some(card_type) => record.card_type == Some(card_type),
        }
    }
}

impl Predicate<CaseRecord> for StatusFilter {
    fn evaluate(&self, record: &CaseRecord) -> bool {
        self.matches(record)
    }
}

impl Predicate<CaseRecord> for PriorityFilter {
    fn evaluate(&self, record: &CaseRecord) -> bool {
        self.matches(record)
    }
}

#[derive(Debug, Clone)]
pub struct SearchPredicate {
    needle: String,
}

impl SearchPredicate {
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
        }
    }
}

impl Predicate<CaseRecord> for SearchPredicate {
    fn evaluate(&self, record: &CaseRecord) -> bool {
        record.id.to_string().contains(&self.needle)
            || record.entity_id.to_string().contains(&self.needle)
            || record
                .assigned_to
                .is_some_and(|user| user.to_string().contains(&self.needle))
    }
}

/// Records passing every active filter, in input order
pub fn apply_filters<'a>(records: &'a [CaseRecord], filters: &CaseFilters) -> Vec<&'a CaseRecord> {
    let filtered = filters.predicate_set().apply(records);
    tracing::debug!(
        input = records.len(),
        output = filtered.len(),
        filters = %filters.describe(),
        "applied case filters"
    );
    filtered
}
