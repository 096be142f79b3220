//! Case records as delivered by the case list API

use std::fmt;

use cg_core::{FieldValue, Record};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Workflow status of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    New,
    InProgress,
    Resolved,
    Escalated,
    Closed,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 5] = [
        CaseStatus::New,
        CaseStatus::InProgress,
        CaseStatus::Resolved,
        CaseStatus::Escalated,
        CaseStatus::Closed,
    ];

    /// Wire form, e.g. `IN_PROGRESS`
    pub fn as_str(self) -> &'static str {
        match self {
            CaseStatus::New => "NEW",
            CaseStatus::InProgress => "IN_PROGRESS",
            CaseStatus::Resolved => "RESOLVED",
            CaseStatus::Escalated => "ESCALATED",
            CaseStatus::Closed => "CLOSED",
        }
    }

    /// Human-readable label, e.g. `In Progress`
    pub fn label(self) -> &'static str {
        match self {
            CaseStatus::New => "New",
            CaseStatus::InProgress => "In Progress",
            CaseStatus::Resolved => "Resolved",
            CaseStatus::Escalated => "Escalated",
            CaseStatus::Closed => "Closed",
        }
    }

    /// Parse the wire form, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasePriority {
    High,
    Medium,
    Low,
}

impl CasePriority {
    pub const ALL: [CasePriority; 3] = [CasePriority::High, CasePriority::Medium, CasePriority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            CasePriority::High => "High",
            CasePriority::Medium => "Medium",
            CasePriority::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for CasePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment instrument a case was raised against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    DebitCard,
    CreditCard,
    Wallet,
}

impl CardType {
    pub fn as_str(self) -> &'static str {
        match self {
            CardType::DebitCard => "DEBIT_CARD",
            CardType::CreditCard => "CREDIT_CARD",
            CardType::Wallet => "WALLET",
        }
    }
}

/// One case summary row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: u64,
    pub entity_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<u64>,
    pub status: CaseStatus,
    pub priority: CasePriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<u64>,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CardType>,
}

impl CaseRecord {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created_at).single()
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.updated_at).single()
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == CasePriority::High
    }
}

impl Record for CaseRecord {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id.into(),
            "entityId" => self.entity_id.into(),
            "customerId" => self.customer_id.into(),
            "status" => self.status.as_str().into(),
            "priority" => self.priority.as_str().into(),
            "assignedTo" => self.assigned_to.into(),
            "createdAt" => self.created_at.into(),
            "updatedAt" => self.updated_at.into(),
            "cardType" => self.card_type.map(CardType::as_str).into(),
            _ => FieldValue::Null,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub const HOUR_MS: i64 = 3_600_000;

    /// Unassigned case without card type, never updated
    pub fn case(id: u64, status: CaseStatus, priority: CasePriority, created_at: i64) -> CaseRecord {
        CaseRecord {
            id,
            entity_id: 1000 + id,
            customer_id: None,
            status,
            priority,
            assigned_to: None,
            created_at,
            updated_at: created_at,
            card_type: None,
        }
    }
}
