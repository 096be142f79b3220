//! Case list API contract and JSON loading

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{CasePriority, CaseRecord, CaseStatus};
use crate::CasesResult;

/// Query parameters of the case list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseListParams {
    pub page: usize,
    pub page_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<CasePriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<cg_core::SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<u64>,
}

impl Default for CaseListParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            status: None,
            priority: None,
            search: None,
            sort_by: None,
            sort_order: None,
            assigned_to: None,
        }
    }
}

/// Server-side pagination block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseListResponse {
    pub data: Vec<CaseRecord>,
    pub pagination: PageInfo,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CaseDocument {
    Response(CaseListResponse),
    Bare(Vec<CaseRecord>),
}

/// Parse either a full list response or a bare array of cases
pub fn parse_cases(json: &str) -> CasesResult<Vec<CaseRecord>> {
    let cases = match serde_json::from_str::<CaseDocument>(json) {
        Ok(CaseDocument::Response(response)) => {
            if response.pagination.total_items > response.data.len() {
                tracing::warn!(
                    loaded = response.data.len(),
                    total = response.pagination.total_items,
                    "case list is a partial page; summary counts cover loaded cases only"
                );
            }
            response.data
        }
        Ok(CaseDocument::Bare(cases)) => cases,
        // Retry as a bare array to surface a precise error location
        Err(_) => serde_json::from_str::<Vec<CaseRecord>>(json)?,
    };
    Ok(cases)
}

/// Load cases from a JSON file
pub fn load_cases(path: impl AsRef<Path>) -> CasesResult<Vec<CaseRecord>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let cases = parse_cases(&json)?;
    tracing::debug!(path = %path.display(), count = cases.len(), "loaded cases");
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CasesError;

    const CASE: &str = r#"{"id":1,"entityId":9,"status":"NEW","priority":"Low","createdAt":0,"updatedAt":0}"#;

    #[test]
    fn test_parse_response_document() {
        let json = format!(
            r#"{{"data":[{CASE}],"pagination":{{"page":1,"pageSize":10,"totalItems":1,"totalPages":1}}}}"#
        );
        let cases = parse_cases(&json).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].entity_id, 9);
    }

    #[test]
    fn test_parse_bare_array() {
        let cases = parse_cases(&format!("[{CASE},{CASE}]")).unwrap();
        assert_eq!(cases.len(), 2);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_cases(r#"[{"id":1}]"#), Err(CasesError::Json(_))));
    }

    #[test]
    fn test_params_wire_names() {
        let params = CaseListParams {
            sort_by: Some("created".into()),
            sort_order: Some(cg_core::SortDirection::Descending),
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["sortOrder"], "desc");
        assert!(json.get("status").is_none());
    }
}
