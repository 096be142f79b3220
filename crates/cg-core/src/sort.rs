//! Sort engine: ordering records by a column

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::column::ColumnSet;
use crate::record::Record;
use crate::value::FieldValue;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Active sort key and direction. Without both, input order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction: Some(direction),
        }
    }

    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Descending)
    }

    pub fn is_active(&self) -> bool {
        self.key.is_some() && self.direction.is_some()
    }

    /// Direction applied to `key`, if it is the active sort column
    pub fn direction_for(&self, key: &str) -> Option<SortDirection> {
        match (&self.key, self.direction) {
            (Some(active), Some(direction)) if active == key => Some(direction),
            _ => None,
        }
    }

    /// Header-click state machine: `desc → asc → none → desc`; a click on a
    /// different column always starts at `desc`.
    pub fn cycled(&self, key: &str) -> SortState {
        match self.direction_for(key) {
            None => SortState::descending(key),
            Some(SortDirection::Descending) => SortState::ascending(key),
            Some(SortDirection::Ascending) => SortState::none(),
        }
    }

    /// Two-state toggle: the same key flips direction, a new key starts at
    /// `desc`. The sort is never cleared.
    pub fn toggled(&self, key: &str) -> SortState {
        match self.direction_for(key) {
            Some(direction) => SortState::new(key, direction.reversed()),
            None => SortState::descending(key),
        }
    }
}

/// Locale-style string ordering: case-insensitive first, lowercase before
/// uppercase on ties, then code points. A total order.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Comparison class chosen once per sort over the defined keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyClass {
    Numeric,
    Textual,
}

#[derive(Debug)]
enum SortKey {
    Missing,
    Number(f64),
    Text(String),
}

fn classify(values: &[FieldValue]) -> KeyClass {
    let all_numbers = values
        .iter()
        .filter(|v| !v.is_missing())
        .all(|v| matches!(v, FieldValue::Number(_)));
    if all_numbers {
        KeyClass::Numeric
    } else {
        KeyClass::Textual
    }
}

fn to_sort_key(value: FieldValue, class: KeyClass) -> SortKey {
    match (value, class) {
        (FieldValue::Null, _) => SortKey::Missing,
        (FieldValue::Number(n), KeyClass::Numeric) => SortKey::Number(n),
        (FieldValue::Text(s), KeyClass::Textual) => SortKey::Text(s),
        (other, _) => SortKey::Text(other.to_string()),
    }
}

fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    let base = match (a, b) {
        // Missing values trail in both directions
        (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
        (SortKey::Missing, _) => return Ordering::Greater,
        (_, SortKey::Missing) => return Ordering::Less,
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => locale_cmp(x, y),
        // A key set is classified as a whole, so the classes never mix
        (SortKey::Number(x), SortKey::Text(y)) => locale_cmp(&x.to_string(), y),
        (SortKey::Text(x), SortKey::Number(y)) => locale_cmp(x, &y.to_string()),
    };
    match direction {
        SortDirection::Ascending => base,
        SortDirection::Descending => base.reverse(),
    }
}

/// Stable sort of `records` by `key` in `direction`.
///
/// The field read is the matching column's `data_index` when one is
/// declared, otherwise `key`. With no key or no direction the input is
/// returned unchanged. Equal keys keep their input order.
pub fn sort<'a, R: Record>(
    records: Vec<&'a R>,
    key: Option<&str>,
    direction: Option<SortDirection>,
    columns: &ColumnSet<R>,
) -> Vec<&'a R> {
    let (Some(key), Some(direction)) = (key, direction) else {
        return records;
    };
    let field = columns.field_for(key);

    let values: Vec<FieldValue> = records.iter().map(|r| r.field(field)).collect();
    let class = classify(&values);
    let keys: Vec<SortKey> = values.into_iter().map(|v| to_sort_key(v, class)).collect();

    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| compare_keys(&keys[a], &keys[b], direction));

    tracing::trace!(key, field, ?direction, rows = records.len(), "sorted records");
    order.into_iter().map(|i| records[i]).collect()
}

/// [`sort`] driven by a [`SortState`]
pub fn sort_by_state<'a, R: Record>(
    records: Vec<&'a R>,
    state: &SortState,
    columns: &ColumnSet<R>,
) -> Vec<&'a R> {
    sort(records, state.key.as_deref(), state.direction, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnSpec;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn columns() -> ColumnSet<Value> {
        ColumnSet::new(vec![
            ColumnSpec::new("name", "Name").sortable(),
            ColumnSpec::new("created", "Created").data_index("createdAt").sortable(),
        ])
        .unwrap()
    }

    fn ids(rows: &[&Value]) -> Vec<i64> {
        rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_no_key_keeps_input_order() {
        let data = vec![json!({"id": 2}), json!({"id": 1})];
        let sorted = sort(data.iter().collect(), None, Some(SortDirection::Ascending), &columns());
        assert_eq!(ids(&sorted), vec![2, 1]);
        let sorted = sort(data.iter().collect(), Some("id"), None, &columns());
        assert_eq!(ids(&sorted), vec![2, 1]);
    }

    #[test]
    fn test_numeric_via_data_index() {
        let data = vec![
            json!({"id": 1, "createdAt": 300}),
            json!({"id": 2, "createdAt": 100}),
            json!({"id": 3, "createdAt": 200}),
        ];
        let asc = sort_by_state(data.iter().collect(), &SortState::ascending("created"), &columns());
        assert_eq!(ids(&asc), vec![2, 3, 1]);
        let desc = sort_by_state(data.iter().collect(), &SortState::descending("created"), &columns());
        assert_eq!(ids(&desc), vec![1, 3, 2]);
    }

    #[test]
    fn test_missing_values_last_in_both_directions() {
        let data = vec![
            json!({"id": 1}),
            json!({"id": 2, "name": "beta"}),
            json!({"id": 3, "name": null}),
            json!({"id": 4, "name": "Alpha"}),
        ];
        let asc = sort_by_state(data.iter().collect(), &SortState::ascending("name"), &columns());
        assert_eq!(ids(&asc), vec![4, 2, 1, 3]);
        let desc = sort_by_state(data.iter().collect(), &SortState::descending("name"), &columns());
        assert_eq!(ids(&desc), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_stability_on_ties() {
        let data = vec![
            json!({"id": 1, "name": "same"}),
            json!({"id": 2, "name": "other"}),
            json!({"id": 3, "name": "same"}),
        ];
        let desc = sort_by_state(data.iter().collect(), &SortState::descending("name"), &columns());
        assert_eq!(ids(&desc), vec![1, 3, 2]);
    }

    #[test]
    fn test_mixed_types_compare_as_strings() {
        let data = vec![
            json!({"id": 1, "name": 10}),
            json!({"id": 2, "name": "9"}),
            json!({"id": 3, "name": true}),
        ];
        let asc = sort_by_state(data.iter().collect(), &SortState::ascending("name"), &columns());
        assert_eq!(ids(&asc), vec![1, 2, 3]);
    }

    #[test]
    fn test_locale_cmp() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("High", "low"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_sort_cycle() {
        let state = SortState::none();
        let state = state.cycled("name");
        assert_eq!(state, SortState::descending("name"));
        let state = state.cycled("name");
        assert_eq!(state, SortState::ascending("name"));
        let state = state.cycled("name");
        assert_eq!(state, SortState::none());
        assert_eq!(SortState::ascending("name").cycled("created"), SortState::descending("created"));
    }

    #[test]
    fn test_sort_toggle() {
        let state = SortState::descending("created");
        assert_eq!(state.toggled("created"), SortState::ascending("created"));
        assert_eq!(state.toggled("created").toggled("created"), state);
        assert_eq!(state.toggled("status"), SortState::descending("status"));
    }

    fn record_strategy() -> impl Strategy<Value = Vec<Value>> {
        prop::collection::vec(
            prop_oneof![
                Just(Value::Null),
                (0i64..5).prop_map(|n| json!(n)),
            ],
            0..40,
        )
        .prop_map(|values| {
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    if v.is_null() {
                        json!({"id": i})
                    } else {
                        json!({"id": i, "createdAt": v})
                    }
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_sort_is_idempotent(data in record_strategy(), asc in any::<bool>()) {
            let direction = if asc { SortDirection::Ascending } else { SortDirection::Descending };
            let cols = columns();
            let once = sort(data.iter().collect(), Some("created"), Some(direction), &cols);
            let twice = sort(once.clone(), Some("created"), Some(direction), &cols);
            prop_assert_eq!(ids(&once), ids(&twice));
        }

        #[test]
        fn prop_sort_is_stable_and_missing_last(data in record_strategy(), asc in any::<bool>()) {
            let direction = if asc { SortDirection::Ascending } else { SortDirection::Descending };
            let sorted = sort(data.iter().collect(), Some("created"), Some(direction), &columns());
            prop_assert_eq!(sorted.len(), data.len());

            let first_missing = sorted.iter().position(|r| r.get("createdAt").is_none());
            if let Some(pos) = first_missing {
                prop_assert!(sorted[pos..].iter().all(|r| r.get("createdAt").is_none()));
            }

            for pair in sorted.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if a.get("createdAt") == b.get("createdAt") {
                    prop_assert!(a["id"].as_i64() < b["id"].as_i64());
                }
            }
        }
    }
}
