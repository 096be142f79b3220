//! Row selection and expansion, keyed by row identity

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::grid::GridRow;

/// Checked rows, by row key, in the order they were selected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSelection {
    keys: IndexSet<String>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row; returns whether it is now selected
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.keys.shift_remove(key) {
            false
        } else {
            self.keys.insert(key.to_string());
            true
        }
    }

    pub fn select(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    pub fn deselect(&mut self, key: &str) {
        self.keys.shift_remove(key);
    }

    /// Header checkbox: select every visible key, or clear them all when
    /// they are already selected
    pub fn toggle_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a str> + Clone) {
        if self.is_all_selected(visible.clone()) {
            for key in visible {
                self.keys.shift_remove(key);
            }
        } else {
            self.keys.extend(visible.into_iter().map(str::to_string));
        }
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// True when `visible` is non-empty and every key in it is selected
    pub fn is_all_selected<'a>(&self, visible: impl IntoIterator<Item = &'a str>) -> bool {
        let mut any = false;
        for key in visible {
            if !self.keys.contains(key) {
                return false;
            }
            any = true;
        }
        any
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// Rows whose detail panel is open
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedRows {
    keys: IndexSet<String>,
}

impl ExpandedRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row; returns whether it is now expanded
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.keys.shift_remove(key) {
            false
        } else {
            self.keys.insert(key.to_string());
            true
        }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn collapse_all(&mut self) {
        self.keys.clear();
    }
}

/// Checkbox and detail-panel state for one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMarks {
    pub selection: RowSelection,
    pub expanded: ExpandedRows,
}

impl RowMarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `selected` and `expanded` flags of annotated rows
    pub fn apply<R>(&self, rows: &mut [GridRow<'_, R>]) {
        for row in rows {
            row.selected = self.selection.is_selected(&row.key);
            row.expanded = self.expanded.is_expanded(&row.key);
        }
    }

    pub fn clear(&mut self) {
        self.selection.clear();
        self.expanded.collapse_all();
    }
}
