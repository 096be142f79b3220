//! Column schema and cell rendering hooks

use std::fmt;
use std::sync::Arc;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::record::Record;
use crate::value::FieldValue;

/// Visual emphasis hint attached to badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Info,
    Warning,
    Success,
    Danger,
    Neutral,
}

/// Renderer-agnostic description of a cell's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ViewFragment {
    Empty,
    Text { text: String },
    Badge { label: String, tone: Tone },
    Link { label: String, href: String },
}

impl ViewFragment {
    pub fn text(text: impl Into<String>) -> Self {
        ViewFragment::Text { text: text.into() }
    }

    /// Plain-text form, used by text renderers and tests
    pub fn label(&self) -> &str {
        match self {
            ViewFragment::Empty => "",
            ViewFragment::Text { text } => text,
            ViewFragment::Badge { label, .. } | ViewFragment::Link { label, .. } => label,
        }
    }
}

/// Capability to turn a cell value into a view fragment
pub trait Renderer<R>: Send + Sync {
    fn render(&self, value: &FieldValue, record: &R, index: usize) -> ViewFragment;
}

impl<R, F> Renderer<R> for F
where
    F: Fn(&FieldValue, &R, usize) -> ViewFragment + Send + Sync,
{
    fn render(&self, value: &FieldValue, record: &R, index: usize) -> ViewFragment {
        self(value, record, index)
    }
}

/// One column of a grid
pub struct ColumnSpec<R> {
    pub key: String,
    pub title: String,
    pub data_index: Option<String>,
    pub sortable: bool,
    renderer: Option<Arc<dyn Renderer<R>>>,
}

impl<R> Clone for ColumnSpec<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            title: self.title.clone(),
            data_index: self.data_index.clone(),
            sortable: self.sortable,
            renderer: self.renderer.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("data_index", &self.data_index)
            .field("sortable", &self.sortable)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl<R> ColumnSpec<R> {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            data_index: None,
            sortable: false,
            renderer: None,
        }
    }

    /// Read values from `field` instead of the column key
    pub fn data_index(mut self, field: impl Into<String>) -> Self {
        self.data_index = Some(field.into());
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn render_with(mut self, renderer: impl Renderer<R> + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Field this column reads
    pub fn field_name(&self) -> &str {
        self.data_index.as_deref().unwrap_or(&self.key)
    }

    /// Render one cell. Without a custom renderer, `status` and `priority`
    /// columns become badges and everything else plain text.
    pub fn render_cell(&self, value: &FieldValue, record: &R, index: usize) -> ViewFragment {
        if let Some(renderer) = &self.renderer {
            return renderer.render(value, record, index);
        }
        if value.is_missing() {
            return ViewFragment::Empty;
        }
        match (self.key.as_str(), value) {
            ("status", FieldValue::Text(status)) => status_badge(status),
            ("priority", FieldValue::Text(priority)) => {
                priority_badge(priority).unwrap_or_else(|| ViewFragment::text(priority.clone()))
            }
            _ => ViewFragment::text(value.to_string()),
        }
    }
}

/// Badge for a case-like status string such as `IN_PROGRESS`
pub fn status_badge(status: &str) -> ViewFragment {
    let tone = match status.to_lowercase().as_str() {
        "in_progress" | "in-progress" | "in progress" => Tone::Warning,
        "resolved" => Tone::Success,
        "escalated" => Tone::Danger,
        "new" => Tone::Info,
        _ => Tone::Neutral,
    };
    ViewFragment::Badge {
        label: status.replacen('_', " ", 1).replacen('-', " ", 1),
        tone,
    }
}

/// Badge for `high`/`medium`/`low`; anything else is not a priority
pub fn priority_badge(priority: &str) -> Option<ViewFragment> {
    let tone = match priority.to_lowercase().as_str() {
        "high" => Tone::Danger,
        "medium" => Tone::Warning,
        "low" => Tone::Success,
        _ => return None,
    };
    let mut chars = priority.chars();
    let label = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    };
    Some(ViewFragment::Badge { label, tone })
}

/// An ordered set of columns with unique keys
pub struct ColumnSet<R> {
    columns: Vec<ColumnSpec<R>>,
}

impl<R> Clone for ColumnSet<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

impl<R> Default for ColumnSet<R> {
    fn default() -> Self {
        Self { columns: Vec::new() }
    }
}

impl<R: Record> ColumnSet<R> {
    /// Build a column set, rejecting duplicate keys
    pub fn new(columns: Vec<ColumnSpec<R>>) -> GridResult<Self> {
        let mut seen = AHashSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(GridError::DuplicateColumnKey(column.key.clone()));
            }
        }
        Ok(Self { columns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSpec<R>> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ColumnSpec<R>> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Look up a sortable column, for callers that must reject bad sort keys
    pub fn sortable(&self, key: &str) -> GridResult<&ColumnSpec<R>> {
        self.get(key)
            .filter(|c| c.sortable)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))
    }

    /// Field to read for `key`: the matching column's `data_index` if any,
    /// otherwise the key itself
    pub fn field_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|c| c.field_name()).unwrap_or(key)
    }

    /// Render every cell of one row
    pub fn render_row(&self, record: &R, index: usize) -> Vec<ViewFragment> {
        self.columns
            .iter()
            .map(|column| {
                let value = record.field(column.field_name());
                column.render_cell(&value, record, index)
            })
            .collect()
    }
}
