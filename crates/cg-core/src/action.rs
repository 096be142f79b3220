//! Row actions and their per-record resolution

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::predicate::{Condition, Predicate};

/// Button style hint passed through to the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionVariant {
    #[default]
    Default,
    Destructive,
    Outline,
    Secondary,
    Ghost,
    Link,
}

/// Result of triggering an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    Navigate(String),
}

/// Side effect run when an action is triggered
pub trait Effect<R>: Send + Sync {
    fn run(&self, record: &R) -> ActionOutcome;
}

impl<R, F> Effect<R> for F
where
    F: Fn(&R) -> ActionOutcome + Send + Sync,
{
    fn run(&self, record: &R) -> ActionOutcome {
        self(record)
    }
}

/// Navigation target, fixed or derived from the record
pub enum ActionTarget<R> {
    Fixed(String),
    PerRecord(Arc<dyn Fn(&R) -> String + Send + Sync>),
}

impl<R> ActionTarget<R> {
    pub fn resolve(&self, record: &R) -> String {
        match self {
            ActionTarget::Fixed(href) => href.clone(),
            ActionTarget::PerRecord(f) => f(record),
        }
    }
}

impl<R> Clone for ActionTarget<R> {
    fn clone(&self) -> Self {
        match self {
            ActionTarget::Fixed(href) => ActionTarget::Fixed(href.clone()),
            ActionTarget::PerRecord(f) => ActionTarget::PerRecord(Arc::clone(f)),
        }
    }
}

/// A user-triggerable operation scoped to one record
pub struct RowAction<R> {
    pub label: String,
    pub visible: Condition<R>,
    pub disabled: Condition<R>,
    pub href: Option<ActionTarget<R>>,
    pub effect: Option<Arc<dyn Effect<R>>>,
    pub variant: ActionVariant,
    pub external: bool,
}

impl<R> Clone for RowAction<R> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            visible: self.visible.clone(),
            disabled: self.disabled.clone(),
            href: self.href.clone(),
            effect: self.effect.clone(),
            variant: self.variant,
            external: self.external,
        }
    }
}

impl<R> fmt::Debug for RowAction<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("label", &self.label)
            .field("visible", &self.visible)
            .field("disabled", &self.disabled)
            .field("variant", &self.variant)
            .field("external", &self.external)
            .finish_non_exhaustive()
    }
}

impl<R> RowAction<R> {
    /// Visible, enabled action with no target or effect
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            visible: Condition::Fixed(true),
            disabled: Condition::Fixed(false),
            href: None,
            effect: None,
            variant: ActionVariant::Default,
            external: false,
        }
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Condition::Fixed(visible);
        self
    }

    pub fn visible_when(mut self, predicate: impl Predicate<R> + 'static) -> Self {
        self.visible = Condition::when(predicate);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Condition::Fixed(disabled);
        self
    }

    pub fn disabled_when(mut self, predicate: impl Predicate<R> + 'static) -> Self {
        self.disabled = Condition::when(predicate);
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(ActionTarget::Fixed(href.into()));
        self
    }

    pub fn href_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        self.href = Some(ActionTarget::PerRecord(Arc::new(f)));
        self
    }

    pub fn on_trigger(mut self, effect: impl Effect<R> + 'static) -> Self {
        self.effect = Some(Arc::new(effect));
        self
    }

    pub fn variant(mut self, variant: ActionVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }
}

/// An action as it applies to one specific record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAction {
    /// Position in the declared action list
    pub index: usize,
    pub label: String,
    pub disabled: bool,
    /// First visible action; rendered outside the overflow menu
    pub primary: bool,
    pub href: Option<String>,
    pub variant: ActionVariant,
    pub external: bool,
}

/// Applicable actions for `record`, in declaration order.
///
/// Hidden actions are skipped and the first visible one is marked primary.
/// Effects are never run here.
pub fn resolve_for_record<R>(actions: &[RowAction<R>], record: &R) -> Vec<ResolvedAction> {
    actions
        .iter()
        .enumerate()
        .filter(|(_, action)| action.visible.evaluate(record))
        .enumerate()
        .map(|(position, (index, action))| ResolvedAction {
            index,
            label: action.label.clone(),
            disabled: action.disabled.evaluate(record),
            primary: position == 0,
            href: action.href.as_ref().map(|target| target.resolve(record)),
            variant: action.variant,
            external: action.external,
        })
        .collect()
}

/// Split resolved actions into the primary entry and the overflow menu
pub fn partition(resolved: &[ResolvedAction]) -> (Option<&ResolvedAction>, &[ResolvedAction]) {
    match resolved.split_first() {
        Some((primary, rest)) => (Some(primary), rest),
        None => (None, &[]),
    }
}

/// Run a resolved action against its record.
///
/// Visibility and enablement are evaluated again against `record`, so an
/// action resolved for another row cannot bypass them. The effect runs if
/// one is declared; otherwise a target becomes a navigation outcome.
pub fn trigger<R>(
    actions: &[RowAction<R>],
    resolved: &ResolvedAction,
    record: &R,
) -> GridResult<ActionOutcome> {
    let action = actions
        .get(resolved.index)
        .ok_or(GridError::ActionIndexOutOfRange(resolved.index))?;
    if !action.visible.evaluate(record) {
        return Err(GridError::ActionHidden {
            label: action.label.clone(),
        });
    }
    if action.disabled.evaluate(record) {
        return Err(GridError::ActionDisabled {
            label: action.label.clone(),
        });
    }

    let outcome = match (&action.effect, &action.href) {
        (Some(effect), _) => effect.run(record),
        (None, Some(target)) => ActionOutcome::Navigate(target.resolve(record)),
        (None, None) => ActionOutcome::Done,
    };
    tracing::debug!(label = %action.label, ?outcome, "row action triggered");
    Ok(outcome)
}
