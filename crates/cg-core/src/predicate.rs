//! Record predicates and their conjunction

use std::fmt;
use std::sync::Arc;

/// A boolean test over one record, used for filtering and for action
/// visibility/disablement
pub trait Predicate<R>: Send + Sync {
    fn evaluate(&self, record: &R) -> bool;
}

impl<R, F> Predicate<R> for F
where
    F: Fn(&R) -> bool + Send + Sync,
{
    fn evaluate(&self, record: &R) -> bool {
        self(record)
    }
}

/// Either a fixed answer or a per-record predicate
pub enum Condition<R> {
    Fixed(bool),
    When(Arc<dyn Predicate<R>>),
}

impl<R> Condition<R> {
    pub fn when(predicate: impl Predicate<R> + 'static) -> Self {
        Condition::When(Arc::new(predicate))
    }

    pub fn evaluate(&self, record: &R) -> bool {
        match self {
            Condition::Fixed(value) => *value,
            Condition::When(predicate) => predicate.evaluate(record),
        }
    }
}

impl<R> Clone for Condition<R> {
    fn clone(&self) -> Self {
        match self {
            Condition::Fixed(value) => Condition::Fixed(*value),
            Condition::When(predicate) => Condition::When(Arc::clone(predicate)),
        }
    }
}

impl<R> fmt::Debug for Condition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Condition::When(_) => f.write_str("When(..)"),
        }
    }
}

impl<R> From<bool> for Condition<R> {
    fn from(value: bool) -> Self {
        Condition::Fixed(value)
    }
}

/// Named predicates combined by logical AND.
///
/// Evaluation stops at the first failing predicate; the result does not
/// depend on insertion order.
pub struct PredicateSet<R> {
    predicates: Vec<(String, Box<dyn Predicate<R>>)>,
}

impl<R> Default for PredicateSet<R> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }
}

impl<R> fmt::Debug for PredicateSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.predicates.iter().map(|(name, _)| name))
            .finish()
    }
}

impl<R> PredicateSet<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named predicate
    pub fn with(mut self, name: impl Into<String>, predicate: impl Predicate<R> + 'static) -> Self {
        self.push(name, predicate);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, predicate: impl Predicate<R> + 'static) {
        self.predicates.push((name.into(), Box::new(predicate)));
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.predicates.iter().map(|(name, _)| name.as_str())
    }

    pub fn matches(&self, record: &R) -> bool {
        self.predicates.iter().all(|(_, p)| p.evaluate(record))
    }

    /// Keep the records satisfying every predicate, in input order
    pub fn apply<'a>(&self, records: impl IntoIterator<Item = &'a R>) -> Vec<&'a R>
    where
        R: 'a,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_matches_everything() {
        let set = PredicateSet::<i32>::new();
        assert_eq!(set.apply(&[1, 2, 3]), vec![&1, &2, &3]);
    }

    #[test]
    fn test_conjunction() {
        let set = PredicateSet::new()
            .with("even", |n: &i32| n % 2 == 0)
            .with("positive", |n: &i32| *n > 0);
        assert_eq!(set.apply(&[-2, 1, 2, 4, 5]), vec![&2, &4]);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["even", "positive"]);
    }

    #[test]
    fn test_short_circuits_on_first_failure() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let set = PredicateSet::new()
            .with("never", |_: &i32| false)
            .with("counted", move |_: &i32| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            });
        assert!(set.apply(&[1, 2, 3]).is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_condition() {
        let fixed: Condition<i32> = true.into();
        assert!(fixed.evaluate(&0));
        let when = Condition::when(|n: &i32| *n > 3);
        assert!(!when.evaluate(&2));
        assert!(when.evaluate(&4));
    }
}
