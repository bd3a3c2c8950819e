//! Demand vectors: the amount of each inventory activity required, as handed to the scoring engine.
use crate::activity::ActivityKey;
use indexmap::IndexMap;

/// The demand for each activity, keyed by activity.
///
/// Amounts are non-negative and finite. The order in which activities were first added is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemandVector(IndexMap<ActivityKey, f64>);

impl DemandVector {
    /// Create an empty demand vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add demand for an activity, accumulating with any existing demand for it.
    ///
    /// # Panics
    ///
    /// If `amount` is negative or not finite.
    pub fn add(&mut self, key: ActivityKey, amount: f64) {
        assert!(
            amount.is_finite() && amount >= 0.0,
            "Invalid demand for activity {key}: {amount}"
        );
        *self.0.entry(key).or_insert(0.0) += amount;
    }

    /// Add all of another demand vector's entries to this one
    pub fn extend(&mut self, other: &DemandVector) {
        for (key, amount) in other.iter() {
            self.add(key.clone(), amount);
        }
    }

    /// Get the demand for an activity, if present
    pub fn get(&self, key: &ActivityKey) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Iterate over activities and their demand
    pub fn iter(&self) -> impl Iterator<Item = (&ActivityKey, f64)> {
        self.0.iter().map(|(key, amount)| (key, *amount))
    }

    /// The number of activities with demand
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there is no demand for any activity
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sum of all demand
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

impl FromIterator<(ActivityKey, f64)> for DemandVector {
    fn from_iter<I: IntoIterator<Item = (ActivityKey, f64)>>(iter: I) -> Self {
        let mut demand = DemandVector::new();
        for (key, amount) in iter {
            demand.add(key, amount);
        }
        demand
    }
}
