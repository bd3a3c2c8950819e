//! The interface to the LCA scoring engine.
//!
//! Building the inventory for a demand vector is expensive, whereas switching between
//! impact-assessment methods is cheap. The interface therefore separates the two: a
//! [`ScoringSession`] is built once per [`DemandVector`] and then scored for each method.
use crate::demand::DemandVector;
use crate::error::LcaError;
use crate::id::define_id_type;
use anyhow::Result;
use log::debug;

pub mod unit_scores;
pub use unit_scores::UnitScoreEngine;

define_id_type! {MethodID}

/// An LCA engine which can score demand vectors
pub trait ScoringEngine {
    /// The impact-assessment methods available
    fn methods(&self) -> Vec<MethodID>;

    /// Build the inventory for a demand vector, ready to be scored with `method`
    fn build_inventory<'a>(
        &'a self,
        demand: &DemandVector,
        method: &MethodID,
    ) -> Result<Box<dyn ScoringSession + 'a>>;
}

/// An inventory built for one demand vector
pub trait ScoringSession {
    /// Change the impact-assessment method used for scoring
    fn switch_method(&mut self, method: &MethodID) -> Result<()>;

    /// Calculate the score for the current method
    fn score(&mut self) -> Result<f64>;
}

/// Score a demand vector with each of the given methods.
///
/// The inventory is only built once.
///
/// # Returns
///
/// One score per method, in the same order as `methods`.
pub fn score_methods(
    engine: &dyn ScoringEngine,
    demand: &DemandVector,
    methods: &[MethodID],
) -> Result<Vec<f64>> {
    let Some((first, rest)) = methods.split_first() else {
        return Ok(Vec::new());
    };

    debug!(
        "Scoring demand for {} activities with {} methods",
        demand.len(),
        methods.len()
    );
    let mut session = engine.build_inventory(demand, first)?;
    let mut scores = Vec::with_capacity(methods.len());
    scores.push(session.score()?);
    for method in rest {
        session.switch_method(method)?;
        scores.push(session.score()?);
    }

    Ok(scores)
}

/// Select the engine's methods belonging to an indicator group (e.g. `ReCiPe Midpoint (H)`).
///
/// A method belongs to the group if its ID contains the group name.
pub fn select_methods(engine: &dyn ScoringEngine, indicator_group: &str) -> Result<Vec<MethodID>> {
    let methods: Vec<_> = engine
        .methods()
        .into_iter()
        .filter(|method| method.as_str().contains(indicator_group))
        .collect();

    if methods.is_empty() {
        return Err(LcaError::config(format!(
            "No impact assessment methods found for indicator group '{indicator_group}'"
        ))
        .into());
    }

    Ok(methods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityKey;
    use crate::fixture::assert_error;
    use std::cell::Cell;

    /// Scores demand as its total multiplied by the method's index, counting inventory builds
    #[derive(Default)]
    struct CountingEngine {
        builds: Cell<usize>,
    }

    struct CountingSession {
        total: f64,
        factor: f64,
    }

    impl CountingEngine {
        fn factor(&self, method: &MethodID) -> Result<f64> {
            let idx = self
                .methods()
                .iter()
                .position(|m| m == method)
                .ok_or_else(|| anyhow::anyhow!("Unknown method {method}"))?;
            Ok((idx + 1) as f64)
        }
    }

    impl ScoringEngine for CountingEngine {
        fn methods(&self) -> Vec<MethodID> {
            vec![
                "ReCiPe Midpoint (H)|climate change|GWP100".into(),
                "ReCiPe Midpoint (H)|water depletion|WDP".into(),
                "ReCiPe Endpoint (H,A)|total|total".into(),
            ]
        }

        fn build_inventory<'a>(
            &'a self,
            demand: &DemandVector,
            method: &MethodID,
        ) -> Result<Box<dyn ScoringSession + 'a>> {
            self.builds.set(self.builds.get() + 1);
            Ok(Box::new(CountingSession {
                total: demand.total(),
                factor: self.factor(method)?,
            }))
        }
    }

    impl ScoringSession for CountingSession {
        fn switch_method(&mut self, method: &MethodID) -> Result<()> {
            self.factor = CountingEngine::default().factor(method)?;
            Ok(())
        }

        fn score(&mut self) -> Result<f64> {
            Ok(self.total * self.factor)
        }
    }

    fn demand() -> DemandVector {
        [(ActivityKey::new("db", "1"), 2.0)].into_iter().collect()
    }

    #[test]
    fn score_methods_builds_once() {
        let engine = CountingEngine::default();
        let methods = engine.methods();

        let scores = score_methods(&engine, &demand(), &methods).unwrap();
        assert_eq!(scores, [2.0, 4.0, 6.0]);
        assert_eq!(engine.builds.get(), 1);
    }

    #[test]
    fn score_methods_no_methods() {
        let engine = CountingEngine::default();
        assert!(score_methods(&engine, &demand(), &[]).unwrap().is_empty());
        assert_eq!(engine.builds.get(), 0);
    }

    #[test]
    fn score_methods_propagates_errors() {
        let engine = CountingEngine::default();
        let methods: [MethodID; 2] = [
            "ReCiPe Midpoint (H)|climate change|GWP100".into(),
            "bad".into(),
        ];
        assert_error!(
            score_methods(&engine, &demand(), &methods),
            "Unknown method bad"
        );
    }

    #[test]
    fn select_methods_by_group() {
        let engine = CountingEngine::default();
        let methods = select_methods(&engine, "ReCiPe Midpoint (H)").unwrap();
        assert_eq!(methods.len(), 2);

        let methods = select_methods(&engine, "Endpoint").unwrap();
        assert_eq!(methods, [MethodID::new("ReCiPe Endpoint (H,A)|total|total")]);

        assert_error!(
            select_methods(&engine, "CML 2001"),
            "Configuration error: No impact assessment methods found for indicator group 'CML 2001'"
        );
    }
}
