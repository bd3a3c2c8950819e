//! A scoring engine backed by precomputed unit scores.
//!
//! Each activity has a cumulative score per unit of output for each method, so the score of a
//! demand vector is just the weighted sum of unit scores.
use super::{MethodID, ScoringEngine, ScoringSession};
use crate::activity::ActivityKey;
use crate::demand::DemandVector;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Unit scores for each activity, for a single method
type MethodScores = HashMap<ActivityKey, f64>;

/// An engine which scores demand with per-unit scores for each activity and method
#[derive(Debug, Default, PartialEq)]
pub struct UnitScoreEngine {
    scores: IndexMap<MethodID, MethodScores>,
}

impl UnitScoreEngine {
    /// Create an engine from (activity, method, unit score) entries.
    ///
    /// Methods are listed in the order they first appear. Each activity may only have one score
    /// per method and scores must be finite.
    pub fn from_scores<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ActivityKey, MethodID, f64)>,
    {
        let mut scores: IndexMap<MethodID, MethodScores> = IndexMap::new();
        for (key, method, score) in entries {
            ensure!(
                score.is_finite(),
                "Invalid unit score for activity {key} with method {method}: {score}"
            );

            let method_scores = scores.entry(method.clone()).or_default();
            ensure!(
                method_scores.insert(key.clone(), score).is_none(),
                "Duplicate unit score for activity {key} with method {method}"
            );
        }

        Ok(Self { scores })
    }

    fn method_scores(&self, method: &MethodID) -> Result<&MethodScores> {
        self.scores
            .get(method)
            .with_context(|| format!("Unknown impact assessment method: {method}"))
    }
}

impl ScoringEngine for UnitScoreEngine {
    fn methods(&self) -> Vec<MethodID> {
        self.scores.keys().cloned().collect()
    }

    fn build_inventory<'a>(
        &'a self,
        demand: &DemandVector,
        method: &MethodID,
    ) -> Result<Box<dyn ScoringSession + 'a>> {
        Ok(Box::new(UnitScoreSession {
            engine: self,
            demand: demand.clone(),
            scores: self.method_scores(method)?,
            method: method.clone(),
        }))
    }
}

struct UnitScoreSession<'a> {
    engine: &'a UnitScoreEngine,
    demand: DemandVector,
    scores: &'a MethodScores,
    method: MethodID,
}

impl ScoringSession for UnitScoreSession<'_> {
    fn switch_method(&mut self, method: &MethodID) -> Result<()> {
        self.scores = self.engine.method_scores(method)?;
        self.method = method.clone();
        Ok(())
    }

    fn score(&mut self) -> Result<f64> {
        self.demand.iter().try_fold(0.0, |total, (key, amount)| -> Result<f64> {
            let unit_score = self.scores.get(key).with_context(|| {
                format!(
                    "No unit score for activity {key} with method {}",
                    self.method
                )
            })?;

            Ok(total + amount * unit_score)
        })
    }
}
