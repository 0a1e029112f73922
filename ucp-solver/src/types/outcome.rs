use super::{ModelInstance, VarId};
use thiserror::Error;

/// A full variable assignment returned by an engine, together with the
/// objective value at that assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    objective: f64,
    values: Vec<f64>,
}

impl Assignment {
    /// Wraps raw solver output: one value per variable, in column order.
    pub fn new(objective: f64, values: Vec<f64>) -> Self {
        Self { objective, values }
    }

    /// Objective value at this assignment.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Value of a single variable.
    pub fn value(&self, id: VarId) -> f64 {
        self.values[id.index()]
    }

    /// All values, in column order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Terminal result of a single engine attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum SolveOutcome {
    /// An optimal assignment was found.
    Optimal(Assignment),
    /// No feasible point exists.
    Infeasible,
    /// The objective is unbounded below.
    Unbounded,
    /// The engine stopped early (time limit, resource limit, unsupported
    /// instance) with the given reason.
    Aborted(String),
}

impl SolveOutcome {
    /// Human-readable status, including the abort reason when present.
    pub fn describe(&self) -> String {
        match self {
            SolveOutcome::Optimal(_) => "optimal".to_string(),
            SolveOutcome::Infeasible => "infeasible".to_string(),
            SolveOutcome::Unbounded => "unbounded".to_string(),
            SolveOutcome::Aborted(reason) => format!("aborted ({reason})"),
        }
    }
}

/// Per-unit dispatch and status trajectories over the horizon.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnitSchedule {
    /// Unit name.
    pub unit: String,
    /// Dispatched power per interval (MW), exactly as the solver reported it.
    pub power: Vec<f64>,
    /// Commitment status per interval.
    pub online: Vec<bool>,
    /// Startup indicator per interval.
    pub started: Vec<bool>,
    /// Shutdown indicator per interval.
    pub stopped: Vec<bool>,
}

/// The solved schedule in domain terms: one trajectory per unit plus the
/// total operating cost.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Schedule {
    /// Minimum total operating cost ($).
    pub total_cost: f64,
    /// Number of intervals in the horizon.
    pub intervals: usize,
    /// Per-unit trajectories, in model order.
    pub units: Vec<UnitSchedule>,
}

impl Schedule {
    /// Maps an optimal outcome back into domain terms.
    ///
    /// Power values are the solver's exact reported values; rounding is a
    /// presentation concern. Binary statuses are read with a 0.5 threshold
    /// to absorb integrality tolerance. Any non-optimal outcome is rejected
    /// outright rather than producing partial or zero-filled data.
    pub fn extract(
        model: &ModelInstance,
        outcome: &SolveOutcome,
    ) -> Result<Schedule, ExtractionError> {
        let SolveOutcome::Optimal(assignment) = outcome else {
            return Err(ExtractionError::NotOptimal {
                status: outcome.describe(),
            });
        };

        let layout = model.layout();
        let intervals = layout.intervals();
        let units = layout
            .unit_names()
            .iter()
            .enumerate()
            .map(|(g, name)| UnitSchedule {
                unit: name.clone(),
                power: (0..intervals)
                    .map(|t| assignment.value(layout.power(g, t)))
                    .collect(),
                online: (0..intervals)
                    .map(|t| assignment.value(layout.committed(g, t)) > 0.5)
                    .collect(),
                started: (0..intervals)
                    .map(|t| assignment.value(layout.started(g, t)) > 0.5)
                    .collect(),
                stopped: (0..intervals)
                    .map(|t| assignment.value(layout.stopped(g, t)) > 0.5)
                    .collect(),
            })
            .collect();

        Ok(Schedule {
            total_cost: assignment.objective(),
            intervals,
            units,
        })
    }
}

/// Raised when results are read from an outcome that has none.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The outcome was not [`SolveOutcome::Optimal`].
    #[error("cannot extract a schedule from a {status} outcome")]
    NotOptimal {
        /// Status of the rejected outcome.
        status: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_rejects_non_optimal_outcomes() {
        let model = ModelInstance::new(vec!["gen1".to_string()], 0);
        for outcome in [
            SolveOutcome::Infeasible,
            SolveOutcome::Unbounded,
            SolveOutcome::Aborted("time limit".to_string()),
        ] {
            let err = Schedule::extract(&model, &outcome).unwrap_err();
            let ExtractionError::NotOptimal { status } = err;
            assert_eq!(status, outcome.describe());
        }
    }

    #[test]
    fn extraction_of_empty_model_yields_empty_trajectories() {
        let model = ModelInstance::new(vec!["gen1".to_string()], 0);
        let outcome = SolveOutcome::Optimal(Assignment::new(0.0, Vec::new()));
        let schedule = Schedule::extract(&model, &outcome).unwrap();
        assert_eq!(schedule.total_cost, 0.0);
        assert_eq!(schedule.units.len(), 1);
        assert!(schedule.units[0].power.is_empty());
    }
}
