/**
 * These are the engine implementations able to solve a commitment model.
 */
mod impls;
pub use impls::*;

/**
 * These are the core data types the builder and engines operate on.
 */
mod types;
pub use types::*;

mod builder;
pub use builder::build_commitment;

mod report;
pub use report::ScheduleTable;

/// Export of built models to standard optimization text formats.
#[cfg(feature = "export")]
pub mod export;

use thiserror::Error;
use ucp_core::models::Scenario;

/// Builds the commitment model for `scenario` in the formulation the engine
/// advertises, runs a single solve, and extracts the resulting schedule.
///
/// Every non-optimal engine outcome maps to its own error variant so callers
/// can tell infeasibility apart from resource limits.
pub fn solve_commitment<E: Engine>(
    scenario: &Scenario,
    engine: &E,
) -> Result<Schedule, CommitmentError> {
    let model = build_commitment(scenario, &engine.formulation());
    match engine.solve(&model) {
        SolveOutcome::Infeasible => Err(CommitmentError::Infeasible),
        SolveOutcome::Unbounded => Err(CommitmentError::Unbounded),
        SolveOutcome::Aborted(reason) => Err(CommitmentError::Aborted(reason)),
        outcome => Ok(Schedule::extract(&model, &outcome)?),
    }
}

/// The ways a scheduling run can fail after the data model has been loaded.
#[derive(Debug, Error)]
pub enum CommitmentError {
    /// The engine proved no commitment/dispatch trace satisfies the model.
    #[error("no feasible commitment schedule exists")]
    Infeasible,
    /// The engine reported an unbounded objective. All variables of a built
    /// commitment model are bounded, so this signals a programming error
    /// rather than a property of the input data.
    #[error("commitment model is unbounded")]
    Unbounded,
    /// The engine stopped before reaching a conclusion (time limit,
    /// resource limit, or an instance outside its capabilities).
    #[error("solve aborted: {0}")]
    Aborted(String),
    /// Result extraction was attempted against a non-optimal outcome.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}
