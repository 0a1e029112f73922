mod formulation;
pub use formulation::*;

mod instance;
pub use instance::*;

mod outcome;
pub use outcome::*;

/// The Engine trait defines the interface to an external MILP/MIQP solver.
///
/// An Engine accepts a built [`ModelInstance`] and reports one of four
/// terminal outcomes. It performs no model transformation of its own: the
/// builder is responsible for producing an instance within the engine's
/// advertised [`Formulation`], which is what lets any compliant back-end be
/// substituted without touching the builder logic.
pub trait Engine {
    /// The configuration type for this engine
    type Settings;

    /// Create a new instance with the provided settings
    fn new(settings: Self::Settings) -> Self;

    /// The formulation this engine is able to consume. Callers building a
    /// model for this engine should pass this to
    /// [`build_commitment`](crate::build_commitment).
    fn formulation(&self) -> Formulation;

    /// Run a single optimization attempt over the instance.
    ///
    /// There are no retries: a numerical failure or resource limit surfaces
    /// as [`SolveOutcome::Aborted`] rather than blocking or looping.
    fn solve(&self, model: &ModelInstance) -> SolveOutcome;
}
