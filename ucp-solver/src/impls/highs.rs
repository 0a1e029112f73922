use crate::{
    Assignment, Domain, Engine, Formulation, ModelInstance, Sense, SolveOutcome, DEFAULT_SEGMENTS,
};
use highs::{HighsModelStatus, RowProblem};

/// Settings for [`HighsEngine`].
#[derive(Clone, Debug)]
pub struct HighsSettings {
    /// Wall-clock limit for a single solve, in seconds.
    pub time_limit: Option<f64>,
    /// Relative MIP gap at which the search stops.
    pub mip_rel_gap: Option<f64>,
    /// Segment count used when linearizing quadratic production costs.
    pub segments: usize,
    /// Let HiGHS write its own log to stdout.
    pub verbose: bool,
}

impl Default for HighsSettings {
    fn default() -> Self {
        Self {
            time_limit: None,
            mip_rel_gap: None,
            segments: DEFAULT_SEGMENTS,
            verbose: false,
        }
    }
}

/// Engine backed by the HiGHS MILP solver.
///
/// HiGHS has no indicator constraints and no mixed-integer quadratic
/// objective, so this engine advertises the linearized formulation and
/// refuses instances outside it.
pub struct HighsEngine(HighsSettings);

impl Default for HighsEngine {
    fn default() -> Self {
        Self(HighsSettings::default())
    }
}

impl Engine for HighsEngine {
    type Settings = HighsSettings;

    fn new(settings: Self::Settings) -> Self {
        Self(settings)
    }

    fn formulation(&self) -> Formulation {
        Formulation::linearized(self.0.segments)
    }

    fn solve(&self, model: &ModelInstance) -> SolveOutcome {
        // A zero-length horizon builds an empty instance; it is trivially
        // optimal at cost 0 and HiGHS would report it as a distinct
        // "model empty" status instead.
        if model.is_empty() {
            return SolveOutcome::Optimal(Assignment::new(0.0, Vec::new()));
        }
        if model.has_quadratic_objective() || !model.indicator_constraints().is_empty() {
            return SolveOutcome::Aborted(
                "HiGHS requires a linearized instance (no quadratic objective, no indicator rows)"
                    .to_string(),
            );
        }

        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(model.num_variables());
        for (var, &obj) in model.variables().iter().zip(model.linear_objective()) {
            let col = match var.domain {
                Domain::Continuous { lb, ub } => {
                    if ub.is_finite() {
                        pb.add_column(obj, lb..=ub)
                    } else {
                        pb.add_column(obj, lb..)
                    }
                }
                Domain::Binary => pb.add_integer_column(obj, 0.0..=1.0),
            };
            cols.push(col);
        }
        for row in model.constraints() {
            let factors: Vec<_> = row
                .terms
                .iter()
                .map(|&(id, coeff)| (cols[id.index()], coeff))
                .collect();
            match row.sense {
                Sense::Eq => {
                    pb.add_row(row.rhs..=row.rhs, factors);
                }
                Sense::Le => {
                    pb.add_row(..=row.rhs, factors);
                }
                Sense::Ge => {
                    pb.add_row(row.rhs.., factors);
                }
            }
        }

        tracing::debug!(
            columns = model.num_variables(),
            rows = model.constraints().len(),
            "dispatching model to HiGHS"
        );

        let mut solver = pb.optimise(highs::Sense::Minimise);
        solver.set_option("output_flag", self.0.verbose);
        if let Some(limit) = self.0.time_limit {
            solver.set_option("time_limit", limit);
        }
        if let Some(gap) = self.0.mip_rel_gap {
            solver.set_option("mip_rel_gap", gap);
        }

        let solved = solver.solve();
        let status = solved.status();
        tracing::debug!(?status, "HiGHS finished");
        match status {
            HighsModelStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                let objective = model.objective_value(&values);
                SolveOutcome::Optimal(Assignment::new(objective, values))
            }
            HighsModelStatus::Infeasible => SolveOutcome::Infeasible,
            HighsModelStatus::Unbounded => SolveOutcome::Unbounded,
            other => SolveOutcome::Aborted(format!("HiGHS returned {other:?}")),
        }
    }
}
