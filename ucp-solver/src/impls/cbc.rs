use crate::{
    Assignment, Domain, Engine, Formulation, ModelInstance, Sense, SolveOutcome, DEFAULT_SEGMENTS,
};
use good_lp::{
    constraint, coin_cbc, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel,
};

/// Settings for [`CbcEngine`].
#[derive(Clone, Debug)]
pub struct CbcSettings {
    /// Wall-clock limit for a single solve, in seconds.
    pub time_limit: Option<f64>,
    /// Segment count used when linearizing quadratic production costs.
    pub segments: usize,
    /// Let CBC write its own log to stdout.
    pub verbose: bool,
    /// Additional raw CBC parameters, passed through untouched.
    pub parameters: Vec<(String, String)>,
}

impl Default for CbcSettings {
    fn default() -> Self {
        Self {
            time_limit: None,
            segments: DEFAULT_SEGMENTS,
            verbose: false,
            parameters: Vec::new(),
        }
    }
}

/// Engine backed by COIN-OR CBC, driven through the good_lp modeling layer.
///
/// CBC is a pure MILP solver, so this engine advertises the linearized
/// formulation and refuses instances outside it.
pub struct CbcEngine(CbcSettings);

impl Default for CbcEngine {
    fn default() -> Self {
        Self(CbcSettings::default())
    }
}

impl Engine for CbcEngine {
    type Settings = CbcSettings;

    fn new(settings: Self::Settings) -> Self {
        Self(settings)
    }

    fn formulation(&self) -> Formulation {
        Formulation::linearized(self.0.segments)
    }

    fn solve(&self, model: &ModelInstance) -> SolveOutcome {
        if model.is_empty() {
            return SolveOutcome::Optimal(Assignment::new(0.0, Vec::new()));
        }
        if model.has_quadratic_objective() || !model.indicator_constraints().is_empty() {
            return SolveOutcome::Aborted(
                "CBC requires a linearized instance (no quadratic objective, no indicator rows)"
                    .to_string(),
            );
        }

        let mut vars = ProblemVariables::new();
        let cols: Vec<good_lp::Variable> = model
            .variables()
            .iter()
            .map(|var| match var.domain {
                Domain::Continuous { lb, ub } => {
                    let mut definition = variable().min(lb);
                    if ub.is_finite() {
                        definition = definition.max(ub);
                    }
                    vars.add(definition)
                }
                Domain::Binary => vars.add(variable().binary()),
            })
            .collect();

        let objective: Expression = model
            .linear_objective()
            .iter()
            .zip(&cols)
            .map(|(&coeff, &col)| coeff * col)
            .sum();

        let mut problem = vars.minimise(objective).using(coin_cbc);
        for row in model.constraints() {
            let lhs: Expression = row
                .terms
                .iter()
                .map(|&(id, coeff)| coeff * cols[id.index()])
                .sum();
            problem = problem.with(match row.sense {
                Sense::Eq => constraint::eq(lhs, row.rhs),
                Sense::Le => constraint::leq(lhs, row.rhs),
                Sense::Ge => constraint::geq(lhs, row.rhs),
            });
        }

        if !self.0.verbose {
            problem.set_parameter("logLevel", "0");
        }
        if let Some(limit) = self.0.time_limit {
            problem.set_parameter("seconds", &limit.to_string());
        }
        for (key, value) in &self.0.parameters {
            problem.set_parameter(key, value);
        }

        tracing::debug!(
            columns = model.num_variables(),
            rows = model.constraints().len(),
            "dispatching model to CBC"
        );

        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = cols.iter().map(|&col| solution.value(col)).collect();
                let objective = model.objective_value(&values);
                tracing::debug!(objective, "CBC finished");
                SolveOutcome::Optimal(Assignment::new(objective, values))
            }
            Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
            Err(ResolutionError::Unbounded) => SolveOutcome::Unbounded,
            Err(other) => SolveOutcome::Aborted(other.to_string()),
        }
    }
}
