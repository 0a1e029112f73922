/// Opaque handle to a decision variable within a [`ModelInstance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of this variable in the instance's column order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Domain of a decision variable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Domain {
    /// Continuous with inclusive bounds; `ub` may be `f64::INFINITY`.
    Continuous {
        /// Lower bound.
        lb: f64,
        /// Upper bound.
        ub: f64,
    },
    /// Binary 0/1.
    Binary,
}

/// A named decision variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    /// Name used in exported models and diagnostics.
    pub name: String,
    /// Variable domain.
    pub domain: Domain,
}

/// Comparison sense of a constraint row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    /// `terms = rhs`
    Eq,
    /// `terms ≤ rhs`
    Le,
    /// `terms ≥ rhs`
    Ge,
}

/// A named linear constraint row, `Σ coeff·var ⋈ rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    /// Row name.
    pub name: String,
    /// Left-hand-side terms as (variable, coefficient) pairs.
    pub terms: Vec<(VarId, f64)>,
    /// Comparison sense.
    pub sense: Sense,
    /// Right-hand side.
    pub rhs: f64,
}

/// A linear row enforced only when a binary variable takes a given value.
#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorConstraint {
    /// Row name.
    pub name: String,
    /// The guarding binary variable.
    pub indicator: VarId,
    /// The indicator value at which the row is enforced.
    pub active_when: bool,
    /// Left-hand-side terms as (variable, coefficient) pairs.
    pub terms: Vec<(VarId, f64)>,
    /// Comparison sense.
    pub sense: Sense,
    /// Right-hand side.
    pub rhs: f64,
}

/// Where the commitment formulation's decision variables live within an
/// instance, per unit `g` and interval `t`.
///
/// Vectors are flattened unit-major: slot `g * intervals + t`.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub(crate) unit_names: Vec<String>,
    pub(crate) intervals: usize,
    pub(crate) power: Vec<VarId>,
    pub(crate) committed: Vec<VarId>,
    pub(crate) started: Vec<VarId>,
    pub(crate) stopped: Vec<VarId>,
}

impl Layout {
    fn slot(&self, g: usize, t: usize) -> usize {
        debug_assert!(g < self.unit_names.len() && t < self.intervals);
        g * self.intervals + t
    }

    /// Unit names, in model order.
    pub fn unit_names(&self) -> &[String] {
        &self.unit_names
    }

    /// Number of intervals in the horizon.
    pub fn intervals(&self) -> usize {
        self.intervals
    }

    /// Dispatched power `p[g,t]`.
    pub fn power(&self, g: usize, t: usize) -> VarId {
        self.power[self.slot(g, t)]
    }

    /// Commitment status `u[g,t]`.
    pub fn committed(&self, g: usize, t: usize) -> VarId {
        self.committed[self.slot(g, t)]
    }

    /// Startup indicator `v[g,t]`.
    pub fn started(&self, g: usize, t: usize) -> VarId {
        self.started[self.slot(g, t)]
    }

    /// Shutdown indicator `w[g,t]`.
    pub fn stopped(&self, g: usize, t: usize) -> VarId {
        self.stopped[self.slot(g, t)]
    }
}

/// A generated optimization problem: variables, minimization objective, and
/// constraints, plus the layout locating each commitment variable.
///
/// Instances are created fresh per solve by the builder, never mutated once
/// handed to an engine, and discarded after extraction. Two builds from the
/// same scenario and formulation compare equal, which is what the
/// determinism tests pin.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelInstance {
    pub(crate) variables: Vec<Variable>,
    pub(crate) linear_objective: Vec<f64>,
    pub(crate) quadratic_objective: Vec<f64>,
    pub(crate) constraints: Vec<LinearConstraint>,
    pub(crate) indicators: Vec<IndicatorConstraint>,
    pub(crate) layout: Layout,
}

impl ModelInstance {
    pub(crate) fn new(unit_names: Vec<String>, intervals: usize) -> Self {
        Self {
            variables: Vec::new(),
            linear_objective: Vec::new(),
            quadratic_objective: Vec::new(),
            constraints: Vec::new(),
            indicators: Vec::new(),
            layout: Layout {
                unit_names,
                intervals,
                power: Vec::new(),
                committed: Vec::new(),
                started: Vec::new(),
                stopped: Vec::new(),
            },
        }
    }

    pub(crate) fn push_variable(
        &mut self,
        name: String,
        domain: Domain,
        linear: f64,
        quadratic: f64,
    ) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable { name, domain });
        self.linear_objective.push(linear);
        self.quadratic_objective.push(quadratic);
        id
    }

    pub(crate) fn push_constraint(
        &mut self,
        name: String,
        terms: Vec<(VarId, f64)>,
        sense: Sense,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            name,
            terms,
            sense,
            rhs,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn push_indicator(
        &mut self,
        name: String,
        indicator: VarId,
        active_when: bool,
        terms: Vec<(VarId, f64)>,
        sense: Sense,
        rhs: f64,
    ) {
        self.indicators.push(IndicatorConstraint {
            name,
            indicator,
            active_when,
            terms,
            sense,
            rhs,
        });
    }

    /// All variables, in column order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The variable behind a handle.
    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.0]
    }

    /// Linear objective coefficients, aligned with [`variables`](Self::variables).
    pub fn linear_objective(&self) -> &[f64] {
        &self.linear_objective
    }

    /// Diagonal quadratic objective coefficients, aligned with
    /// [`variables`](Self::variables). All zero for linearized instances.
    pub fn quadratic_objective(&self) -> &[f64] {
        &self.quadratic_objective
    }

    /// Plain linear constraint rows.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Indicator constraint rows. Empty for linearized instances.
    pub fn indicator_constraints(&self) -> &[IndicatorConstraint] {
        &self.indicators
    }

    /// The commitment variable layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Number of decision variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraint rows, indicator rows included.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len() + self.indicators.len()
    }

    /// Whether this instance has no variables and no constraints, as built
    /// from a zero-length horizon.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.num_constraints() == 0
    }

    /// Whether any diagonal quadratic objective coefficient is nonzero.
    pub fn has_quadratic_objective(&self) -> bool {
        self.quadratic_objective.iter().any(|&q| q != 0.0)
    }

    /// Evaluates the objective at a full variable assignment.
    ///
    /// Engines report their objective through this, so the number is
    /// identical across back-ends for the same assignment and independent of
    /// back-end objective accessors.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        assert_eq!(values.len(), self.variables.len());
        self.linear_objective
            .iter()
            .zip(values)
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self
                .quadratic_objective
                .iter()
                .zip(values)
                .map(|(c, x)| c * x * x)
                .sum::<f64>()
    }
}
