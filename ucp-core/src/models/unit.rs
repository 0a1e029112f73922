/// A dispatchable thermal generator.
///
/// The cost of running a unit for one interval at power `p` is
/// `quadratic_cost * p^2 + linear_cost * p + no_load_cost`, with
/// `startup_cost` and `shutdown_cost` charged once per off-to-on and
/// on-to-off transition respectively.
///
/// Units are immutable once loaded into a [`Scenario`](super::Scenario);
/// the fleet is fixed for the whole planning horizon.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    /// Display name, unique within a scenario.
    pub name: String,
    /// Minimum stable generation while online (MW).
    pub pmin: f64,
    /// Maximum generation (MW).
    pub pmax: f64,
    /// Fixed cost per interval while online ($/h).
    pub no_load_cost: f64,
    /// Linear production cost ($/MWh).
    pub linear_cost: f64,
    /// Quadratic production cost ($/MWh²).
    pub quadratic_cost: f64,
    /// One-time cost of an off-to-on transition ($).
    pub startup_cost: f64,
    /// One-time cost of an on-to-off transition ($).
    pub shutdown_cost: f64,
    /// Commitment status in the interval preceding the horizon.
    pub initially_on: bool,
}

impl Unit {
    /// Production cost of dispatching this unit at power `p` for one
    /// interval, excluding the no-load, startup, and shutdown components.
    pub fn dispatch_cost(&self, p: f64) -> f64 {
        self.quadratic_cost * p * p + self.linear_cost * p
    }
}
