/// Default segment count for piecewise-linear quadratic cost approximation.
///
/// Breakpoints land on multiples of `pmax / 8`, so dispatch levels at those
/// points incur exactly their quadratic cost; between breakpoints the secant
/// interpolation over-estimates by at most `(γ·pmax²)/256` per unit-interval.
pub const DEFAULT_SEGMENTS: usize = 8;

/// How the builder should express the constructs that vary by engine
/// capability.
///
/// The commitment model needs conditional power limits and a convex
/// quadratic production cost. Engines with native support get the direct
/// encoding; pure-MILP engines get an exact linearization of the limits and
/// a convex piecewise-linear interpolation of the cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Formulation {
    /// Encoding of the commitment-conditioned power limits.
    pub power_limits: PowerLimits,
    /// Encoding of the quadratic production cost term.
    pub quadratic_cost: QuadraticCost,
}

impl Formulation {
    /// The full-capability form: native indicator constraints and a true
    /// quadratic objective.
    pub fn native() -> Self {
        Self {
            power_limits: PowerLimits::Indicator,
            quadratic_cost: QuadraticCost::Native,
        }
    }

    /// The pure-MILP form consumed by linear engines.
    pub fn linearized(segments: usize) -> Self {
        Self {
            power_limits: PowerLimits::Linearized,
            quadratic_cost: QuadraticCost::PiecewiseLinear { segments },
        }
    }
}

impl Default for Formulation {
    fn default() -> Self {
        Self::native()
    }
}

/// Encoding of the `u = 1 ⇒ pmin ≤ p ≤ pmax`, `u = 0 ⇒ p = 0` rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerLimits {
    /// Three indicator constraints per unit and interval, for engines with
    /// first-class indicator support.
    Indicator,
    /// The equivalent linear pair `pmin·u ≤ p ≤ pmax·u`. Exact: offline
    /// forces `p = 0` through the upper row, and online imposes no floor
    /// beyond `pmin`.
    Linearized,
}

/// Encoding of the `γ·p²` production cost term.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuadraticCost {
    /// Keep `γ` as a diagonal quadratic objective coefficient on `p`.
    Native,
    /// Replace `γ·p²` by its secant interpolation over `[0, pmax]`:
    /// `segments` extra fill variables per unit and interval, with strictly
    /// increasing objective slopes. Convexity makes the fills stack in
    /// order without any extra binaries, and the increasing slopes keep
    /// marginal cost monotone.
    PiecewiseLinear {
        /// Number of equal-width segments; must be at least 1.
        segments: usize,
    },
}
