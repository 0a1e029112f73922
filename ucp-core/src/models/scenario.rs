use super::Unit;
use thiserror::Error;

#[cfg(feature = "serde")]
use crate::Map;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A complete scheduling problem: a thermal fleet plus per-interval load and
/// renewable supply forecasts over an ordered horizon of equal-length
/// intervals.
///
/// A `Scenario` can only be obtained through [`Scenario::new`] or by
/// deserializing the raw input format, both of which validate every rule in
/// [`ValidationError`]. Holding one is therefore proof that the data is
/// consistent, which is what lets the model builder downstream stay total.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawScenario", into = "RawScenario")
)]
pub struct Scenario {
    units: Vec<Unit>,
    load: Vec<f64>,
    solar: Vec<f64>,
}

impl Scenario {
    /// Assembles a scenario from its parts, checking every invariant the
    /// rest of the system relies on:
    ///
    /// - unit names are non-empty and unique;
    /// - `0 <= pmin <= pmax` and all costs are finite and non-negative;
    /// - the two forecasts have equal length, with finite non-negative
    ///   entries;
    /// - net demand `load[t] - solar[t]` is non-negative in every interval
    ///   (there is no curtailment or storage in this model, so renewable
    ///   supply beyond the load cannot be absorbed).
    pub fn new(units: Vec<Unit>, load: Vec<f64>, solar: Vec<f64>) -> Result<Self, ValidationError> {
        for (i, unit) in units.iter().enumerate() {
            if unit.name.is_empty() {
                return Err(ValidationError::EmptyUnitName);
            }
            if units[..i].iter().any(|other| other.name == unit.name) {
                return Err(ValidationError::DuplicateUnit(unit.name.clone()));
            }
            if !(unit.pmin.is_finite() && unit.pmax.is_finite())
                || unit.pmin < 0.0
                || unit.pmax < unit.pmin
            {
                return Err(ValidationError::PowerBounds {
                    unit: unit.name.clone(),
                    pmin: unit.pmin,
                    pmax: unit.pmax,
                });
            }
            for (field, value) in [
                ("no_load_cost", unit.no_load_cost),
                ("linear_cost", unit.linear_cost),
                ("quadratic_cost", unit.quadratic_cost),
                ("startup_cost", unit.startup_cost),
                ("shutdown_cost", unit.shutdown_cost),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationError::Cost {
                        unit: unit.name.clone(),
                        field,
                        value,
                    });
                }
            }
        }

        if load.len() != solar.len() {
            return Err(ValidationError::ForecastLength {
                load: load.len(),
                solar: solar.len(),
            });
        }
        for (t, (&l, &s)) in load.iter().zip(solar.iter()).enumerate() {
            for (field, value) in [("load", l), ("solar", s)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationError::Forecast {
                        interval: t,
                        field,
                        value,
                    });
                }
            }
            if s > l {
                return Err(ValidationError::NegativeNetDemand {
                    interval: t,
                    load: l,
                    solar: s,
                });
            }
        }

        Ok(Self { units, load, solar })
    }

    /// The thermal fleet, in load order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Load forecast, one entry per interval (MW).
    pub fn load(&self) -> &[f64] {
        &self.load
    }

    /// Renewable supply forecast, one entry per interval (MW).
    pub fn solar(&self) -> &[f64] {
        &self.solar
    }

    /// Number of intervals in the planning horizon.
    pub fn intervals(&self) -> usize {
        self.load.len()
    }

    /// Net demand the thermal fleet must cover in interval `t`: the load
    /// forecast less the must-take renewable supply.
    pub fn net_demand(&self, t: usize) -> f64 {
        self.load[t] - self.solar[t]
    }
}

/// The ways in which scenario data can be malformed or inconsistent.
///
/// These are loader errors: fatal, raised before any model is built, and
/// never recovered from within the core.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A unit was given an empty name.
    #[error("unit with empty name")]
    EmptyUnitName,
    /// Two units share a name.
    #[error("duplicate unit `{0}`")]
    DuplicateUnit(String),
    /// Power bounds violate `0 <= pmin <= pmax`.
    #[error("unit `{unit}`: power bounds must satisfy 0 <= pmin <= pmax, got [{pmin}, {pmax}]")]
    PowerBounds {
        /// Offending unit name.
        unit: String,
        /// Declared minimum power.
        pmin: f64,
        /// Declared maximum power.
        pmax: f64,
    },
    /// A cost coefficient is negative or not finite.
    #[error("unit `{unit}`: {field} must be finite and non-negative, got {value}")]
    Cost {
        /// Offending unit name.
        unit: String,
        /// Name of the offending cost field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The raw initial commitment status is neither 0 nor 1.
    #[error("unit `{unit}`: initial status must be 0 or 1, got {value}")]
    InitialStatus {
        /// Offending unit name.
        unit: String,
        /// The rejected value.
        value: u8,
    },
    /// The load and solar forecasts disagree on the horizon length.
    #[error("forecast length mismatch: {load} load intervals vs {solar} solar intervals")]
    ForecastLength {
        /// Number of load entries.
        load: usize,
        /// Number of solar entries.
        solar: usize,
    },
    /// A forecast entry is negative or not finite.
    #[error("interval {interval}: {field} must be finite and non-negative, got {value}")]
    Forecast {
        /// Offending interval index.
        interval: usize,
        /// Which forecast the value came from.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Renewable supply exceeds load, leaving negative net demand that the
    /// fleet cannot absorb.
    #[error("interval {interval}: renewable supply {solar} exceeds load {load}")]
    NegativeNetDemand {
        /// Offending interval index.
        interval: usize,
        /// Load forecast at that interval.
        load: f64,
        /// Solar forecast at that interval.
        solar: f64,
    },
}

// Raw input format: units keyed by name, cost and limit fields flattened
// into one record per unit. Serde round-trips through these structs so that
// every deserialized Scenario has passed validation.

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawUnit {
    pmin: f64,
    pmax: f64,
    no_load_cost: f64,
    linear_cost: f64,
    quadratic_cost: f64,
    startup_cost: f64,
    shutdown_cost: f64,
    initial_status: u8,
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawScenario {
    units: Map<String, RawUnit>,
    load: Vec<f64>,
    solar: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawScenario> for Scenario {
    type Error = ValidationError;

    fn try_from(raw: RawScenario) -> Result<Self, Self::Error> {
        let units = raw
            .units
            .into_iter()
            .map(|(name, unit)| {
                let initially_on = match unit.initial_status {
                    0 => false,
                    1 => true,
                    value => return Err(ValidationError::InitialStatus { unit: name, value }),
                };
                Ok(Unit {
                    name,
                    pmin: unit.pmin,
                    pmax: unit.pmax,
                    no_load_cost: unit.no_load_cost,
                    linear_cost: unit.linear_cost,
                    quadratic_cost: unit.quadratic_cost,
                    startup_cost: unit.startup_cost,
                    shutdown_cost: unit.shutdown_cost,
                    initially_on,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Scenario::new(units, raw.load, raw.solar)
    }
}

#[cfg(feature = "serde")]
impl From<Scenario> for RawScenario {
    fn from(scenario: Scenario) -> Self {
        RawScenario {
            units: scenario
                .units
                .into_iter()
                .map(|unit| {
                    (
                        unit.name,
                        RawUnit {
                            pmin: unit.pmin,
                            pmax: unit.pmax,
                            no_load_cost: unit.no_load_cost,
                            linear_cost: unit.linear_cost,
                            quadratic_cost: unit.quadratic_cost,
                            startup_cost: unit.startup_cost,
                            shutdown_cost: unit.shutdown_cost,
                            initial_status: unit.initially_on as u8,
                        },
                    )
                })
                .collect(),
            load: scenario.load,
            solar: scenario.solar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str) -> Unit {
        Unit {
            name: name.to_string(),
            pmin: 1.5,
            pmax: 5.0,
            no_load_cost: 5.0,
            linear_cost: 0.5,
            quadratic_cost: 1.0,
            startup_cost: 2.0,
            shutdown_cost: 1.0,
            initially_on: false,
        }
    }

    #[test]
    fn accepts_consistent_data() {
        let scenario =
            Scenario::new(vec![unit("gen1")], vec![4.0, 6.0], vec![0.0, 1.0]).unwrap();
        assert_eq!(scenario.intervals(), 2);
        assert_eq!(scenario.net_demand(1), 5.0);
    }

    #[test]
    fn accepts_empty_horizon() {
        let scenario = Scenario::new(vec![unit("gen1")], vec![], vec![]).unwrap();
        assert_eq!(scenario.intervals(), 0);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Scenario::new(vec![unit("gen1"), unit("gen1")], vec![], vec![]).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateUnit(name) if name == "gen1"));
    }

    #[test]
    fn rejects_inverted_power_bounds() {
        let mut bad = unit("gen1");
        bad.pmax = 1.0;
        let err = Scenario::new(vec![bad], vec![], vec![]).unwrap_err();
        assert!(matches!(err, ValidationError::PowerBounds { .. }));
    }

    #[test]
    fn rejects_negative_costs() {
        let mut bad = unit("gen1");
        bad.startup_cost = -2.0;
        let err = Scenario::new(vec![bad], vec![], vec![]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Cost {
                field: "startup_cost",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_finite_forecast() {
        let err =
            Scenario::new(vec![unit("gen1")], vec![f64::NAN], vec![0.0]).unwrap_err();
        assert!(matches!(err, ValidationError::Forecast { field: "load", .. }));
    }

    #[test]
    fn rejects_mismatched_forecasts() {
        let err = Scenario::new(vec![unit("gen1")], vec![4.0, 4.0], vec![0.0]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ForecastLength { load: 2, solar: 1 }
        ));
    }

    #[test]
    fn rejects_solar_in_excess_of_load() {
        let err = Scenario::new(vec![unit("gen1")], vec![4.0, 2.0], vec![0.0, 3.5]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NegativeNetDemand { interval: 1, .. }
        ));
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    const INPUT: &str = r#"{
        "units": {
            "gen1": {
                "pmin": 1.5, "pmax": 5.0,
                "no_load_cost": 5.0, "linear_cost": 0.5, "quadratic_cost": 1.0,
                "startup_cost": 2.0, "shutdown_cost": 1.0,
                "initial_status": 0
            }
        },
        "load": [4.0, 6.0],
        "solar": [0.0, 1.0]
    }"#;

    #[test]
    fn deserializes_and_validates() {
        let scenario: Scenario = serde_json::from_str(INPUT).unwrap();
        assert_eq!(scenario.units().len(), 1);
        assert_eq!(scenario.units()[0].name, "gen1");
        assert!(!scenario.units()[0].initially_on);
    }

    #[test]
    fn round_trips() {
        let scenario: Scenario = serde_json::from_str(INPUT).unwrap();
        let text = serde_json::to_string(&scenario).unwrap();
        let again: Scenario = serde_json::from_str(&text).unwrap();
        assert_eq!(scenario, again);
    }

    #[test]
    fn rejects_bad_initial_status() {
        let err = serde_json::from_str::<Scenario>(&INPUT.replace(
            r#""initial_status": 0"#,
            r#""initial_status": 2"#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("initial status must be 0 or 1"));
    }

    #[test]
    fn rejects_negative_net_demand() {
        let err = serde_json::from_str::<Scenario>(&INPUT.replace(
            "\"solar\": [0.0, 1.0]",
            "\"solar\": [0.0, 8.0]",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("exceeds load"));
    }
}
