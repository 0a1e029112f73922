use crate::{Domain, Formulation, ModelInstance, PowerLimits, QuadraticCost, Sense, VarId};
use ucp_core::models::Scenario;

/// Builds the unit-commitment model for a scenario.
///
/// This is a pure function of its inputs: a validated [`Scenario`] plus the
/// [`Formulation`] the target engine advertises. It raises no errors — every
/// precondition is enforced by the scenario loader — and two calls with the
/// same inputs produce structurally identical instances.
///
/// The model minimizes, over all units `g` and intervals `t`,
///
/// ```text
/// Σ [ γ·p² + β·p + α·u + δ·v + ζ·w ]
/// ```
///
/// subject to per-interval power balance against net demand, power limits
/// conditioned on commitment status, and the state-transition logic tying
/// `u`, `v`, `w` into a single consistent on/off trace anchored at each
/// unit's pre-horizon status.
///
/// A zero-length horizon yields an empty instance: no variables, no
/// constraints, trivially optimal at cost 0.
pub fn build_commitment(scenario: &Scenario, formulation: &Formulation) -> ModelInstance {
    let units = scenario.units();
    let horizon = scenario.intervals();

    let mut model = ModelInstance::new(units.iter().map(|u| u.name.clone()).collect(), horizon);

    // Decision variables, one block per kind: dispatched power p, startup
    // indicator v, shutdown indicator w, commitment status u. Power is
    // declared on [0, ∞); its effective range comes from the limit rows.
    for unit in units {
        let quadratic = match formulation.quadratic_cost {
            QuadraticCost::Native => unit.quadratic_cost,
            QuadraticCost::PiecewiseLinear { .. } => 0.0,
        };
        for t in 0..horizon {
            let id = model.push_variable(
                format!("p_{}_{t}", unit.name),
                Domain::Continuous {
                    lb: 0.0,
                    ub: f64::INFINITY,
                },
                unit.linear_cost,
                quadratic,
            );
            model.layout.power.push(id);
        }
    }
    for unit in units {
        for t in 0..horizon {
            let id = model.push_variable(
                format!("v_{}_{t}", unit.name),
                Domain::Binary,
                unit.startup_cost,
                0.0,
            );
            model.layout.started.push(id);
        }
    }
    for unit in units {
        for t in 0..horizon {
            let id = model.push_variable(
                format!("w_{}_{t}", unit.name),
                Domain::Binary,
                unit.shutdown_cost,
                0.0,
            );
            model.layout.stopped.push(id);
        }
    }
    for unit in units {
        for t in 0..horizon {
            let id = model.push_variable(
                format!("u_{}_{t}", unit.name),
                Domain::Binary,
                unit.no_load_cost,
                0.0,
            );
            model.layout.committed.push(id);
        }
    }

    // Piecewise fill variables for engines without a quadratic objective:
    // γ·p² over [0, pmax] becomes `segments` equal-width fills with secant
    // slopes γ·(x0 + x1). The slopes strictly increase, so convexity packs
    // the fills in order and the interpolation is exact at breakpoints.
    let mut links: Vec<(String, Vec<(VarId, f64)>)> = Vec::new();
    if let QuadraticCost::PiecewiseLinear { segments } = formulation.quadratic_cost {
        assert!(segments > 0, "piecewise formulation needs at least one segment");
        for (g, unit) in units.iter().enumerate() {
            if unit.quadratic_cost == 0.0 || unit.pmax == 0.0 {
                continue;
            }
            let width = unit.pmax / segments as f64;
            for t in 0..horizon {
                let mut terms = vec![(model.layout.power(g, t), 1.0)];
                for k in 0..segments {
                    let x0 = k as f64 * width;
                    let x1 = x0 + width;
                    let slope = unit.quadratic_cost * (x0 + x1);
                    let id = model.push_variable(
                        format!("pw_{}_{t}_{k}", unit.name),
                        Domain::Continuous { lb: 0.0, ub: width },
                        slope,
                        0.0,
                    );
                    terms.push((id, -1.0));
                }
                links.push((format!("piecewise_link_{}_{t}", unit.name), terms));
            }
        }
    }

    // Power balance: the thermal fleet covers net demand in every interval.
    // Renewable supply is must-take, so a negative net demand (excluded by
    // the loader) would make the instance infeasible here, never clipped.
    for t in 0..horizon {
        let terms = (0..units.len())
            .map(|g| (model.layout.power(g, t), 1.0))
            .collect();
        model.push_constraint(
            format!("power_balance_{t}"),
            terms,
            Sense::Eq,
            scenario.net_demand(t),
        );
    }

    // Physical limits, conditioned on commitment status.
    for (g, unit) in units.iter().enumerate() {
        for t in 0..horizon {
            let p = model.layout.power(g, t);
            let u = model.layout.committed(g, t);
            match formulation.power_limits {
                PowerLimits::Indicator => {
                    model.push_indicator(
                        format!("min_power_{}_{t}", unit.name),
                        u,
                        true,
                        vec![(p, 1.0)],
                        Sense::Ge,
                        unit.pmin,
                    );
                    model.push_indicator(
                        format!("max_power_{}_{t}", unit.name),
                        u,
                        true,
                        vec![(p, 1.0)],
                        Sense::Le,
                        unit.pmax,
                    );
                    model.push_indicator(
                        format!("offline_power_{}_{t}", unit.name),
                        u,
                        false,
                        vec![(p, 1.0)],
                        Sense::Eq,
                        0.0,
                    );
                }
                PowerLimits::Linearized => {
                    // pmin·u ≤ p ≤ pmax·u. The upper row already forces
                    // p = 0 when offline, so no third row is needed.
                    model.push_constraint(
                        format!("min_power_{}_{t}", unit.name),
                        vec![(p, 1.0), (u, -unit.pmin)],
                        Sense::Ge,
                        0.0,
                    );
                    model.push_constraint(
                        format!("max_power_{}_{t}", unit.name),
                        vec![(p, 1.0), (u, -unit.pmax)],
                        Sense::Le,
                        0.0,
                    );
                }
            }
        }
    }

    // State-transition logic: the change in commitment between consecutive
    // intervals equals started minus stopped. The t = 0 row anchors against
    // the pre-horizon status u0, not a nonexistent interval -1.
    for (g, unit) in units.iter().enumerate() {
        for t in 0..horizon {
            let u = model.layout.committed(g, t);
            let v = model.layout.started(g, t);
            let w = model.layout.stopped(g, t);
            let (terms, rhs) = if t == 0 {
                (
                    vec![(u, 1.0), (v, -1.0), (w, 1.0)],
                    if unit.initially_on { 1.0 } else { 0.0 },
                )
            } else {
                (
                    vec![
                        (u, 1.0),
                        (model.layout.committed(g, t - 1), -1.0),
                        (v, -1.0),
                        (w, 1.0),
                    ],
                    0.0,
                )
            };
            model.push_constraint(format!("state_transition_{}_{t}", unit.name), terms, Sense::Eq, rhs);
            model.push_constraint(
                format!("start_stop_exclusive_{}_{t}", unit.name),
                vec![(v, 1.0), (w, 1.0)],
                Sense::Le,
                1.0,
            );
        }
    }

    for (name, terms) in links {
        model.push_constraint(name, terms, Sense::Eq, 0.0);
    }

    tracing::debug!(
        variables = model.num_variables(),
        rows = model.constraints.len(),
        indicator_rows = model.indicators.len(),
        "built commitment model"
    );

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinearConstraint;
    use ucp_core::models::{Scenario, Unit};

    fn unit(name: &str, quadratic_cost: f64, initially_on: bool) -> Unit {
        Unit {
            name: name.to_string(),
            pmin: 1.5,
            pmax: 5.0,
            no_load_cost: 5.0,
            linear_cost: 0.5,
            quadratic_cost,
            startup_cost: 2.0,
            shutdown_cost: 1.0,
            initially_on,
        }
    }

    fn two_units() -> Scenario {
        Scenario::new(
            vec![unit("alpha", 1.0, true), unit("beta", 0.0, false)],
            vec![4.0, 6.0, 8.0],
            vec![0.0, 1.0, 0.0],
        )
        .unwrap()
    }

    fn row<'a>(model: &'a ModelInstance, name: &str) -> &'a LinearConstraint {
        model
            .constraints()
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("no row named {name}"))
    }

    #[test]
    fn native_formulation_counts() {
        let model = build_commitment(&two_units(), &Formulation::native());
        // p, v, w, u per unit and interval
        assert_eq!(model.num_variables(), 4 * 2 * 3);
        // balance per interval, transition and exclusivity per unit-interval
        assert_eq!(model.constraints().len(), 3 + 2 * 2 * 3);
        // three conditional limit rows per unit-interval
        assert_eq!(model.indicator_constraints().len(), 3 * 2 * 3);
        assert!(model.has_quadratic_objective());
    }

    #[test]
    fn linearized_formulation_counts() {
        let model = build_commitment(&two_units(), &Formulation::linearized(4));
        // only alpha has a quadratic cost, so only alpha gets fills
        assert_eq!(model.num_variables(), 4 * 2 * 3 + 4 * 3);
        // balance + two limit rows per unit-interval + logic + links
        assert_eq!(model.constraints().len(), 3 + 2 * 2 * 3 + 2 * 2 * 3 + 3);
        assert!(model.indicator_constraints().is_empty());
        assert!(!model.has_quadratic_objective());
    }

    #[test]
    fn quadratic_coefficients_sit_on_power_columns() {
        let model = build_commitment(&two_units(), &Formulation::native());
        let layout = model.layout();
        for t in 0..3 {
            assert_eq!(model.quadratic_objective()[layout.power(0, t).index()], 1.0);
            assert_eq!(model.quadratic_objective()[layout.power(1, t).index()], 0.0);
        }
    }

    #[test]
    fn objective_coefficients_match_unit_costs() {
        let model = build_commitment(&two_units(), &Formulation::native());
        let layout = model.layout();
        let lin = model.linear_objective();
        assert_eq!(lin[layout.power(0, 0).index()], 0.5);
        assert_eq!(lin[layout.committed(0, 0).index()], 5.0);
        assert_eq!(lin[layout.started(0, 0).index()], 2.0);
        assert_eq!(lin[layout.stopped(0, 0).index()], 1.0);
    }

    #[test]
    fn balance_rows_cover_net_demand() {
        let model = build_commitment(&two_units(), &Formulation::native());
        let layout = model.layout();
        let balance = row(&model, "power_balance_1");
        assert_eq!(balance.sense, Sense::Eq);
        assert_eq!(balance.rhs, 5.0);
        assert_eq!(
            balance.terms,
            vec![(layout.power(0, 1), 1.0), (layout.power(1, 1), 1.0)]
        );
    }

    #[test]
    fn transition_boundary_anchors_at_initial_status() {
        let model = build_commitment(&two_units(), &Formulation::native());
        let layout = model.layout();

        // alpha starts the horizon online, beta offline
        let alpha = row(&model, "state_transition_alpha_0");
        assert_eq!(alpha.rhs, 1.0);
        assert_eq!(
            alpha.terms,
            vec![
                (layout.committed(0, 0), 1.0),
                (layout.started(0, 0), -1.0),
                (layout.stopped(0, 0), 1.0),
            ]
        );
        assert_eq!(row(&model, "state_transition_beta_0").rhs, 0.0);

        // interior rows difference against the previous interval instead
        let interior = row(&model, "state_transition_alpha_2");
        assert_eq!(interior.rhs, 0.0);
        assert!(
            interior
                .terms
                .contains(&(layout.committed(0, 1), -1.0))
        );
    }

    #[test]
    fn linearized_limits_scale_with_commitment() {
        let model = build_commitment(&two_units(), &Formulation::linearized(4));
        let layout = model.layout();
        let min = row(&model, "min_power_alpha_0");
        assert_eq!(min.sense, Sense::Ge);
        assert_eq!(
            min.terms,
            vec![(layout.power(0, 0), 1.0), (layout.committed(0, 0), -1.5)]
        );
        let max = row(&model, "max_power_alpha_0");
        assert_eq!(max.sense, Sense::Le);
        assert_eq!(
            max.terms,
            vec![(layout.power(0, 0), 1.0), (layout.committed(0, 0), -5.0)]
        );
    }

    #[test]
    fn indicator_limits_guard_on_commitment() {
        let model = build_commitment(&two_units(), &Formulation::native());
        let layout = model.layout();
        let offline = model
            .indicator_constraints()
            .iter()
            .find(|c| c.name == "offline_power_beta_2")
            .unwrap();
        assert_eq!(offline.indicator, layout.committed(1, 2));
        assert!(!offline.active_when);
        assert_eq!(offline.sense, Sense::Eq);
        assert_eq!(offline.rhs, 0.0);
    }

    #[test]
    fn piecewise_fills_cover_pmax_with_increasing_slopes() {
        let model = build_commitment(&two_units(), &Formulation::linearized(4));
        let link = row(&model, "piecewise_link_alpha_0");
        // p minus the four fills
        assert_eq!(link.terms.len(), 5);

        let fills: Vec<VarId> = link.terms[1..].iter().map(|&(id, _)| id).collect();
        let widths: Vec<f64> = fills
            .iter()
            .map(|&id| match model.variable(id).domain {
                Domain::Continuous { ub, .. } => ub,
                Domain::Binary => panic!("fill must be continuous"),
            })
            .collect();
        assert_eq!(widths.iter().sum::<f64>(), 5.0);

        let slopes: Vec<f64> = fills
            .iter()
            .map(|&id| model.linear_objective()[id.index()])
            .collect();
        assert!(slopes.windows(2).all(|pair| pair[0] < pair[1]));

        // packing fills in order reproduces γ·p² exactly at breakpoints
        let mut values = vec![0.0; model.num_variables()];
        for &id in &fills[..2] {
            values[id.index()] = 1.25;
        }
        let cost = model.objective_value(&values);
        assert!((cost - 2.5 * 2.5).abs() < 1e-12);
    }

    #[test]
    fn empty_horizon_builds_empty_instance() {
        let scenario =
            Scenario::new(vec![unit("alpha", 1.0, false)], vec![], vec![]).unwrap();
        for formulation in [Formulation::native(), Formulation::linearized(8)] {
            let model = build_commitment(&scenario, &formulation);
            assert!(model.is_empty());
            assert_eq!(model.num_variables(), 0);
            assert_eq!(model.num_constraints(), 0);
        }
    }

    #[test]
    fn rebuilds_are_structurally_identical() {
        let scenario = two_units();
        for formulation in [Formulation::native(), Formulation::linearized(8)] {
            assert_eq!(
                build_commitment(&scenario, &formulation),
                build_commitment(&scenario, &formulation)
            );
        }
    }
}
