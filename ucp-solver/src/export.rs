use crate::{Domain, ModelInstance, Sense, VarId};
use std::io::Write;

// Both writers embed variable and row names directly, so they assume the
// unit names feeding the builder are identifier-like. Names with spaces or
// LP/MPS operator characters would need escaping that neither format
// standardizes.

fn write_terms(
    buffer: &mut impl Write,
    model: &ModelInstance,
    terms: &[(VarId, f64)],
) -> Result<(), std::io::Error> {
    for (i, &(id, coeff)) in terms.iter().enumerate() {
        let name = &model.variable(id).name;
        if i == 0 {
            if coeff < 0.0 {
                write!(buffer, "- {} {name}", -coeff)?;
            } else {
                write!(buffer, "{coeff} {name}")?;
            }
        } else if coeff < 0.0 {
            write!(buffer, " - {} {name}", -coeff)?;
        } else {
            write!(buffer, " + {coeff} {name}")?;
        }
    }
    Ok(())
}

fn sense_str(sense: Sense) -> &'static str {
    match sense {
        Sense::Eq => "=",
        Sense::Le => "<=",
        Sense::Ge => ">=",
    }
}

/// Export a built commitment model to CPLEX-LP format.
///
/// Indicator constraints use the `bin = value -> row` syntax and the
/// quadratic objective the `[ ... ] / 2` block (with doubled coefficients),
/// both as consumed by the major commercial solvers.
pub fn export_lp(
    model: &ModelInstance,
    buffer: &mut impl Write,
) -> Result<(), std::io::Error> {
    writeln!(buffer, "\\ unit commitment model")?;
    writeln!(buffer, "Minimize")?;

    write!(buffer, " obj: ")?;
    let mut first = true;
    for (i, &coeff) in model.linear_objective().iter().enumerate() {
        if coeff == 0.0 {
            continue;
        }
        let name = &model.variables()[i].name;
        if first {
            write!(buffer, "{coeff} {name}")?;
            first = false;
        } else {
            write!(buffer, " + {coeff} {name}")?;
        }
    }
    if model.has_quadratic_objective() {
        write!(buffer, " + [ ")?;
        let mut first = true;
        for (i, &coeff) in model.quadratic_objective().iter().enumerate() {
            if coeff == 0.0 {
                continue;
            }
            let name = &model.variables()[i].name;
            if !first {
                write!(buffer, " + ")?;
            }
            write!(buffer, "{} {name} ^ 2", 2.0 * coeff)?;
            first = false;
        }
        write!(buffer, " ] / 2")?;
    }
    writeln!(buffer)?;

    writeln!(buffer, "Subject To")?;
    for row in model.constraints() {
        write!(buffer, " {}: ", row.name)?;
        write_terms(buffer, model, &row.terms)?;
        writeln!(buffer, " {} {}", sense_str(row.sense), row.rhs)?;
    }
    for row in model.indicator_constraints() {
        write!(
            buffer,
            " {}: {} = {} -> ",
            row.name,
            model.variable(row.indicator).name,
            row.active_when as u8,
        )?;
        write_terms(buffer, model, &row.terms)?;
        writeln!(buffer, " {} {}", sense_str(row.sense), row.rhs)?;
    }

    writeln!(buffer, "Bounds")?;
    for var in model.variables() {
        if let Domain::Continuous { lb, ub } = var.domain {
            match (lb != 0.0, ub.is_finite()) {
                (true, true) => writeln!(buffer, " {lb} <= {} <= {ub}", var.name)?,
                (true, false) => writeln!(buffer, " {lb} <= {}", var.name)?,
                (false, true) => writeln!(buffer, " {} <= {ub}", var.name)?,
                // the LP default: 0 <= x < +inf
                (false, false) => {}
            }
        }
    }

    let binaries: Vec<&str> = model
        .variables()
        .iter()
        .filter(|var| var.domain == Domain::Binary)
        .map(|var| var.name.as_str())
        .collect();
    if !binaries.is_empty() {
        writeln!(buffer, "Binaries")?;
        writeln!(buffer, " {}", binaries.join(" "))?;
    }

    writeln!(buffer, "End")
}

/// Export a built commitment model to MPS format.
///
/// Integer columns sit between `'INTORG'`/`'INTEND'` markers, the quadratic
/// objective goes into a `QMATRIX` section with doubled diagonal entries,
/// and indicator constraints into the `INDICATORS` extension section.
pub fn export_mps(
    model: &ModelInstance,
    buffer: &mut impl Write,
) -> Result<(), std::io::Error> {
    writeln!(buffer, "NAME unit_commitment")?;

    writeln!(buffer, "ROWS")?;
    writeln!(buffer, " N  obj")?;
    let all_rows = model
        .constraints()
        .iter()
        .map(|row| (row.name.as_str(), row.sense, row.rhs))
        .chain(
            model
                .indicator_constraints()
                .iter()
                .map(|row| (row.name.as_str(), row.sense, row.rhs)),
        );
    for (name, sense, _) in all_rows.clone() {
        let tag = match sense {
            Sense::Eq => "E",
            Sense::Le => "L",
            Sense::Ge => "G",
        };
        writeln!(buffer, " {tag}  {name}")?;
    }

    // MPS is column-major, so gather every (row, coefficient) pair per
    // variable before writing.
    let mut columns: Vec<Vec<(&str, f64)>> = model
        .linear_objective()
        .iter()
        .map(|&coeff| {
            if coeff != 0.0 {
                vec![("obj", coeff)]
            } else {
                Vec::new()
            }
        })
        .collect();
    let constraint_terms = model
        .constraints()
        .iter()
        .map(|row| (row.name.as_str(), &row.terms))
        .chain(
            model
                .indicator_constraints()
                .iter()
                .map(|row| (row.name.as_str(), &row.terms)),
        );
    for (name, terms) in constraint_terms {
        for &(id, coeff) in terms {
            columns[id.index()].push((name, coeff));
        }
    }

    writeln!(buffer, "COLUMNS")?;
    let mut integer_block = false;
    for (var, entries) in model.variables().iter().zip(columns.iter()) {
        let is_integer = var.domain == Domain::Binary;
        if is_integer != integer_block {
            let marker = if is_integer { "'INTORG'" } else { "'INTEND'" };
            writeln!(buffer, "    MARKER  'MARKER'  {marker}")?;
            integer_block = is_integer;
        }
        if entries.is_empty() {
            // a column must appear somewhere to be declared
            writeln!(buffer, "    {}  obj  0", var.name)?;
        }
        for (row, coeff) in entries {
            writeln!(buffer, "    {}  {row}  {coeff}", var.name)?;
        }
    }
    if integer_block {
        writeln!(buffer, "    MARKER  'MARKER'  'INTEND'")?;
    }

    writeln!(buffer, "RHS")?;
    for (name, _, rhs) in all_rows {
        if rhs != 0.0 {
            writeln!(buffer, "    RHS  {name}  {rhs}")?;
        }
    }

    writeln!(buffer, "BOUNDS")?;
    for var in model.variables() {
        match var.domain {
            Domain::Binary => writeln!(buffer, " BV BND  {}", var.name)?,
            Domain::Continuous { lb, ub } => {
                if lb != 0.0 {
                    writeln!(buffer, " LO BND  {}  {lb}", var.name)?;
                }
                if ub.is_finite() {
                    writeln!(buffer, " UP BND  {}  {ub}", var.name)?;
                }
            }
        }
    }

    if model.has_quadratic_objective() {
        writeln!(buffer, "QMATRIX")?;
        for (var, &coeff) in model.variables().iter().zip(model.quadratic_objective()) {
            if coeff != 0.0 {
                writeln!(buffer, "    {}  {}  {}", var.name, var.name, 2.0 * coeff)?;
            }
        }
    }

    if !model.indicator_constraints().is_empty() {
        writeln!(buffer, "INDICATORS")?;
        for row in model.indicator_constraints() {
            writeln!(
                buffer,
                " IF  {}  {}  {}",
                row.name,
                model.variable(row.indicator).name,
                row.active_when as u8,
            )?;
        }
    }

    writeln!(buffer, "ENDATA")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_commitment, Formulation};
    use ucp_core::models::{Scenario, Unit};

    fn scenario() -> Scenario {
        Scenario::new(
            vec![Unit {
                name: "gen1".to_string(),
                pmin: 1.5,
                pmax: 5.0,
                no_load_cost: 5.0,
                linear_cost: 0.5,
                quadratic_cost: 1.0,
                startup_cost: 2.0,
                shutdown_cost: 1.0,
                initially_on: false,
            }],
            vec![4.0],
            vec![0.0],
        )
        .unwrap()
    }

    fn render(formulation: Formulation, mps: bool) -> String {
        let model = build_commitment(&scenario(), &formulation);
        let mut buffer = Vec::new();
        if mps {
            export_mps(&model, &mut buffer).unwrap();
        } else {
            export_lp(&model, &mut buffer).unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn lp_linearized_has_rows_and_binaries() {
        let text = render(Formulation::linearized(4), false);
        assert!(text.starts_with("\\ unit commitment model\nMinimize"));
        assert!(text.contains("power_balance_0: 1 p_gen1_0 = 4"));
        assert!(text.contains("max_power_gen1_0: 1 p_gen1_0 - 5 u_gen1_0 <= 0"));
        assert!(text.contains("\nBinaries\n"));
        assert!(text.contains("u_gen1_0"));
        assert!(text.ends_with("End\n"));
        // linearized instances carry no indicator arrows or quadratic block
        assert!(!text.contains("->"));
        assert!(!text.contains("^ 2"));
        // fills are bounded by the segment width
        assert!(text.contains("pw_gen1_0_0 <= 1.25"));
    }

    #[test]
    fn lp_native_has_indicators_and_quadratic_block() {
        let text = render(Formulation::native(), false);
        assert!(text.contains("[ 2 p_gen1_0 ^ 2 ] / 2"));
        assert!(text.contains("min_power_gen1_0: u_gen1_0 = 1 -> 1 p_gen1_0 >= 1.5"));
        assert!(text.contains("offline_power_gen1_0: u_gen1_0 = 0 -> 1 p_gen1_0 = 0"));
    }

    #[test]
    fn mps_sections_are_complete() {
        let text = render(Formulation::native(), true);
        assert!(text.starts_with("NAME unit_commitment\nROWS\n N  obj\n"));
        assert!(text.contains("'INTORG'"));
        assert!(text.contains("'INTEND'"));
        assert!(text.contains("    RHS  power_balance_0  4"));
        assert!(text.contains(" BV BND  u_gen1_0"));
        assert!(text.contains("QMATRIX"));
        assert!(text.contains("    p_gen1_0  p_gen1_0  2"));
        assert!(text.contains(" IF  min_power_gen1_0  u_gen1_0  1"));
        assert!(text.ends_with("ENDATA\n"));
    }

    #[test]
    fn mps_linearized_omits_extension_sections() {
        let text = render(Formulation::linearized(4), true);
        assert!(!text.contains("QMATRIX"));
        assert!(!text.contains("INDICATORS"));
        assert!(text.contains(" UP BND  pw_gen1_0_0  1.25"));
    }
}
