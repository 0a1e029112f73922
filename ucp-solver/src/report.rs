use crate::Schedule;
use std::fmt;
use ucp_core::models::Scenario;

/// Renders a solved schedule as a dispatch table: a time header, one row of
/// dispatched power per unit, then the solar and load forecast rows.
///
/// Values are rounded to one decimal for display only; the underlying
/// [`Schedule`] keeps the solver's exact numbers.
pub struct ScheduleTable<'a> {
    schedule: &'a Schedule,
    scenario: &'a Scenario,
}

impl<'a> ScheduleTable<'a> {
    /// Pairs a schedule with the scenario it was solved from.
    pub fn new(schedule: &'a Schedule, scenario: &'a Scenario) -> Self {
        Self { schedule, scenario }
    }
}

impl fmt::Display for ScheduleTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .schedule
            .units
            .iter()
            .map(|u| u.unit.len())
            .chain(["time".len(), "solar".len()])
            .max()
            .unwrap_or(5);

        writeln!(f, "overall cost = {:.2}", self.schedule.total_cost)?;
        writeln!(f)?;

        write!(f, "{:>width$}", "time")?;
        for t in 0..self.schedule.intervals {
            write!(f, " {t:>6}")?;
        }
        writeln!(f)?;

        for unit in &self.schedule.units {
            write!(f, "{:>width$}", unit.unit)?;
            for p in &unit.power {
                write!(f, " {p:>6.1}")?;
            }
            writeln!(f)?;
        }

        write!(f, "{:>width$}", "solar")?;
        for s in self.scenario.solar() {
            write!(f, " {s:>6.1}")?;
        }
        writeln!(f)?;

        write!(f, "{:>width$}", "load")?;
        for l in self.scenario.load() {
            write!(f, " {l:>6.1}")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnitSchedule;
    use ucp_core::models::Unit;

    #[test]
    fn renders_one_row_per_unit() {
        let scenario = Scenario::new(
            vec![Unit {
                name: "gen1".to_string(),
                pmin: 1.0,
                pmax: 4.0,
                no_load_cost: 5.0,
                linear_cost: 0.5,
                quadratic_cost: 1.0,
                startup_cost: 2.0,
                shutdown_cost: 1.0,
                initially_on: false,
            }],
            vec![2.0, 3.0],
            vec![0.0, 1.0],
        )
        .unwrap();
        let schedule = Schedule {
            total_cost: 12.25,
            intervals: 2,
            units: vec![UnitSchedule {
                unit: "gen1".to_string(),
                power: vec![2.0, 2.0],
                online: vec![true, true],
                started: vec![true, false],
                stopped: vec![false, false],
            }],
        };

        let table = ScheduleTable::new(&schedule, &scenario).to_string();
        assert!(table.starts_with("overall cost = 12.25"));
        assert!(table.contains("gen1"));
        assert!(table.contains("solar"));
        assert!(table.contains("load"));
        // one line per unit plus cost, blank, header, solar, load
        assert_eq!(table.lines().count(), 6);
    }
}
