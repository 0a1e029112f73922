use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write, stdin, stdout},
    path::PathBuf,
};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};
use ucp_core::models::Scenario;
use ucp_solver::{
    CommitmentError, DEFAULT_SEGMENTS, Engine as _, Formulation, Schedule, ScheduleTable,
    build_commitment,
    cbc::{CbcEngine, CbcSettings},
    export::{export_lp, export_mps},
    highs::{HighsEngine, HighsSettings},
    solve_commitment,
};

// The top-level arguments -- presently just which subcommand to execute
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct BaseArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the scheduling problem and report the dispatch
    Solve {
        #[command(flatten)]
        io: IOArgs,

        /// Request a specific MILP engine
        #[arg(short, long, default_value = "highs")]
        engine: EngineLib,

        /// Wall-clock limit for the solve, in seconds
        #[arg(short, long)]
        time_limit: Option<f64>,

        /// Print a dispatch table instead of JSON
        #[arg(long)]
        table: bool,
    },

    /// Construct the mixed-integer program and export to a standard format
    Export {
        #[command(flatten)]
        io: IOArgs,

        /// The file format to use (if omitted, will infer based on filename)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Keep indicator constraints and the quadratic objective instead
        /// of linearizing them
        #[arg(long)]
        native: bool,
    },
}

// Most (all, presently) subcommands have a notion of input and output.
// This struct standardizes their implementation.
#[derive(Args)]
struct IOArgs {
    /// The scenario JSON file (defaults to stdin if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// The output file (defaults to stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl IOArgs {
    fn read(&self) -> anyhow::Result<Box<dyn Read>> {
        if let Some(path) = &self.input {
            Ok(Box::new(BufReader::new(File::open(path)?)))
        } else {
            Ok(Box::new(stdin().lock()))
        }
    }

    fn write(&self) -> anyhow::Result<Box<dyn Write>> {
        if let Some(path) = &self.output {
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        } else {
            Ok(Box::new(stdout().lock()))
        }
    }

    fn extension(&self) -> Option<&str> {
        self.output
            .as_ref()
            .and_then(|path| path.extension())
            .and_then(|ext| ext.to_str())
    }
}

// This explicitly articulates the available engines for the `solve` subcommand
#[derive(Clone, Copy, ValueEnum)]
enum EngineLib {
    Highs,
    Cbc,
}

// Conveniently, we can use the same enum to handle the particulars of calling
// into the various engine implementations
impl EngineLib {
    fn solve(
        &self,
        scenario: &Scenario,
        time_limit: Option<f64>,
    ) -> Result<Schedule, CommitmentError> {
        match self {
            EngineLib::Highs => {
                let engine = HighsEngine::new(HighsSettings {
                    time_limit,
                    ..HighsSettings::default()
                });
                solve_commitment(scenario, &engine)
            }
            EngineLib::Cbc => {
                let engine = CbcEngine::new(CbcSettings {
                    time_limit,
                    ..CbcSettings::default()
                });
                solve_commitment(scenario, &engine)
            }
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Lp,
    Mps,
}

fn main() -> anyhow::Result<()> {
    // By convention, we leverage `tracing` to instrument and log various
    // operations throughout this project.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = BaseArgs::parse();
    match args.command {
        Commands::Solve {
            io,
            engine,
            time_limit,
            table,
        } => {
            let scenario: Scenario = serde_json::from_reader(io.read()?)?;
            let schedule = engine.solve(&scenario, time_limit)?;
            let mut writer = io.write()?;
            if table {
                write!(writer, "{}", ScheduleTable::new(&schedule, &scenario))?;
            } else {
                serde_json::to_writer_pretty(&mut writer, &schedule)?;
                writeln!(writer)?;
            }
        }
        Commands::Export { io, format, native } => {
            let scenario: Scenario = serde_json::from_reader(io.read()?)?;
            let formulation = if native {
                Formulation::native()
            } else {
                Formulation::linearized(DEFAULT_SEGMENTS)
            };
            let model = build_commitment(&scenario, &formulation);
            let format = format
                .or_else(|| match io.extension() {
                    Some("lp") => Some(ExportFormat::Lp),
                    Some("mps") => Some(ExportFormat::Mps),
                    _ => None,
                })
                .unwrap_or(ExportFormat::Lp);
            let mut writer = io.write()?;
            match format {
                ExportFormat::Lp => export_lp(&model, &mut writer)?,
                ExportFormat::Mps => export_mps(&model, &mut writer)?,
            }
        }
    }

    Ok(())
}
