mod cli;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{PreviewArgs, ReportArgs, ScheduleArgs};
use moto_financing::FinancingSettings;

/// Installment schedules for financed motorcycle sales
#[derive(Parser)]
#[command(name = "moto-schedule", version, about = "Installment schedules for financed motorcycle sales")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Financing settings file (defaults to $MOTO_FINANCING_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the amortization schedule with due dates
    Schedule(ScheduleArgs),
    /// Preview installment amount and totals for a sale
    Preview(PreviewArgs),
    /// Join a financing record's schedule with recorded payments
    Report(ReportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let log_json = std::env::var("MOTO_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    let registry = tracing_subscriber::registry().with(filter);
    if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = FinancingSettings::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Schedule(args) => cli::run_schedule(args, &settings, cli.output),
        Commands::Preview(args) => cli::run_preview(args, &settings, cli.output),
        Commands::Report(args) => cli::run_report(args, cli.output),
        Commands::Version => {
            println!("moto-schedule {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
