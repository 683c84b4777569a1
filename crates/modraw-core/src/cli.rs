//! Command-line entry point for `modraw-sim`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use modraw_common::Result;
use modraw_config::{resolve_jobs, InputSpec, ReplayConfig, ReplayOverrides, SPEED_ENV_VAR};

use crate::batch::{run_batch, BatchReport};
use crate::clock::SystemClock;
use crate::exit_codes::ExitCode;
use crate::logging::{self, LogFormat};

/// End-of-run summary encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
}

/// Replay .modraw captures in real time, packet by packet.
#[derive(Parser, Debug)]
#[command(name = "modraw-sim", version, about)]
pub struct Cli {
    /// Capture file, folder of captures, or @list file with one path per line
    #[arg(short, long, value_name = "PATH")]
    pub input: String,

    /// Output .modraw file or folder (a folder is required for batch input)
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Time multiplier; 2 replays twice as fast as recorded
    #[arg(short, long, env = SPEED_ENV_VAR)]
    pub speed: Option<f64>,

    /// Log every packet with its reconstructed time
    #[arg(short, long)]
    pub verbose: bool,

    /// Only reconstruct relative offsets; OFFSET_TIME becomes optional
    #[arg(long)]
    pub relative_only: bool,

    /// JSON replay config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Summary format printed on stdout
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub format: SummaryFormat,

    /// Diagnostic log format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    fn overrides(&self) -> ReplayOverrides {
        ReplayOverrides {
            speed: self.speed,
            relative_only: self.relative_only,
            verbose: self.verbose,
        }
    }
}

/// Parse the process arguments and run.
pub fn run() -> ExitCode {
    match Cli::try_parse() {
        Ok(cli) => run_with(&cli),
        Err(e) => {
            // Help and version output land here too.
            let _ = e.print();
            if e.use_stderr() {
                ExitCode::Usage
            } else {
                ExitCode::Clean
            }
        }
    }
}

/// Run a parsed command line.
pub fn run_with(cli: &Cli) -> ExitCode {
    logging::init(cli.log_format, cli.verbose);
    match replay(cli) {
        Ok(report) => {
            print_summary(&report, cli.format);
            ExitCode::Clean
        }
        Err(err) => {
            let code = ExitCode::from_error(&err);
            error!(code = err.code(), "{err}");
            eprintln!("modraw-sim: error: {err}");
            code
        }
    }
}

fn replay(cli: &Cli) -> Result<BatchReport> {
    let config = ReplayConfig::resolve(cli.config.as_deref(), &cli.overrides())?;
    let input = InputSpec::parse(&cli.input);
    let jobs = resolve_jobs(&input, &cli.output)?;
    info!(
        files = jobs.len(),
        speed = config.speed,
        date_mode = %config.date_mode,
        "starting replay"
    );
    run_batch(&jobs, &config, &SystemClock)
}

fn summary_json(report: &BatchReport) -> serde_json::Value {
    serde_json::json!({
        "files": report.files,
        "total_packets": report.total_packets(),
        "total_bytes": report.total_bytes(),
        "late_packets": report.late_packets(),
    })
}

fn print_summary(report: &BatchReport, format: SummaryFormat) {
    match format {
        SummaryFormat::Json => match serde_json::to_string_pretty(&summary_json(report)) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("modraw-sim: can't encode summary: {e}"),
        },
        SummaryFormat::Text => {
            for file in &report.files {
                println!(
                    "{} -> {}: {} packets, {} bytes, {} late",
                    file.input.display(),
                    file.output.display(),
                    file.stats.packets,
                    file.stats.bytes_written,
                    file.stats.late_packets
                );
            }
            println!(
                "replayed {} file(s): {} packets, {} bytes",
                report.files.len(),
                report.total_packets(),
                report.total_bytes()
            );
        }
    }
}
