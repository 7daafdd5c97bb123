//! boothpack - derive the photobooth bundle's inclusion plan and run the bundling backend.

mod config;
mod pipeline;

use clap::{Parser, Subcommand, ValueEnum};
use config::{EnvironmentArgs, Settings};
use pipeline::{PlanFormat, ReportFormat};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "boothpack")]
#[command(
    author,
    version,
    about = "Package the photobooth application into a standalone bundle"
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log line format on stderr
    #[arg(
        long,
        global = true,
        value_enum,
        env = "PHOTOBOOTH_LOG_FORMAT",
        default_value = "text"
    )]
    log_format: LogFormat,

    #[command(flatten)]
    environment: EnvironmentArgs,

    /// Defaults to `build`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe, plan and run the bundling backend
    Build {
        /// Also write the plan used for the build
        #[arg(long)]
        plan_out: Option<PathBuf>,
    },

    /// Derive and validate the plan without running a backend
    Plan {
        /// Output file path [default: stdout]
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Plan format
        #[arg(long, value_enum, default_value = "json")]
        format: PlanFormat,
    },

    /// Report which optional components the environment provides
    Probe {
        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
    },
}

async fn run(cli: Cli) -> boothpack_common::Result<()> {
    let settings = Settings::from_args(&cli.environment)?;
    info!(
        "Packaging {} for {} with {}",
        settings.project_root.display(),
        settings.platform,
        settings.backend
    );

    match cli.command.unwrap_or(Commands::Build { plan_out: None }) {
        Commands::Build { plan_out } => {
            pipeline::build(&settings, plan_out.as_deref()).await?;
        }

        Commands::Plan { out, format } => {
            let interpreter = pipeline::locate(&settings)?;
            let report = pipeline::probe(&settings, interpreter).await;
            let plan = pipeline::plan(&settings, &report)?;

            match out {
                Some(path) => pipeline::write_plan(&plan, &path, format)?,
                None => println!("{}", pipeline::render_plan(&plan, format)?),
            }
        }

        Commands::Probe { format } => {
            let interpreter = pipeline::locate(&settings)?;
            let report = pipeline::probe(&settings, interpreter).await;
            print!("{}", pipeline::render_report(&report, format)?);
        }
    }

    Ok(())
}

/// Parse `args`, or report the usage problem and return the exit code.
///
/// `--help` and `--version` are successful runs. Any other parse failure,
/// including a bad environment variable value, is a configuration error.
fn parse_args<I, T>(args: I) -> Result<Cli, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        if e.use_stderr() {
            1
        } else {
            0
        }
    })
}

fn init_logging(verbose: bool, format: LogFormat) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let (text, json) = match format {
        LogFormat::Text => (
            Some(fmt::layer().with_target(false).with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(text)
        .with(json)
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return ExitCode::from(code),
    };

    init_logging(cli.verbose, cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
