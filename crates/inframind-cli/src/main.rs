use clap::{Parser, Subcommand};
use inframind_core::config::Config;
use inframind_core::{AppError, AppResult};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod analyze;
mod output;
mod render;
mod summary;
mod transform;

#[derive(Parser)]
#[command(name = "inframind")]
#[command(about = "Incident analysis: submit evidence, normalize the verdict, export reports.")]
struct Cli {
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send incident evidence to the analysis backend and export the result.
    Analyze {
        #[arg(long, value_name = "TEXT")]
        description: String,
        #[arg(long, value_name = "NAME", default_value = "")]
        service: String,
        #[arg(long, value_name = "FILE")]
        logs: Vec<PathBuf>,
        #[arg(long, value_name = "FILE")]
        metrics: Vec<PathBuf>,
        #[arg(long, value_name = "FILE")]
        traces: Vec<PathBuf>,
        #[arg(long, value_name = "FILE")]
        configs: Vec<PathBuf>,
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        #[arg(long, value_name = "FORMAT")]
        format: Option<String>,
        #[arg(long)]
        overwrite: bool,
    },
    /// Normalize a saved backend payload and export it.
    Transform {
        #[arg(value_name = "PAYLOAD")]
        payload: PathBuf,
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        #[arg(long, value_name = "FORMAT")]
        format: Option<String>,
        #[arg(long)]
        overwrite: bool,
    },
    /// Render the Markdown report from a JSON export.
    Render {
        #[arg(value_name = "EXPORT")]
        export: PathBuf,
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
        #[arg(long)]
        overwrite: bool,
    },
    /// Print the metrics panel and grouped fixes of a JSON export.
    Summary {
        #[arg(value_name = "EXPORT")]
        export: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{}", err.message());
        process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> AppResult<()> {
    validate_log_level(&cli.log_level)?;
    validate_log_format(&cli.log_format)?;
    init_logging(&cli.log_level, &cli.log_format);

    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Analyze {
            description,
            service,
            logs,
            metrics,
            traces,
            configs,
            out,
            format,
            overwrite,
        } => {
            let formats = output::resolve_formats(format.as_deref(), &config.export.formats)?;
            let out_dir = out.unwrap_or_else(|| config.export.out_dir.clone());
            let files = analyze::EvidenceFiles {
                logs,
                metrics,
                traces,
                configs,
            };
            analyze::analyze_command(
                description,
                service,
                files,
                &out_dir,
                &formats,
                overwrite,
                &config,
            )
        }
        Commands::Transform {
            payload,
            out,
            format,
            overwrite,
        } => {
            let formats = output::resolve_formats(format.as_deref(), &config.export.formats)?;
            let out_dir = out.unwrap_or_else(|| config.export.out_dir.clone());
            transform::transform_command(&payload, &out_dir, &formats, overwrite)
        }
        Commands::Render {
            export,
            out,
            overwrite,
        } => render::render_command(&export, out, overwrite),
        Commands::Summary { export } => summary::summary_command(&export),
    }
}

fn validate_log_level(value: &str) -> AppResult<()> {
    match value {
        "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
        _ => Err(AppError::usage(format!(
            "invalid --log-level '{value}'; expected error|warn|info|debug|trace"
        ))),
    }
}

fn validate_log_format(value: &str) -> AppResult<()> {
    match value {
        "text" | "json" => Ok(()),
        _ => Err(AppError::usage(format!(
            "invalid --log-format '{value}'; expected text|json"
        ))),
    }
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    let result = if format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(err) = result {
        eprintln!("logging already initialized: {err}");
    }
}
