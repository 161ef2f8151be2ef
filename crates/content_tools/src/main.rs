//! Idle engine content packs - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use content_core::diagnostics::Severity;
use content_core::options::ValidationConfig;
use content_tools::load::load_config;
use content_tools::validate::{render_digests, validate_packs, PackReport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "content-tools")]
#[command(about = "Development tools for idle engine content packs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate content packs
    Validate {
        /// Pack files or directories of packs
        #[arg(required = true)]
        packs: Vec<PathBuf>,

        /// Validation options file (.json or .ron)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Runtime version to check engine ranges and feature gates against
        #[arg(long)]
        runtime_version: Option<String>,

        /// Treat unknown runtime events as errors
        #[arg(long)]
        strict_events: bool,

        /// Print one JSON summary per pack
        #[arg(long)]
        json: bool,
    },
    /// Print the digest of each valid pack
    Digest {
        /// Pack files or directories of packs
        #[arg(required = true)]
        packs: Vec<PathBuf>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Validate {
            packs,
            options,
            runtime_version,
            strict_events,
            json,
        } => {
            let config = match options.as_deref().map(load_config).transpose() {
                Ok(config) => config.unwrap_or_default(),
                Err(e) => {
                    tracing::error!("Failed to load options: {e}");
                    std::process::exit(1);
                }
            };
            run_validate(&packs, apply_flags(config, runtime_version, strict_events), json)
        }
        Commands::Digest { packs } => run_digest(&packs),
    };

    if !ok {
        std::process::exit(1);
    }
}

fn apply_flags(mut config: ValidationConfig, runtime_version: Option<String>, strict_events: bool) -> ValidationConfig {
    if runtime_version.is_some() {
        config.runtime_version = runtime_version;
    }
    if strict_events {
        config.unknown_runtime_event_severity = Some(Severity::Error);
    }
    config
}

fn load_reports(packs: &[PathBuf], config: &ValidationConfig) -> Vec<PackReport> {
    match validate_packs(packs, config) {
        Ok(reports) => reports,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

fn run_validate(packs: &[PathBuf], config: ValidationConfig, json: bool) -> bool {
    let reports = load_reports(packs, &config);
    for report in &reports {
        if json {
            match serde_json::to_string(&report.summary()) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!("Failed to serialize report: {e}"),
            }
        } else {
            print!("{}", report.render());
        }
    }

    let failed = reports.iter().filter(|report| !report.is_valid()).count();
    if failed == 0 {
        tracing::info!("Validation passed ({} pack(s))", reports.len());
    } else {
        tracing::error!("Validation failed: {failed} of {} pack(s)", reports.len());
    }
    failed == 0
}

fn run_digest(packs: &[PathBuf]) -> bool {
    let reports = load_reports(packs, &ValidationConfig::default());
    print!("{}", render_digests(&reports));
    reports.iter().all(PackReport::is_valid)
}
