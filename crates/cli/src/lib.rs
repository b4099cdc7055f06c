pub mod audit_client;
pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use vamela_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "vamela",
    about = "Vamela estimator CLI",
    long_about = "Price website projects, draft messaging handoffs, run performance audits, and inspect config.",
    after_help = "Examples:\n  vamela quote --pages 7 --feature cms --feature copywriting\n  vamela inquiry --name Anna --budget 1500 --message \"Neue Website\"\n  vamela audit example.com\n  vamela config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Estimate a project price and build the quote handoff link")]
    Quote {
        #[arg(long, default_value_t = 1, help = "Number of subpages (clamped to 1..=20)")]
        pages: i64,
        #[arg(long, default_value = "standard", help = "Design tier: standard, premium, high-end")]
        tier: String,
        #[arg(long = "feature", help = "Extra feature key (seo, cms, copywriting, legal)")]
        features: Vec<String>,
    },
    #[command(about = "Validate a contact inquiry and build its handoff link")]
    Inquiry {
        #[arg(long)]
        name: String,
        #[arg(long, help = "Budget in euros (snapped to 250..=5000 in steps of 50)")]
        budget: Option<i64>,
        #[arg(long)]
        message: String,
    },
    #[command(about = "Request a performance audit for a domain")]
    Audit { domain: String },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use vamela_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    // stdout carries the command payload.
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);
    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Commands report config failures themselves; logging only needs a best effort.
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Quote { pages, tier, features } => {
            commands::quote::run(&commands::quote::QuoteArgs { pages, tier, features })
        }
        Command::Inquiry { name, budget, message } => {
            commands::inquiry::run(&commands::inquiry::InquiryArgs { name, budget, message })
        }
        Command::Audit { domain } => commands::audit::run(&domain),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
