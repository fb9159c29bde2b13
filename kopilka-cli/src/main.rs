//! Kopilka CLI - statement analysis with LLM budgeting advice
//!
//! Usage:
//!   kopilka setup                     Capture name, status, country and city
//!   kopilka preview --csv FILE        Ingest only; show the table and coercion counts
//!   kopilka analyze --csv FILE        Charts, breakdowns, advice and student guides
//!   kopilka config init               Write ~/.kopilka/config.toml with defaults
//!   kopilka auth paste-openai-api-key

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use kopilka_core::{City, Country, DateLocale, SocialStatus};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod analyze;
mod auth;
mod config;
mod dashboard;
mod llm;
mod report;
mod setup;
mod state;

/// Statement rows shown before the charts
const PREVIEW_ROWS: usize = 10;

#[derive(Parser, Debug)]
#[command(
    name = "kopilka",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("KOPILKA_BUILD_SHA"), ")"),
    about = "Income/expense statement analysis with budgeting advice"
)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One-time interactive setup: writes ~/.kopilka/profile.json
    Setup,

    /// Parse a statement and show what was read, without charts or advice
    Preview {
        /// Statement CSV (Дата, Сумма, Доходы/Расходы, Категория[, Описание])
        #[arg(long, default_value = "statement.csv")]
        csv: PathBuf,

        /// How to read ambiguous dates: ru, us or iso (default from config)
        #[arg(long)]
        locale: Option<DateLocale>,

        /// Rows to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Full analysis: daily chart, category shares, advice, guides
    Analyze {
        #[arg(long, default_value = "statement.csv")]
        csv: PathBuf,

        /// Казахстан/Россия/Англия or kazakhstan/russia/england (default from profile)
        #[arg(long)]
        country: Option<Country>,

        /// Студент/Работающий/Пенсионер or student/employed/retired (default from profile)
        #[arg(long)]
        status: Option<SocialStatus>,

        /// Астана/Москва/Лондон or astana/moscow/london (default from profile)
        #[arg(long)]
        city: Option<City>,

        /// Share below which a category is folded into "Мелкие" (default from config)
        #[arg(long)]
        threshold: Option<f64>,

        #[arg(long)]
        locale: Option<DateLocale>,

        /// Skip the LLM calls
        #[arg(long)]
        offline: bool,

        /// Interactive terminal dashboard instead of the text report
        #[arg(long)]
        tui: bool,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Credentials for the LLM provider
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Paste an OpenAI API key into ~/.kopilka/auth.json
    PasteOpenaiApiKey,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Setup => setup::run_setup()?,

        Command::Preview { csv, locale, limit } => {
            let cfg = config::load_config()?;
            let ingest = analyze::ingest(&csv, locale.unwrap_or(cfg.analysis.date_locale))?;
            print!("{}", report::render_preview(&ingest, limit));
        }

        Command::Analyze {
            csv,
            country,
            status,
            city,
            threshold,
            locale,
            offline,
            tui,
        } => {
            let cfg = config::load_config()?;
            let profile = state::read_profile()?;

            let threshold = threshold.unwrap_or(cfg.analysis.threshold);
            if !(0.0..1.0).contains(&threshold) {
                bail!("--threshold must be in [0, 1), got {threshold}");
            }

            let req = analyze::AnalyzeRequest {
                csv,
                locale: locale.unwrap_or(cfg.analysis.date_locale),
                threshold,
                name: profile.name,
                country: country.unwrap_or(profile.country),
                status: status.unwrap_or(profile.status),
                city: city.unwrap_or(profile.city),
                reference: cfg.reference,
            };

            let narrator = if offline {
                llm::Narrator::offline()
            } else {
                llm::Narrator::from_config(&cfg.llm)
            };

            let result = analyze::run_analysis(&req, &narrator)?;
            if tui {
                dashboard::run_dashboard(&result)?;
            } else {
                print!("{}", report::render_report(&result, PREVIEW_ROWS));
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },

        Command::Auth { command } => match command {
            AuthCommand::PasteOpenaiApiKey => auth::openai_paste_api_key()?,
        },
    }

    Ok(())
}
