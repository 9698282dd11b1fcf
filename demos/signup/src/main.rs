//! # formpipe signup demo
//!
//! Loads a signup submission given as `field=value` arguments and prints the
//! outcome as JSON.
//!
//! ## Running
//!
//! ```bash
//! cargo run --package formpipe-signup -- \
//!     username=grace email=grace@example.com age=36 birthday=1906-12-09 \
//!     newsletter=on password=cobol-rules confirm=cobol-rules
//! ```
//!
//! Settings are read from `--config <file.toml>` when given, then from
//! `FORMPIPE_*` environment variables. The process exits with status 1 when
//! the submission is invalid and 2 when the settings cannot be loaded.

mod signup;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use formpipe_core::logging::setup_logging;
use formpipe_core::{settings_loader, FormpipeResult, Settings, SETTINGS};
use formpipe_forms::input::FormData;

use signup::{outcome_json, signup_form};

/// Validate a signup submission.
#[derive(Parser, Debug)]
#[command(name = "formpipe-signup", version, about)]
struct Cli {
    /// Path to a TOML settings file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the JSON outcome on a single line.
    #[arg(long)]
    compact: bool,

    /// Submitted fields as `name=value` pairs. Repeated names keep the first value.
    #[arg(value_name = "FIELD=VALUE", value_parser = parse_pair)]
    fields: Vec<(String, String)>,
}

fn parse_pair(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{arg}`"))
}

fn load_settings(config: Option<&PathBuf>) -> FormpipeResult<Settings> {
    match config {
        Some(path) => settings_loader::from_toml_file_with_env(path),
        None => Ok(settings_loader::from_env()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match load_settings(cli.config.as_ref()) {
        Ok(settings) => SETTINGS.configure(settings),
        Err(err) => {
            eprintln!("formpipe-signup: {err}");
            return ExitCode::from(2);
        }
    }
    let settings = SETTINGS.get();
    setup_logging(settings);
    tracing::debug!(fields = cli.fields.len(), "submission received");

    let form = signup_form(settings);
    let result = form.load(&FormData::from_pairs(cli.fields));
    let outcome = outcome_json(&result);

    let rendered = if cli.compact {
        serde_json::to_string(&outcome)
    } else {
        serde_json::to_string_pretty(&outcome)
    };
    match rendered {
        Ok(text) => println!("{text}"),
        Err(err) => {
            eprintln!("formpipe-signup: {err}");
            return ExitCode::from(2);
        }
    }

    if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
