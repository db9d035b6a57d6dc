// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tafel — Whiteboard Problem Extractor
//
// Entry point. Initialises logging, parses arguments, runs the extraction and
// prints a JSON report (or a plain-language error) for the caller.

mod cli;
mod services;

use clap::Parser;
use tafel_core::TafelError;
use tafel_core::human_errors::humanize_error;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!(image = %cli.image.display(), "Tafel starting");

    let report = services::extract::run(&cli)
        .and_then(|report| serde_json::to_string_pretty(&report).map_err(TafelError::from));
    match report {
        Ok(json) => println!("{json}"),
        Err(err) => {
            let human = humanize_error(&err);
            tracing::error!(error = %err, status = human.status_code, "extraction failed");
            eprintln!("{}\n{}", human.message, human.suggestion);
            std::process::exit(1);
        }
    }
}
