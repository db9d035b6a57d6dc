// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction run — decode the photo, segment it, write one PNG per problem
// and summarise the result.

use std::path::PathBuf;

use serde::Serialize;
use tafel_core::error::Result;
use tafel_core::{Region, UploadLimits};
use tafel_segment::{Segmenter, open_image, sub_image_to_png};
use tracing::{info, instrument};

use super::output_dir::{output_dir, problem_file_name};
use crate::cli::Cli;

/// JSON summary printed after a successful run.
#[derive(Debug, Serialize)]
pub struct ExtractionReport {
    pub problems_detected: usize,
    pub status: String,
    pub message: String,
    pub original_filename: String,
    pub output_dir: PathBuf,
    pub problems: Vec<ProblemEntry>,
}

/// One written problem image.
#[derive(Debug, Serialize)]
pub struct ProblemEntry {
    pub name: String,
    pub index: usize,
    pub region: Region,
    pub file: PathBuf,
}

/// Run the whole extraction described by `cli`.
#[instrument(skip_all, fields(image = %cli.image.display()))]
pub fn run(cli: &Cli) -> Result<ExtractionReport> {
    let config = cli.segment_config()?;
    let segmenter = Segmenter::new(config)?;

    let image = open_image(&cli.image, &UploadLimits::default())?;
    let problems = segmenter.extract_problems(&image)?;

    let dir = output_dir(&cli.image, cli.output_dir.as_deref())?;
    let mut entries = Vec::with_capacity(problems.len());
    for problem in &problems {
        let file = dir.join(problem_file_name(problem.index));
        std::fs::write(&file, sub_image_to_png(problem)?)?;
        entries.push(ProblemEntry {
            name: problem.name.clone(),
            index: problem.index,
            region: problem.region,
            file,
        });
    }
    info!(problems = entries.len(), dir = %dir.display(), "Problem images written");

    let original_filename = cli
        .image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ExtractionReport {
        problems_detected: entries.len(),
        status: "success".to_string(),
        message: format!("Extracted {} problems from {original_filename}", entries.len()),
        original_filename,
        output_dir: dir,
        problems: entries,
    })
}
