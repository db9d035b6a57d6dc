// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognition pipeline — segment a board, then hand every problem crop to the
// formula recognizer and normalizer collaborators.
//
// The recognizers themselves (OCR models, LLM rewriting) live outside this
// crate. Only their interfaces are defined here.

use std::time::Instant;

use tafel_core::error::Result;
use tafel_core::{PipelineReport, ProblemResult, RawImage, SubImage};
use tracing::{info, instrument, warn};

use crate::segment::Segmenter;

/// Turns one problem crop into a formula string.
pub trait FormulaRecognizer: Sync {
    fn recognize(&self, problem: &SubImage) -> Result<String>;
}

/// Rewrites a recognised formula into canonical syntax.
pub trait FormulaNormalizer: Sync {
    fn normalize(&self, formula: &str) -> Result<String>;
}

/// Normalizer that only trims surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimNormalizer;

impl FormulaNormalizer for TrimNormalizer {
    fn normalize(&self, formula: &str) -> Result<String> {
        Ok(formula.trim().to_string())
    }
}

/// Segment `image` and recognise every problem.
///
/// Segmentation errors fail the whole call. Recognition or normalisation
/// errors are recorded on the affected `ProblemResult` and the rest of the
/// batch still completes.
#[instrument(skip_all, fields(name = image.name(), target = segmenter.config().target_regions))]
pub fn run_pipeline(
    image: &RawImage,
    segmenter: &Segmenter,
    recognizer: &dyn FormulaRecognizer,
    normalizer: &dyn FormulaNormalizer,
) -> Result<PipelineReport> {
    let started = Instant::now();

    let problems = segmenter.extract_problems(image)?;
    info!(problems = problems.len(), "Segmentation complete, recognising problems");

    let results = recognize_problems(&problems, recognizer, normalizer);
    let successful = results.iter().filter(|r| r.success).count();
    let report = PipelineReport {
        total_problems: results.len(),
        successful,
        failed: results.len() - successful,
        results,
        processing_time_secs: started.elapsed().as_secs_f64(),
    };
    info!(
        successful = report.successful,
        failed = report.failed,
        secs = report.processing_time_secs,
        "Pipeline complete"
    );
    Ok(report)
}

/// Recognise all problems concurrently, one scoped thread per crop.
///
/// Results come back in problem order regardless of completion order.
pub fn recognize_problems(
    problems: &[SubImage],
    recognizer: &dyn FormulaRecognizer,
    normalizer: &dyn FormulaNormalizer,
) -> Vec<ProblemResult> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = problems
            .iter()
            .map(|problem| scope.spawn(move || recognize_one(problem, recognizer, normalizer)))
            .collect();

        handles
            .into_iter()
            .zip(problems)
            .map(|(handle, problem)| {
                handle.join().unwrap_or_else(|_| {
                    failed_result(problem, "recognition worker panicked".to_string())
                })
            })
            .collect()
    })
}

fn recognize_one(
    problem: &SubImage,
    recognizer: &dyn FormulaRecognizer,
    normalizer: &dyn FormulaNormalizer,
) -> ProblemResult {
    let raw = match recognizer.recognize(problem) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(problem = problem.index, error = %err, "Recognition failed");
            return failed_result(problem, err.to_string());
        }
    };
    match normalizer.normalize(&raw) {
        Ok(normalized) => ProblemResult {
            problem_id: problem.index,
            filename: problem.name.clone(),
            formula_raw: Some(raw),
            formula_normalized: Some(normalized),
            error: None,
            success: true,
        },
        Err(err) => {
            warn!(problem = problem.index, error = %err, "Normalization failed");
            ProblemResult {
                formula_raw: Some(raw),
                ..failed_result(problem, err.to_string())
            }
        }
    }
}

fn failed_result(problem: &SubImage, error: String) -> ProblemResult {
    ProblemResult {
        problem_id: problem.index,
        filename: problem.name.clone(),
        formula_raw: None,
        formula_normalized: None,
        error: Some(error),
        success: false,
    }
}
