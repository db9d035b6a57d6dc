// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use tafel_core::SegmentConfig;
use tafel_core::error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "tafel",
    version,
    about = "Split a whiteboard photo into one image per math problem"
)]
pub struct Cli {
    /// Whiteboard photo (png, jpg, jpeg, webp or bmp).
    pub image: PathBuf,

    /// Number of problems expected on the board (1-20).
    #[arg(short = 'n', long)]
    pub target_regions: Option<usize>,

    /// Margin added around each problem, as a fraction of its size (0.0-1.0).
    #[arg(short, long)]
    pub padding_ratio: Option<f64>,

    /// Dilate/erode passes used to join strokes of one expression.
    #[arg(long)]
    pub closing_iterations: Option<u32>,

    /// JSON file with segmentation settings; flags override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the problem images. Defaults to
    /// `<image stem>_extracted_problems` next to the photo.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

impl Cli {
    /// Settings from `--config` (or defaults) with flag overrides applied.
    pub fn segment_config(&self) -> Result<SegmentConfig> {
        let mut config = match &self.config {
            Some(path) => SegmentConfig::from_json_file(path)?,
            None => SegmentConfig::default(),
        };
        if let Some(target) = self.target_regions {
            config.target_regions = target;
        }
        if let Some(ratio) = self.padding_ratio {
            config.padding_ratio = ratio;
        }
        if let Some(iterations) = self.closing_iterations {
            config.closing_iterations = iterations;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tafel_core::TafelError;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from(["tafel", "board.jpg", "-n", "3", "--padding-ratio", "0.05"]);
        let config = cli.segment_config().unwrap();
        assert_eq!(config.target_regions, 3);
        assert_eq!(config.padding_ratio, 0.05);
        assert_eq!(config.closing_iterations, 2);
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "target_regions": 5, "closing_iterations": 3 }}"#).unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let cli = Cli::parse_from(["tafel", "board.jpg", "--config", &path, "-n", "2"]);
        let config = cli.segment_config().unwrap();
        assert_eq!(config.target_regions, 2);
        assert_eq!(config.closing_iterations, 3);
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        let cli = Cli::parse_from(["tafel", "board.jpg", "-n", "25"]);
        assert!(matches!(
            cli.segment_config(),
            Err(TafelError::InvalidTargetCount { target: 25, .. })
        ));
    }
}
