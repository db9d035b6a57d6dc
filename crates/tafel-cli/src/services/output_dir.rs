// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output directory resolution for extracted problems.

use std::path::{Path, PathBuf};

use tafel_core::error::Result;

/// Resolve the directory problem images are written to, creating it if needed.
///
/// An explicit `requested` directory wins; otherwise the images go next to
/// the photo in `<stem>_extracted_problems`.
pub fn output_dir(image: &Path, requested: Option<&Path>) -> Result<PathBuf> {
    let dir = match requested {
        Some(dir) => dir.to_path_buf(),
        None => default_output_dir(image),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn default_output_dir(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "whiteboard".to_string());
    let parent = image.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{stem}_extracted_problems"))
}

/// File name for the problem with 1-based `index`.
pub fn problem_file_name(index: usize) -> String {
    format!("problem_{index:02}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dir_sits_next_to_photo() {
        let dir = default_output_dir(Path::new("/photos/lecture 3.jpg"));
        assert_eq!(dir, PathBuf::from("/photos/lecture 3_extracted_problems"));
    }

    #[test]
    fn explicit_dir_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let wanted = tmp.path().join("nested").join("out");
        let dir = output_dir(Path::new("board.png"), Some(&wanted)).unwrap();
        assert_eq!(dir, wanted);
        assert!(dir.is_dir());
    }

    #[test]
    fn problem_files_are_numbered() {
        assert_eq!(problem_file_name(1), "problem_01.png");
        assert_eq!(problem_file_name(17), "problem_17.png");
    }
}
