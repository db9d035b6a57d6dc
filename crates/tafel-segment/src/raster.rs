// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster boundary — decode uploaded photos into `RawImage`s and encode
// problem crops back into PNG using the `image` crate.

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use tafel_core::error::{Result, TafelError};
use tafel_core::{RawImage, SubImage, UploadLimits};
use tracing::{debug, info, instrument};

// -- Decoding -----------------------------------------------------------------

/// Validate and decode an uploaded photo.
///
/// Rejects empty payloads, payloads over `limits.max_bytes` and file names
/// whose extension is not accepted. The decoded image keeps the file stem as
/// its name; grayscale sources stay single-channel, everything else becomes RGB.
#[instrument(skip(bytes, limits), fields(data_len = bytes.len()))]
pub fn decode_image(file_name: &str, bytes: &[u8], limits: &UploadLimits) -> Result<RawImage> {
    if bytes.is_empty() {
        return Err(TafelError::InvalidImage(format!("{file_name} is empty")));
    }
    if bytes.len() > limits.max_bytes {
        return Err(TafelError::FileTooLarge {
            size: bytes.len(),
            max: limits.max_bytes,
        });
    }
    match extension(file_name) {
        Some(ext) if limits.accepts_extension(ext) => {}
        other => {
            return Err(TafelError::UnsupportedFormat(format!(
                "{} (allowed: {})",
                other.unwrap_or("no extension"),
                limits.extensions.join(", ")
            )));
        }
    }

    let decoded = image::load_from_memory(bytes).map_err(|err| {
        TafelError::ImageError(format!("failed to decode {file_name}: {err}"))
    })?;
    info!(
        width = decoded.width(),
        height = decoded.height(),
        "Whiteboard image decoded"
    );
    raw_from_dynamic(file_stem(file_name), &decoded)
}

/// Read and decode a photo from disk.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open_image(path: impl AsRef<Path>, limits: &UploadLimits) -> Result<RawImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    decode_image(&file_name, &bytes, limits)
}

/// Copy a decoded image into a packed `RawImage`.
pub fn raw_from_dynamic(name: &str, image: &DynamicImage) -> Result<RawImage> {
    let (width, height) = (image.width(), image.height());
    if image.color().has_color() {
        RawImage::packed(name, image.to_rgb8().into_raw(), width, height, 3)
    } else {
        RawImage::packed(name, image.to_luma8().into_raw(), width, height, 1)
    }
}

// -- Encoding -----------------------------------------------------------------

/// View a problem crop as a `DynamicImage`.
pub fn sub_image_to_dynamic(problem: &SubImage) -> Result<DynamicImage> {
    let (width, height) = (problem.width(), problem.height());
    let data = problem.data.clone();
    let image = match problem.channels {
        1 => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        _ => None,
    };
    image.ok_or_else(|| {
        TafelError::ImageError(format!(
            "{} does not hold a {width}x{height}x{} buffer",
            problem.name, problem.channels
        ))
    })
}

/// Encode a problem crop as PNG bytes.
pub fn sub_image_to_png(problem: &SubImage) -> Result<Vec<u8>> {
    let image = sub_image_to_dynamic(problem)?;
    let bytes = encode_to_format(&image, ImageFormat::Png)?;
    debug!(name = %problem.name, png_bytes = bytes.len(), "Problem encoded");
    Ok(bytes)
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        TafelError::ImageError(format!("image encoding failed: {err}"))
    })?;
    Ok(buffer)
}

// -- File name helpers --------------------------------------------------------

fn extension(file_name: &str) -> Option<&str> {
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

fn file_stem(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};
    use tafel_core::Region;

    fn png_of(image: DynamicImage) -> Vec<u8> {
        encode_to_format(&image, ImageFormat::Png).unwrap()
    }

    #[test]
    fn decodes_rgb_png_with_stem_name() {
        let img = RgbImage::from_pixel(12, 8, Rgb([10, 20, 30]));
        let raw = decode_image("board.shot.png", &png_of(DynamicImage::ImageRgb8(img)), &UploadLimits::default()).unwrap();
        assert_eq!(raw.name(), "board.shot");
        assert_eq!((raw.width(), raw.height(), raw.channels()), (12, 8, 3));
        assert_eq!(raw.pixel(3, 4), &[10, 20, 30]);
    }

    #[test]
    fn grayscale_sources_stay_single_channel() {
        let img = GrayImage::from_pixel(5, 5, Luma([77]));
        let raw = decode_image("g.png", &png_of(DynamicImage::ImageLuma8(img)), &UploadLimits::default()).unwrap();
        assert_eq!(raw.channels(), 1);
        assert_eq!(raw.pixel(0, 0), &[77]);
    }

    #[test]
    fn rejects_unsupported_extension() {
        let bytes = png_of(DynamicImage::ImageLuma8(GrayImage::new(2, 2)));
        assert!(matches!(
            decode_image("board.gif", &bytes, &UploadLimits::default()),
            Err(TafelError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            decode_image("board", &bytes, &UploadLimits::default()),
            Err(TafelError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn rejects_oversized_payload() {
        let limits = UploadLimits {
            max_bytes: 4,
            ..Default::default()
        };
        assert!(matches!(
            decode_image("board.png", &[0u8; 5], &limits),
            Err(TafelError::FileTooLarge { size: 5, max: 4 })
        ));
    }

    #[test]
    fn rejects_garbage_and_empty_payloads() {
        let limits = UploadLimits::default();
        assert!(matches!(
            decode_image("board.png", b"not an image", &limits),
            Err(TafelError::ImageError(_))
        ));
        assert!(matches!(
            decode_image("board.png", &[], &limits),
            Err(TafelError::InvalidImage(_))
        ));
    }

    #[test]
    fn problem_crops_round_trip_through_png() {
        let problem = SubImage {
            name: "board_problem_01".into(),
            index: 1,
            region: Region::new(4, 4, 3, 2),
            channels: 3,
            data: (0..18).collect(),
        };
        let png = sub_image_to_png(&problem).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.into_raw(), problem.data);
    }

    #[test]
    fn mismatched_buffer_is_an_error() {
        let problem = SubImage {
            name: "bad".into(),
            index: 1,
            region: Region::new(0, 0, 4, 4),
            channels: 1,
            data: vec![0; 3],
        };
        assert!(matches!(
            sub_image_to_dynamic(&problem),
            Err(TafelError::ImageError(_))
        ));
    }
}
