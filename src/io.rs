//! Image file loading and saving.
//!
//! Input format is detected from the file's leading bytes, so a graymap
//! loads whatever it is named; anything the `image` crate decodes is
//! converted to 8-bit luma. Output is a binary P5 graymap unless the
//! extension names PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use log::debug;

use crate::error::{FilterError, Result};
use crate::gray::GrayImage;

/// Load an image from disk as 8-bit grayscale.
pub fn load_gray<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
    let path = path.as_ref();
    let luma = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?
        .into_luma8();
    let (width, height) = luma.dimensions();
    debug!("loaded {} ({}x{})", path.display(), height, width);
    GrayImage::from_vec(height as usize, width as usize, luma.into_raw())
}

/// Save a grayscale image as PGM, or PNG when the extension asks for it.
pub fn save_gray<P: AsRef<Path>>(image: &GrayImage, path: P) -> Result<()> {
    let path = path.as_ref();
    let width = dim_u32(image.cols())?;
    let height = dim_u32(image.rows())?;

    match ImageFormat::from_path(path) {
        Ok(ImageFormat::Png) => image::save_buffer_with_format(
            path,
            image.as_slice(),
            width,
            height,
            ExtendedColorType::L8,
            ImageFormat::Png,
        )?,
        _ => {
            let mut writer = BufWriter::new(File::create(path)?);
            PnmEncoder::new(&mut writer)
                .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
                .write_image(image.as_slice(), width, height, ExtendedColorType::L8)?;
            writer.flush()?;
        }
    }

    debug!("saved {} ({}x{})", path.display(), image.rows(), image.cols());
    Ok(())
}

fn dim_u32(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| FilterError::BufferLength {
        expected: u32::MAX as usize,
        actual: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("diamond_filter_io_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_pgm_round_trip() {
        let img = GrayImage::from_vec(2, 3, vec![0, 64, 128, 192, 255, 7]).unwrap();
        let path = temp_path("round_trip.pgm");
        save_gray(&img, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P5"));

        let loaded = load_gray(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, img);
    }

    #[test]
    fn test_png_round_trip() {
        let img = GrayImage::filled(4, 5, 33).unwrap();
        let path = temp_path("round_trip.png");
        save_gray(&img, &path).unwrap();
        let loaded = load_gray(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, img);
    }

    #[test]
    fn test_load_ascii_pgm() {
        let path = temp_path("ascii.pgm");
        std::fs::write(&path, b"P2\n3 2\n255\n1 2 3\n4 5 6\n").unwrap();
        let loaded = load_gray(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!((loaded.rows(), loaded.cols()), (2, 3));
        assert_eq!(loaded.as_slice(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_load_detects_graymap_by_content() {
        let path = temp_path("binary_input.img");
        std::fs::write(&path, b"P5\n3 2\n255\n\x01\x02\x03\x04\x05\x06").unwrap();
        let loaded = load_gray(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!((loaded.rows(), loaded.cols()), (2, 3));
        assert_eq!(loaded.as_slice(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_save_without_extension_writes_pgm() {
        let img = GrayImage::from_vec(2, 2, vec![10, 20, 30, 40]).unwrap();
        let path = temp_path("no_extension");
        save_gray(&img, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P5"));

        let loaded = load_gray(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, img);
    }

    #[test]
    fn test_save_unknown_extension_writes_pgm() {
        let img = GrayImage::filled(3, 2, 99).unwrap();
        let path = temp_path("output.out");
        save_gray(&img, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(bytes.starts_with(b"P5"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_gray(temp_path("does_not_exist.pgm")).is_err());
    }
}
