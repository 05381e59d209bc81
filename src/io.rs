// ============================================================================
// IMAGE I/O — decode the source photo, encode the filtered result
// ============================================================================

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageError, RgbImage};

use crate::error::{LomoError, Result};

/// Decode any format the `image` crate recognises and flatten it to 8-bit RGB.
/// Alpha, if present, is dropped.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|source| LomoError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = img.to_rgb8();
    log::info!(
        "loaded {} ({}x{})",
        path.display(),
        rgb.width(),
        rgb.height()
    );
    Ok(rgb)
}

/// Write `image` to `path`. JPEG paths use `quality`; any other extension is
/// handed to `image`'s format inference.
pub fn save_image(image: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    encode_and_write(image, path, quality).map_err(|source| LomoError::Save {
        path: path.to_path_buf(),
        source,
    })
}

fn encode_and_write(image: &RgbImage, path: &Path, quality: u8) -> std::result::Result<(), ImageError> {
    if is_jpeg_path(path) {
        write_jpeg(image, path, quality)
    } else {
        image.save(path)
    }
}

fn write_jpeg(image: &RgbImage, path: &Path, quality: u8) -> std::result::Result<(), ImageError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));
        encoder.encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ColorType::Rgb8,
        )?;
    }
    // Dropping a BufWriter discards write errors; surface them here.
    writer.flush()?;
    Ok(())
}

fn is_jpeg_path(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("jpg") | Some("jpeg")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn jpeg_extension_detection() {
        assert!(is_jpeg_path(Path::new("out.jpg")));
        assert!(is_jpeg_path(Path::new("dir/OUT.JPEG")));
        assert!(!is_jpeg_path(Path::new("out.png")));
        assert!(!is_jpeg_path(Path::new("noext")));
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        let img = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 80, 7]));
        save_image(&img, &path, 90).unwrap();
        assert_eq!(load_image(&path).unwrap(), img);
    }

    #[test]
    fn jpeg_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.jpg");
        let img = RgbImage::from_pixel(16, 9, Rgb([120, 60, 30]));
        save_image(&img, &path, 95).unwrap();
        assert_eq!(load_image(&path).unwrap().dimensions(), (16, 9));
    }

    #[test]
    fn missing_file_is_load_error() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, LomoError::Load { .. }));
    }

    #[test]
    fn unwritable_path_is_save_error() {
        let img = RgbImage::new(2, 2);
        let err = save_image(&img, Path::new("/definitely/not/here/out.jpg"), 90).unwrap_err();
        assert!(matches!(err, LomoError::Save { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn full_device_is_save_error() {
        let image = RgbImage::from_pixel(16, 16, Rgb([90, 140, 200]));
        assert!(write_jpeg(&image, Path::new("/dev/full"), 90).is_err());

        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("out.jpg");
        std::os::unix::fs::symlink("/dev/full", &link).unwrap();
        let err = save_image(&image, &link, 90).unwrap_err();
        assert!(matches!(err, LomoError::Save { .. }));
    }
}
