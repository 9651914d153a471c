//! Photo normalization: shrink a user-selected image so four of them fit in
//! localStorage next to the quest snapshot.
//!
//! Pipeline: decode (format sniffed) → bound the longer side → triangle
//! resample → RGB JPEG at fixed quality → `data:` URL.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::config::PipelineConfig;
use crate::error::PhotoError;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Output of [`normalize`].
#[derive(Debug, Clone)]
pub struct NormalizedPhoto {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// Target size for a `width`×`height` image. If the longer side exceeds
/// `max`, both sides scale down so it equals `max` (the other side is
/// truncated, never below 1). Otherwise the size is unchanged.
pub fn target_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    let scaled = |side: u32, longer: u32| -> u32 {
        ((side as u64 * max as u64) / longer as u64).max(1) as u32
    };
    if width > height {
        if width > max {
            return (max, scaled(height, width));
        }
    } else if height > max {
        return (scaled(width, height), max);
    }
    (width, height)
}

/// Decode, bound, re-encode. Fails without side effects; callers keep the
/// previous photo on error.
pub fn normalize(bytes: &[u8], config: &PipelineConfig) -> Result<NormalizedPhoto, PhotoError> {
    if bytes.is_empty() {
        return Err(PhotoError::Empty);
    }

    let img = image::load_from_memory(bytes).map_err(PhotoError::Decode)?;
    let (w, h) = img.dimensions();
    let (tw, th) = target_dimensions(w, h, config.max_dimension);

    let resized = if (tw, th) == (w, h) {
        img
    } else {
        img.resize_exact(tw, th, FilterType::Triangle)
    };

    let jpeg = encode_jpeg(&resized, config.jpeg_quality)?;
    let mut data_url = String::with_capacity(DATA_URL_PREFIX.len() + jpeg.len() * 4 / 3 + 4);
    data_url.push_str(DATA_URL_PREFIX);
    STANDARD.encode_string(&jpeg, &mut data_url);

    if data_url.len() > config.max_photo_bytes {
        return Err(PhotoError::TooLarge {
            len: data_url.len(),
            max: config.max_photo_bytes,
        });
    }

    log::debug!(
        "Normalized photo {}x{} -> {}x{} ({} bytes)",
        w,
        h,
        tw,
        th,
        data_url.len()
    );

    Ok(NormalizedPhoto {
        data_url,
        width: tw,
        height: th,
    })
}

/// JPEG has no alpha channel; transparent pixels keep their color values.
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, PhotoError> {
    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder).map_err(PhotoError::Encode)?;
    Ok(out)
}

/// Whether `s` looks like something the pipeline produced.
pub fn is_photo_data_url(s: &str) -> bool {
    s.starts_with(DATA_URL_PREFIX) && s.len() > DATA_URL_PREFIX.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn decode_data_url(url: &str) -> DynamicImage {
        let b64 = url.strip_prefix(DATA_URL_PREFIX).unwrap();
        let bytes = STANDARD.decode(b64).unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn small_dimensions_unchanged() {
        assert_eq!(target_dimensions(800, 600, 1200), (800, 600));
        assert_eq!(target_dimensions(1200, 1200, 1200), (1200, 1200));
        assert_eq!(target_dimensions(1, 1, 1200), (1, 1));
    }

    #[test]
    fn landscape_scales_to_ceiling() {
        assert_eq!(target_dimensions(3000, 2000, 1200), (1200, 800));
        assert_eq!(target_dimensions(4032, 3024, 1200), (1200, 900));
    }

    #[test]
    fn portrait_and_square_scale_to_ceiling() {
        assert_eq!(target_dimensions(2000, 3000, 1200), (800, 1200));
        assert_eq!(target_dimensions(2400, 2400, 1200), (1200, 1200));
    }

    #[test]
    fn extreme_aspect_keeps_one_pixel() {
        assert_eq!(target_dimensions(5000, 1, 1200), (1200, 1));
    }

    #[test]
    fn normalize_keeps_small_image_size() {
        let out = normalize(&png_bytes(640, 480), &PipelineConfig::default()).unwrap();
        assert_eq!((out.width, out.height), (640, 480));
        assert!(is_photo_data_url(&out.data_url));
        let decoded = decode_data_url(&out.data_url);
        assert_eq!(decoded.dimensions(), (640, 480));
    }

    #[test]
    fn normalize_bounds_large_image() {
        let out = normalize(&png_bytes(3000, 1500), &PipelineConfig::default()).unwrap();
        assert_eq!((out.width, out.height), (1200, 600));
        let decoded = decode_data_url(&out.data_url);
        assert_eq!(decoded.dimensions(), (1200, 600));
    }

    #[test]
    fn normalize_accepts_transparent_png() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 0]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        let out = normalize(buf.get_ref(), &PipelineConfig::default()).unwrap();
        assert_eq!((out.width, out.height), (10, 10));
    }

    #[test]
    fn normalize_rejects_garbage() {
        let err = normalize(b"definitely not an image", &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PhotoError::Decode(_)));
    }

    #[test]
    fn normalize_rejects_empty() {
        let err = normalize(&[], &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PhotoError::Empty));
    }

    #[test]
    fn normalize_enforces_ceiling() {
        let config = PipelineConfig {
            max_photo_bytes: 64,
            ..PipelineConfig::default()
        };
        let err = normalize(&png_bytes(200, 200), &config).unwrap_err();
        assert!(matches!(err, PhotoError::TooLarge { max: 64, .. }));
    }
}
