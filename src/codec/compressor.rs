/// The compression capability
///
/// `Compressor` is the seam between the session and the actual encoder.
/// `ImageCompressor` re-encodes with the `image` crate:
/// - JPEG stays JPEG at the requested quality
/// - PNG stays PNG, or becomes JPEG when larger than `convert_size`
/// - WebP stays WebP, lossy at the requested quality
/// - anything else decodable becomes PNG
///
/// EXIF orientation is applied to the pixels before encoding, so the output
/// is upright without carrying the tag.
///
/// In strict mode an output larger than its input is discarded in favor of
/// the original bytes.

use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;
use tracing::debug;

use super::encoder;
use crate::error::CompressError;
use crate::state::{Payload, Quality};

/// PNG inputs above this many bytes are converted to JPEG
pub const DEFAULT_CONVERT_SIZE: u64 = 5_000_000;

/// Parameters for one compression call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressOptions {
    pub quality: Quality,
    /// Return the input unchanged when re-encoding would grow it
    pub strict: bool,
    pub convert_size: u64,
}

impl CompressOptions {
    #[cfg(test)]
    pub fn new(quality: Quality) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            strict: true,
            convert_size: DEFAULT_CONVERT_SIZE,
        }
    }
}

/// Encoded bytes plus the format they are in
#[derive(Debug, Clone, PartialEq)]
pub struct CompressOutput {
    pub bytes: Payload,
    pub format: ImageFormat,
}

impl CompressOutput {
    /// Short lowercase label, e.g. "jpeg"
    pub fn format_label(&self) -> String {
        format!("{:?}", self.format).to_lowercase()
    }
}

/// Anything that can turn image bytes into smaller image bytes
pub trait Compressor: Send + Sync {
    fn compress(&self, payload: &[u8], options: &CompressOptions)
        -> Result<CompressOutput, CompressError>;
}

/// Compressor backed by the `image` crate encoders
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCompressor;

impl ImageCompressor {
    pub fn new() -> Self {
        Self
    }

    /// Decode `payload` and rotate/flip it upright per its EXIF orientation
    fn decode_upright(payload: &[u8], format: ImageFormat) -> Result<DynamicImage, CompressError> {
        let decode_error = |e: image::ImageError| CompressError::Decode(e.to_string());

        let mut decoder = ImageReader::with_format(Cursor::new(payload), format)
            .into_decoder()
            .map_err(decode_error)?;
        let orientation = decoder.orientation().map_err(decode_error)?;
        let mut img = DynamicImage::from_decoder(decoder).map_err(decode_error)?;

        img.apply_orientation(orientation);
        Ok(img)
    }

    /// Pick the output format for an input of `input_format` and `input_len` bytes
    fn output_format(input_format: ImageFormat, input_len: u64, options: &CompressOptions) -> ImageFormat {
        match input_format {
            ImageFormat::Jpeg => ImageFormat::Jpeg,
            ImageFormat::Png if input_len > options.convert_size => ImageFormat::Jpeg,
            ImageFormat::Png => ImageFormat::Png,
            ImageFormat::WebP => ImageFormat::WebP,
            _ => ImageFormat::Png,
        }
    }
}

impl Compressor for ImageCompressor {
    fn compress(
        &self,
        payload: &[u8],
        options: &CompressOptions,
    ) -> Result<CompressOutput, CompressError> {
        let input_format =
            image::guess_format(payload).map_err(|_| CompressError::UnsupportedFormat)?;
        let img = Self::decode_upright(payload, input_format)?;

        let format = Self::output_format(input_format, payload.len() as u64, options);
        let bytes = match format {
            ImageFormat::Jpeg => encoder::encode_jpeg(&img, options.quality.jpeg_level())?,
            ImageFormat::WebP => encoder::encode_webp(&img, options.quality.webp_level())?,
            _ => encoder::encode_png(&img)?,
        };

        debug!(
            input = ?input_format,
            output = ?format,
            quality = options.quality.value(),
            before = payload.len(),
            after = bytes.len(),
            "re-encoded image"
        );

        if options.strict && bytes.len() > payload.len() {
            debug!("output larger than input, keeping original bytes");
            return Ok(CompressOutput {
                bytes: Payload::copy_from_slice(payload),
                format: input_format,
            });
        }

        Ok(CompressOutput {
            bytes: Payload::from(bytes),
            format,
        })
    }
}

/// Compress on the blocking pool, then hold the result for `min_display`
/// so fast encodes still show a visible "compressing" beat.
/// Failures are reported immediately.
pub async fn compress_in_background(
    compressor: Arc<dyn Compressor>,
    payload: Payload,
    options: CompressOptions,
    min_display: Duration,
) -> Result<CompressOutput, CompressError> {
    let output = task::spawn_blocking(move || compressor.compress(&payload, &options))
        .await
        .map_err(|e| CompressError::Worker(e.to_string()))??;

    if !min_display.is_zero() {
        tokio::time::sleep(min_display).await;
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

    /// A noisy-ish gradient so quality actually changes the JPEG size
    fn sample_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(64, 64, |x, y| {
            let noise = ((x * 31 + y * 17) % 23) as u8 * 5;
            Rgb([(x * 4) as u8 ^ noise, (y * 4) as u8, noise])
        }))
    }

    fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    fn lax(quality: f32) -> CompressOptions {
        CompressOptions {
            quality: Quality::new(quality),
            strict: false,
            convert_size: DEFAULT_CONVERT_SIZE,
        }
    }

    #[test]
    fn test_jpeg_quality_controls_size() {
        let input = encoder::encode_jpeg(&sample_image(), 100).unwrap();
        let compressor = ImageCompressor::new();

        let low = compressor.compress(&input, &lax(0.1)).unwrap();
        let high = compressor.compress(&input, &lax(0.9)).unwrap();

        assert_eq!(low.format, ImageFormat::Jpeg);
        assert_eq!(high.format, ImageFormat::Jpeg);
        assert!(low.bytes.len() < high.bytes.len());
    }

    #[test]
    fn test_repeated_compression_succeeds() {
        let input = encoder::encode_jpeg(&sample_image(), 90).unwrap();
        let compressor = ImageCompressor::new();
        let options = CompressOptions::new(Quality::new(0.5));

        let first = compressor.compress(&input, &options).unwrap();
        let second = compressor.compress(&input, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_strict_keeps_smaller_original() {
        let input = encoder::encode_jpeg(&sample_image(), 5).unwrap();
        let compressor = ImageCompressor::new();

        let strict = compressor
            .compress(&input, &CompressOptions::new(Quality::new(1.0)))
            .unwrap();
        assert_eq!(&strict.bytes[..], input.as_slice());
        assert_eq!(strict.format, ImageFormat::Jpeg);

        let grown = compressor.compress(&input, &lax(1.0)).unwrap();
        assert!(grown.bytes.len() > input.len());
    }

    #[test]
    fn test_webp_quality_controls_size() {
        let input = encoder::encode_webp(&sample_image(), 100.0).unwrap();
        let compressor = ImageCompressor::new();

        let low = compressor.compress(&input, &lax(0.1)).unwrap();
        let high = compressor.compress(&input, &lax(0.9)).unwrap();

        assert_eq!(low.format, ImageFormat::WebP);
        assert_eq!(image::guess_format(&low.bytes).unwrap(), ImageFormat::WebP);
        assert!(low.bytes.len() < high.bytes.len());
    }

    /// Insert an APP1 Exif segment carrying `orientation` right after SOI
    fn with_exif_orientation(jpeg: &[u8], orientation: u8) -> Vec<u8> {
        let mut segment = vec![0xFF, 0xE1, 0x00, 0x22];
        segment.extend_from_slice(b"Exif\0\0");
        // Big-endian TIFF header, first IFD at offset 8
        segment.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
        // One entry: tag 0x0112 (Orientation), SHORT, count 1
        segment.extend_from_slice(&[0x00, 0x01]);
        segment.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        segment.extend_from_slice(&[0x00, orientation, 0x00, 0x00]);
        segment.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&segment);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_exif_orientation_is_applied() {
        let landscape = DynamicImage::ImageRgb8(RgbImage::from_fn(64, 32, |x, _| {
            Rgb([(x * 4) as u8, 0, 0])
        }));
        let plain = encoder::encode_jpeg(&landscape, 90).unwrap();
        let rotated = with_exif_orientation(&plain, 6);

        let output = ImageCompressor::new().compress(&rotated, &lax(0.8)).unwrap();
        let decoded = image::load_from_memory(&output.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 64));

        let untagged = ImageCompressor::new().compress(&plain, &lax(0.8)).unwrap();
        let decoded = image::load_from_memory(&untagged.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 32));
    }

    #[test]
    fn test_png_stays_png_below_convert_size() {
        let input = encode(&sample_image(), ImageFormat::Png);
        let output = ImageCompressor::new().compress(&input, &lax(0.6)).unwrap();
        assert_eq!(output.format, ImageFormat::Png);
        assert_eq!(output.format_label(), "png");
    }

    #[test]
    fn test_large_png_converts_to_jpeg() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0])));
        let input = encode(&img, ImageFormat::Png);
        let options = CompressOptions {
            quality: Quality::new(0.8),
            strict: false,
            convert_size: 0,
        };

        let output = ImageCompressor::new().compress(&input, &options).unwrap();
        assert_eq!(output.format, ImageFormat::Jpeg);
        assert_eq!(image::guess_format(&output.bytes).unwrap(), ImageFormat::Jpeg);

        // Transparent pixels come out white
        let decoded = image::load_from_memory(&output.bytes).unwrap().to_rgb8();
        assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c >= 250)));
    }

    #[test]
    fn test_other_formats_become_png() {
        let input = encode(&sample_image(), ImageFormat::Bmp);
        let output = ImageCompressor::new().compress(&input, &lax(0.6)).unwrap();
        assert_eq!(output.format, ImageFormat::Png);
    }

    #[test]
    fn test_unknown_bytes_are_rejected() {
        let err = ImageCompressor::new()
            .compress(b"definitely not an image", &CompressOptions::default())
            .unwrap_err();
        assert_eq!(err, CompressError::UnsupportedFormat);
    }

    #[test]
    fn test_truncated_image_fails_to_decode() {
        let mut input = encoder::encode_jpeg(&sample_image(), 80).unwrap();
        input.truncate(40);
        let err = ImageCompressor::new()
            .compress(&input, &CompressOptions::default())
            .unwrap_err();
        assert!(matches!(err, CompressError::Decode(_)));
    }

    #[tokio::test]
    async fn test_compress_in_background() {
        let input = Payload::from(encoder::encode_jpeg(&sample_image(), 90).unwrap());
        let compressor: Arc<dyn Compressor> = Arc::new(ImageCompressor::new());

        let output = compress_in_background(
            compressor,
            input,
            CompressOptions::new(Quality::new(0.3)),
            Duration::from_millis(5),
        )
        .await
        .unwrap();
        assert_eq!(output.format, ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn test_background_failure_is_reported() {
        let compressor: Arc<dyn Compressor> = Arc::new(ImageCompressor::new());
        let result = compress_in_background(
            compressor,
            Payload::from(vec![0u8; 8]),
            CompressOptions::default(),
            Duration::from_secs(60),
        )
        .await;
        assert_eq!(result.unwrap_err(), CompressError::UnsupportedFormat);
    }
}
