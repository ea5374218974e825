/// Per-format encoders
///
/// Thin wrappers over the `image` crate encoders, plus libwebp for lossy
/// WebP. Each returns the encoded bytes or an `Encode` error carrying the
/// encoder's message.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, Rgb, RgbImage};

use crate::error::CompressError;

/// Encode as baseline JPEG at `level` (1..=100).
/// Transparent areas are composited onto white first.
pub fn encode_jpeg(img: &DynamicImage, level: u8) -> Result<Vec<u8>, CompressError> {
    let rgb = if img.color().has_alpha() {
        flatten_onto_white(img)
    } else {
        img.to_rgb8()
    };

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, level);
    DynamicImage::ImageRgb8(rgb)
        .write_with_encoder(encoder)
        .map_err(|e| CompressError::Encode(e.to_string()))?;
    Ok(out)
}

/// Encode as PNG with the strongest deflate setting
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, CompressError> {
    let normalized = to_8bit(img);

    let mut out = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
    normalized
        .write_with_encoder(encoder)
        .map_err(|e| CompressError::Encode(e.to_string()))?;
    Ok(out)
}

/// Encode as lossy WebP at `quality` (0.0..=100.0)
pub fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, CompressError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let encoded = webp::Encoder::from_rgba(rgba.as_raw(), width, height)
        .encode_simple(false, quality)
        .map_err(|e| CompressError::Encode(format!("webp: {e:?}")))?;
    Ok(encoded.to_vec())
}

/// Composite an image with alpha onto an opaque white background
pub fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }

    rgb
}

/// Reduce to 8-bit RGB or RGBA so every encoder accepts the buffer
fn to_8bit(img: &DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => img.clone(),
        _ if img.color().has_alpha() => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    #[test]
    fn test_flatten_transparent_is_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0])));
        let flat = flatten_onto_white(&img);
        assert!(flat.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_flatten_opaque_keeps_color() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255])));
        let flat = flatten_onto_white(&img);
        assert!(flat.pixels().all(|p| p.0 == [10, 20, 30]));
    }

    #[test]
    fn test_encoders_produce_their_format() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(16, 16, |x, y| {
            Rgb([(x * 16) as u8, (y * 16) as u8, 128])
        }));

        let jpeg = encode_jpeg(&img, 80).unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);

        let png = encode_png(&img).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);

        let webp = encode_webp(&img, 80.0).unwrap();
        assert_eq!(image::guess_format(&webp).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn test_png_accepts_float_input() {
        let img = DynamicImage::ImageRgb32F(image::Rgb32FImage::from_pixel(
            3,
            3,
            Rgb([0.5, 0.25, 1.0]),
        ));
        let png = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 3);
    }
}
