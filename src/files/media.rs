use image::ImageFormat;
use std::path::Path;

/// Extensions offered by the open dialog
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff", "ico", "tga", "qoi", "pnm",
    "pbm", "pgm", "ppm",
];

/// Media type a file declares through its extension (e.g. "image/jpeg")
pub fn declared_media_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?;
    ImageFormat::from_extension(extension).map(|format| format.to_mime_type())
}

/// Only the `image/` category is accepted
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Whether a dropped path should be taken as an image
pub fn is_image_file(path: &Path) -> bool {
    declared_media_type(path).is_some_and(is_image_media_type)
}
