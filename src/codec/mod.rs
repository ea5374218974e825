/// Image compression module
///
/// This module handles:
/// - The `Compressor` seam the session's compression requests go through
/// - Re-encoding with the `image` crate at a given quality
/// - Running compression off the UI thread

pub mod compressor;
pub mod encoder;

pub use compressor::{
    compress_in_background, CompressOptions, CompressOutput, Compressor, ImageCompressor,
};
