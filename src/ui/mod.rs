/// User interface module
///
/// - Upload/drop affordance and reset control (upload.rs)
/// - Before/after comparison with quality slider and download (comparison.rs)
/// - Display formatting helpers (format.rs)

pub mod comparison;
pub mod format;
pub mod upload;
