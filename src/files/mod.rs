/// File boundary module
///
/// Everything that touches the filesystem or native dialogs:
/// - Declared media types and image acceptance (media.rs)
/// - Open dialog and reading picked/dropped files (loader.rs)
/// - Save dialog and writing the compressed result (saver.rs)

pub mod loader;
pub mod media;
pub mod saver;

pub use loader::{load_file, pick_image, LoadedFile};
pub use saver::{choose_destination, save_file};
