/// State management module
///
/// This module handles all session state, including:
/// - Shared data structures (data.rs)
/// - The quality parameter (quality.rs)
/// - The select → compare → reset state machine (session.rs)
/// - Ownership of renderable preview handles (previews.rs)

pub mod data;
pub mod previews;
pub mod quality;
pub mod session;

pub use data::{CompressedImage, Generation, Payload, PreviewId, RequestId, SourceImage};
pub use previews::PreviewArena;
pub use quality::Quality;
pub use session::{Effect, Event, Session, SessionPhase};
