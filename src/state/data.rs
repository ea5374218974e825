/// Shared data structures for the session state
///
/// These structs represent the data model that flows between
/// the reducer, the preview registry and the UI layer.

use bytes::Bytes;
use serde::Serialize;

/// Immutable in-memory image bytes.
/// Clones share the buffer with background tasks and preview handles.
pub type Payload = Bytes;

/// Identifier of a live preview handle in the `PreviewArena`
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewId(pub u64);

/// Sequence number of a compression request.
/// Issued in increasing order and never reused.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// One selection → comparison → reset cycle
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(pub u64);

/// The image the user picked or dropped
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SourceImage {
    /// File name including extension (e.g., "photo.jpg")
    pub name: String,
    /// Size of the original payload in bytes
    pub byte_size: u64,
    /// Preview handle for the original bytes
    pub preview: PreviewId,
    #[serde(skip_serializing)]
    pub payload: Payload,
}

/// The result of compressing a `SourceImage` at some quality
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CompressedImage {
    pub byte_size: u64,
    pub preview: PreviewId,
    /// Output format label (e.g., "jpeg"); may differ from the source's
    pub format: String,
    #[serde(skip_serializing)]
    pub payload: Payload,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, payload: Payload, preview: PreviewId) -> Self {
        Self {
            name: name.into(),
            byte_size: payload.len() as u64,
            preview,
            payload,
        }
    }
}

impl CompressedImage {
    pub fn new(payload: Payload, format: impl Into<String>, preview: PreviewId) -> Self {
        Self {
            byte_size: payload.len() as u64,
            preview,
            format: format.into(),
            payload,
        }
    }
}
