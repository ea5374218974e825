use iced::widget::image::Handle;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::data::{Payload, PreviewId};

/// The PreviewArena owns every live image handle shown by the UI.
///
/// The session only holds `PreviewId`s. A handle is minted when bytes enter
/// the session and dropped when the reducer asks for its release, so each
/// id is released exactly once and never resolved afterwards.
#[derive(Default)]
pub struct PreviewArena {
    next_id: u64,
    live: HashMap<PreviewId, Handle>,
    minted: u64,
    released: u64,
}

impl PreviewArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderable handle for `payload` and return its id.
    /// The handle shares the payload's buffer.
    pub fn mint(&mut self, payload: &Payload) -> PreviewId {
        self.next_id += 1;
        let id = PreviewId(self.next_id);
        let handle = Handle::from_bytes(payload.clone());

        self.live.insert(id, handle);
        self.minted += 1;
        debug!(preview = id.0, bytes = payload.len(), "minted preview");
        id
    }

    /// Look up a live handle
    pub fn get(&self, id: PreviewId) -> Option<&Handle> {
        self.live.get(&id)
    }

    /// Drop the handle for `id`.
    /// Returns false (and logs) if it was never minted or already released.
    pub fn release(&mut self, id: PreviewId) -> bool {
        if self.live.remove(&id).is_some() {
            self.released += 1;
            debug!(preview = id.0, "released preview");
            true
        } else {
            warn!(preview = id.0, "release of unknown preview");
            false
        }
    }

    #[cfg(test)]
    pub fn is_live(&self, id: PreviewId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn minted_count(&self) -> u64 {
        self.minted
    }

    pub fn released_count(&self) -> u64 {
        self.released
    }
}

impl std::fmt::Debug for PreviewArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewArena")
            .field("live", &self.live.len())
            .field("minted", &self.minted)
            .field("released", &self.released)
            .finish()
    }
}
