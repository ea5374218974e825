/// Session state machine
///
/// `Session::apply` maps (state, event) to the next state plus a list of
/// effects. It never touches handles, files, timers or the encoder itself;
/// the application performs the returned effects and feeds completions back
/// in as new events.

use serde::Serialize;
use tracing::debug;

use super::data::{CompressedImage, Generation, Payload, PreviewId, RequestId, SourceImage};
use super::quality::Quality;

/// Where the session is in the select → compare → reset cycle
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No image; the upload affordance is shown
    #[default]
    Idle,
    /// An image is selected and the comparison builds/updates
    Active,
    /// Reset requested; content stays on screen until the close delay elapses
    Closing,
}

/// Inputs to the reducer
#[derive(Debug, Clone)]
pub enum Event {
    /// A picked or dropped image was read and given a preview
    SourceAccepted(SourceImage),
    /// The quality slider moved
    QualityChanged(Quality),
    CompressionSucceeded {
        request: RequestId,
        image: CompressedImage,
    },
    CompressionFailed {
        request: RequestId,
        message: String,
    },
    DownloadRequested,
    /// "Compress another image"
    ResetRequested,
    /// The close delay for `Generation` has elapsed
    CloseElapsed(Generation),
}

/// Work the reducer asks the application to perform
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run the compressor and report back with `request`
    Compress {
        request: RequestId,
        payload: Payload,
        quality: Quality,
    },
    /// Drop a preview handle
    Release(PreviewId),
    /// Send `CloseElapsed(generation)` after the close delay
    ScheduleClose(Generation),
    /// Write `payload` to disk under `file_name`
    Save { file_name: String, payload: Payload },
}

/// The complete UI session state
#[derive(Serialize, Debug, Clone, Default)]
pub struct Session {
    phase: SessionPhase,
    quality: Quality,
    generation: Generation,
    source: Option<SourceImage>,
    compressed: Option<CompressedImage>,
    /// Last request issued; only its completion may be installed
    latest_request: Option<RequestId>,
    /// True while `latest_request` has not completed
    pending: bool,
    /// Non-blocking message shown after the latest compression failed
    notice: Option<String>,
    #[serde(skip_serializing)]
    next_request: u64,
}

impl Session {
    /// Create an idle session starting at `quality`
    pub fn new(quality: Quality) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    #[cfg(test)]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn compressed(&self) -> Option<&CompressedImage> {
        self.compressed.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[cfg(test)]
    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest_request
    }

    /// True while the most recent compression has not reported back
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether a new picked/dropped file would be taken
    pub fn accepts_selection(&self) -> bool {
        self.phase != SessionPhase::Closing
    }

    /// The comparison is shown once both images exist, and kept on screen
    /// while closing so it can animate out.
    pub fn shows_comparison(&self) -> bool {
        (self.source.is_some() && self.compressed.is_some())
            || self.phase == SessionPhase::Closing
    }

    /// Apply `event` and return the effects it requires
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::SourceAccepted(source) => self.accept_source(source),
            Event::QualityChanged(quality) => self.change_quality(quality),
            Event::CompressionSucceeded { request, image } => self.install(request, image),
            Event::CompressionFailed { request, message } => {
                if self.is_current(request) {
                    self.pending = false;
                    self.notice = Some(format!("Compression failed: {message}"));
                    debug!(request = request.0, "latest compression failed, keeping last result");
                } else {
                    debug!(request = request.0, "ignoring stale compression failure");
                }
                Vec::new()
            }
            Event::DownloadRequested => self.download(),
            Event::ResetRequested => {
                if self.phase != SessionPhase::Active {
                    return Vec::new();
                }
                self.phase = SessionPhase::Closing;
                debug!(generation = self.generation.0, "session closing");
                vec![Effect::ScheduleClose(self.generation)]
            }
            Event::CloseElapsed(generation) => {
                if self.phase != SessionPhase::Closing || generation != self.generation {
                    return Vec::new();
                }
                let effects = self.clear();
                self.phase = SessionPhase::Idle;
                debug!(generation = generation.0, "session idle");
                effects
            }
        }
    }

    fn accept_source(&mut self, source: SourceImage) -> Vec<Effect> {
        if !self.accepts_selection() {
            debug!(name = %source.name, "selection ignored while closing");
            return vec![Effect::Release(source.preview)];
        }

        let mut effects = self.clear();
        self.generation = Generation(self.generation.0 + 1);
        self.phase = SessionPhase::Active;

        let payload = source.payload.clone();
        debug!(
            generation = self.generation.0,
            name = %source.name,
            bytes = source.byte_size,
            "new session"
        );
        self.source = Some(source);
        effects.push(self.issue(payload));
        effects
    }

    fn change_quality(&mut self, quality: Quality) -> Vec<Effect> {
        self.quality = quality;

        if self.phase != SessionPhase::Active {
            return Vec::new();
        }
        match self.source.as_ref() {
            Some(source) => {
                let payload = source.payload.clone();
                vec![self.issue(payload)]
            }
            None => Vec::new(),
        }
    }

    fn install(&mut self, request: RequestId, image: CompressedImage) -> Vec<Effect> {
        if !self.is_current(request) || self.phase != SessionPhase::Active {
            debug!(request = request.0, "discarding stale compression result");
            return vec![Effect::Release(image.preview)];
        }

        let mut effects = Vec::new();
        if let Some(previous) = self.compressed.take() {
            effects.push(Effect::Release(previous.preview));
        }
        debug!(request = request.0, bytes = image.byte_size, "installed compressed image");
        self.compressed = Some(image);
        self.pending = false;
        self.notice = None;
        effects
    }

    fn download(&self) -> Vec<Effect> {
        if self.phase != SessionPhase::Active {
            return Vec::new();
        }
        match (self.source.as_ref(), self.compressed.as_ref()) {
            (Some(source), Some(compressed)) => vec![Effect::Save {
                file_name: compressed_file_name(&source.name),
                payload: compressed.payload.clone(),
            }],
            _ => Vec::new(),
        }
    }

    /// Issue the next request for `payload` at the current quality
    fn issue(&mut self, payload: Payload) -> Effect {
        self.next_request += 1;
        let request = RequestId(self.next_request);
        self.latest_request = Some(request);
        self.pending = true;

        Effect::Compress {
            request,
            payload,
            quality: self.quality,
        }
    }

    fn is_current(&self, request: RequestId) -> bool {
        self.latest_request == Some(request)
    }

    /// Drop the source and compressed images, releasing their previews.
    /// Quality survives; it is the user's preference, not session data.
    fn clear(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(source) = self.source.take() {
            effects.push(Effect::Release(source.preview));
        }
        if let Some(compressed) = self.compressed.take() {
            effects.push(Effect::Release(compressed.preview));
        }
        self.latest_request = None;
        self.pending = false;
        self.notice = None;
        effects
    }
}

/// Name for the downloaded file: `_compressed` goes before the last dot,
/// or at the end when there is no dot.
///
/// `photo.jpg` → `photo_compressed.jpg`, `noext` → `noext_compressed`
pub fn compressed_file_name(name: &str) -> String {
    const SUFFIX: &str = "_compressed";

    match name.rfind('.') {
        Some(dot) => format!("{}{}{}", &name[..dot], SUFFIX, &name[dot..]),
        None => format!("{name}{SUFFIX}"),
    }
}
