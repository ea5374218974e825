// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use iced::widget::{column, container, scrollable, text};
use iced::{event, window, Alignment, Element, Event, Length, Subscription, Task, Theme};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod codec;
mod error;
mod files;
mod settings;
mod state;
mod ui;

use codec::{CompressOutput, Compressor, ImageCompressor};
use error::{CompressError, LoadError, SaveError};
use files::LoadedFile;
use settings::Settings;
use state::{
    CompressedImage, Effect, Event as SessionEvent, Generation, PreviewArena, Quality, RequestId,
    Session, SessionPhase, SourceImage,
};

/// Main application state
struct ImageCompressorApp {
    /// Select → compare → reset state machine
    session: Session,
    /// Owner of every preview handle the session refers to
    previews: PreviewArena,
    compressor: Arc<dyn Compressor>,
    settings: Settings,
    /// Files are being dragged over the window
    drop_hovered: bool,
    /// Sequence number of the most recent file read; older reads are dropped
    latest_load: u64,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the upload area
    PickFile,
    /// A file was dropped anywhere on the window
    FileDropped(PathBuf),
    DropHovered(bool),
    /// Background read of a picked/dropped file finished
    FileLoaded(u64, Result<LoadedFile, LoadError>),
    QualityChanged(f32),
    /// Background compression finished
    Compressed(RequestId, Result<CompressOutput, CompressError>),
    Download,
    Saved(Result<PathBuf, SaveError>),
    /// User clicked "Compress another image"
    Reset,
    CloseElapsed(Generation),
}

impl ImageCompressorApp {
    /// Create a new instance of the application
    fn new(settings: Settings) -> (Self, Task<Message>) {
        (
            Self::with_compressor(settings, Arc::new(ImageCompressor::new())),
            Task::none(),
        )
    }

    fn with_compressor(settings: Settings, compressor: Arc<dyn Compressor>) -> Self {
        ImageCompressorApp {
            session: Session::new(settings.default_quality),
            previews: PreviewArena::new(),
            compressor,
            settings,
            drop_hovered: false,
            latest_load: 0,
        }
    }

    /// Read `path` in the background, superseding any read still in flight
    fn load(&mut self, path: PathBuf) -> Task<Message> {
        self.latest_load += 1;
        let load = self.latest_load;
        Task::perform(files::load_file(path), move |result| {
            Message::FileLoaded(load, result)
        })
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFile => {
                if !self.session.accepts_selection() {
                    return Task::none();
                }
                match files::pick_image() {
                    Some(path) => self.load(path),
                    None => {
                        debug!("file picker cancelled");
                        Task::none()
                    }
                }
            }
            Message::FileDropped(path) => {
                self.drop_hovered = false;

                if !self.session.accepts_selection() {
                    debug!(path = %path.display(), "drop ignored while closing");
                    return Task::none();
                }
                if !files::media::is_image_file(&path) {
                    debug!(path = %path.display(), "ignoring non-image drop");
                    return Task::none();
                }
                self.load(path)
            }
            Message::DropHovered(hovered) => {
                self.drop_hovered = hovered && self.session.accepts_selection();
                Task::none()
            }
            Message::FileLoaded(load, _) if load != self.latest_load => {
                debug!(load, latest = self.latest_load, "discarding superseded file read");
                Task::none()
            }
            Message::FileLoaded(_, Ok(file)) => {
                if !file.is_image() {
                    debug!(name = %file.name, "ignoring non-image file");
                    return Task::none();
                }
                info!(name = %file.name, bytes = file.payload.len(), "selected image");

                let preview = self.previews.mint(&file.payload);
                let source = SourceImage::new(file.name, file.payload, preview);
                self.dispatch(SessionEvent::SourceAccepted(source))
            }
            Message::FileLoaded(_, Err(e)) => {
                warn!("could not open image: {}", e);
                Task::none()
            }
            Message::QualityChanged(value) => {
                self.dispatch(SessionEvent::QualityChanged(Quality::new(value)))
            }
            Message::Compressed(request, Ok(output)) => {
                let format = output.format_label();
                let preview = self.previews.mint(&output.bytes);
                let image = CompressedImage::new(output.bytes, format, preview);
                self.dispatch(SessionEvent::CompressionSucceeded { request, image })
            }
            Message::Compressed(request, Err(e)) => {
                warn!(request = request.0, "compression failed: {}", e);
                self.dispatch(SessionEvent::CompressionFailed {
                    request,
                    message: e.to_string(),
                })
            }
            Message::Download => self.dispatch(SessionEvent::DownloadRequested),
            Message::Saved(Ok(_)) => Task::none(),
            Message::Saved(Err(e)) => {
                warn!("could not save compressed image: {}", e);
                Task::none()
            }
            Message::Reset => self.dispatch(SessionEvent::ResetRequested),
            Message::CloseElapsed(generation) => {
                let task = self.dispatch(SessionEvent::CloseElapsed(generation));
                debug!(
                    live = self.previews.live_count(),
                    minted = self.previews.minted_count(),
                    released = self.previews.released_count(),
                    "previews after close"
                );
                task
            }
        }
    }

    /// Run `event` through the session and perform the resulting effects
    fn dispatch(&mut self, event: SessionEvent) -> Task<Message> {
        let effects = self.session.apply(event);
        let tasks: Vec<Task<Message>> = effects
            .into_iter()
            .map(|effect| self.perform(effect))
            .collect();
        Task::batch(tasks)
    }

    fn perform(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::Compress {
                request,
                payload,
                quality,
            } => {
                debug!(request = request.0, quality = quality.value(), "compressing");
                Task::perform(
                    codec::compress_in_background(
                        Arc::clone(&self.compressor),
                        payload,
                        self.settings.compress_options(quality),
                        self.settings.min_display_delay(),
                    ),
                    move |result| Message::Compressed(request, result),
                )
            }
            Effect::Release(preview) => {
                self.previews.release(preview);
                Task::none()
            }
            Effect::ScheduleClose(generation) => {
                let delay = self.settings.close_delay();
                Task::perform(
                    async move { tokio::time::sleep(delay).await },
                    move |_| Message::CloseElapsed(generation),
                )
            }
            Effect::Save { file_name, payload } => match files::choose_destination(&file_name) {
                Some(path) => Task::perform(files::save_file(path, payload), Message::Saved),
                None => {
                    debug!(file_name = %file_name, "save dialog cancelled");
                    Task::none()
                }
            },
        }
    }

    /// Window-wide drag and drop
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            Event::Window(window::Event::FileHovered(_)) => Some(Message::DropHovered(true)),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::DropHovered(false)),
            _ => None,
        })
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut content = column![]
            .spacing(24)
            .padding(40)
            .align_x(Alignment::Center)
            .max_width(960);

        match self.session.phase() {
            SessionPhase::Idle => {
                content = content
                    .push(ui::upload::header())
                    .push(ui::upload::upload_zone(self.drop_hovered));
            }
            phase => {
                content = content.push(ui::upload::back_button(phase == SessionPhase::Active));
            }
        }

        if self.session.shows_comparison() {
            content = content.push(ui::comparison::view(&self.session, &self.previews));
        } else if let Some(source) = self.session.source() {
            let status = match self.session.notice() {
                Some(notice) => notice.to_string(),
                None => format!("Compressing {}…", source.name),
            };
            content = content.push(text(status).size(16));
        }

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Compact console logging; `RUST_LOG` overrides the default filter
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("image_compressor=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();
}

fn main() -> iced::Result {
    init_tracing();

    let settings = Settings::load();
    info!(
        quality = settings.default_quality.value(),
        strict = settings.strict,
        "=== Image Compressor starting ==="
    );

    iced::application(
        "Image Compressor",
        ImageCompressorApp::update,
        ImageCompressorApp::view,
    )
    .subscription(ImageCompressorApp::subscription)
    .theme(ImageCompressorApp::theme)
    .centered()
    .run_with(move || ImageCompressorApp::new(settings))
}
