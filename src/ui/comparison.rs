/// Side-by-side original/compressed comparison with the quality slider

use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, row, slider, text};
use iced::{Alignment, ContentFit, Element, Length};

use super::format::{format_size, quality_label, savings_label};
use crate::state::{PreviewArena, Quality, Session, SessionPhase};
use crate::Message;

/// Height of each preview image
const PREVIEW_HEIGHT: f32 = 320.0;

/// Build the comparison view. Only called when `session.shows_comparison()`.
pub fn view<'a>(session: &'a Session, previews: &'a PreviewArena) -> Element<'a, Message> {
    let closing = session.phase() == SessionPhase::Closing;

    let original_size = session.source().map(|source| source.byte_size);
    let original = card(
        "Original".to_string(),
        session.source().and_then(|source| previews.get(source.preview)),
        original_size.map(format_size),
    );

    let compressed_size = session.compressed().map(|compressed| {
        let size = format_size(compressed.byte_size);
        match original_size.and_then(|original| savings_label(original, compressed.byte_size)) {
            Some(savings) => format!("{size} ({savings})"),
            None => size,
        }
    });
    let compressed_label = match session.compressed() {
        Some(compressed) => format!("Compressed ({})", compressed.format.to_uppercase()),
        None => "Compressed".to_string(),
    };
    let compressed = card(
        compressed_label,
        session.compressed().and_then(|compressed| previews.get(compressed.preview)),
        compressed_size,
    );

    let images = row![original, compressed].spacing(20);

    let can_download = !closing && session.compressed().is_some();
    let controls = column![
        text(quality_label(session.quality())).size(16),
        slider(
            Quality::MIN..=Quality::MAX,
            session.quality().value(),
            Message::QualityChanged
        )
        .step(Quality::STEP),
        button(text("Download"))
            .on_press_maybe(can_download.then_some(Message::Download))
            .padding(10)
            .style(button::primary),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    let mut content = column![images, controls].spacing(20);

    if session.is_pending() && !closing {
        content = content.push(text("Compressing…").size(14));
    }
    if let Some(notice) = session.notice() {
        content = content.push(text(notice).size(14).style(text::danger));
    }
    if closing {
        content = content.push(text("Closing…").size(14).style(text::secondary));
    }

    container(content).padding(20).style(container::rounded_box).into()
}

/// One labelled preview with its size underneath
fn card<'a>(label: String, preview: Option<&Handle>, size: Option<String>) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match preview {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(PREVIEW_HEIGHT))
            .content_fit(ContentFit::Contain)
            .into(),
        None => container(text("…"))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(PREVIEW_HEIGHT))
            .into(),
    };

    column![
        text(label).size(18),
        picture,
        text(size.unwrap_or_default()).size(14),
    ]
    .spacing(8)
    .align_x(Alignment::Center)
    .width(Length::FillPortion(1))
    .into()
}
