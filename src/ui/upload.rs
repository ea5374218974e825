/// Upload affordance and the "compress another image" control

use iced::widget::{button, column, container, text};
use iced::{Alignment, Element, Length, Theme};

use crate::Message;

/// Title block shown while no image is selected
pub fn header<'a>() -> Element<'a, Message> {
    column![
        text("Free Image Compressor").size(40),
        text("Reduce image file size without leaving your machine. Fast, private, and easy to use.")
            .size(16),
    ]
    .spacing(8)
    .align_x(Alignment::Center)
    .into()
}

/// Click-to-pick area that also advertises the window-wide drop target
pub fn upload_zone<'a>(drop_hovered: bool) -> Element<'a, Message> {
    let hint = if drop_hovered {
        "Release to compress"
    } else {
        "JPEG, PNG, WebP, GIF, BMP, TIFF and more"
    };

    let prompt = column![
        text("Drag and drop an image here or click to select an image.").size(18),
        text(hint).size(14),
    ]
    .spacing(8)
    .align_x(Alignment::Center);

    let style: fn(&Theme, button::Status) -> button::Style = if drop_hovered {
        button::success
    } else {
        button::secondary
    };

    button(container(prompt).padding(48).center_x(Length::Fill))
        .on_press(Message::PickFile)
        .width(Length::Fill)
        .style(style)
        .into()
}

/// "Compress another image"; disabled while the session is closing
pub fn back_button<'a>(enabled: bool) -> Element<'a, Message> {
    button(text("← Compress another image").size(16))
        .on_press_maybe(enabled.then_some(Message::Reset))
        .style(button::text)
        .into()
}
