use eframe::egui;

use crate::common::types::format_message_time;
use crate::common::{CurrentUser, Message, Peer, Side};

use super::avatar::{self, MediaCache};

const BUBBLE_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(42, 28, 74, 77);
const BUBBLE_MAX_WIDTH: f32 = 200.0;
const IMAGE_MAX_WIDTH: f32 = 230.0;
const IMAGE_PLACEHOLDER: &str = "[image]";

/// The two sides of the conversation.
pub struct Participants<'a> {
    pub me: &'a CurrentUser,
    pub peer: &'a Peer,
}

pub fn render(
    ui: &mut egui::Ui,
    media: &mut MediaCache,
    messages: &[Message],
    participants: &Participants<'_>,
    scroll_to_end: bool,
) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (index, message) in messages.iter().enumerate() {
                // Id-less messages may share a timestamp.
                let row_id = match &message.id {
                    Some(_) => egui::Id::new(message.key()),
                    None => egui::Id::new(message.key()).with(index),
                };
                ui.push_id(row_id, |ui| {
                    message_row(ui, media, message, participants);
                });
                ui.add_space(8.0);
            }

            // End marker; scrolled into view whenever the timeline changes.
            let end = ui.allocate_response(egui::Vec2::ZERO, egui::Sense::hover());
            if scroll_to_end {
                end.scroll_to_me(Some(egui::Align::BOTTOM));
            }
        });
}

pub fn render_loading(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading messages...");
        });
    });
}

pub fn render_load_failed(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Couldn't load messages")
                .color(egui::Color32::from_rgb(248, 113, 113)),
        );
    });
}

/// Shown when no conversation is selected.
pub fn render_empty(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Chat anytime, anywhere")
                .size(18.0)
                .weak(),
        );
    });
}

fn message_row(
    ui: &mut egui::Ui,
    media: &mut MediaCache,
    message: &Message,
    participants: &Participants<'_>,
) {
    let side = Side::of(message, &participants.me.id);
    let (layout, avatar_uri, name) = match side {
        Side::Outgoing => (
            egui::Layout::right_to_left(egui::Align::Max),
            participants.me.profile_pic.as_deref(),
            participants.me.full_name.as_str(),
        ),
        Side::Incoming => (
            egui::Layout::left_to_right(egui::Align::Max),
            participants.peer.profile_pic.as_deref(),
            participants.peer.full_name.as_str(),
        ),
    };

    ui.with_layout(layout, |ui| {
        ui.vertical(|ui| {
            avatar::show(ui, media, avatar_uri, name, 28.0);
            ui.label(
                egui::RichText::new(format_message_time(&message.created_at))
                    .small()
                    .weak(),
            );
        });
        bubble(ui, media, message, side);
    });
}

fn bubble(ui: &mut egui::Ui, media: &mut MediaCache, message: &Message, side: Side) {
    if let Some(uri) = message.image.as_deref() {
        if let Some(source) = media.source(uri) {
            ui.add(
                egui::Image::new(source)
                    .max_width(IMAGE_MAX_WIDTH)
                    .corner_radius(egui::CornerRadius::same(8)),
            );
            return;
        }
    }

    // The corner nearest the avatar stays square.
    let corners = match side {
        Side::Outgoing => egui::CornerRadius {
            nw: 8,
            ne: 8,
            sw: 8,
            se: 0,
        },
        Side::Incoming => egui::CornerRadius {
            nw: 8,
            ne: 8,
            sw: 0,
            se: 8,
        },
    };

    egui::Frame::new()
        .fill(BUBBLE_FILL)
        .corner_radius(corners)
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.set_max_width(BUBBLE_MAX_WIDTH);
            ui.label(
                egui::RichText::new(bubble_text(message)).color(egui::Color32::WHITE),
            );
        });
}

/// Text shown in a bubble; images that cannot be displayed get a marker.
fn bubble_text(message: &Message) -> &str {
    match (message.text.as_deref(), message.image.as_deref()) {
        (Some(text), _) if !text.is_empty() => text,
        (_, Some(_)) => IMAGE_PLACEHOLDER,
        (text, None) => text.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(text: Option<&str>, image: Option<&str>) -> Message {
        Message {
            id: Some("1".into()),
            sender_id: "ann".into(),
            receiver_id: Some("me".into()),
            text: text.map(Into::into),
            image: image.map(Into::into),
            seen: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn undecodable_image_gets_a_marker() {
        let broken = message(None, Some("data:image/png;base64,@@@"));
        assert_eq!(bubble_text(&broken), IMAGE_PLACEHOLDER);
    }

    #[test]
    fn text_is_shown_as_is() {
        assert_eq!(bubble_text(&message(Some("hi"), None)), "hi");
        assert_eq!(bubble_text(&message(None, None)), "");
    }
}
