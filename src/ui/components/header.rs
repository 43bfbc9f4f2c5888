use eframe::egui;

use crate::common::Peer;

use super::avatar::{self, MediaCache};

const ONLINE: egui::Color32 = egui::Color32::from_rgb(34, 197, 94);
const OFFLINE: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);

#[derive(Default)]
pub struct HeaderActions {
    pub back: bool,
}

pub fn render(ui: &mut egui::Ui, media: &mut MediaCache, peer: &Peer, online: bool) -> HeaderActions {
    let mut actions = HeaderActions::default();

    ui.horizontal(|ui| {
        if ui.button("←").on_hover_text("Back to user list").clicked() {
            actions.back = true;
        }
        avatar::show(ui, media, peer.profile_pic.as_deref(), &peer.full_name, 32.0);
        ui.label(egui::RichText::new(&peer.full_name).size(18.0).strong());
        presence_dot(ui, online);
    });

    actions
}

/// Green when the user is in the presence set, red otherwise.
pub fn presence_dot(ui: &mut egui::Ui, online: bool) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
    let color = if online { ONLINE } else { OFFLINE };
    ui.painter().circle_filled(rect.center(), 4.0, color);
    response.on_hover_text(if online { "Online" } else { "Offline" })
}
