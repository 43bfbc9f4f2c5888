use crate::common::Peer;
use crate::ui::state::AppState;
use eframe::egui;

use super::avatar::{self, MediaCache};
use super::header::presence_dot;

#[derive(Default)]
pub struct SidebarActions {
    pub selected: Option<Peer>,
    pub open_profile: bool,
}

pub fn render(
    ui: &mut egui::Ui,
    state: &AppState,
    selected_id: Option<&str>,
    media: &mut MediaCache,
) -> SidebarActions {
    let mut actions = SidebarActions::default();

    ui.heading("Chats");
    if let Some(me) = &state.current_user {
        ui.horizontal(|ui| {
            avatar::show(ui, media, me.profile_pic.as_deref(), &me.full_name, 28.0);
            ui.label(&me.full_name);
            if ui.small_button("Edit profile").clicked() {
                actions.open_profile = true;
            }
        });
    }
    ui.separator();

    if state.users.is_empty() {
        ui.label("No contacts yet");
        return actions;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for peer in &state.users {
            let online = state.presence.is_online(&peer.id);
            ui.horizontal(|ui| {
                avatar::show(ui, media, peer.profile_pic.as_deref(), &peer.full_name, 28.0);
                let is_selected = selected_id == Some(peer.id.as_str());
                if ui.selectable_label(is_selected, &peer.full_name).clicked() {
                    actions.selected = Some(peer.clone());
                }
                presence_dot(ui, online);
            });
        }
    });

    actions
}
