use eframe::egui;

use crate::ui::notify::{ToastLevel, Toasts};

pub fn render(ctx: &egui::Context, toasts: &Toasts) {
    if toasts.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
        .show(ctx, |ui| {
            for toast in toasts.iter() {
                let color = match toast.level {
                    ToastLevel::Error => egui::Color32::from_rgb(248, 113, 113),
                    ToastLevel::Info => egui::Color32::from_rgb(134, 239, 172),
                };
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.colored_label(color, &toast.message);
                });
            }
        });
}
