use eframe::egui;

use crate::common::CurrentUser;
use crate::ui::profile::{AvatarSource, ProfileEditor};

use super::avatar::{self, MediaCache};

#[derive(Default)]
pub struct ProfileFormActions {
    pub pick_image: bool,
    pub clear_image: bool,
    pub submit: bool,
    pub cancel: bool,
}

pub fn render(
    ui: &mut egui::Ui,
    editor: &mut ProfileEditor,
    user: Option<&CurrentUser>,
    media: &mut MediaCache,
) -> ProfileFormActions {
    let mut actions = ProfileFormActions::default();

    ui.heading("Profile details");
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let uri = match editor.avatar(user) {
            AvatarSource::Preview(uri) | AvatarSource::Committed(uri) => Some(uri),
            AvatarSource::Placeholder => None,
        };
        avatar::show(ui, media, uri, &editor.name, 48.0);

        if ui.button("Upload profile picture").clicked() {
            actions.pick_image = true;
        }
        if let Some(file) = editor.selected_image() {
            ui.label(egui::RichText::new(&file.name).weak());
            if ui.small_button("✕").on_hover_text("Remove").clicked() {
                actions.clear_image = true;
            }
        }
    });

    ui.add_space(8.0);
    ui.add(
        egui::TextEdit::singleline(&mut editor.name)
            .hint_text("Your name")
            .desired_width(f32::INFINITY),
    );
    ui.add(
        egui::TextEdit::multiline(&mut editor.bio)
            .hint_text("Write profile bio")
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let label = if editor.is_submitting() {
            "Saving..."
        } else {
            "Save Changes"
        };
        if ui
            .add_enabled(editor.can_submit(), egui::Button::new(label))
            .clicked()
        {
            actions.submit = true;
        }
        if editor.is_submitting() {
            ui.spinner();
        }
        if ui.button("Cancel").clicked() {
            actions.cancel = true;
        }
    });

    actions
}
