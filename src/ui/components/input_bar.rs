use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    SendText,
    PickImage,
}

pub fn render(ui: &mut egui::Ui, input_text: &mut String, can_send: bool, busy: bool) -> InputAction {
    let mut action = InputAction::None;
    ui.horizontal(|ui| {
        let width = (ui.available_width() - 90.0).max(80.0);
        let response = ui.add(
            egui::TextEdit::singleline(input_text)
                .hint_text("Send a message")
                .desired_width(width),
        );

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            action = InputAction::SendText;
            response.request_focus();
        }

        if ui
            .add_enabled(!busy, egui::Button::new("🖼"))
            .on_hover_text("Upload image")
            .clicked()
        {
            action = InputAction::PickImage;
        }

        if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() {
            action = InputAction::SendText;
        }
    });

    action
}
