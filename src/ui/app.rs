use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::codec::LocalFile;
use crate::common::{ClientCommand, ClientError, ClientEvent};

use super::components::avatar::MediaCache;
use super::components::chat_area::{self, Participants};
use super::components::input_bar::{self, InputAction};
use super::components::{header, profile_form, sidebar, toasts};
use super::conversation::{ConversationView, HistoryState};
use super::notify::Notifier;
use super::preview::{EguiPreviews, PreviewBackend};
use super::profile::ProfileEditor;
use super::state::{AppState, Navigator, Route};

pub struct ChatApp {
    state: AppState,
    conversation: ConversationView,
    profile: Option<ProfileEditor>,
    previews: Arc<dyn PreviewBackend>,
    media: MediaCache,
    command_sender: mpsc::Sender<ClientCommand>,
    event_receiver: mpsc::Receiver<ClientEvent>,
}

impl ChatApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        command_sender: mpsc::Sender<ClientCommand>,
        event_receiver: mpsc::Receiver<ClientEvent>,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut app = Self {
            state: AppState::new(),
            conversation: ConversationView::new(),
            profile: None,
            previews: Arc::new(EguiPreviews::new(cc.egui_ctx.clone())),
            media: MediaCache::default(),
            command_sender,
            event_receiver,
        };
        app.send_command(ClientCommand::LoadSession);
        app
    }

    fn handle_backend_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::SessionLoaded(Ok(user)) => {
                log::info!("Signed in as {} ({})", user.full_name, user.id);
                self.state.current_user = Some(user);
            }
            ClientEvent::SessionLoaded(Err(err)) => {
                self.state
                    .toasts
                    .notify_error(&format!("Failed to load session: {err}"));
            }
            ClientEvent::UsersLoaded(Ok(users)) => {
                self.state.set_users(users);
                // Refresh display data of the open conversation.
                let refreshed = self
                    .conversation
                    .selected_peer()
                    .and_then(|peer| self.state.find_user(&peer.id))
                    .cloned();
                if refreshed.is_some() {
                    self.conversation.select_peer(refreshed);
                }
            }
            ClientEvent::UsersLoaded(Err(err)) => {
                self.state
                    .toasts
                    .notify_error(&format!("Failed to load users: {err}"));
            }
            ClientEvent::HistoryLoaded { ticket, result } => {
                self.conversation
                    .apply_history(ticket, result, &mut self.state.toasts);
            }
            ClientEvent::MessageSent {
                peer_id,
                kind,
                result,
            } => {
                self.conversation
                    .apply_sent(&peer_id, kind, result, &mut self.state.toasts);
            }
            ClientEvent::MessageReceived(message) => self.conversation.apply_incoming(message),
            ClientEvent::PresenceChanged(online) => {
                log::debug!("{} users online", online.len());
                self.state.presence.replace(online);
            }
            ClientEvent::ProfileUpdated(result) => {
                let committed = match self.profile.as_mut() {
                    Some(editor) => {
                        editor.apply_update(result, &mut self.state.toasts, &mut self.state.router)
                    }
                    None => result.ok(),
                };
                if let Some(user) = committed {
                    self.state.current_user = Some(user);
                }
            }
        }
    }

    fn send_command(&mut self, command: ClientCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to backend: {err}");
            let event = ClientEvent::failure_for(
                err.into_inner(),
                ClientError::Unavailable("backend is not accepting commands".into()),
            );
            self.apply_event(event);
        }
    }

    /// Mount the profile editor while its route is shown; dropping it
    /// releases any live preview.
    fn sync_route(&mut self) {
        match self.state.router.current() {
            Route::Profile if self.profile.is_none() => {
                self.profile = Some(ProfileEditor::new(
                    self.state.current_user.as_ref(),
                    self.previews.clone(),
                ));
            }
            Route::Chat if self.profile.is_some() => self.profile = None,
            _ => {}
        }
    }

    fn chat_page(&mut self, ctx: &egui::Context, outbox: &mut Vec<ClientCommand>) {
        let Some(peer) = self.conversation.selected_peer().cloned() else {
            egui::CentralPanel::default().show(ctx, chat_area::render_empty);
            return;
        };

        let online = self.state.presence.is_online(&peer.id);
        let header = egui::TopBottomPanel::top("chat_header")
            .show(ctx, |ui| header::render(ui, &mut self.media, &peer, online))
            .inner;
        if header.back {
            self.conversation.select_peer(None);
            return;
        }

        let action = egui::TopBottomPanel::bottom("chat_input")
            .show(ctx, |ui| {
                if let Some(file) = self.conversation.attachment() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(format!("Sending {}", file.name));
                    });
                }
                let can_send = self.conversation.can_submit_text();
                let busy = self.conversation.is_submitting();
                input_bar::render(ui, &mut self.conversation.input, can_send, busy)
            })
            .inner;

        match action {
            InputAction::SendText => outbox.extend(self.conversation.submit_text()),
            InputAction::PickImage => {
                if let Some(path) = pick_image_file() {
                    outbox.extend(
                        self.conversation
                            .submit_image(LocalFile::from_path(path), &mut self.state.toasts),
                    );
                }
            }
            InputAction::None => {}
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let content = timeline_content(
                self.state.current_user.is_some(),
                self.conversation.history_state(),
                !self.conversation.messages().is_empty(),
            );
            match (content, self.state.current_user.as_ref()) {
                (TimelineContent::Messages, Some(me)) => {
                    // Only taken when the timeline is actually laid out.
                    let scroll_to_end = self.conversation.take_scroll_request();
                    let who = Participants { me, peer: &peer };
                    chat_area::render(
                        ui,
                        &mut self.media,
                        self.conversation.messages(),
                        &who,
                        scroll_to_end,
                    );
                }
                (TimelineContent::LoadFailed, _) => chat_area::render_load_failed(ui),
                _ => chat_area::render_loading(ui),
            }
        });
    }

    fn profile_page(&mut self, ctx: &egui::Context, outbox: &mut Vec<ClientCommand>) {
        let Some(editor) = self.profile.as_mut() else {
            return;
        };

        let actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                profile_form::render(
                    ui,
                    editor,
                    self.state.current_user.as_ref(),
                    &mut self.media,
                )
            })
            .inner;

        if actions.pick_image {
            if let Some(path) = pick_image_file() {
                editor.select_image(Some(LocalFile::from_path(path)), &mut self.state.toasts);
            }
        }
        if actions.clear_image {
            editor.select_image(None, &mut self.state.toasts);
        }
        if actions.submit {
            outbox.extend(editor.submit(&mut self.state.toasts));
        }
        if actions.cancel {
            self.state.router.go_to(Route::Chat);
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_backend_events();
        self.sync_route();

        let mut outbox = Vec::new();

        let selected_id = self.conversation.selected_peer().map(|peer| peer.id.clone());
        let sidebar = egui::SidePanel::left("user_sidebar")
            .default_width(240.0)
            .show(ctx, |ui| {
                sidebar::render(ui, &self.state, selected_id.as_deref(), &mut self.media)
            })
            .inner;
        if let Some(peer) = sidebar.selected {
            self.state.router.go_to(Route::Chat);
            outbox.extend(self.conversation.select_peer(Some(peer)));
        }
        if sidebar.open_profile {
            self.state.router.go_to(Route::Profile);
        }
        self.sync_route();

        match self.state.router.current() {
            Route::Chat => self.chat_page(ctx, &mut outbox),
            Route::Profile => self.profile_page(ctx, &mut outbox),
        }

        for command in outbox {
            self.send_command(command);
        }

        self.state.toasts.prune(Instant::now());
        toasts::render(ctx, &self.state.toasts);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimelineContent {
    Loading,
    LoadFailed,
    Messages,
}

/// What the conversation body shows. The timeline needs the signed-in user
/// to decide bubble sides; messages sent after a failed fetch stay visible.
fn timeline_content(signed_in: bool, history: HistoryState, has_messages: bool) -> TimelineContent {
    match (signed_in, history) {
        (true, HistoryState::Failed) if has_messages => TimelineContent::Messages,
        (_, HistoryState::Failed) => TimelineContent::LoadFailed,
        (true, HistoryState::Idle | HistoryState::Loaded) => TimelineContent::Messages,
        _ => TimelineContent::Loading,
    }
}

fn pick_image_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg"])
        .pick_file()
}
