//! View model behind the conversation pane: header, timeline and composer.
//!
//! Operations never perform I/O themselves. They update local state and hand
//! back the [`ClientCommand`] the backend half should execute; results come
//! back through the `apply_*` methods.

use crate::codec::LocalFile;
use crate::common::{
    ClientCommand, ClientResult, FetchTicket, Message, OutgoingDraft, Peer, SendKind,
};

use super::notify::Notifier;
use super::state::Submission;

pub const INVALID_IMAGE_NOTICE: &str = "Select a valid image file";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Default)]
pub struct ConversationView {
    selected: Option<Peer>,
    messages: Vec<Message>,
    history: HistoryState,
    pending_fetch: Option<FetchTicket>,
    next_seq: u64,
    /// Composer text, edited directly by the input bar.
    pub input: String,
    in_flight_text: Option<String>,
    attachment: Option<LocalFile>,
    submission: Submission,
    scroll_to_end: bool,
}

impl ConversationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_peer(&self) -> Option<&Peer> {
        self.selected.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn history_state(&self) -> HistoryState {
        self.history
    }

    pub fn attachment(&self) -> Option<&LocalFile> {
        self.attachment.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission == Submission::Submitting
    }

    pub fn can_submit_text(&self) -> bool {
        self.selected.is_some() && !self.is_submitting() && !self.input.trim().is_empty()
    }

    /// Change the selected peer.
    ///
    /// A fetch is issued only when the peer id actually changes; picking the
    /// same peer again just refreshes its display data.
    pub fn select_peer(&mut self, peer: Option<Peer>) -> Option<ClientCommand> {
        let Some(peer) = peer else {
            if self.selected.take().is_some() {
                log::debug!("Conversation closed");
            }
            self.messages.clear();
            self.pending_fetch = None;
            self.history = HistoryState::Idle;
            return None;
        };

        if self.selected.as_ref().map(|p| p.id.as_str()) == Some(peer.id.as_str()) {
            self.selected = Some(peer);
            return None;
        }

        self.next_seq += 1;
        let ticket = FetchTicket {
            peer_id: peer.id.clone(),
            seq: self.next_seq,
        };
        log::debug!("Selected peer {} (fetch #{})", peer.id, ticket.seq);

        self.selected = Some(peer);
        self.messages.clear();
        self.history = HistoryState::Loading;
        self.pending_fetch = Some(ticket.clone());
        Some(ClientCommand::FetchHistory(ticket))
    }

    /// Apply a history result, unless a newer fetch or a different selection
    /// has superseded it.
    pub fn apply_history(
        &mut self,
        ticket: FetchTicket,
        result: ClientResult<Vec<Message>>,
        notifier: &mut dyn Notifier,
    ) {
        let current = self.pending_fetch.as_ref() == Some(&ticket)
            && self.selected.as_ref().map(|p| p.id.as_str()) == Some(ticket.peer_id.as_str());
        if !current {
            log::debug!(
                "Discarding stale history for {} (fetch #{})",
                ticket.peer_id,
                ticket.seq
            );
            return;
        }
        self.pending_fetch = None;

        match result {
            Ok(messages) => {
                self.messages = messages;
                self.history = HistoryState::Loaded;
                self.scroll_to_end = true;
            }
            Err(err) => {
                self.history = HistoryState::Failed;
                notifier.notify_error(&format!("Failed to load messages: {err}"));
            }
        }
    }

    /// Send the composer text. Whitespace-only input is ignored.
    pub fn submit_text(&mut self) -> Option<ClientCommand> {
        let trimmed = self.input.trim();
        if trimmed.is_empty() || self.is_submitting() {
            return None;
        }
        let peer = self.selected.as_ref()?;

        let text = trimmed.to_string();
        self.in_flight_text = Some(text.clone());
        self.submission = Submission::Submitting;
        Some(ClientCommand::SendMessage {
            peer_id: peer.id.clone(),
            draft: OutgoingDraft::Text(text),
        })
    }

    /// Send an image file. Non-image files are rejected with a notification.
    pub fn submit_image(
        &mut self,
        file: LocalFile,
        notifier: &mut dyn Notifier,
    ) -> Option<ClientCommand> {
        if !file.is_image() {
            log::debug!("Rejected {} ({})", file.name, file.mime_type);
            notifier.notify_error(INVALID_IMAGE_NOTICE);
            return None;
        }
        if self.is_submitting() {
            return None;
        }
        let peer = self.selected.as_ref()?;

        self.attachment = Some(file.clone());
        self.submission = Submission::Submitting;
        Some(ClientCommand::SendMessage {
            peer_id: peer.id.clone(),
            draft: OutgoingDraft::Image(file),
        })
    }

    pub fn apply_sent(
        &mut self,
        peer_id: &str,
        kind: SendKind,
        result: ClientResult<Message>,
        notifier: &mut dyn Notifier,
    ) {
        self.submission = Submission::Idle;
        let sent_text = self.in_flight_text.take();

        match kind {
            // The file control is reset whatever the outcome so the same file
            // can be picked again.
            SendKind::Image => self.attachment = None,
            SendKind::Text => {}
        }

        match result {
            Ok(message) => {
                if kind == SendKind::Text && sent_text.as_deref() == Some(self.input.trim()) {
                    self.input.clear();
                }
                if self.is_selected(peer_id) {
                    self.push(message);
                }
            }
            Err(err) => notifier.notify_error(&format!("Failed to send message: {err}")),
        }
    }

    /// A message pushed by the service. Only the selected peer's messages land
    /// in the timeline.
    pub fn apply_incoming(&mut self, message: Message) {
        if self.is_selected(&message.sender_id) {
            self.push(message);
        }
    }

    /// Returns `true` once after each timeline change.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_end)
    }

    fn is_selected(&self, peer_id: &str) -> bool {
        self.selected.as_ref().is_some_and(|peer| peer.id == peer_id)
    }

    /// Messages without a server id are always appended.
    fn push(&mut self, message: Message) {
        if let Some(id) = message.id.as_deref() {
            if self
                .messages
                .iter()
                .any(|existing| existing.id.as_deref() == Some(id))
            {
                return;
            }
        }
        self.messages.push(message);
        self.scroll_to_end = true;
    }
}
