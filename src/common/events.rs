use std::collections::HashSet;

use super::commands::{ClientCommand, FetchTicket, SendKind};
use super::error::{ClientError, ClientResult};
use super::types::{CurrentUser, Message, Peer, UserId};

/// Sự kiện từ tầng backend gửi lên UI.
#[derive(Debug)]
pub enum ClientEvent {
    SessionLoaded(ClientResult<CurrentUser>),
    UsersLoaded(ClientResult<Vec<Peer>>),
    HistoryLoaded {
        ticket: FetchTicket,
        result: ClientResult<Vec<Message>>,
    },
    MessageSent {
        peer_id: UserId,
        kind: SendKind,
        result: ClientResult<Message>,
    },
    MessageReceived(Message),
    PresenceChanged(HashSet<UserId>),
    ProfileUpdated(ClientResult<CurrentUser>),
}

impl ClientEvent {
    /// The event reporting that `command` failed with `error` before it could
    /// run, so the issuing view can leave its submitting state.
    pub fn failure_for(command: ClientCommand, error: ClientError) -> Self {
        match command {
            ClientCommand::LoadSession => ClientEvent::SessionLoaded(Err(error)),
            ClientCommand::FetchHistory(ticket) => ClientEvent::HistoryLoaded {
                ticket,
                result: Err(error),
            },
            ClientCommand::SendMessage { peer_id, draft } => ClientEvent::MessageSent {
                peer_id,
                kind: draft.kind(),
                result: Err(error),
            },
            ClientCommand::UpdateProfile(_) => ClientEvent::ProfileUpdated(Err(error)),
        }
    }
}
