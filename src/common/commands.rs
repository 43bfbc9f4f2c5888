use crate::codec::LocalFile;

use super::types::UserId;

/// Identity of one issued history fetch. Results carrying an older ticket are stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub peer_id: UserId,
    pub seq: u64,
}

/// What a send carries before the backend has encoded it.
#[derive(Debug, Clone, PartialEq)]
pub enum OutgoingDraft {
    Text(String),
    Image(LocalFile),
}

impl OutgoingDraft {
    pub fn kind(&self) -> SendKind {
        match self {
            OutgoingDraft::Text(_) => SendKind::Text,
            OutgoingDraft::Image(_) => SendKind::Image,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendKind {
    Text,
    Image,
}

/// Profile form contents at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub full_name: String,
    pub bio: String,
    pub image: Option<LocalFile>,
}

/// Lệnh UI gửi xuống tầng backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    /// Load the signed-in user and the contact list.
    LoadSession,
    FetchHistory(FetchTicket),
    SendMessage {
        peer_id: UserId,
        draft: OutgoingDraft,
    },
    UpdateProfile(ProfileDraft),
}
