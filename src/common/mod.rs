pub mod commands;
pub mod error;
pub mod events;
pub mod types;

pub use commands::{ClientCommand, FetchTicket, OutgoingDraft, ProfileDraft, SendKind};
pub use error::{ClientError, ClientResult};
pub use events::ClientEvent;
pub use types::{
    CurrentUser, Message, MessageKey, OutgoingMessage, Peer, ProfileUpdate, Side, UserId,
};
