use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};

use crate::common::{
    ClientResult, CurrentUser, Message, OutgoingMessage, Peer, ProfileUpdate, UserId,
};

/// Conversation data: contacts, per-peer history and sending.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn list_users(&self) -> ClientResult<Vec<Peer>>;

    async fn get_messages(&self, peer_id: &str) -> ClientResult<Vec<Message>>;

    async fn send_message(&self, peer_id: &str, payload: &OutgoingMessage)
    -> ClientResult<Message>;

    /// Messages pushed by the service as they arrive. Stores without a push
    /// channel return `None`.
    fn subscribe_incoming(&self) -> Option<broadcast::Receiver<Message>> {
        None
    }
}

/// The signed-in user's committed profile.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn current_user(&self) -> ClientResult<CurrentUser>;

    async fn update_profile(&self, payload: &ProfileUpdate) -> ClientResult<CurrentUser>;
}

/// Live set of online user ids.
pub trait PresenceSource: Send + Sync {
    fn subscribe(&self) -> watch::Receiver<HashSet<UserId>>;
}
