use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, watch};
use uuid::Uuid;

use crate::common::{
    ClientError, ClientResult, CurrentUser, Message, OutgoingMessage, Peer, ProfileUpdate, UserId,
};

use super::store::{MessageStore, PresenceSource, ProfileStore};

/// In-process store backing every collaborator trait.
///
/// Records what it is asked to do so callers can inspect the traffic, and can
/// be switched into a mode where every call fails.
pub struct MemoryBackend {
    inner: Mutex<Inner>,
    presence: watch::Sender<HashSet<UserId>>,
    incoming: broadcast::Sender<Message>,
}

struct Inner {
    user: CurrentUser,
    peers: Vec<Peer>,
    messages: Vec<Message>,
    history_requests: Vec<UserId>,
    sent: Vec<(UserId, OutgoingMessage)>,
    profile_updates: Vec<ProfileUpdate>,
    failing: bool,
}

impl MemoryBackend {
    pub fn new(user: CurrentUser) -> Self {
        let (presence, _) = watch::channel(HashSet::new());
        let (incoming, _) = broadcast::channel(64);
        Self {
            inner: Mutex::new(Inner {
                user,
                peers: Vec::new(),
                messages: Vec::new(),
                history_requests: Vec::new(),
                sent: Vec::new(),
                profile_updates: Vec::new(),
                failing: false,
            }),
            presence,
            incoming,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_peer(&self, peer: Peer) {
        let mut inner = self.lock();
        inner.peers.retain(|existing| existing.id != peer.id);
        inner.peers.push(peer);
    }

    /// Store a message as if it had been exchanged earlier.
    pub fn insert_message(&self, message: Message) {
        self.lock().messages.push(message);
    }

    /// Store a message and push it to subscribers.
    pub fn deliver(&self, message: Message) {
        self.lock().messages.push(message.clone());
        if self.incoming.send(message).is_err() {
            log::debug!("No subscribers for incoming message");
        }
    }

    pub fn set_online<I>(&self, ids: I)
    where
        I: IntoIterator,
        I::Item: Into<UserId>,
    {
        let online: HashSet<UserId> = ids.into_iter().map(Into::into).collect();
        self.presence.send_replace(online);
    }

    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    pub fn history_requests(&self) -> Vec<UserId> {
        self.lock().history_requests.clone()
    }

    pub fn sent(&self) -> Vec<(UserId, OutgoingMessage)> {
        self.lock().sent.clone()
    }

    pub fn profile_updates(&self) -> Vec<ProfileUpdate> {
        self.lock().profile_updates.clone()
    }

    fn check(inner: &Inner) -> ClientResult<()> {
        if inner.failing {
            Err(ClientError::Unavailable("memory backend set to fail".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MessageStore for MemoryBackend {
    async fn list_users(&self) -> ClientResult<Vec<Peer>> {
        let inner = self.lock();
        Self::check(&inner)?;
        Ok(inner.peers.clone())
    }

    async fn get_messages(&self, peer_id: &str) -> ClientResult<Vec<Message>> {
        let mut inner = self.lock();
        inner.history_requests.push(peer_id.to_string());
        Self::check(&inner)?;

        let me = inner.user.id.clone();
        let mut history: Vec<Message> = inner
            .messages
            .iter()
            .filter(|message| {
                (message.sender_id == peer_id && message.receiver_id.as_deref() == Some(me.as_str()))
                    || (message.sender_id == me && message.receiver_id.as_deref() == Some(peer_id))
            })
            .cloned()
            .collect();
        history.sort_by_key(|message| message.created_at);
        Ok(history)
    }

    async fn send_message(
        &self,
        peer_id: &str,
        payload: &OutgoingMessage,
    ) -> ClientResult<Message> {
        let mut inner = self.lock();
        Self::check(&inner)?;

        let message = Message {
            id: Some(Uuid::new_v4().to_string()),
            sender_id: inner.user.id.clone(),
            receiver_id: Some(peer_id.to_string()),
            text: payload.text.clone(),
            image: payload.image.clone(),
            seen: false,
            created_at: Utc::now(),
        };
        inner.sent.push((peer_id.to_string(), payload.clone()));
        inner.messages.push(message.clone());
        Ok(message)
    }

    fn subscribe_incoming(&self) -> Option<broadcast::Receiver<Message>> {
        Some(self.incoming.subscribe())
    }
}

#[async_trait]
impl ProfileStore for MemoryBackend {
    async fn current_user(&self) -> ClientResult<CurrentUser> {
        let inner = self.lock();
        Self::check(&inner)?;
        Ok(inner.user.clone())
    }

    async fn update_profile(&self, payload: &ProfileUpdate) -> ClientResult<CurrentUser> {
        let mut inner = self.lock();
        inner.profile_updates.push(payload.clone());
        Self::check(&inner)?;

        if let Some(name) = &payload.full_name {
            inner.user.full_name = name.clone();
        }
        if let Some(bio) = &payload.bio {
            inner.user.bio = bio.clone();
        }
        if let Some(pic) = &payload.profile_pic {
            inner.user.profile_pic = Some(pic.clone());
        }
        Ok(inner.user.clone())
    }
}

impl PresenceSource for MemoryBackend {
    fn subscribe(&self) -> watch::Receiver<HashSet<UserId>> {
        self.presence.subscribe()
    }
}
