use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::common::{
    ClientError, ClientResult, CurrentUser, Message, OutgoingMessage, Peer, ProfileUpdate, UserId,
};

use super::store::{MessageStore, PresenceSource, ProfileStore};

/// Every response from the chat service is wrapped as
/// `{ "success": bool, "message": "...", ...payload }`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    payload: Option<T>,
}

impl<T> Envelope<T> {
    fn into_payload(self) -> ClientResult<T> {
        if !self.success {
            return Err(ClientError::Rejected(
                self.message
                    .unwrap_or_else(|| "request rejected by server".to_string()),
            ));
        }
        self.payload
            .ok_or_else(|| ClientError::Decode("missing payload in response".into()))
    }
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    user: CurrentUser,
}

#[derive(Debug, Deserialize)]
struct UsersPayload {
    users: Vec<Peer>,
}

#[derive(Debug, Deserialize)]
struct MessagesPayload {
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentPayload {
    new_message: Message,
}

/// REST client for the chat service, authenticated with the `token` header.
pub struct HttpBackend {
    http: Client,
    base_url: String,
    token: String,
    // The REST API has no presence endpoint; the sender is kept so the feed
    // stays open and simply reports nobody online.
    presence: watch::Sender<HashSet<UserId>>,
}

impl HttpBackend {
    pub fn new(base_url: &str, token: impl Into<String>) -> Self {
        let (presence, _) = watch::channel(HashSet::new());
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            presence,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("{method} {url}");
        self.http
            .request(method, url)
            .header("token", self.token.as_str())
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<Envelope<T>>(&body) {
            Ok(envelope) => envelope.into_payload(),
            Err(err) if status.is_success() => Err(ClientError::Decode(err.to_string())),
            Err(_) => Err(ClientError::Rejected(format!("server returned {status}"))),
        }
    }
}

#[async_trait]
impl MessageStore for HttpBackend {
    async fn list_users(&self) -> ClientResult<Vec<Peer>> {
        let payload: UsersPayload = self
            .call(self.request(Method::GET, "/api/messages/users"))
            .await?;
        Ok(payload.users)
    }

    async fn get_messages(&self, peer_id: &str) -> ClientResult<Vec<Message>> {
        let payload: MessagesPayload = self
            .call(self.request(Method::GET, &format!("/api/messages/{peer_id}")))
            .await?;
        Ok(payload.messages)
    }

    async fn send_message(
        &self,
        peer_id: &str,
        payload: &OutgoingMessage,
    ) -> ClientResult<Message> {
        let sent: SentPayload = self
            .call(
                self.request(Method::POST, &format!("/api/messages/send/{peer_id}"))
                    .json(payload),
            )
            .await?;
        Ok(sent.new_message)
    }
}

#[async_trait]
impl ProfileStore for HttpBackend {
    async fn current_user(&self) -> ClientResult<CurrentUser> {
        let payload: UserPayload = self
            .call(self.request(Method::GET, "/api/auth/check"))
            .await?;
        Ok(payload.user)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<CurrentUser> {
        let payload: UserPayload = self
            .call(self.request(Method::PUT, "/api/auth/update-profile").json(update))
            .await?;
        Ok(payload.user)
    }
}

impl PresenceSource for HttpBackend {
    fn subscribe(&self) -> watch::Receiver<HashSet<UserId>> {
        self.presence.subscribe()
    }
}
