use std::sync::Arc;

use futures::future;
use tokio::sync::{broadcast, mpsc};

use crate::codec::ImageCodec;
use crate::common::{
    ClientCommand, ClientEvent, ClientResult, CurrentUser, Message, OutgoingDraft,
    OutgoingMessage, ProfileDraft, ProfileUpdate,
};

use super::store::{MessageStore, PresenceSource, ProfileStore};

/// Collaborators the backend half talks to.
#[derive(Clone)]
pub struct Services {
    pub messages: Arc<dyn MessageStore>,
    pub profile: Arc<dyn ProfileStore>,
    pub presence: Arc<dyn PresenceSource>,
    pub codec: Arc<dyn ImageCodec>,
}

/// Executes UI commands against the stores and reports outcomes as events.
pub struct BackendClient {
    services: Services,
    event_sender: mpsc::Sender<ClientEvent>,
    command_receiver: mpsc::Receiver<ClientCommand>,
}

impl BackendClient {
    pub fn new(
        services: Services,
        event_sender: mpsc::Sender<ClientEvent>,
        command_receiver: mpsc::Receiver<ClientCommand>,
    ) -> Self {
        Self {
            services,
            event_sender,
            command_receiver,
        }
    }

    /// Runs until the UI drops its command sender.
    pub async fn run(mut self) {
        let mut presence = self.services.presence.subscribe();
        let mut incoming = self.services.messages.subscribe_incoming();
        log::info!("Backend event loop started");

        // Initial presence snapshot.
        let snapshot = presence.borrow_and_update().clone();
        self.emit(ClientEvent::PresenceChanged(snapshot)).await;

        let mut presence_open = true;
        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => self.dispatch(command),
                        None => break,
                    }
                }
                changed = presence.changed(), if presence_open => {
                    if changed.is_err() {
                        log::info!("Presence feed closed");
                        presence_open = false;
                        continue;
                    }
                    let online = presence.borrow_and_update().clone();
                    self.emit(ClientEvent::PresenceChanged(online)).await;
                }
                message = next_incoming(&mut incoming) => {
                    match message {
                        Some(message) => self.emit(ClientEvent::MessageReceived(message)).await,
                        None => incoming = None,
                    }
                }
            }
        }

        log::info!("Backend event loop stopped");
    }

    async fn emit(&self, event: ClientEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to notify UI: {err}");
        }
    }

    /// Each command runs in its own task so a slow fetch never holds up a send.
    fn dispatch(&self, command: ClientCommand) {
        log::debug!("Handling command {command:?}");
        let services = self.services.clone();
        let events = self.event_sender.clone();

        tokio::spawn(async move {
            for event in handle_command(&services, command).await {
                if let Err(err) = events.send(event).await {
                    log::warn!("Failed to deliver backend result: {err}");
                }
            }
        });
    }
}

async fn next_incoming(incoming: &mut Option<broadcast::Receiver<Message>>) -> Option<Message> {
    let Some(receiver) = incoming.as_mut() else {
        return future::pending().await;
    };

    loop {
        match receiver.recv().await {
            Ok(message) => return Some(message),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::warn!("Dropped {skipped} incoming messages");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

/// Performs one command and returns the events describing its outcome.
pub async fn handle_command(services: &Services, command: ClientCommand) -> Vec<ClientEvent> {
    match command {
        ClientCommand::LoadSession => {
            let (user, users) = future::join(
                services.profile.current_user(),
                services.messages.list_users(),
            )
            .await;
            vec![ClientEvent::SessionLoaded(user), ClientEvent::UsersLoaded(users)]
        }
        ClientCommand::FetchHistory(ticket) => {
            let result = services.messages.get_messages(&ticket.peer_id).await;
            if let Err(err) = &result {
                log::warn!("Failed to fetch history for {}: {err}", ticket.peer_id);
            }
            vec![ClientEvent::HistoryLoaded { ticket, result }]
        }
        ClientCommand::SendMessage { peer_id, draft } => {
            let kind = draft.kind();
            let result = send(services, &peer_id, draft).await;
            if let Err(err) = &result {
                log::warn!("Failed to send message to {peer_id}: {err}");
            }
            vec![ClientEvent::MessageSent {
                peer_id,
                kind,
                result,
            }]
        }
        ClientCommand::UpdateProfile(draft) => {
            let result = update_profile(services, draft).await;
            if let Err(err) = &result {
                log::error!("Profile update failed: {err}");
            }
            vec![ClientEvent::ProfileUpdated(result)]
        }
    }
}

async fn send(services: &Services, peer_id: &str, draft: OutgoingDraft) -> ClientResult<Message> {
    let payload = match draft {
        OutgoingDraft::Text(text) => OutgoingMessage::text(text),
        OutgoingDraft::Image(file) => {
            OutgoingMessage::image(services.codec.encode(&file).await?.into_inner())
        }
    };
    services.messages.send_message(peer_id, &payload).await
}

async fn update_profile(services: &Services, draft: ProfileDraft) -> ClientResult<CurrentUser> {
    let profile_pic = match &draft.image {
        Some(file) => Some(services.codec.encode(file).await?.into_inner()),
        None => None,
    };

    let update = ProfileUpdate {
        full_name: Some(draft.full_name),
        bio: Some(draft.bio),
        profile_pic,
    };
    services.profile.update_profile(&update).await
}
