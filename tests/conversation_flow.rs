use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use quickchat_client::codec::DataUriCodec;
use quickchat_client::common::{
    ClientCommand, ClientEvent, CurrentUser, Message, OutgoingMessage, Peer, Side,
};
use quickchat_client::network::{BackendClient, MemoryBackend, Services};
use quickchat_client::ui::{ConversationView, HistoryState, Toasts};
use tokio::sync::mpsc;
use tokio::time::timeout;

struct Harness {
    backend: Arc<MemoryBackend>,
    commands: mpsc::Sender<ClientCommand>,
    events: mpsc::Receiver<ClientEvent>,
    view: ConversationView,
    toasts: Toasts,
}

impl Harness {
    async fn start(backend: Arc<MemoryBackend>) -> Self {
        let services = Services {
            messages: backend.clone(),
            profile: backend.clone(),
            presence: backend.clone(),
            codec: Arc::new(DataUriCodec::default()),
        };
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::channel(16);
        tokio::spawn(BackendClient::new(services, event_tx, cmd_rx).run());

        let mut harness = Self {
            backend,
            commands: cmd_tx,
            events: event_rx,
            view: ConversationView::new(),
            toasts: Toasts::new(),
        };
        match harness.next_event().await {
            ClientEvent::PresenceChanged(online) => assert!(online.is_empty()),
            other => panic!("expected presence snapshot, got {other:?}"),
        }
        harness
    }

    async fn send(&self, command: Option<ClientCommand>) {
        let command = command.expect("view should have issued a command");
        self.commands.send(command).await.unwrap();
    }

    async fn next_event(&mut self) -> ClientEvent {
        timeout(Duration::from_secs(2), self.events.recv())
            .await
            .expect("timed out waiting for backend event")
            .expect("backend stopped")
    }

    /// Route one backend event into the view the way the app does.
    async fn pump(&mut self) {
        match self.next_event().await {
            ClientEvent::HistoryLoaded { ticket, result } => {
                self.view.apply_history(ticket, result, &mut self.toasts)
            }
            ClientEvent::MessageSent {
                peer_id,
                kind,
                result,
            } => self
                .view
                .apply_sent(&peer_id, kind, result, &mut self.toasts),
            ClientEvent::MessageReceived(message) => self.view.apply_incoming(message),
            other => panic!("unexpected event {other:?}"),
        }
    }
}

fn me() -> CurrentUser {
    CurrentUser {
        id: "me".into(),
        full_name: "Me".into(),
        bio: "hello".into(),
        profile_pic: None,
        email: None,
    }
}

fn peer(id: &str) -> Peer {
    Peer {
        id: id.into(),
        full_name: format!("Peer {id}"),
        profile_pic: None,
        bio: None,
    }
}

fn message(id: &str, from: &str, to: &str, text: &str) -> Message {
    Message {
        id: Some(id.into()),
        sender_id: from.into(),
        receiver_id: Some(to.into()),
        text: Some(text.into()),
        image: None,
        seen: false,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
    }
}

#[tokio::test]
async fn opening_a_conversation_and_replying() {
    let backend = Arc::new(MemoryBackend::new(me()));
    backend.add_peer(peer("p"));
    backend.insert_message(message("1", "p", "me", "hi"));
    let mut h = Harness::start(backend).await;

    let select = h.view.select_peer(Some(peer("p")));
    h.send(select).await;
    h.pump().await;

    assert_eq!(h.view.history_state(), HistoryState::Loaded);
    assert_eq!(h.view.messages().len(), 1);
    assert_eq!(Side::of(&h.view.messages()[0], "me"), Side::Incoming);
    assert!(h.view.take_scroll_request());

    h.view.input = "yo".into();
    let submit = h.view.submit_text();
    h.send(submit).await;
    h.pump().await;

    assert_eq!(
        h.backend.sent(),
        vec![("p".to_string(), OutgoingMessage::text("yo"))]
    );
    assert!(h.view.input.is_empty());
    assert!(!h.view.is_submitting());
    let last = h.view.messages().last().unwrap();
    assert_eq!(last.text.as_deref(), Some("yo"));
    assert_eq!(Side::of(last, "me"), Side::Outgoing);
    assert!(h.toasts.is_empty());
}

#[tokio::test]
async fn pushed_messages_reach_only_the_open_conversation() {
    let backend = Arc::new(MemoryBackend::new(me()));
    backend.add_peer(peer("p"));
    backend.add_peer(peer("q"));
    let mut h = Harness::start(backend).await;

    let select = h.view.select_peer(Some(peer("p")));
    h.send(select).await;
    h.pump().await;
    assert!(h.view.messages().is_empty());

    h.backend.deliver(message("2", "q", "me", "psst"));
    h.pump().await;
    assert!(h.view.messages().is_empty());

    h.backend.deliver(message("3", "p", "me", "there?"));
    h.pump().await;
    assert_eq!(h.view.messages().len(), 1);
    assert_eq!(h.view.messages()[0].text.as_deref(), Some("there?"));
}

#[tokio::test]
async fn switching_peers_discards_the_earlier_history() {
    let backend = Arc::new(MemoryBackend::new(me()));
    backend.add_peer(peer("p"));
    backend.add_peer(peer("q"));
    backend.insert_message(message("1", "p", "me", "from p"));
    backend.insert_message(message("2", "q", "me", "from q"));
    let mut h = Harness::start(backend).await;

    let first = h.view.select_peer(Some(peer("p")));
    let second = h.view.select_peer(Some(peer("q")));
    h.send(first).await;
    h.send(second).await;
    h.pump().await;
    h.pump().await;

    assert_eq!(h.view.selected_peer().map(|p| p.id.as_str()), Some("q"));
    let texts: Vec<_> = h
        .view
        .messages()
        .iter()
        .filter_map(|m| m.text.as_deref())
        .collect();
    assert_eq!(texts, vec!["from q"]);
    assert_eq!(h.backend.history_requests(), vec!["p", "q"]);
}

#[tokio::test]
async fn failed_send_keeps_the_draft() {
    let backend = Arc::new(MemoryBackend::new(me()));
    backend.add_peer(peer("p"));
    let mut h = Harness::start(backend).await;

    let select = h.view.select_peer(Some(peer("p")));
    h.send(select).await;
    h.pump().await;

    h.backend.set_failing(true);
    h.view.input = "lost?".into();
    let submit = h.view.submit_text();
    h.send(submit).await;
    h.pump().await;

    assert_eq!(h.view.input, "lost?");
    assert!(h.view.messages().is_empty());
    assert!(!h.toasts.is_empty());
    assert!(h.view.can_submit_text());
}
