pub mod app;
pub mod components;
pub mod conversation;
pub mod notify;
pub mod preview;
pub mod profile;
pub mod state;

pub use app::ChatApp;
pub use conversation::{ConversationView, HistoryState};
pub use notify::{Notifier, Toasts};
pub use preview::{EguiPreviews, Preview, PreviewBackend};
pub use profile::{AvatarSource, ProfileEditor};
pub use state::{AppState, Navigator, Route, Router};
