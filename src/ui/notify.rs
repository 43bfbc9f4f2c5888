use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// User-visible, fire-and-forget notifications.
pub trait Notifier {
    fn notify_error(&mut self, message: &str);

    fn notify_info(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub shown_at: Instant,
}

const TOAST_TTL: Duration = Duration::from_secs(4);
// Giữ tối đa vài toast để không che hết màn hình
const MAX_TOASTS: usize = 5;

/// Notification queue rendered as an overlay in the bottom-right corner.
#[derive(Debug, Default)]
pub struct Toasts {
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: ToastLevel, message: &str) {
        self.queue.push_back(Toast {
            level,
            message: message.to_string(),
            shown_at: Instant::now(),
        });
        if self.queue.len() > MAX_TOASTS {
            self.queue.pop_front();
        }
    }

    /// Drop toasts that have been on screen long enough.
    pub fn prune(&mut self, now: Instant) {
        self.queue
            .retain(|toast| now.duration_since(toast.shown_at) < TOAST_TTL);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Notifier for Toasts {
    fn notify_error(&mut self, message: &str) {
        log::warn!("{message}");
        self.push(ToastLevel::Error, message);
    }

    fn notify_info(&mut self, message: &str) {
        log::info!("{message}");
        self.push(ToastLevel::Info, message);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_most_recent_toasts() {
        let mut toasts = Toasts::new();
        for i in 0..7 {
            toasts.notify_error(&format!("error {i}"));
        }
        let messages: Vec<_> = toasts.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages.len(), MAX_TOASTS);
        assert_eq!(messages.first(), Some(&"error 2"));
    }

    #[test]
    fn prune_expires_old_toasts() {
        let mut toasts = Toasts::new();
        toasts.notify_info("saved");
        toasts.prune(Instant::now());
        assert!(!toasts.is_empty());

        toasts.prune(Instant::now() + TOAST_TTL + Duration::from_millis(1));
        assert!(toasts.is_empty());
    }
}
