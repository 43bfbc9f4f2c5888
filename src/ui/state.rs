use std::collections::HashSet;

use crate::common::{CurrentUser, Peer, UserId};

use super::notify::Toasts;

/// Progress of a view's single in-flight submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Submission {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Chat,
    Profile,
}

pub trait Navigator {
    fn go_to(&mut self, route: Route);
}

#[derive(Debug, Default)]
pub struct Router {
    current: Route,
}

impl Router {
    pub fn current(&self) -> Route {
        self.current
    }
}

impl Navigator for Router {
    fn go_to(&mut self, route: Route) {
        if self.current != route {
            log::debug!("Navigating {:?} -> {:?}", self.current, route);
        }
        self.current = route;
    }
}

/// Set of user ids currently online.
#[derive(Debug, Default, Clone)]
pub struct Presence {
    online: HashSet<UserId>,
}

impl Presence {
    pub fn replace(&mut self, online: HashSet<UserId>) {
        self.online = online;
    }

    pub fn is_online(&self, user_id: &str) -> bool {
        self.online.contains(user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.online.is_empty()
    }
}

/// Trạng thái cục bộ của UI.
#[derive(Debug, Default)]
pub struct AppState {
    pub current_user: Option<CurrentUser>,
    pub users: Vec<Peer>,
    pub presence: Presence,
    pub router: Router,
    pub toasts: Toasts,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_users(&mut self, users: Vec<Peer>) {
        self.users = users;
    }

    pub fn find_user(&self, user_id: &str) -> Option<&Peer> {
        self.users.iter().find(|user| user.id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_membership_follows_replacements() {
        let mut presence = Presence::default();
        assert!(!presence.is_online("ann"));

        presence.replace(["ann".to_string()].into_iter().collect());
        assert!(presence.is_online("ann"));

        presence.replace(HashSet::new());
        assert!(!presence.is_online("ann"));
        assert!(presence.is_empty());
    }

    #[test]
    fn router_switches_routes() {
        let mut router = Router::default();
        assert_eq!(router.current(), Route::Chat);
        router.go_to(Route::Profile);
        assert_eq!(router.current(), Route::Profile);
    }
}
