use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl User {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
}

type Callback = Box<dyn Fn(&AuthState) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct Inner {
    state: AuthState,
    subscribers: Vec<(u64, Callback)>,
    next_id: u64,
}

/// Session-owned auth context. Components that care about the current user
/// hold a clone and subscribe/unsubscribe explicitly; there is no
/// process-wide identity.
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<Mutex<Inner>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: AuthState { user: None, is_loading: true },
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.lock().state.user.clone()
    }

    pub fn subscribe(&self, callback: impl Fn(&AuthState) + Send + 'static) -> SubscriptionId {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        // New subscribers observe the current state immediately.
        callback(&inner.state);
        inner.subscribers.push((id, Box::new(callback)));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.lock().subscribers.retain(|(sid, _)| *sid != id.0);
    }

    pub fn login(&self, user: User) {
        self.set_state(AuthState { user: Some(user), is_loading: false });
    }

    pub fn logout(&self) {
        self.set_state(AuthState { user: None, is_loading: false });
    }

    fn set_state(&self, state: AuthState) {
        let mut inner = self.inner.lock();
        inner.state = state;
        for (_, cb) in &inner.subscribers {
            cb(&inner.state);
        }
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}
