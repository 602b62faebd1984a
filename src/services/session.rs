//! Session persistence and the shared session context

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use crate::{
    error::{AppError, AppResult},
    models::{user::UserProfile, Role, Session},
    storage::Storage,
};

/// Storage key holding the opaque auth token
pub const TOKEN_KEY: &str = "userToken";
/// Storage key holding the serialized profile
pub const USER_KEY: &str = "userData";

/// Reads and writes the session in client-local storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Persist the token and profile
    pub fn save(&self, token: &str, profile: &UserProfile) -> AppResult<()> {
        let data = serde_json::to_string(profile)?;
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_KEY, &data)
    }

    /// Saved session, or the guest session if nothing usable is stored.
    ///
    /// A profile that fails to decode (including one carrying an unknown
    /// role) is treated as absent.
    pub fn load(&self) -> AppResult<Session> {
        let token = self.storage.get(TOKEN_KEY)?;
        let data = self.storage.get(USER_KEY)?;

        let (token, data) = match (token, data) {
            (Some(token), Some(data)) => (token, data),
            _ => return Ok(Session::guest()),
        };

        match serde_json::from_str::<UserProfile>(&data) {
            Ok(user) => Ok(Session {
                token: Some(token),
                user,
            }),
            Err(e) => {
                tracing::warn!("Discarding unreadable stored session: {}", e);
                Ok(Session::guest())
            }
        }
    }

    /// Remove both entries
    pub fn clear(&self) -> AppResult<()> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)
    }
}

/// Change notifications published by [`SessionContext`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn(UserProfile),
    SignedOut,
}

/// Shared handle to the current session.
///
/// Storage is read exactly once, in [`SessionContext::initialize`]. Every
/// change goes through [`update`](Self::update) or [`clear`](Self::clear),
/// which write storage and notify subscribers.
#[derive(Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Session>>,
    store: SessionStore,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
    pub fn initialize(store: SessionStore) -> AppResult<Self> {
        let session = store.load()?;
        tracing::debug!(
            "Session loaded: role={}, authenticated={}",
            session.role(),
            session.is_authenticated()
        );
        let (events, _) = broadcast::channel(16);

        Ok(Self {
            current: Arc::new(RwLock::new(session)),
            store,
            events,
        })
    }

    pub fn current(&self) -> Session {
        match self.current.read() {
            Ok(session) => session.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn role(&self) -> Role {
        self.current().role()
    }

    pub fn token(&self) -> Option<String> {
        self.current().token
    }

    /// Replace the session after a successful login
    pub fn update(&self, token: String, user: UserProfile) -> AppResult<()> {
        self.store.save(&token, &user)?;
        self.replace(Session {
            token: Some(token),
            user: user.clone(),
        })?;
        let _ = self.events.send(SessionEvent::SignedIn(user));
        Ok(())
    }

    /// Drop the session and fall back to guest
    pub fn clear(&self) -> AppResult<()> {
        self.store.clear()?;
        self.replace(Session::guest())?;
        let _ = self.events.send(SessionEvent::SignedOut);
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn replace(&self, session: Session) -> AppResult<()> {
        let mut current = self
            .current
            .write()
            .map_err(|_| AppError::Storage("session lock poisoned".to_string()))?;
        *current = session;
        Ok(())
    }
}
