/**
 * Application State Management
 *
 * `AppState` is the single state container handed to the router. Every
 * field is cheap to clone (pools, `Arc`s and channel senders), and the
 * `FromRef` implementations let handlers extract only the part they use:
 *
 * ```rust,ignore
 * async fn handler(State(store): State<Store>) { /* ... */ }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::broadcast;

use crate::backend::auth::sessions::{AuthConfig, TokenKeys};
use crate::backend::media::MediaStore;
use crate::backend::realtime::broadcast::{RealtimeEventBroadcast, CHANNEL_CAPACITY};
use crate::backend::store::Store;
use crate::shared::users::Role;
use crate::shared::AppConfig;

#[derive(Clone, Debug)]
pub struct AppState {
    /// Persistence backend
    pub store: Store,

    /// Token signing and verification keys
    pub tokens: TokenKeys,

    /// Where uploaded files go
    pub media: MediaStore,

    /// Fan-out channel for the `/socket` relay
    pub realtime: RealtimeEventBroadcast,

    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,

    /// Registration emails granted the `admin` role, lowercase
    pub admin_emails: Arc<[String]>,
}

impl AppState {
    /// Build the state for `config` on top of an already opened store
    pub fn new(config: &AppConfig, store: Store) -> Self {
        let (realtime, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            store,
            tokens: TokenKeys::new(&AuthConfig::from(config)),
            media: MediaStore::from_config(config),
            realtime,
            bcrypt_cost: config.bcrypt_cost,
            admin_emails: config.admin_emails.clone().into(),
        }
    }

    /// Role for a new account registering with `email`
    pub fn role_for_email(&self, email: &str) -> Role {
        let email = email.trim().to_lowercase();
        if self.admin_emails.iter().any(|admin| *admin == email) {
            Role::admin()
        } else {
            Role::user()
        }
    }
}

impl FromRef<AppState> for Store {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for MediaStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.media.clone()
    }
}

impl FromRef<AppState> for RealtimeEventBroadcast {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.realtime.clone()
    }
}
