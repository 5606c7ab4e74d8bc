//! Session state: login, logout and startup restore.
//!
//! The session is a single mutable record owned by the top-level context
//! and only ever replaced wholesale. It is mirrored into durable storage
//! under two keys so a restart can reconstruct it without
//! re-authenticating; any inconsistency found at restore time fails
//! closed.

use crate::access::{Permission, Role};
use crate::store::Store;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Storage key for the serialized [`User`].
pub const KEY_CURRENT_USER: &str = "currentUser";
/// Storage key for the authenticated flag; only the literal `"true"` counts.
pub const KEY_IS_AUTHENTICATED: &str = "isAuthenticated";

/// An authenticated principal. Never carries the secret it logged in with.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: u32,
    pub nombre: String,
    pub email: String,
    pub rol: Role,
    pub permisos: Vec<Permission>,
    pub activo: bool,
}

impl User {
    /// Display label for the user's role.
    pub fn role_label(&self) -> &'static str {
        self.rol.label()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Credenciales inválidas")]
    InvalidCredentials,
    #[error("stored session could not be decoded: {0}")]
    SessionDeserialization(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// One entry of the credential file. The secret lives only here and in the
/// file it was read from; it is stripped before a [`User`] is produced.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: u32,
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub rol: Role,
    #[serde(default)]
    pub permisos: Vec<Permission>,
    #[serde(default = "default_active")]
    pub activo: bool,
}

fn default_active() -> bool {
    true
}

impl Account {
    fn to_user(&self) -> User {
        User {
            id: self.id,
            nombre: self.nombre.clone(),
            email: self.email.clone(),
            rol: self.rol,
            permisos: self.permisos.clone(),
            activo: self.activo,
        }
    }
}

/// The credential list, loaded from `accounts.toml` in the data directory.
///
/// This is a prototype/demo store, not a real credential backend. The
/// accounts are deliberately not compiled into the binary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountStore {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl AccountStore {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let store: AccountStore = toml::from_str(&content)?;
        Ok(store)
    }

    /// Load the account list, tolerating a missing file (empty store: every
    /// login fails with InvalidCredentials).
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(store) => store,
            Err(err) => {
                eprintln!(
                    "Warning: failed to load accounts from {}: {}",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    fn find(&self, email: &str, password: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.email == email && a.password == password && a.activo)
    }
}

/// The current session: user, authenticated flag and the startup loading
/// flag consulted by the route guard.
#[derive(Debug)]
pub struct SessionState {
    current_user: Option<User>,
    is_authenticated: bool,
    is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            current_user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Authenticate against the credential list.
    ///
    /// On a match the secret is stripped, the in-memory session replaced and
    /// a serialized copy plus the authenticated flag written to durable
    /// storage. On no match nothing is written.
    pub fn login(
        &mut self,
        store: &Store,
        accounts: &AccountStore,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let account = accounts
            .find(email, password)
            .ok_or(AuthError::InvalidCredentials)?;
        let user = account.to_user();

        let serialized = serde_json::to_string(&user)?;
        store.set(KEY_CURRENT_USER, &serialized)?;
        store.set(KEY_IS_AUTHENTICATED, "true")?;

        self.current_user = Some(user.clone());
        self.is_authenticated = true;
        Ok(user)
    }

    /// Clear the in-memory session and both storage entries. Idempotent.
    pub fn logout(&mut self, store: &Store) {
        self.current_user = None;
        self.is_authenticated = false;
        // Storage removal failures leave stale files at worst; the restore
        // path still fails closed on them.
        let _ = store.remove(KEY_CURRENT_USER);
        let _ = store.remove(KEY_IS_AUTHENTICATED);
    }

    /// Reconstruct the session from durable storage, once at process start.
    ///
    /// Adopts the stored user iff both entries are present and the flag is
    /// exactly `"true"`. A corrupt user record forces a logout so both
    /// entries are cleared. Always ends with the loading flag false.
    pub fn restore(&mut self, store: &Store) -> RestoreOutcome {
        let outcome = match (store.get(KEY_CURRENT_USER), store.get(KEY_IS_AUTHENTICATED)) {
            (Some(raw), Some(flag)) if flag == "true" => {
                match serde_json::from_str::<User>(&raw) {
                    Ok(user) => {
                        self.current_user = Some(user);
                        self.is_authenticated = true;
                        RestoreOutcome::Restored
                    }
                    Err(_) => {
                        self.logout(store);
                        RestoreOutcome::Discarded
                    }
                }
            }
            _ => RestoreOutcome::NoSession,
        };
        self.is_loading = false;
        outcome
    }
}

/// What the startup restore found, for audit purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    Discarded,
    NoSession,
}
