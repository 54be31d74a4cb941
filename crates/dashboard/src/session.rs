//! Session state and its best-effort persistence.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use taskdeck_core::user::{User, Viewer};

/// What survives a restart: enough to skip the login screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    token: String,
    current_user: User,
    #[serde(default)]
    sidebar_collapsed: bool,
}

/// The signed-in state owned by the dashboard root.
///
/// The session file is convenience, not truth: load failures are logged
/// and ignored, and the backend re-validates the token on the first call
/// of a restored session anyway.
#[derive(Debug, Default)]
pub struct SessionStore {
    token: Option<String>,
    current_user: Option<User>,
    sidebar_collapsed: bool,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// In-memory only store; nothing survives a restart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store persisted at `path`, restoring any session found there.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: Some(path.into()),
            ..Self::default()
        };
        store.restore();
        store
    }

    fn restore(&mut self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        match load_session(path) {
            Ok(Some(session)) => {
                tracing::debug!(user = %session.current_user.email, "restored session");
                self.token = Some(session.token);
                self.current_user = Some(session.current_user);
                self.sidebar_collapsed = session.sidebar_collapsed;
            }
            Ok(None) => {}
            Err(err) => tracing::warn!("ignoring unreadable session file: {err:#}"),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// The identity triple filtering and permissions consume.
    pub fn viewer(&self) -> Option<Viewer> {
        self.current_user.as_ref().map(User::viewer)
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    pub fn sign_in(&mut self, token: String, user: User) {
        self.token = Some(token);
        self.current_user = Some(user);
        self.persist();
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.current_user = None;
        if let Some(path) = self.path.as_deref() {
            if let Err(err) = remove_session(path) {
                tracing::warn!("failed to remove session file: {err:#}");
            }
        }
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.sidebar_collapsed = collapsed;
        if self.is_signed_in() {
            self.persist();
        }
    }

    fn persist(&self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        let (Some(token), Some(user)) = (self.token.as_ref(), self.current_user.as_ref()) else {
            return;
        };
        let session = PersistedSession {
            token: token.clone(),
            current_user: user.clone(),
            sidebar_collapsed: self.sidebar_collapsed,
        };
        if let Err(err) = save_session(path, &session) {
            tracing::warn!("failed to persist session: {err:#}");
        }
    }
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn load_session(path: &Path) -> anyhow::Result<Option<PersistedSession>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading session file {}", path.display()))?;
    let session = serde_json::from_str(&raw)
        .with_context(|| format!("parsing session file {}", path.display()))?;
    Ok(Some(session))
}

fn save_session(path: &Path, session: &PersistedSession) -> anyhow::Result<()> {
    let raw = serde_json::to_string_pretty(session).context("serializing session")?;
    std::fs::write(path, raw).with_context(|| format!("writing session file {}", path.display()))
}

fn remove_session(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("removing session file {}", path.display()))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use taskdeck_core::user::Role;

    use super::*;

    fn user() -> User {
        serde_json::from_str(
            r#"{"id":"u-1","name":"Ana","email":"ana@example.com","role":"developer"}"#,
        )
        .unwrap()
    }

    fn session_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("session.json")
    }

    #[test]
    fn in_memory_store_signs_in_and_out() {
        let mut store = SessionStore::new();
        assert!(!store.is_signed_in());

        store.sign_in("tok-1".into(), user());
        assert_eq!(store.token(), Some("tok-1"));
        assert_eq!(store.viewer().unwrap().role, Role::Developer);

        store.sign_out();
        assert!(!store.is_signed_in());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn sign_in_writes_a_camel_case_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = session_path(&dir);

        let mut store = SessionStore::with_file(&path);
        store.sign_in("tok-1".into(), user());

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["token"], "tok-1");
        assert_eq!(value["currentUser"]["email"], "ana@example.com");
        assert_eq!(value["sidebarCollapsed"], false);
    }

    #[test]
    fn a_new_store_restores_the_persisted_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = session_path(&dir);

        let mut first = SessionStore::with_file(&path);
        first.sign_in("tok-1".into(), user());
        first.set_sidebar_collapsed(true);

        let second = SessionStore::with_file(&path);
        assert_eq!(second.token(), Some("tok-1"));
        assert_eq!(second.current_user().unwrap().email, "ana@example.com");
        assert!(second.sidebar_collapsed());
    }

    #[test]
    fn sign_out_removes_the_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = session_path(&dir);

        let mut store = SessionStore::with_file(&path);
        store.sign_in("tok-1".into(), user());
        assert!(path.exists());

        store.sign_out();
        assert!(!path.exists());
    }

    #[test]
    fn a_corrupt_session_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = session_path(&dir);
        std::fs::write(&path, "{not json").unwrap();

        let store = SessionStore::with_file(&path);
        assert!(!store.is_signed_in());
    }

    #[test]
    fn sidebar_state_is_not_persisted_while_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = session_path(&dir);

        let mut store = SessionStore::with_file(&path);
        store.set_sidebar_collapsed(true);
        assert!(!path.exists());
    }
}
