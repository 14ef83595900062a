//! Current-session providers (the localStorage analogue).

use std::path::PathBuf;
use std::sync::Mutex;

use scholarshare_domain::user::User;

use crate::domain::ports::SessionStore;

/// Process-local session, dropped on exit.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: Mutex<Option<User>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<User> {
        self.current.lock().unwrap().clone()
    }

    fn set(&self, user: &User) {
        *self.current.lock().unwrap() = Some(user.clone());
    }

    fn clear(&self) {
        *self.current.lock().unwrap() = None;
    }
}

/// Session persisted as JSON on disk, surviving restarts.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<User> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "discarding unreadable session file");
                None
            }
        }
    }

    fn set(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&self.path, json) {
                    tracing::warn!(path = %self.path.display(), error = %err, "failed to persist session");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize session"),
        }
    }

    fn clear(&self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to clear session file");
            }
        }
    }
}
