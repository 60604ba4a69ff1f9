//! Where the client keeps the session between runs.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{auth::Session, client::ClientError, config::config_dir};

/// The name of the session file inside the config directory.
pub const SESSION_FILE_NAME: &str = "session.json";

/// Persists the access and refresh tokens of the logged-in user.
pub trait SessionStore: Send + Sync {
    /// The saved session, if there is one.
    fn load(&self) -> Result<Option<Session>, ClientError>;

    /// Replace the saved session.
    fn save(&self, session: &Session) -> Result<(), ClientError>;

    /// Forget the saved session. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), ClientError>;
}

/// Keeps the session in a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store the session at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the session in the platform config directory.
    pub fn in_config_dir() -> Result<Self, ClientError> {
        let dir = config_dir().map_err(|error| ClientError::SessionStore(error.to_string()))?;

        Ok(Self::new(dir.join(SESSION_FILE_NAME)))
    }

    /// The path of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(io_error(&self.path, error)),
        };

        match serde_json::from_str(&text) {
            Ok(session) => Ok(Some(session)),
            Err(error) => {
                tracing::warn!(
                    "Ignoring unreadable session file {}: {error}",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| io_error(parent, error))?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|error| ClientError::SessionStore(error.to_string()))?;

        fs::write(&self.path, json).map_err(|error| io_error(&self.path, error))
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(&self.path, error)),
        }
    }
}

fn io_error(path: &Path, error: std::io::Error) -> ClientError {
    ClientError::SessionStore(format!("{}: {error}", path.display()))
}

/// Keeps the session in memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// A store that starts out holding `session`.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        let session = self.session.lock().map_err(|_| lock_error())?;

        Ok(session.clone())
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        *self.session.lock().map_err(|_| lock_error())? = Some(session.clone());

        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.session.lock().map_err(|_| lock_error())? = None;

        Ok(())
    }
}

fn lock_error() -> ClientError {
    ClientError::SessionStore("could not acquire the session lock".to_owned())
}
