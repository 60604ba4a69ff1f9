//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use crate::{Error, store::RemoteStore, timezone::get_local_offset};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The remote store that every request is forwarded to.
    pub store: Arc<dyn RemoteStore>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] that forwards requests to `store`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if `local_timezone` is not a known timezone.
    pub fn new(store: impl RemoteStore + 'static, local_timezone: &str) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezone(local_timezone.to_owned()));
        }

        Ok(Self {
            store: Arc::new(store),
            local_timezone: local_timezone.to_owned(),
        })
    }
}
