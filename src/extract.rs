//! Extractors that report their rejections as API errors.

use axum::extract::FromRequest;

use crate::Error;

/// Like [axum::Json], but a body that cannot be parsed is rejected with an
/// [Error::InvalidBody] JSON response instead of plain text.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);
