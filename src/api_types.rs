//! TVDB api response envelopes for deserialization.
//!
//! Every payload-carrying endpoint wraps its result in a `{"data": ...}`
//! object; only the login/refresh endpoints answer with a bare token object.
use serde::Deserialize;

/// The `{"data": ...}` wrapper used by every TVDB endpoint.
///
/// The payload type varies per endpoint (a single record or a list of
/// records), so the envelope is generic over it.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub data: T,
}

/// Response body of the `/login` and `/refresh_token` endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
}
