//! Session lifecycle: login, logout, authentication state.
//!
//! The 401 path needs no call here — the client core tears the session down
//! on any unauthorized response before the error reaches the caller.

use std::sync::Arc;

use reqwest::Method;
use tracing::info;

use roster_types::{Credentials, TokenPair};

use crate::error::{ApiError, ApiErrorKind, ApiResult};
use crate::http::ApiClient;

const LOGIN_PATH: &str = "/users/login/";

/// Message shown when a login rejection carries no usable payload.
const GENERIC_LOGIN_ERROR: &str = "Invalid username or password";

/// Session controller over a shared [`ApiClient`].
#[derive(Debug)]
pub struct Session {
    client: Arc<ApiClient>,
}

impl Session {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a token pair and persists it.
    ///
    /// Both tokens are stored before the pair is returned, so a successful
    /// call leaves the session authenticated. Server rejections keep their
    /// field-level messages where present; an unrecognized payload surfaces
    /// as a generic invalid-credentials error.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<TokenPair> {
        let response = self
            .client
            .send(Method::POST, LOGIN_PATH, Some(credentials))
            .await
            .map_err(generalize_login_error)?;

        let tokens: TokenPair = response.json().await.map_err(ApiError::parse)?;
        self.client.store_tokens(&tokens);
        info!(username = %credentials.username, "login succeeded");
        Ok(tokens)
    }

    /// Clears both tokens and fires the unauthorized hook so the host
    /// returns to its sign-in surface. No server call is made.
    ///
    /// A storage no-op when nothing was stored; the hook still runs.
    pub fn logout(&self) {
        info!("logging out");
        self.client.end_session();
    }

    /// Whether an access token is currently present.
    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }
}

/// Swaps an uninformative rejection for the generic credentials message.
/// Classified payloads (field maps, detail strings) pass through unchanged.
fn generalize_login_error(err: ApiError) -> ApiError {
    if err.kind() == ApiErrorKind::Status && !err.is_classified() {
        err.with_message(GENERIC_LOGIN_ERROR)
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: an unclassified rejection becomes the generic message.
    #[test]
    fn test_generalize_unclassified_rejection() {
        let err = generalize_login_error(ApiError::from_status(400, "<html>nope</html>"));
        assert_eq!(err.to_string(), GENERIC_LOGIN_ERROR);
        assert_eq!(err.status(), Some(400));
    }

    /// Test: field-level messages survive untouched.
    #[test]
    fn test_generalize_keeps_field_messages() {
        let err =
            generalize_login_error(ApiError::from_status(400, r#"{"username": ["required"]}"#));
        assert!(err.to_string().contains("username: required"));
    }

    /// Test: transport failures are not rewritten into credential errors.
    #[test]
    fn test_generalize_ignores_other_kinds() {
        let err = generalize_login_error(ApiError::parse("bad json"));
        assert_eq!(err.kind(), ApiErrorKind::Parse);
        assert!(err.to_string().contains("bad json"));
    }
}
