//! HTTP client core.
//!
//! One [`ApiClient`] is constructed at application start and shared by
//! reference with every gateway. It owns the two cross-cutting behaviors:
//! attaching the bearer token read from the [`TokenStore`] to each outgoing
//! request, and tearing the session down when any response comes back 401.
//! Both happen here and nowhere else.

use std::fmt;
use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use roster_types::TokenPair;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TokenStore};

/// Standard User-Agent header for roster API requests.
pub const USER_AGENT: &str = concat!("roster-client/", env!("CARGO_PKG_VERSION"));

/// Hook invoked after the session has been torn down.
///
/// Registered by the hosting application; typically navigates back to its
/// sign-in surface. By the time it runs, both tokens are already cleared.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Session-authenticated request executor.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client over the given configuration and token store.
    pub fn new(config: ApiConfig, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url,
            store,
            on_unauthorized: None,
        }
    }

    /// Registers the hook invoked whenever the session ends — on a 401
    /// response or an explicit logout.
    pub fn with_unauthorized_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether an access token is currently present in the store.
    pub fn is_authenticated(&self) -> bool {
        self.store.get(ACCESS_TOKEN_KEY).is_some()
    }

    /// Persists both tokens of a freshly issued pair.
    pub(crate) fn store_tokens(&self, tokens: &TokenPair) {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access);
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh);
    }

    /// Clears both tokens and fires the unauthorized hook.
    ///
    /// Idempotent on storage; the hook runs unconditionally so the host
    /// always returns to its sign-in surface.
    pub(crate) fn end_session(&self) {
        self.store.clear(ACCESS_TOKEN_KEY);
        self.store.clear(REFRESH_TOKEN_KEY);
        if let Some(hook) = &self.on_unauthorized {
            hook();
        }
    }

    /// Sends a request with an optional JSON body.
    ///
    /// Returns the raw response on any 2xx status; non-success statuses come
    /// back as [`ApiError`] so every rejection reaches the caller.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<reqwest::Response> {
        let mut builder = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(&method, path, builder).await
    }

    /// Sends a multipart request for payloads carrying binary attachments.
    pub async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> ApiResult<reqwest::Response> {
        let builder = self.http.request(method.clone(), self.url(path)).multipart(form);
        self.execute(&method, path, builder).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Common send path: attach the bearer token if present, then inspect the
    /// response. A 401 clears the session *before* the error propagates, so
    /// callers catching it must not assume the session is still valid.
    async fn execute(
        &self,
        method: &Method,
        path: &str,
        mut builder: reqwest::RequestBuilder,
    ) -> ApiResult<reqwest::Response> {
        builder = builder.header(reqwest::header::USER_AGENT, USER_AGENT);
        if let Some(token) = self.store.get(ACCESS_TOKEN_KEY) {
            builder = builder.bearer_auth(token);
        }

        debug!(%method, path, "sending request");

        let response = builder.send().await.map_err(|e| ApiError::network(&e))?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            warn!(path, "unauthorized response, ending session");
            self.end_session();
            return Err(ApiError::unauthorized(&body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%method, path, status = status.as_u16(), "request rejected");
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        Ok(response)
    }
}
