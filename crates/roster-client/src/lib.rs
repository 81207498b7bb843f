//! Session-authenticated client for the roster user-accounts API.
//!
//! The hosting application constructs one [`ApiClient`] at startup with an
//! injected [`TokenStore`], then hands it by reference to the [`Session`]
//! controller and the [`UsersApi`] gateways. Bearer attachment and 401
//! handling live in the client core, so no gateway deals with either.

pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod store;
pub mod users;

pub use config::ApiConfig;
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use http::ApiClient;
pub use session::Session;
pub use store::{
    ACCESS_TOKEN_KEY, FileTokenStore, MemoryTokenStore, REFRESH_TOKEN_KEY, TokenStore,
};
pub use users::UsersApi;
