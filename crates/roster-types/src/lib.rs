//! Data model shared by the roster client and its consumers.

pub mod account;
pub mod users;

pub use account::{Credentials, TokenPair, UserProfile};
pub use users::{ImageUpload, NewUser, UserRecord, UserUpdate};
