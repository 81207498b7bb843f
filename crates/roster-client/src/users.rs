//! Typed gateways for the user resource.
//!
//! Thin wrappers translating each domain operation into one HTTP call on the
//! shared [`ApiClient`]. Auth attachment and 401 handling are inherited from
//! the client core; nothing here touches tokens.

use std::sync::Arc;

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::warn;

use roster_types::{ImageUpload, NewUser, TokenPair, UserProfile, UserRecord, UserUpdate};

use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;

/// Marker for requests without a body.
const NO_BODY: Option<&()> = None;

/// Gateways for registration, profile, and administrative user CRUD.
#[derive(Debug)]
pub struct UsersApi {
    client: Arc<ApiClient>,
}

impl UsersApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Registers a new account.
    ///
    /// Returns the issued token pair without persisting it — whether the
    /// fresh registration also becomes the active session is the host's call.
    pub async fn register(&self, user: &NewUser) -> ApiResult<TokenPair> {
        let form = new_user_form(user);
        let response = self
            .client
            .send_multipart(Method::POST, "/users/register/", form)
            .await?;
        decode(response).await
    }

    /// Fetches the signed-in account's profile.
    pub async fn profile(&self) -> ApiResult<UserProfile> {
        let response = self
            .client
            .send(Method::GET, "/users/profile/", NO_BODY)
            .await?;
        decode(response).await
    }

    /// Lists all user records.
    pub async fn list(&self) -> ApiResult<Vec<UserRecord>> {
        let response = self.client.send(Method::GET, "/users/", NO_BODY).await?;
        decode(response).await
    }

    /// Creates a user and returns the stored record.
    pub async fn create(&self, user: &NewUser) -> ApiResult<UserRecord> {
        let form = new_user_form(user);
        let response = self
            .client
            .send_multipart(Method::POST, "/users/", form)
            .await?;
        decode(response).await
    }

    /// Partially updates a user; only populated fields are sent, so the
    /// server leaves everything else untouched.
    pub async fn update(&self, id: u64, changes: &UserUpdate) -> ApiResult<UserRecord> {
        let form = update_form(changes);
        let response = self
            .client
            .send_multipart(Method::PATCH, &format!("/users/{id}/"), form)
            .await?;
        decode(response).await
    }

    /// Deletes a user. The server answers 204 with no body.
    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        self.client
            .send(Method::DELETE, &format!("/users/{id}/"), NO_BODY)
            .await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    response.json().await.map_err(ApiError::parse)
}

fn new_user_form(user: &NewUser) -> Form {
    build_form(user.text_fields(), user.image.as_ref())
}

fn update_form(changes: &UserUpdate) -> Form {
    build_form(changes.text_fields(), changes.image.as_ref())
}

/// Assembles a multipart form from text parts plus an optional attachment.
/// Fields absent from the payload never appear as form entries.
fn build_form(text_fields: Vec<(&'static str, &str)>, image: Option<&ImageUpload>) -> Form {
    let mut form = Form::new();
    for (name, value) in text_fields {
        form = form.text(name, value.to_string());
    }
    if let Some(image) = image {
        form = form.part("image", image_part(image));
    }
    form
}

/// Builds the attachment part. An unparsable content type is dropped with a
/// warning rather than failing the whole request; the server sniffs the file.
fn image_part(image: &ImageUpload) -> Part {
    let part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
    match part.mime_str(&image.content_type) {
        Ok(part) => part,
        Err(_) => {
            warn!(
                content_type = %image.content_type,
                "invalid attachment content type, sending untyped"
            );
            Part::bytes(image.bytes.clone()).file_name(image.file_name.clone())
        }
    }
}
