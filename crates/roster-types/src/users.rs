//! User directory records and write payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A row in the administrative user list.
///
/// The three image fields are the server-generated avatar renditions; any of
/// them may be null for accounts without an avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub image_small: Option<String>,
    #[serde(default)]
    pub image_medium: Option<String>,
    #[serde(default)]
    pub image_large: Option<String>,
}

/// In-memory binary attachment for multipart bodies.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name reported to the server (extension matters for validation).
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

// Manual impl: the raw bytes are noise in logs, the length is not.
impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .finish()
    }
}

/// Payload for registration and administrative user creation.
///
/// All text fields are required by the backend; the avatar is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub image: Option<ImageUpload>,
}

impl NewUser {
    /// Text form parts in submission order.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("username", self.username.as_str()),
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("phone", self.phone.as_str()),
        ]
    }
}

/// Partial-update payload; only populated fields become form parts.
///
/// Absent fields are omitted from the outgoing form entirely so the server
/// leaves them untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub image: Option<ImageUpload>,
}

impl UserUpdate {
    /// Text form parts for the populated fields, in submission order.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = Vec::new();
        if let Some(username) = &self.username {
            fields.push(("username", username.as_str()));
        }
        if let Some(email) = &self.email {
            fields.push(("email", email.as_str()));
        }
        if let Some(first_name) = &self.first_name {
            fields.push(("first_name", first_name.as_str()));
        }
        if let Some(last_name) = &self.last_name {
            fields.push(("last_name", last_name.as_str()));
        }
        if let Some(phone) = &self.phone {
            fields.push(("phone", phone.as_str()));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: list rows deserialize with and without avatar renditions.
    #[test]
    fn test_user_record_deserialize() {
        let json = r#"{
            "id": 3,
            "username": "oles",
            "email": "oles@example.com",
            "first_name": "Oles",
            "last_name": "Bondar",
            "phone": "+380671234567",
            "image_small": "/media/small/oles.webp",
            "image_medium": null,
            "image_large": null
        }"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.image_small.as_deref(), Some("/media/small/oles.webp"));
        assert!(record.image_medium.is_none());
        assert!(record.image_large.is_none());
    }

    /// Test: a fresh update payload produces no form parts at all.
    #[test]
    fn test_user_update_empty_has_no_fields() {
        assert!(UserUpdate::default().text_fields().is_empty());
    }

    /// Test: only populated update fields are listed.
    #[test]
    fn test_user_update_partial_fields() {
        let update = UserUpdate {
            first_name: Some("Mira".to_string()),
            phone: Some("+380991112233".to_string()),
            ..UserUpdate::default()
        };
        let fields = update.text_fields();
        assert_eq!(
            fields,
            vec![("first_name", "Mira"), ("phone", "+380991112233")]
        );
    }

    /// Test: creation payload always lists all six text fields.
    #[test]
    fn test_new_user_lists_all_text_fields() {
        let user = NewUser {
            username: "oles".to_string(),
            email: "oles@example.com".to_string(),
            password: "s3cret-pass".to_string(),
            first_name: "Oles".to_string(),
            last_name: "Bondar".to_string(),
            phone: "+380671234567".to_string(),
            image: None,
        };
        let names: Vec<&str> = user.text_fields().iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "username",
                "email",
                "password",
                "first_name",
                "last_name",
                "phone"
            ]
        );
    }

    /// Test: debug output summarizes attachment bytes instead of dumping them.
    #[test]
    fn test_image_upload_debug_is_compact() {
        let image = ImageUpload::new("a.png", "image/png", vec![0u8; 4096]);
        let rendered = format!("{image:?}");
        assert!(rendered.contains("4096 bytes"));
        assert!(!rendered.contains("[0,"));
    }
}
