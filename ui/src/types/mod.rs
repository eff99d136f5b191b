// Shared type definitions
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownRole;

// User types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Receptionist,
}

impl Role {
    /// Every selectable role, in the order the select control lists them.
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::Receptionist];

    /// Wire value sent in the `role` multipart field.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Receptionist => "receptionist",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
            Role::Receptionist => "Receptionist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// A picked profile photo. The default value is the empty placeholder file
/// the form starts with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Photo {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Photo {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    #[cfg(test)]
    pub fn is_placeholder(&self) -> bool {
        self.file_name.is_empty() && self.bytes.is_empty()
    }
}

/// Validated payload of one submission attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCreationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub photo: Photo,
    pub role: Role,
}

impl fmt::Debug for UserCreationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCreationRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("photo", &self.photo.file_name)
            .field("photo_len", &self.photo.bytes.len())
            .field("role", &self.role)
            .finish()
    }
}

/// Body shape shared by success and error responses of the user endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// The user was created. The message, when the server sent one, has
    /// been handed to the listing page through the flash store.
    Created { message: Option<String> },
    /// The user was not created; `message` has been shown as a toast.
    Failed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_wire_value() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_role_rejects_unknown_values() {
        assert!("Admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_message_body_tolerates_missing_message() {
        let body: MessageBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.message, None);

        let body: MessageBody = serde_json::from_str(r#"{"message":"User created"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("User created"));
    }

    #[test]
    fn test_request_debug_hides_password() {
        let request = UserCreationRequest {
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            password: "hunter2".into(),
            photo: Photo::default(),
            role: Role::Admin,
        };
        let printed = format!("{request:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("jdoe"));
    }
}
