use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::text::is_valid_email;

/// The client-local record of who is signed in.
///
/// Fields beyond `name` and `email` are kept verbatim so a session written by
/// another page version survives a read/write cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    name: String,
    email: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

impl UserSession {
    /// Build a session from login form input.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyName` if the trimmed name is empty and
    /// `SessionError::InvalidEmail` if the email does not look like `a@b.c`.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, SessionError> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if !is_valid_email(&email) {
            return Err(SessionError::InvalidEmail(email));
        }
        Ok(Self {
            name,
            email,
            extra: Map::new(),
        })
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != "name" && key != "email" {
            self.extra.insert(key, value);
        }
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
