//! User records persisted by the companion user store.
//!
//! Password hashing happens outside this workspace; `hashed_password` is
//! stored and returned verbatim.

use serde::{Deserialize, Serialize};

use crate::context::validate_identifier;
use crate::error::CoreError;

/// Username seeded by the relational user store when it is asked to.
pub const DEFAULT_USERNAME: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub hashed_password: String,
    #[serde(default)]
    pub disabled: bool,
}

impl User {
    pub fn new(username: impl Into<String>, hashed_password: impl Into<String>) -> Self {
        User {
            username: username.into(),
            email: None,
            full_name: None,
            hashed_password: hashed_password.into(),
            disabled: false,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_identifier("user", &self.username)
    }
}
