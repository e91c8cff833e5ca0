//! # User Directory
//!
//! In-crate stand-in for the user store boundary: existence checks for the
//! order flow and username resolution for upstream identity handling.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::CommerceError, implementation::cart_system::CustomerId};

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id:         CustomerId,
    /// Unique username.
    pub username:   String,
    /// Email address.
    pub email:      String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a generated ID.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id:         CustomerId::generate(),
            username:   username.into(),
            email:      email.into(),
            created_at: Utc::now(),
        }
    }
}

/// User directory service.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    /// Users indexed by ID.
    users:       Arc<Mutex<HashMap<CustomerId, User>>>,
    /// User IDs indexed by username.
    by_username: Arc<Mutex<HashMap<String, CustomerId>>>,
}

impl UserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    pub fn add_user(&self, user: User) -> Result<(), CommerceError> {
        let mut users = self.users.lock().map_err(|_| CommerceError::LockError)?;
        let mut by_username = self.by_username.lock().map_err(|_| CommerceError::LockError)?;

        if by_username.contains_key(&user.username) {
            return Err(CommerceError::UsernameTaken(user.username));
        }

        by_username.insert(user.username.clone(), user.id.clone());
        users.insert(user.id.clone(), user);
        Ok(())
    }

    /// Gets a user by ID.
    pub fn get_user(&self, id: &CustomerId) -> Result<User, CommerceError> {
        let users = self.users.lock().map_err(|_| CommerceError::LockError)?;
        users.get(id).cloned().ok_or_else(|| CommerceError::UserNotFound(id.to_string()))
    }

    /// Whether a username is registered.
    pub fn exists_by_username(&self, username: &str) -> Result<bool, CommerceError> {
        let by_username = self.by_username.lock().map_err(|_| CommerceError::LockError)?;
        Ok(by_username.contains_key(username))
    }

    /// Finds a user by username.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, CommerceError> {
        let users = self.users.lock().map_err(|_| CommerceError::LockError)?;
        let by_username = self.by_username.lock().map_err(|_| CommerceError::LockError)?;
        Ok(by_username.get(username).and_then(|id| users.get(id)).cloned())
    }
}
