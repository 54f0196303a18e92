use crate::config::{IdPolicy, StoreConfig};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{User, UserFields};

use std::collections::BTreeMap;
use tracing::debug;

/// Owner of every user record.
///
/// All validation happens before the map is touched, so a failed operation
/// leaves the store unchanged.
#[derive(Debug)]
pub struct UserService {
    users: BTreeMap<u64, User>,
    next_id: u64,
    config: StoreConfig,
}

impl UserService {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: 1,
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn create_user(&mut self, fields: UserFields) -> ServiceResult<u64> {
        let new_user = fields.validate_new()?;
        if self.email_in_use(&new_user.email, None) {
            return Err(ServiceError::AlreadyCreated);
        }

        let id = self.allocate_id()?;
        self.users.insert(id, new_user.into_user(id));
        debug!(user_id = id, policy = %self.config.id_policy, "user created");
        Ok(id)
    }

    pub fn get_user(&self, id: u64) -> ServiceResult<User> {
        self.users
            .get(&id)
            .cloned()
            .ok_or(ServiceError::NotFound(id))
    }

    /// Snapshot of all records in ascending id order
    pub fn list_users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    pub fn update_user(&mut self, id: u64, fields: UserFields) -> ServiceResult<()> {
        if !self.users.contains_key(&id) {
            return Err(ServiceError::NotFound(id));
        }

        let changes = fields.validate_changes(self.config.update_validation)?;
        if let Some(email) = &changes.email {
            if self.email_in_use(email, Some(id)) {
                return Err(ServiceError::AlreadyCreated);
            }
        }

        let user = self
            .users
            .get_mut(&id)
            .ok_or(ServiceError::NotFound(id))?;
        user.apply(changes);
        debug!(user_id = id, "user updated");
        Ok(())
    }

    pub fn delete_user(&mut self, id: u64) -> ServiceResult<()> {
        self.users
            .remove(&id)
            .map(|_| debug!(user_id = id, "user deleted"))
            .ok_or(ServiceError::NotFound(id))
    }

    /// Whether a live record other than `except` already uses `email`
    fn email_in_use(&self, email: &str, except: Option<u64>) -> bool {
        self.users
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }

    fn allocate_id(&mut self) -> ServiceResult<u64> {
        match self.config.id_policy {
            IdPolicy::Monotonic => {
                let id = self.next_id;
                self.next_id = id
                    .checked_add(1)
                    .ok_or_else(|| ServiceError::Internal("user id space exhausted".to_string()))?;
                Ok(id)
            }
            IdPolicy::Count => {
                let id = u64::try_from(self.users.len())
                    .ok()
                    .and_then(|count| count.checked_add(1))
                    .ok_or_else(|| ServiceError::Internal("user id space exhausted".to_string()))?;
                // count + 1 can land on a live id once an earlier user was deleted
                if self.users.contains_key(&id) {
                    return Err(ServiceError::Internal(format!(
                        "id {} derived from the user count is still in use",
                        id
                    )));
                }
                Ok(id)
            }
        }
    }
}

impl Default for UserService {
    fn default() -> Self {
        Self::new()
    }
}
