use crate::error::{RpcError, RpcResult};

use std::sync::{Arc, Mutex, MutexGuard};
use user_service::{StoreConfig, User, UserFields, UserService};

/// Shared entry point to the user store.
///
/// Clones share one store; every operation runs under a single lock.
#[derive(Debug, Clone)]
pub struct UserHandler {
    service: Arc<Mutex<UserService>>,
}

impl UserHandler {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::from_service(UserService::with_config(config))
    }

    pub fn from_service(service: UserService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }

    fn lock(&self) -> RpcResult<MutexGuard<'_, UserService>> {
        self.service
            .lock()
            .map_err(|_| RpcError::InternalError("user store lock poisoned".to_string()))
    }

    pub fn create_user(&self, fields: UserFields) -> RpcResult<u64> {
        Ok(self.lock()?.create_user(fields)?)
    }

    pub fn get_user(&self, id: u64) -> RpcResult<User> {
        Ok(self.lock()?.get_user(id)?)
    }

    pub fn list_users(&self) -> RpcResult<Vec<User>> {
        Ok(self.lock()?.list_users())
    }

    pub fn update_user(&self, id: u64, fields: UserFields) -> RpcResult<()> {
        Ok(self.lock()?.update_user(id, fields)?)
    }

    pub fn delete_user(&self, id: u64) -> RpcResult<()> {
        Ok(self.lock()?.delete_user(id)?)
    }
}

impl Default for UserHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use user_service::ServiceError;

    #[test]
    fn test_create_and_get_user() {
        let handler = UserHandler::new();
        let id = handler
            .create_user(UserFields::new("Alice", "alice@example.com", 30))
            .unwrap();

        let fetched_user = handler.get_user(id).unwrap();
        assert_eq!(fetched_user.name, "Alice");
        assert_eq!(fetched_user.email, "alice@example.com");
    }

    #[test]
    fn test_list_users() {
        let handler = UserHandler::new();
        handler
            .create_user(UserFields::new("Alice", "alice@example.com", 30))
            .unwrap();
        handler
            .create_user(UserFields::new("Bob", "bob@example.com", 31))
            .unwrap();

        let users = handler.list_users().unwrap();
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn test_clones_share_the_store() {
        let handler = UserHandler::new();
        let other = handler.clone();
        let id = handler
            .create_user(UserFields::new("Alice", "alice@example.com", 30))
            .unwrap();

        other.delete_user(id).unwrap();
        assert!(matches!(
            handler.get_user(id),
            Err(RpcError::ServiceError(ServiceError::NotFound(_)))
        ));
    }

    #[test]
    fn test_poisoned_lock_is_internal_error() {
        let handler = UserHandler::new();
        let poisoner = handler.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.service.lock().unwrap();
            panic!("poison the user store lock");
        })
        .join();

        assert!(matches!(
            handler.create_user(UserFields::new("Alice", "alice@example.com", 30)),
            Err(RpcError::InternalError(_))
        ));
    }
}
