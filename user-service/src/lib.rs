// User Service Library
// In-memory user store with field validation and email uniqueness

pub mod config;
pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::{IdPolicy, ParseConfigError, StoreConfig, UpdateValidation};
pub use error::{messages, ServiceError, ServiceResult};
pub use models::{User, UserChanges, UserFields};
pub use services::UserService;
