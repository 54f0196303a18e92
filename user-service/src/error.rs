// Service error types
// One variant per outcome a store operation can report

use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Messages shown to clients, shared by the store errors and the HTTP layer.
pub mod messages {
    pub const USER_CREATED: &str = "User created successfully";
    pub const USER_UPDATED: &str = "User updated successfully";
    pub const USER_DELETED: &str = "User deleted successfully";
    pub const USER_NOT_FOUND: &str = "User not found";
    pub const INVALID_DATA: &str = "Invalid data: name, email and age are required";
    pub const INVALID_EMAIL: &str = "Invalid email: it must contain '@'";
    pub const INVALID_AGE: &str = "Invalid age: it must be zero or greater";
    pub const ALREADY_CREATED: &str = "A user with this email already exists";
    pub const INTERNAL_ERROR: &str = "Internal server error";
}

/// Errors reported by [`UserService`](crate::services::UserService) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// A required field is missing, null or empty
    #[error("{}", messages::INVALID_DATA)]
    InvalidData,

    #[error("{}", messages::INVALID_EMAIL)]
    InvalidEmail,

    #[error("{}", messages::INVALID_AGE)]
    InvalidAge,

    /// Another live record already uses the email
    #[error("{}", messages::ALREADY_CREATED)]
    AlreadyCreated,

    #[error("{}", messages::USER_NOT_FOUND)]
    NotFound(u64),

    /// Unanticipated failure; the detail is for logs only
    #[error("Internal error: {0}")]
    Internal(String),
}
