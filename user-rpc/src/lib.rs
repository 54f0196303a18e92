pub mod api;
pub mod error;
pub mod handlers;
pub mod request;
pub mod response;

pub use api::{router, shutdown_signal, RpcServer, ServerConfig};
pub use error::{RpcError, RpcResult};
pub use handlers::UserHandler;

// Re-export types needed by clients
pub use user_service;
pub use user_service::{IdPolicy, StoreConfig, UpdateValidation, User, UserFields};
