pub mod user_handler;

pub use user_handler::UserHandler;
