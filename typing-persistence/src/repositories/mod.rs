pub mod error_log_repository;
pub mod user_repository;

pub use error_log_repository::ErrorLogRepository;
pub use user_repository::{UserMutation, UserRepository};
