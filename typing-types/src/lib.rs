pub mod errors;
pub mod leaderboard;
pub mod messages;
pub mod user;

// Re-export all types
pub use errors::*;
pub use leaderboard::*;
pub use messages::*;
pub use user::*;
