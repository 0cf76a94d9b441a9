pub mod achievements;
pub mod errors;
pub mod leaderboard;
pub mod passages;
pub mod stats;

// Re-export main components
pub use achievements::*;
pub use errors::*;
pub use leaderboard::*;
pub use passages::*;
pub use stats::*;
