pub mod user;
pub mod commit;
pub mod insights;
pub mod achievement;
pub mod leaderboard;

pub use user::*;
pub use commit::*;
pub use insights::*;
pub use achievement::*;
pub use leaderboard::*;
