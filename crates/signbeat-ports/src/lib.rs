pub mod audio;
pub mod capture;
pub mod leaderboard;
pub mod recognition;
pub mod storage;
pub mod types;

pub use audio::*;
pub use capture::*;
pub use leaderboard::*;
pub use recognition::*;
pub use storage::*;
pub use types::*;
