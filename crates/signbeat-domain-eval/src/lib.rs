pub mod board;
pub mod grade;
pub mod scheduler;

pub use board::*;
pub use grade::*;
pub use scheduler::*;
