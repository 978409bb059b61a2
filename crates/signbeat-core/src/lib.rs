pub mod clock;
pub mod diagnostics;
pub mod ipc;
pub mod pipeline;
pub mod session;

pub use clock::*;
pub use diagnostics::*;
pub use ipc::*;
pub use pipeline::*;
pub use session::*;
