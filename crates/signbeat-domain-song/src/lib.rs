pub mod catalog;
pub mod model;
pub mod timeline;

pub use catalog::*;
pub use model::*;
pub use timeline::*;
