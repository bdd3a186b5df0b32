pub mod engine;
pub mod error;
pub mod load;
pub mod solar;

pub use engine::*;
pub use error::*;
pub use load::*;
pub use solar::*;
