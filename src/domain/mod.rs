pub mod payload;
pub mod pricing;
pub mod series;
pub mod site;

pub use payload::*;
pub use pricing::*;
pub use series::*;
pub use site::*;
