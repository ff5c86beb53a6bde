pub mod broker;
pub mod response;

pub use broker::*;
pub use response::*;
