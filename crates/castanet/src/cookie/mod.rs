mod error;
mod interface;

pub use error::*;
pub use interface::*;
