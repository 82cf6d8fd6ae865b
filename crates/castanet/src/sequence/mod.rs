mod atomic;
mod interface;
#[cfg(feature = "parking-lot")]
mod lock;
#[cfg(test)]
mod tests;

pub use atomic::*;
pub use interface::*;
#[cfg_attr(docsrs, doc(cfg(feature = "parking-lot")))]
#[cfg(feature = "parking-lot")]
pub use lock::*;
