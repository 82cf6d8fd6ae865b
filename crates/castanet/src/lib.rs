#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod context;
mod cookie;
mod error;
mod factory;
mod id;
mod log;
mod sequence;
#[cfg(feature = "serde")]
mod serde;
mod time;
mod tracker;

pub use crate::config::*;
pub use crate::context::*;
pub use crate::cookie::*;
pub use crate::error::*;
pub use crate::factory::*;
pub use crate::id::*;
pub use crate::log::*;
pub use crate::sequence::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
pub use crate::tracker::*;
