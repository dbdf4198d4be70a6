//! # HugBot
//!
//! Discord bot that forwards hug requests sent by DM to Pushover.
//!
//! This is the main binary crate that wires configuration, the Discord
//! client and the Pushover notifier together and owns the process lifecycle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod error;

pub use bot::*;
pub use error::*;
