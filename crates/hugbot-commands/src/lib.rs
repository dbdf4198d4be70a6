//! # HugBot Commands
//!
//! Direct-message handling for HugBot.
//!
//! This crate owns the per-user cooldown gate, the transport-agnostic request
//! handler that decides how to answer each DM, and the Poise framework wiring
//! that feeds Discord events into it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cooldown;
pub mod framework;
pub mod handler;

pub use cooldown::*;
pub use framework::*;
pub use handler::*;
