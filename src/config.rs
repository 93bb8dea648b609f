//! Configuration loader and schema types.
//!
//! This module exposes the settings that select the player and search
//! backends and tune the watchdog, plus helpers to load them from disk.

mod load;
mod schema;

pub use schema::*;
