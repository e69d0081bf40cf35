//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive the player (archive
//! location, playback defaults, audio timing) and helpers to load them
//! from disk and environment.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
