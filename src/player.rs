//! Playback queue and transport engine.
//!
//! `Player` owns what is currently playing, what comes next and how
//! transitions happen, independent of how tracks are fetched or rendered.
//! The promoted-track set lives behind a pluggable store in
//! `player::promoted`.

mod engine;
mod promoted;
mod queue;
mod types;

pub use engine::*;
pub use promoted::*;
pub use queue::*;
pub use types::*;
