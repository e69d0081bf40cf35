//! Queue-building helpers.
//!
//! Queues are plain ordered lists of track ids; the catalog produces the
//! ordered variants, this module the randomized one.

use rand::seq::SliceRandom;

/// Return `ids` in a random order.
pub fn shuffled(mut ids: Vec<String>) -> Vec<String> {
    ids.shuffle(&mut rand::rng());
    ids
}
