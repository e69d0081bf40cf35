//! Utilities for creating `rodio` sinks from archive audio files.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

/// Failure to open or decode an audio source. Callers log and carry on;
/// a catalog entry pointing at a broken file must not take the player down.
#[derive(Debug, Error)]
pub(super) enum SinkError {
    #[error("open: {0}")]
    Open(#[from] std::io::Error),
    #[error("decode: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Create a paused `Sink` for the file at `path` that starts at `start_at`.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<Sink, SinkError> {
    let file = File::open(path)?;

    let source = Decoder::new(BufReader::new(file))?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
