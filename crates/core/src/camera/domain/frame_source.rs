use std::path::PathBuf;

use thiserror::Error;

use crate::shared::frame::{Frame, FrameError};

/// Error type crossing the session worker thread.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum FrameSourceError {
    #[error("frame source has no frames")]
    Empty,
    #[error("frame source polled before start")]
    NotStarted,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Result of asking a source for its latest frame.
#[derive(Debug)]
pub enum FramePoll {
    Ready(Frame),
    /// No frame available yet; the tick is skipped.
    Pending,
    /// The source is exhausted or its producer went away.
    Ended,
}

/// The camera stream as seen by a session.
///
/// Implementations own whatever device or file handles they need; the
/// session only starts, polls and stops them.
pub trait FrameSource: Send {
    /// Acquires the stream. Failure here is what the UI reports as denied
    /// camera access.
    fn start(&mut self) -> Result<(), SourceError>;

    /// Returns the most recent frame, if any.
    fn poll(&mut self) -> Result<FramePoll, SourceError>;

    /// Releases the stream. Must be idempotent.
    fn stop(&mut self);
}
