//! A file-backed stream handed to users one at a time.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::sequence::SequenceTracker;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("path must not be absent")]
    MissingPath,

    #[error("path must not be blank")]
    BlankPath,

    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("stream user {user} failed: {source}")]
    User {
        user: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Consumer of an opened stream.
pub trait StreamUser {
    fn name(&self) -> &str;

    fn use_stream(&mut self, stream: &mut dyn Read) -> io::Result<()>;
}

/// Opens a fresh stream over a file for every user and closes it afterwards.
#[derive(Debug)]
pub struct StreamProvider {
    path: PathBuf,
    tracker: Option<SequenceTracker>,
}

impl StreamProvider {
    pub fn new(path: Option<&str>) -> Result<Self, StreamError> {
        let path = path.ok_or(StreamError::MissingPath)?;
        if path.trim().is_empty() {
            return Err(StreamError::BlankPath);
        }

        let path = PathBuf::from(path);
        if !path.is_file() {
            return Err(StreamError::NotFound { path });
        }
        Ok(Self {
            path,
            tracker: None,
        })
    }

    /// Record `open:<user>` and `close:<user>` events around every use.
    #[must_use]
    pub fn with_tracker(mut self, tracker: SequenceTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file, hand the stream to `user`, and close it.
    pub fn used_by(&self, user: &mut dyn StreamUser) -> Result<(), StreamError> {
        let mut file = File::open(&self.path)?;
        self.record("open", user.name());
        tracing::debug!(path = %self.path.display(), user = user.name(), "stream opened");

        let result = user.use_stream(&mut file);
        drop(file);
        self.record("close", user.name());

        result.map_err(|source| StreamError::User {
            user: user.name().to_string(),
            source,
        })
    }

    /// Hand a fresh stream to each user in order, stopping at the first failure.
    pub fn used_by_all(&self, users: &mut [&mut dyn StreamUser]) -> Result<(), StreamError> {
        for user in users.iter_mut() {
            self.used_by(&mut **user)?;
        }
        Ok(())
    }

    fn record(&self, event: &str, user: &str) {
        if let Some(tracker) = &self.tracker {
            tracker.record(format!("{event}:{user}"));
        }
    }
}

/// A [`StreamUser`] that reads the whole stream and compares it against the
/// expected content, recording its turn in a [`SequenceTracker`].
#[derive(Debug)]
pub struct StreamVerifier {
    name: String,
    expected: Vec<u8>,
    tracker: SequenceTracker,
    step: Option<usize>,
}

impl StreamVerifier {
    pub fn new(name: impl Into<String>, expected: impl Into<Vec<u8>>, tracker: SequenceTracker) -> Self {
        Self {
            name: name.into(),
            expected: expected.into(),
            tracker,
            step: None,
        }
    }

    /// Step at which this verifier consumed its stream.
    pub fn step(&self) -> Option<usize> {
        self.step
    }
}

impl StreamUser for StreamVerifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn use_stream(&mut self, stream: &mut dyn Read) -> io::Result<()> {
        let mut content = Vec::new();
        stream.read_to_end(&mut content)?;
        self.step = Some(self.tracker.record(format!("use:{}", self.name)));

        if content != self.expected {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "expected {} bytes of content, read {}",
                    self.expected.len(),
                    content.len()
                ),
            ));
        }
        Ok(())
    }
}
