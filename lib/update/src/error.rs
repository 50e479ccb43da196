use fedsparql_common::ErrorKind;
use std::error::Error as StdError;
use thiserror::Error;

/// An error surfaced by a [`crate::Consumer`].
///
/// All variants are terminal: once one is produced, `execute()` rejects and
/// no further writes are attempted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConsumerError {
    /// The source triple stream failed before every write could be applied.
    #[error("the source triple stream failed: {0}")]
    Source(#[source] Box<dyn StdError + Send + Sync + 'static>),

    /// A per-triple write (`insert`/`delete`) against the target failed.
    #[error("a write against the target failed: {0}")]
    Write(#[source] Box<dyn StdError + Send + Sync + 'static>),

    /// Surfaced by [`crate::FailingConsumer`] for plans that cannot run.
    #[error("preparation failed: {0}")]
    Preparation(String),
}

impl ConsumerError {
    /// Builds a [`ConsumerError::Write`] from any printable error.
    pub fn write(error: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self::Write(error.into())
    }

    /// The structural [`ErrorKind`] this error maps onto.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Source(_) => ErrorKind::Source,
            Self::Write(_) => ErrorKind::Write,
            Self::Preparation(_) => ErrorKind::Preparation,
        }
    }
}
