use fedsparql_common::ErrorKind;
use std::error::Error as StdError;
use thiserror::Error;

/// An error surfaced by a [`crate::BoundJoinStream`].
///
/// Both variants are terminal: once one is produced, the stream is done and
/// yields no further items. There is no retry at this layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BoundJoinError {
    /// The input binding stream failed before the operator could finish
    /// draining its in-flight batches.
    #[error("the input stream failed: {0}")]
    Source(#[source] Box<dyn StdError + Send + Sync + 'static>),

    /// A dispatched `evalBGP`/`evalUnion` request failed.
    #[error("the remote graph evaluation failed: {0}")]
    Remote(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl BoundJoinError {
    /// The structural [`ErrorKind`] this error maps onto.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Source(_) => ErrorKind::Source,
            Self::Remote(_) => ErrorKind::Remote,
        }
    }
}
