use fedsparql_common::ErrorKind;
use std::error::Error as StdError;
use thiserror::Error;

/// An error from a [`crate::Graph`] implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// `eval_bgp`/`eval_union` failed against the remote endpoint.
    #[error("remote graph evaluation failed: {0}")]
    Remote(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl GraphError {
    /// Builds a [`GraphError::Remote`] from any printable error.
    pub fn remote(error: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self::Remote(error.into())
    }

    /// The structural [`ErrorKind`] this error maps onto.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Remote(_) => ErrorKind::Remote,
        }
    }
}
