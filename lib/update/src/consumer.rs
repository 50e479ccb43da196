use crate::{ConsumerError, WriteTarget};
use async_trait::async_trait;
use fedsparql_model::Triple;
use futures::future;
use futures::stream::{Stream, StreamExt, TryStreamExt};
use std::error::Error as StdError;
use std::pin::Pin;
use std::sync::Arc;

/// A lazy, possibly-asynchronous sequence of triples, or a single terminal
/// error - the source a [`WriteConsumer`] drains.
pub type TripleStream = Pin<Box<dyn Stream<Item = Result<Triple, ConsumerError>> + Send>>;

/// Wraps any triple stream with a distinct error type into the consumer's
/// error type, tagging failures as [`ConsumerError::Source`].
pub fn source_stream<S, E>(inner: S) -> impl Stream<Item = Result<Triple, ConsumerError>> + Send
where
    S: Stream<Item = Result<Triple, E>> + Send,
    E: StdError + Send + Sync + 'static,
{
    inner.map(|item| item.map_err(|error| ConsumerError::Source(Box::new(error))))
}

/// Which per-triple write operation a [`WriteConsumer`] performs.
///
/// The two specialization points the update plan needs: an INSERT plan
/// drives a `WriteConsumer` with `Insert`, a DELETE plan with `Delete`. Both
/// share the same draining, back-pressure, and error discipline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOperation {
    /// Apply `target.insert(triple)` to every triple of the source.
    Insert,
    /// Apply `target.delete(triple)` to every triple of the source.
    Delete,
}

/// A terminal stream sink: drives an UPDATE plan's triple source to
/// completion, applying each triple to a [`WriteTarget`] via `execute()`.
///
/// # Contract
///
/// If the source has already terminated by the time `execute()` is called,
/// `execute()` resolves as soon as any already-buffered writes drain (there
/// are none to buffer here, so it resolves immediately). Otherwise each
/// triple is applied to the target as it arrives; the first write failure
/// halts further writes and rejects `execute()`.
#[async_trait]
pub trait Consumer: Send {
    /// Drains the source, applying every triple, and resolves once the
    /// source has ended and all writes it produced are durable - or rejects
    /// on the first error. Calling `execute()` more than once panics.
    async fn execute(&mut self) -> Result<(), ConsumerError>;
}

/// The `Consumer` used by INSERT/DELETE plans: drains a [`TripleStream`]
/// against a [`WriteTarget`].
///
/// Back-pressure is governed by `max_concurrent_writes`: `1` (the default)
/// serializes writes one at a time, matching spec's "simple implementation";
/// a higher value permits bounded parallelism while still only resolving
/// once every write has finished.
pub struct WriteConsumer<T> {
    source: Option<TripleStream>,
    target: Arc<T>,
    operation: WriteOperation,
    max_concurrent_writes: usize,
}

impl<T> WriteConsumer<T>
where
    T: WriteTarget + 'static,
{
    /// Builds a consumer that applies `operation` to every triple of
    /// `source` against `target`.
    #[must_use]
    pub fn new(source: TripleStream, target: Arc<T>, operation: WriteOperation) -> Self {
        Self {
            source: Some(source),
            target,
            operation,
            max_concurrent_writes: 1,
        }
    }

    /// Overrides how many writes may be outstanding against the target at
    /// once. Must be at least `1`; `0` is treated as `1`.
    #[must_use]
    pub fn with_max_concurrent_writes(mut self, max_concurrent_writes: usize) -> Self {
        self.max_concurrent_writes = max_concurrent_writes.max(1);
        self
    }
}

#[async_trait]
impl<T> Consumer for WriteConsumer<T>
where
    T: WriteTarget + 'static,
{
    #[allow(clippy::expect_used, reason = "documented single-use contract, violating it is a caller bug")]
    async fn execute(&mut self) -> Result<(), ConsumerError> {
        let source = self
            .source
            .take()
            .expect("WriteConsumer::execute called more than once");
        let target = Arc::clone(&self.target);
        let operation = self.operation;
        let max_concurrent_writes = self.max_concurrent_writes;

        tracing::debug!(
            max_concurrent_writes,
            ?operation,
            "draining update consumer"
        );

        let result = source
            .map(move |item| {
                let target = Arc::clone(&target);
                async move {
                    let triple = item?;
                    match operation {
                        WriteOperation::Insert => target.insert(&triple).await,
                        WriteOperation::Delete => target.delete(&triple).await,
                    }
                }
            })
            .buffer_unordered(max_concurrent_writes)
            .try_for_each(|()| future::ready(Ok(())))
            .await;

        if let Err(ref error) = result {
            tracing::warn!(%error, "update consumer write failed");
        }
        result
    }
}

/// A degenerate `Consumer` that fails unconditionally.
///
/// Used by the planner to surface preparation-time errors (a plan that could
/// not be built, a target that could not be reached) uniformly through the
/// same `Consumer` interface as a real write.
pub struct FailingConsumer {
    reason: String,
}

impl FailingConsumer {
    /// Builds a consumer whose `execute()` always rejects with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Consumer for FailingConsumer {
    async fn execute(&mut self) -> Result<(), ConsumerError> {
        Err(ConsumerError::Preparation(self.reason.clone()))
    }
}
