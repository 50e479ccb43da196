use crate::BoundJoinError;
use fedsparql_common::{GraphOptions, DEFAULT_BIND_JOIN_BUFFER_SIZE};
use fedsparql_graph::Graph;
use fedsparql_model::{find_rewriting_key, revert_bindings, rewrite_pattern, Bgp, Bindings};
use futures::stream::SelectAll;
use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

type BoxedStream<T, E> = Pin<Box<dyn Stream<Item = Result<T, E>> + Send>>;
type BatchStream = BoxedStream<Bindings, BoundJoinError>;
type SourceStream = BoxedStream<Bindings, BoundJoinError>;

/// Wraps any binding stream with a distinct error type into the operator's
/// error type, tagging failures as [`BoundJoinError::Source`].
///
/// Use this to feed an upstream producer (a parser, a previous operator, a
/// channel) into [`BoundJoin::evaluate`].
pub fn source_stream<S, E>(inner: S) -> impl Stream<Item = Result<Bindings, BoundJoinError>> + Send
where
    S: Stream<Item = Result<Bindings, E>> + Send,
    E: StdError + Send + Sync + 'static,
{
    inner.map(|item| item.map_err(|error| BoundJoinError::Source(Box::new(error))))
}

/// The bound-join operator: batches inputs, rewrites and dispatches one
/// union-of-BGPs request per batch against a [`Graph`], then demultiplexes
/// the results back onto the input binding that produced them.
pub struct BoundJoin<G> {
    graph: Arc<G>,
    bgp: Bgp,
    options: GraphOptions,
    buffer_size: usize,
    max_in_flight_batches: Option<usize>,
}

impl<G> BoundJoin<G>
where
    G: Graph + 'static,
{
    /// Builds an operator over `bgp`, evaluated against `graph`.
    #[must_use]
    pub fn new(graph: Arc<G>, bgp: Bgp) -> Self {
        Self {
            graph,
            bgp,
            options: GraphOptions::new(),
            buffer_size: DEFAULT_BIND_JOIN_BUFFER_SIZE,
            max_in_flight_batches: None,
        }
    }

    /// Sets the options passed through to every `evalBGP`/`evalUnion` call.
    #[must_use]
    pub fn with_options(mut self, options: GraphOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the number of inputs accumulated into one dispatched batch.
    ///
    /// Also governs the range of rewriting keys searched for on the way
    /// back, since the two are the same constant by construction.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Caps the number of batches this operator will have in flight at once.
    ///
    /// Once the cap is reached the operator stops pulling the input stream
    /// until an in-flight batch completes, providing simple back-pressure.
    /// `None` (the default) means unbounded.
    #[must_use]
    pub fn with_max_in_flight_batches(mut self, max_in_flight_batches: usize) -> Self {
        self.max_in_flight_batches = Some(max_in_flight_batches);
        self
    }

    /// Evaluates this operator over `source`, returning the output stream.
    pub fn evaluate<S>(self, source: S) -> BoundJoinStream<G>
    where
        S: Stream<Item = Result<Bindings, BoundJoinError>> + Send + 'static,
    {
        BoundJoinStream {
            source: Some(Box::pin(source)),
            active: SelectAll::new(),
            buffer: Vec::with_capacity(self.buffer_size),
            graph: self.graph,
            bgp: self.bgp,
            options: self.options,
            buffer_size: self.buffer_size,
            max_in_flight_batches: self.max_in_flight_batches,
            state: State::Streaming,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Streaming,
    Draining,
    Complete,
    Failed,
}

/// The output stream of a [`BoundJoin`] operator.
///
/// Dropping this value before it completes is the operator's cancellation
/// path: the input stream and every in-flight batch are dropped with it, and
/// no further output or error is produced.
pub struct BoundJoinStream<G> {
    source: Option<SourceStream>,
    active: SelectAll<BatchStream>,
    buffer: Vec<Bindings>,
    graph: Arc<G>,
    bgp: Bgp,
    options: GraphOptions,
    buffer_size: usize,
    max_in_flight_batches: Option<usize>,
    state: State,
}

impl<G> BoundJoinStream<G>
where
    G: Graph + 'static,
{
    fn may_pull_source(&self) -> bool {
        self.state == State::Streaming
            && self
                .max_in_flight_batches
                .map_or(true, |cap| self.active.len() < cap)
    }

    fn fail(&mut self) {
        self.state = State::Failed;
        self.source = None;
        self.active.clear();
    }

    /// Dispatches the currently buffered inputs as one batch and clears the
    /// buffer, pushing the resulting stream into the active set.
    fn dispatch_bucket(&mut self) {
        let bucket = std::mem::take(&mut self.buffer);
        tracing::trace!(bucket_size = bucket.len(), "dispatching bound-join batch");

        let stream = if bucket.len() == 1 && bucket[0].is_empty() {
            map_graph_errors(self.graph.eval_bgp(&self.bgp, &self.options))
        } else {
            let mut rewriting_table = HashMap::with_capacity(bucket.len());
            let mut union_bucket = Vec::with_capacity(bucket.len());
            for (key, input) in bucket.into_iter().enumerate() {
                let rewritten: Bgp = self
                    .bgp
                    .iter()
                    .map(|pattern| rewrite_pattern(&input.bound(pattern), key))
                    .collect();
                union_bucket.push(rewritten);
                rewriting_table.insert(key, input);
            }

            let inner = self.graph.eval_union(&union_bucket, &self.options);
            demultiplex(inner, rewriting_table, self.buffer_size)
        };

        self.active.push(stream);
    }

    #[allow(clippy::expect_used, reason = "may_pull_source only returns true while Streaming, which requires source")]
    fn poll_inner(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<Bindings, BoundJoinError>>> {
        loop {
            match self.state {
                State::Complete | State::Failed => return Poll::Ready(None),
                State::Draining if self.active.is_empty() => {
                    self.state = State::Complete;
                    return Poll::Ready(None);
                }
                _ => {}
            }

            let mut made_progress = false;

            if !self.active.is_empty() {
                match self.active.poll_next_unpin(cx) {
                    Poll::Ready(Some(Ok(bindings))) => return Poll::Ready(Some(Ok(bindings))),
                    Poll::Ready(Some(Err(error))) => {
                        tracing::warn!(%error, "bound-join batch failed");
                        self.fail();
                        return Poll::Ready(Some(Err(error)));
                    }
                    Poll::Ready(None) => made_progress = true,
                    Poll::Pending => {}
                }
            }

            if self.may_pull_source() {
                match self
                    .source
                    .as_mut()
                    .expect("source present while Streaming")
                    .poll_next_unpin(cx)
                {
                    Poll::Ready(Some(Ok(bindings))) => {
                        self.buffer.push(bindings);
                        if self.buffer.len() >= self.buffer_size {
                            self.dispatch_bucket();
                        }
                        made_progress = true;
                    }
                    Poll::Ready(Some(Err(error))) => {
                        tracing::warn!(%error, "bound-join input stream failed");
                        self.fail();
                        return Poll::Ready(Some(Err(error)));
                    }
                    Poll::Ready(None) => {
                        if !self.buffer.is_empty() {
                            self.dispatch_bucket();
                        }
                        self.source = None;
                        self.state = State::Draining;
                        made_progress = true;
                    }
                    Poll::Pending => {}
                }
            }

            if !made_progress {
                return Poll::Pending;
            }
        }
    }
}

impl<G> Stream for BoundJoinStream<G>
where
    G: Graph + 'static,
{
    type Item = Result<Bindings, BoundJoinError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_inner(cx)
    }
}

fn map_graph_errors(inner: fedsparql_graph::BindingStream) -> BatchStream {
    Box::pin(inner.map(|item| item.map_err(|error| BoundJoinError::Remote(Box::new(error)))))
}

/// Reverts the rewriting suffix on every output of a dispatched batch and
/// merges it back onto the originating input, per the rewriting table built
/// when the batch was dispatched.
fn demultiplex(
    inner: fedsparql_graph::BindingStream,
    rewriting_table: HashMap<usize, Bindings>,
    buffer_size: usize,
) -> BatchStream {
    let rewriting_table = Arc::new(rewriting_table);
    Box::pin(inner.map(move |item| {
        let rewriting_table = Arc::clone(&rewriting_table);
        item.map(move |output| {
            let key = find_rewriting_key(&output, buffer_size);
            let reverted = match key {
                Some(key) => revert_bindings(&output, key),
                None => output,
            };
            match key.and_then(|key| rewriting_table.get(&key)) {
                Some(original) => reverted.union(original),
                None => reverted,
            }
        })
        .map_err(|error| BoundJoinError::Remote(Box::new(error)))
    }))
}
