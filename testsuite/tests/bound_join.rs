//! Scenario-level tests for the bound-join operator, run against
//! [`MemoryGraph`] rather than any mock.

use fedsparql_common::{GraphOptions, DEFAULT_BIND_JOIN_BUFFER_SIZE};
use fedsparql_graph::{BindingStream, Graph, GraphError, MemoryGraph};
use fedsparql_model::{Bgp, Bindings, Term, Variable};
use fedsparql_physical::{source_stream, BoundJoin, BoundJoinError};
use fedsparql_testsuite::{knows_graph, knows_pattern, nn, triple};
use futures::{stream, StreamExt};
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn singleton_source(
    bindings: Vec<Bindings>,
) -> impl futures::Stream<Item = Result<Bindings, BoundJoinError>> + Send + 'static {
    stream::iter(bindings.into_iter().map(Ok))
}

#[tokio::test]
async fn empty_binding_seed_uses_the_fast_path() {
    let graph = Arc::new(knows_graph(&[("alice", "carol"), ("bob", "dan")]));
    let bgp: Bgp = vec![knows_pattern("s", "knows", "o")];

    let source = source_stream(stream::iter(vec![Ok::<_, Infallible>(Bindings::empty())]));
    let outputs: Vec<_> = BoundJoin::new(graph, bgp)
        .evaluate(source)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(outputs.len(), 2);
}

#[tokio::test]
async fn two_input_batch_rewrites_demultiplexes_and_merges() {
    let graph = Arc::new(knows_graph(&[("alice", "carol"), ("bob", "dan")]));
    let bgp: Bgp = vec![knows_pattern("s", "knows", "o")];
    let s = Variable::new_unchecked("s");
    let o = Variable::new_unchecked("o");

    let inputs = vec![
        Bindings::empty().set(s.clone(), Term::NamedNode(nn("alice"))),
        Bindings::empty().set(s.clone(), Term::NamedNode(nn("bob"))),
    ];

    let mut outputs = BoundJoin::new(graph, bgp)
        .with_buffer_size(2)
        .evaluate(singleton_source(inputs))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, BoundJoinError>>()
        .unwrap();
    outputs.sort_by_key(|b| b.get(&s).map(ToString::to_string));

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].get(&s), Some(&Term::NamedNode(nn("alice"))));
    assert_eq!(outputs[0].get(&o), Some(&Term::NamedNode(nn("carol"))));
    assert_eq!(outputs[1].get(&s), Some(&Term::NamedNode(nn("bob"))));
    assert_eq!(outputs[1].get(&o), Some(&Term::NamedNode(nn("dan"))));
}

/// A `Graph` that counts `eval_union` calls and records each bucket's size,
/// delegating the actual evaluation to an in-memory graph.
#[derive(Default)]
struct CountingGraph {
    inner: MemoryGraph,
    union_calls: AtomicUsize,
    bucket_sizes: Mutex<Vec<usize>>,
}

impl Graph for CountingGraph {
    fn eval_bgp(&self, bgp: &Bgp, options: &GraphOptions) -> BindingStream {
        self.inner.eval_bgp(bgp, options)
    }

    fn eval_union(&self, bucket: &[Bgp], options: &GraphOptions) -> BindingStream {
        self.union_calls.fetch_add(1, Ordering::SeqCst);
        self.bucket_sizes.lock().unwrap().push(bucket.len());
        self.inner.eval_union(bucket, options)
    }
}

#[tokio::test]
async fn thirty_inputs_dispatch_exactly_two_batches_of_fifteen() {
    let edges: Vec<(String, String)> = (0..30)
        .map(|i| (format!("person{i}"), format!("target{i}")))
        .collect();
    let triples = edges
        .iter()
        .map(|(from, to)| triple(from, "knows", to))
        .collect();
    let graph = Arc::new(CountingGraph {
        inner: MemoryGraph::new(triples),
        ..Default::default()
    });
    let bgp: Bgp = vec![knows_pattern("s", "knows", "o")];
    let s = Variable::new_unchecked("s");

    let inputs: Vec<_> = edges
        .iter()
        .map(|(from, _)| Bindings::empty().set(s.clone(), Term::NamedNode(nn(from))))
        .collect();

    let outputs = BoundJoin::new(Arc::clone(&graph), bgp)
        .evaluate(singleton_source(inputs))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, BoundJoinError>>()
        .unwrap();

    assert_eq!(outputs.len(), 30);
    assert_eq!(graph.union_calls.load(Ordering::SeqCst), 2);
    let mut bucket_sizes = graph.bucket_sizes.lock().unwrap().clone();
    bucket_sizes.sort_unstable();
    assert_eq!(bucket_sizes, vec![15, 15]);
    assert_eq!(DEFAULT_BIND_JOIN_BUFFER_SIZE, 15);
}

/// A `Graph` whose first `eval_union` call succeeds and every later call
/// fails - used to simulate a remote error on a later batch.
struct FlakyOnSecondBatch {
    inner: MemoryGraph,
    calls: AtomicUsize,
}

impl Graph for FlakyOnSecondBatch {
    fn eval_bgp(&self, bgp: &Bgp, options: &GraphOptions) -> BindingStream {
        self.inner.eval_bgp(bgp, options)
    }

    fn eval_union(&self, bucket: &[Bgp], options: &GraphOptions) -> BindingStream {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.inner.eval_union(bucket, options)
        } else {
            Box::pin(stream::iter(vec![Err(GraphError::remote(
                "remote endpoint unreachable",
            ))]))
        }
    }
}

#[tokio::test]
async fn remote_error_on_a_later_batch_is_terminal() {
    let graph = Arc::new(FlakyOnSecondBatch {
        inner: MemoryGraph::new(vec![
            triple("a", "knows", "1"),
            triple("b", "knows", "2"),
            triple("c", "knows", "3"),
        ]),
        calls: AtomicUsize::new(0),
    });
    let bgp: Bgp = vec![knows_pattern("s", "knows", "o")];
    let s = Variable::new_unchecked("s");

    let inputs: Vec<_> = ["a", "b", "c", "x", "y", "z"]
        .into_iter()
        .map(|name| Bindings::empty().set(s.clone(), Term::NamedNode(nn(name))))
        .collect();

    let outputs: Vec<_> = BoundJoin::new(graph, bgp)
        .with_buffer_size(3)
        .evaluate(singleton_source(inputs))
        .collect()
        .await;

    // First batch (a, b, c) succeeds fully; the second batch's error is the
    // single terminal item after it - no third batch exists to dispatch.
    assert_eq!(outputs.len(), 4);
    assert!(outputs[..3].iter().all(Result::is_ok));
    let error = outputs[3].as_ref().unwrap_err();
    assert_eq!(error.kind(), fedsparql_common::ErrorKind::Remote);
}

#[tokio::test]
async fn downstream_cancellation_stops_without_error() {
    let graph = Arc::new(knows_graph(&[
        ("a", "1"),
        ("b", "2"),
        ("c", "3"),
        ("d", "4"),
    ]));
    let bgp: Bgp = vec![knows_pattern("s", "knows", "o")];
    let s = Variable::new_unchecked("s");
    let inputs: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|name| Bindings::empty().set(s.clone(), Term::NamedNode(nn(name))))
        .collect();

    let outputs: Vec<_> = BoundJoin::new(graph, bgp)
        .with_buffer_size(2)
        .evaluate(singleton_source(inputs))
        .take(2)
        .collect()
        .await;

    assert_eq!(outputs.len(), 2);
    assert!(outputs.iter().all(Result::is_ok));
}

#[tokio::test]
async fn empty_source_completes_immediately_with_no_dispatch() {
    let graph = Arc::new(CountingGraph::default());
    let bgp: Bgp = vec![knows_pattern("s", "knows", "o")];

    let outputs: Vec<_> = BoundJoin::new(Arc::clone(&graph), bgp)
        .evaluate(singleton_source(vec![]))
        .collect()
        .await;

    assert!(outputs.is_empty());
    assert_eq!(graph.union_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn bgp_with_no_variables_is_a_rewriting_no_op() {
    use fedsparql_model::{NamedNodePattern, TermPattern, TriplePattern};

    let graph = Arc::new(MemoryGraph::new(vec![triple("alice", "knows", "carol")]));
    // Entirely ground - no variables left for the rewriting to touch.
    let bgp: Bgp = vec![TriplePattern {
        subject: TermPattern::NamedNode(nn("alice")),
        predicate: NamedNodePattern::NamedNode(nn("knows")),
        object: TermPattern::NamedNode(nn("carol")),
    }];
    let s = Variable::new_unchecked("s");

    let inputs = vec![
        Bindings::empty().set(s.clone(), Term::NamedNode(nn("ignored-left"))),
        Bindings::empty().set(s, Term::NamedNode(nn("ignored-right"))),
    ];

    let outputs = BoundJoin::new(graph, bgp)
        .with_buffer_size(2)
        .evaluate(singleton_source(inputs))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, BoundJoinError>>()
        .unwrap();

    // Each of the 2 inputs matches the single ground fact once.
    assert_eq!(outputs.len(), 2);
}
