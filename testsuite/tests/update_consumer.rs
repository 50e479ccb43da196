//! Scenario-level tests for the UPDATE consumer sink: draining an INSERT
//! plan against a real write target, and the error-only specialization used
//! to surface preparation-time failures.

use fedsparql_testsuite::triple;
use fedsparql_update::{
    Consumer, ConsumerError, FailingConsumer, MemoryWriteTarget, TripleStream, WriteConsumer,
    WriteOperation,
};
use futures::stream;
use std::sync::Arc;

fn ok_source(triples: Vec<fedsparql_model::Triple>) -> TripleStream {
    Box::pin(stream::iter(triples.into_iter().map(Ok)))
}

#[tokio::test]
async fn insert_consumer_resolves_once_with_all_triples_durable() {
    let target = Arc::new(MemoryWriteTarget::new());
    let triples = vec![
        triple("alice", "knows", "bob"),
        triple("alice", "knows", "carol"),
        triple("bob", "knows", "carol"),
    ];

    let mut consumer = WriteConsumer::new(
        ok_source(triples.clone()),
        Arc::clone(&target),
        WriteOperation::Insert,
    );
    consumer.execute().await.unwrap();

    let mut stored = target.snapshot();
    stored.sort_by_key(ToString::to_string);
    let mut expected = triples;
    expected.sort_by_key(ToString::to_string);
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn failing_consumer_surfaces_preparation_error() {
    let mut consumer = FailingConsumer::new("remote endpoint unreachable during planning");
    let error = consumer.execute().await.unwrap_err();
    match error {
        ConsumerError::Preparation(reason) => {
            assert_eq!(reason, "remote endpoint unreachable during planning");
        }
        other => panic!("expected a Preparation error, got {other:?}"),
    }
}

#[tokio::test]
async fn already_terminated_source_resolves_without_blocking() {
    use futures::FutureExt;

    let target = Arc::new(MemoryWriteTarget::new());
    let mut consumer = WriteConsumer::new(ok_source(vec![]), target, WriteOperation::Delete);
    consumer
        .execute()
        .now_or_never()
        .expect("an already-terminated source resolves synchronously")
        .unwrap();
}
