use crate::ConsumerError;
use async_trait::async_trait;
use fedsparql_model::Triple;
use std::sync::{Arc, Mutex};

/// The write surface a [`crate::WriteConsumer`] applies triples against.
///
/// This is deliberately narrower than `fedsparql_graph::Graph`: the bound
/// join reads from a graph, the update consumer only ever writes to one, and
/// the two are never required of the same endpoint by this workspace.
#[async_trait]
pub trait WriteTarget: Send + Sync {
    /// Adds `triple` to the target. Idempotent: inserting an already-present
    /// triple is not an error.
    async fn insert(&self, triple: &Triple) -> Result<(), ConsumerError>;

    /// Removes `triple` from the target. Idempotent: deleting an absent
    /// triple is not an error.
    async fn delete(&self, triple: &Triple) -> Result<(), ConsumerError>;
}

/// A small in-memory `WriteTarget` used as a reference target in tests: a
/// flat, deduplicated `Vec<Triple>` behind a mutex.
///
/// Stands in for the real storage layer an UPDATE plan would write through;
/// the consumer only ever depends on the `WriteTarget` trait.
#[derive(Clone, Debug, Default)]
pub struct MemoryWriteTarget {
    triples: Arc<Mutex<Vec<Triple>>>,
}

impl MemoryWriteTarget {
    /// An empty target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the triples currently held by this target.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Triple> {
        self.triples
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl WriteTarget for MemoryWriteTarget {
    async fn insert(&self, triple: &Triple) -> Result<(), ConsumerError> {
        let mut triples = self
            .triples
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if !triples.contains(triple) {
            triples.push(triple.clone());
        }
        Ok(())
    }

    async fn delete(&self, triple: &Triple) -> Result<(), ConsumerError> {
        let mut triples = self
            .triples
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        triples.retain(|existing| existing != triple);
        Ok(())
    }
}
