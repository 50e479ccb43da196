#![doc(test(attr(deny(warnings))))]

//! The UPDATE-side `Consumer` sink: drives a lazy sequence of triples
//! produced by an INSERT/DELETE plan to completion against a
//! [`WriteTarget`], resolving a single completion signal or rejecting on the
//! first write failure.
//!
//! Shares its back-pressure discipline with the bound-join operator in
//! `fedsparql-physical`: a stream-of-items-with-terminal-promise contract,
//! just on triples rather than bindings, and writing rather than reading.

mod consumer;
mod error;
mod target;

pub use consumer::{source_stream, Consumer, FailingConsumer, TripleStream, WriteConsumer, WriteOperation};
pub use error::ConsumerError;
pub use target::{MemoryWriteTarget, WriteTarget};
