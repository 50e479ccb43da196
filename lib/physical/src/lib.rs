#![doc(test(attr(deny(warnings))))]

//! The bound-join physical operator: for every batch of input
//! [`Bindings`], rewrite the target BGP once per input, dispatch a single
//! union-of-BGPs request to a [`Graph`], then demultiplex and merge the
//! results back onto the input that produced them.
//!
//! [`Bindings`]: fedsparql_model::Bindings
//! [`Graph`]: fedsparql_graph::Graph

mod bound_join;
mod error;

pub use bound_join::{source_stream, BoundJoin, BoundJoinStream};
pub use error::BoundJoinError;

pub use fedsparql_common::DEFAULT_BIND_JOIN_BUFFER_SIZE;
