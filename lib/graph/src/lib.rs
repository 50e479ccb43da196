#![doc(test(attr(deny(warnings))))]

//! The `Graph` interface: the contract the bound-join operator dispatches
//! against. See `fedsparql-physical` for the operator itself.

mod error;
mod memory;

pub use error::GraphError;
pub use memory::MemoryGraph;

use fedsparql_common::GraphOptions;
use fedsparql_model::{Bgp, Bindings};
use futures::Stream;
use std::pin::Pin;

/// A lazy, possibly-asynchronous sequence of solution [`Bindings`], or a
/// single terminal error.
pub type BindingStream = Pin<Box<dyn Stream<Item = Result<Bindings, GraphError>> + Send>>;

/// The remote-graph interface the bound-join operator is built against.
///
/// Implementations are expected to be cheap to clone/share (`Send + Sync`)
/// and are responsible for actually reaching the remote endpoint; the
/// bound-join operator is a pure consumer of this trait.
pub trait Graph: Send + Sync {
    /// Evaluates a single Basic Graph Pattern, returning every solution
    /// mapping for `bgp` against the graph.
    fn eval_bgp(&self, bgp: &Bgp, options: &GraphOptions) -> BindingStream;

    /// Evaluates the disjoint union of `eval_bgp(bgp)` over every `bgp` in
    /// `bucket`, ideally packed into a single remote request.
    ///
    /// Each output `Bindings` carries the variables of whichever `bgp`
    /// produced it, including any bound-join rewriting suffix the caller
    /// applied to that `bgp` - this is how the caller demultiplexes.
    fn eval_union(&self, bucket: &[Bgp], options: &GraphOptions) -> BindingStream;
}
