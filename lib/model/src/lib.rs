#![doc(test(attr(deny(warnings))))]

//! RDF term types and the [`Bindings`] value type shared by the bound-join
//! operator, the graph interface, and the update consumer sink.
//!
//! Large portions of the available types are re-exported from
//! [Oxigraph](https://github.com/oxigraph/oxigraph)'s data model crates
//! (`oxrdf`, `spargebra`) rather than redefined here.

mod bindings;
mod rewriting;

pub use bindings::Bindings;
pub use rewriting::{find_rewriting_key, revert_bindings, rewrite_pattern, rewrite_variable};

// Re-export the RDF term and triple-pattern types we build on.
pub use oxiri::Iri;
pub use oxrdf::{
    BlankNode, BlankNodeRef, Literal, LiteralRef, NamedNode, NamedNodeRef, NamedOrBlankNode,
    NamedOrBlankNodeRef, Term, TermRef, Triple, TripleRef, Variable, VariableRef,
};
pub use spargebra::term::{GroundTerm, NamedNodePattern, TermPattern, TriplePattern};

/// A Basic Graph Pattern: an ordered sequence of triple patterns.
///
/// Order is not semantically significant (BGP matching has set semantics) but
/// is preserved so that rewriting a bucket of inputs against the same `Bgp`
/// yields a stable, comparable sequence of rewritten patterns per input.
pub type Bgp = Vec<TriplePattern>;
