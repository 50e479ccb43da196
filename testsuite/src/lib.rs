//! Shared fixtures for the black-box scenario tests in `tests/`.
//!
//! These exercise the bound-join operator and the update consumer
//! end-to-end against [`MemoryGraph`], a real in-memory store, rather than
//! mocking the graph layer.

use fedsparql_graph::MemoryGraph;
use fedsparql_model::{NamedNode, NamedNodePattern, TermPattern, Triple, TriplePattern, Variable};

/// A `NamedNode` from a short local name, e.g. `nn("alice")`.
#[must_use]
pub fn nn(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{name}"))
}

/// A ground triple from three short local names.
#[must_use]
pub fn triple(s: &str, p: &str, o: &str) -> Triple {
    Triple::new(nn(s), nn(p), nn(o))
}

/// A single-pattern BGP `{ ?subject_var <predicate> ?object_var }` over
/// short local names.
#[must_use]
pub fn knows_pattern(subject_var: &str, predicate: &str, object_var: &str) -> TriplePattern {
    TriplePattern {
        subject: TermPattern::Variable(Variable::new_unchecked(subject_var)),
        predicate: NamedNodePattern::NamedNode(nn(predicate)),
        object: TermPattern::Variable(Variable::new_unchecked(object_var)),
    }
}

/// A social-graph fixture: `alice`/`bob`/.. each `knows` one other person.
#[must_use]
pub fn knows_graph(edges: &[(&str, &str)]) -> MemoryGraph {
    MemoryGraph::new(
        edges
            .iter()
            .map(|(from, to)| triple(from, "knows", to))
            .collect(),
    )
}
