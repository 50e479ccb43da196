use crate::{BindingStream, Graph};
use fedsparql_common::GraphOptions;
use fedsparql_model::{Bgp, Bindings, NamedNode, NamedNodePattern, Term, TermPattern, Triple, TriplePattern, Variable};
use futures::stream;

/// A small in-memory `Graph` used as a reference remote endpoint in tests:
/// a flat `Vec<Triple>` scanned with a naive nested-loop join per BGP.
///
/// This stands in for the real transport (HTTP, gRPC, ...) a production
/// remote graph would use; the bound-join operator only depends on the
/// `Graph` trait, never on this type.
#[derive(Clone, Debug, Default)]
pub struct MemoryGraph {
    triples: Vec<Triple>,
}

impl MemoryGraph {
    /// Builds a graph over the given triples.
    #[must_use]
    pub fn new(triples: Vec<Triple>) -> Self {
        Self { triples }
    }

    fn solve_bgp(&self, bgp: &Bgp) -> Vec<Bindings> {
        let mut solutions = vec![Bindings::empty()];
        for pattern in bgp {
            let mut next = Vec::new();
            for solution in &solutions {
                let bound_pattern = solution.bound(pattern);
                for triple in &self.triples {
                    if let Some(extension) = match_triple(&bound_pattern, triple) {
                        next.push(solution.clone().union(&extension));
                    }
                }
            }
            solutions = next;
        }
        solutions
    }
}

impl Graph for MemoryGraph {
    fn eval_bgp(&self, bgp: &Bgp, _options: &GraphOptions) -> BindingStream {
        let solutions = self.solve_bgp(bgp);
        Box::pin(stream::iter(solutions.into_iter().map(Ok)))
    }

    fn eval_union(&self, bucket: &[Bgp], _options: &GraphOptions) -> BindingStream {
        let solutions = bucket
            .iter()
            .flat_map(|bgp| self.solve_bgp(bgp))
            .map(Ok)
            .collect::<Vec<_>>();
        Box::pin(stream::iter(solutions))
    }
}

fn match_triple(pattern: &TriplePattern, triple: &Triple) -> Option<Bindings> {
    let bindings = Bindings::empty();
    let bindings = match_term_pattern(
        &pattern.subject,
        &Term::from(triple.subject.clone()),
        bindings,
    )?;
    let bindings = match_named_node_pattern(&pattern.predicate, &triple.predicate, bindings)?;
    match_term_pattern(&pattern.object, &triple.object, bindings)
}

fn match_term_pattern(pattern: &TermPattern, value: &Term, bindings: Bindings) -> Option<Bindings> {
    match pattern {
        TermPattern::Variable(variable) => bind_variable(variable, value.clone(), bindings),
        TermPattern::NamedNode(named_node) => {
            (&Term::NamedNode(named_node.clone()) == value).then_some(bindings)
        }
        TermPattern::BlankNode(blank_node) => {
            (&Term::BlankNode(blank_node.clone()) == value).then_some(bindings)
        }
        TermPattern::Literal(literal) => {
            (&Term::Literal(literal.clone()) == value).then_some(bindings)
        }
    }
}

fn match_named_node_pattern(
    pattern: &NamedNodePattern,
    value: &NamedNode,
    bindings: Bindings,
) -> Option<Bindings> {
    match pattern {
        NamedNodePattern::Variable(variable) => {
            bind_variable(variable, Term::NamedNode(value.clone()), bindings)
        }
        NamedNodePattern::NamedNode(named_node) => (named_node == value).then_some(bindings),
    }
}

fn bind_variable(variable: &Variable, value: Term, bindings: Bindings) -> Option<Bindings> {
    match bindings.get(variable) {
        Some(bound) if *bound == value => Some(bindings),
        Some(_) => None,
        None => Some(bindings.set(variable.clone(), value)),
    }
}
