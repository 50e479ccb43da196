use crate::{NamedNodePattern, Term, TermPattern, TriplePattern, Variable};
use indexmap::IndexMap;

/// A finite mapping from variable name to RDF term.
///
/// Iteration order (via [`Bindings::variables`]) is not required to be
/// sorted, only deterministic for a given instance - `IndexMap` gives us that
/// for free by preserving insertion order.
///
/// A `Bindings` never contains two entries for the same variable name: `set`
/// overwrites any previous binding for that variable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    terms: IndexMap<Variable, Term>,
}

impl Bindings {
    /// A fresh, empty set of bindings.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// `true` iff no variables are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Iterates over the bound variable names, in a stable but unspecified order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.terms.keys()
    }

    /// The term bound to `variable`, or `None` if it is unbound here.
    #[must_use]
    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.terms.get(variable)
    }

    /// Returns a new `Bindings` with `variable` additionally bound to `term`.
    ///
    /// This consumes `self` rather than mutating a shared value: callers that
    /// want to keep the original must clone it first.
    #[must_use]
    pub fn set(mut self, variable: Variable, term: Term) -> Self {
        self.terms.insert(variable, term);
        self
    }

    /// Applies this binding to a triple pattern: every variable field that is
    /// bound here is substituted with its term, unbound variables are left
    /// untouched. Never introduces new variables.
    #[must_use]
    pub fn bound(&self, pattern: &TriplePattern) -> TriplePattern {
        TriplePattern {
            subject: self.bound_term_pattern(&pattern.subject),
            predicate: self.bound_named_node_pattern(&pattern.predicate),
            object: self.bound_term_pattern(&pattern.object),
        }
    }

    fn bound_term_pattern(&self, pattern: &TermPattern) -> TermPattern {
        match pattern {
            TermPattern::Variable(variable) => match self.get(variable) {
                Some(Term::NamedNode(named_node)) => TermPattern::NamedNode(named_node.clone()),
                Some(Term::BlankNode(blank_node)) => TermPattern::BlankNode(blank_node.clone()),
                Some(Term::Literal(literal)) => TermPattern::Literal(literal.clone()),
                None => pattern.clone(),
            },
            TermPattern::NamedNode(_) | TermPattern::BlankNode(_) | TermPattern::Literal(_) => {
                pattern.clone()
            }
        }
    }

    fn bound_named_node_pattern(&self, pattern: &NamedNodePattern) -> NamedNodePattern {
        match pattern {
            NamedNodePattern::Variable(variable) => match self.get(variable) {
                Some(Term::NamedNode(named_node)) => NamedNodePattern::NamedNode(named_node.clone()),
                _ => pattern.clone(),
            },
            NamedNodePattern::NamedNode(_) => pattern.clone(),
        }
    }

    /// Pointwise union of two bindings.
    ///
    /// When a variable is bound on both sides, `self`'s term wins - by
    /// construction in the bound join the two sides never disagree, so this
    /// tie-break is only ever observable if that invariant is violated.
    #[must_use]
    pub fn union(&self, other: &Bindings) -> Bindings {
        let mut terms = self.terms.clone();
        for (variable, term) in &other.terms {
            terms.entry(variable.clone()).or_insert_with(|| term.clone());
        }
        Bindings { terms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NamedNode;

    fn nn(iri: &str) -> Term {
        Term::NamedNode(NamedNode::new_unchecked(iri))
    }

    #[test]
    fn empty_has_no_variables() {
        let bindings = Bindings::empty();
        assert!(bindings.is_empty());
        assert_eq!(bindings.variables().count(), 0);
    }

    #[test]
    fn set_overwrites_previous_binding() {
        let s = Variable::new_unchecked("s");
        let bindings = Bindings::empty()
            .set(s.clone(), nn("http://example.com/a"))
            .set(s.clone(), nn("http://example.com/b"));
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.get(&s), Some(&nn("http://example.com/b")));
    }

    #[test]
    fn bound_substitutes_only_bound_variables() {
        let s = Variable::new_unchecked("s");
        let o = Variable::new_unchecked("o");
        let bindings = Bindings::empty().set(s.clone(), nn("http://example.com/alice"));

        let pattern = TriplePattern {
            subject: TermPattern::Variable(s),
            predicate: NamedNodePattern::NamedNode(NamedNode::new_unchecked(
                "http://example.com/knows",
            )),
            object: TermPattern::Variable(o.clone()),
        };
        let bound = bindings.bound(&pattern);
        assert_eq!(
            bound.subject,
            TermPattern::NamedNode(NamedNode::new_unchecked("http://example.com/alice"))
        );
        assert_eq!(bound.object, TermPattern::Variable(o));
    }

    #[test]
    fn union_keeps_left_on_conflict_and_merges_otherwise() {
        let s = Variable::new_unchecked("s");
        let o = Variable::new_unchecked("o");
        let left = Bindings::empty().set(s.clone(), nn("http://example.com/alice"));
        let right = Bindings::empty()
            .set(s.clone(), nn("http://example.com/conflicting"))
            .set(o.clone(), nn("http://example.com/carol"));

        let merged = left.union(&right);
        assert_eq!(merged.get(&s), Some(&nn("http://example.com/alice")));
        assert_eq!(merged.get(&o), Some(&nn("http://example.com/carol")));
    }
}
