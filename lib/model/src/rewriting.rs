use crate::{Bindings, NamedNodePattern, TermPattern, TriplePattern, Variable};

/// Appends the bound-join rewriting suffix `"_<key>"` to a variable's name.
///
/// Variable names are not expected to contain this suffix before rewriting;
/// see [`find_rewriting_key`] and [`revert_bindings`] for the caveats that
/// apply if they do.
#[must_use]
pub fn rewrite_variable(variable: &Variable, key: usize) -> Variable {
    Variable::new_unchecked(format!("{}_{key}", variable.as_str()))
}

/// Renames every variable field of `pattern` by appending `"_<key>"`,
/// leaving constant fields untouched.
#[must_use]
pub fn rewrite_pattern(pattern: &TriplePattern, key: usize) -> TriplePattern {
    TriplePattern {
        subject: rewrite_term_pattern(&pattern.subject, key),
        predicate: rewrite_named_node_pattern(&pattern.predicate, key),
        object: rewrite_term_pattern(&pattern.object, key),
    }
}

fn rewrite_term_pattern(pattern: &TermPattern, key: usize) -> TermPattern {
    match pattern {
        TermPattern::Variable(variable) => TermPattern::Variable(rewrite_variable(variable, key)),
        TermPattern::NamedNode(_) | TermPattern::BlankNode(_) | TermPattern::Literal(_) => {
            pattern.clone()
        }
    }
}

fn rewrite_named_node_pattern(pattern: &NamedNodePattern, key: usize) -> NamedNodePattern {
    match pattern {
        NamedNodePattern::Variable(variable) => {
            NamedNodePattern::Variable(rewrite_variable(variable, key))
        }
        NamedNodePattern::NamedNode(_) => pattern.clone(),
    }
}

/// Finds the rewriting key encoded in a demultiplexed output's variable
/// names: the first (in iteration order) bound variable whose name ends with
/// `"_j"` for some `j` in `0..buffer_size` determines the key.
///
/// Returns `None` if no bound variable carries a recognizable suffix - this
/// is the fast-path / no-variables-rewritten case, not an error.
#[must_use]
pub fn find_rewriting_key(bindings: &Bindings, buffer_size: usize) -> Option<usize> {
    bindings.variables().find_map(|variable| {
        (0..buffer_size).find(|key| variable.as_str().ends_with(&format!("_{key}")))
    })
}

/// Reverts the bound-join rewriting for a given `key`: every variable whose
/// name contains `"_<key>"` has that suffix (and everything after it)
/// stripped; variables without it pass through unchanged.
///
/// Intentionally uses the *first* occurrence of `"_<key>"` in the name, not
/// the last - this matches the bound-join wire convention's own latent
/// ambiguity (a variable that legitimately contains `"_<key>"` before its
/// real suffix reverts incorrectly) and must not be "fixed" here, since the
/// remote side relies on the same rule to round-trip names it did not rewrite.
#[must_use]
#[allow(clippy::expect_used, reason = "variable is drawn from bindings.variables(), so get() cannot miss")]
pub fn revert_bindings(bindings: &Bindings, key: usize) -> Bindings {
    let suffix = format!("_{key}");
    let mut result = Bindings::empty();
    for variable in bindings.variables() {
        let term = bindings
            .get(variable)
            .expect("variable came from bindings.variables()")
            .clone();
        let reverted_name = match variable.as_str().find(&suffix) {
            Some(index) => &variable.as_str()[..index],
            None => variable.as_str(),
        };
        result = result.set(Variable::new_unchecked(reverted_name), term);
    }
    result
}
