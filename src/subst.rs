//! Variable bindings and their ordered application.
//!
//! A binding list is applied by folding each binding, in list order, over a
//! term: later bindings act on the output of earlier ones. This is
//! sequential composition, not simultaneous substitution and not a
//! fixpoint, and the resolution engine depends on that exact behavior when
//! it concatenates binding lists along a derivation.

use crate::symbols::Variable;
use crate::term::Term;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One variable-to-term binding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binding {
    /// The bound variable.
    pub var: Variable,
    /// The term it is bound to.
    pub term: Term,
}

impl Binding {
    /// Build a binding.
    #[must_use]
    pub fn new(var: Variable, term: Term) -> Self {
        Binding { var, term }
    }

    /// Apply this single binding to a term.
    ///
    /// Replaces every occurrence (by identity) of the bound variable;
    /// constants and other variables are returned unchanged, applications
    /// are rebuilt with each argument substituted recursively. Applying to
    /// a ground term is a no-op.
    #[must_use]
    pub fn apply(&self, term: &Term) -> Term {
        match term {
            Term::Variable(var) => {
                if *var == self.var {
                    self.term.clone()
                } else {
                    term.clone()
                }
            }
            Term::Constant(_) => term.clone(),
            Term::Application(functor, args) => Term::Application(
                functor.clone(),
                args.iter().map(|arg| self.apply(arg)).collect(),
            ),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.var, self.term)
    }
}

/// Apply a binding list to a term by an ordered left-fold.
#[must_use]
pub fn apply_all(term: &Term, bindings: &[Binding]) -> Term {
    bindings
        .iter()
        .fold(term.clone(), |acc, binding| binding.apply(&acc))
}
