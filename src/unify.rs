//! Syntactic unification over term-equality constraints.

use crate::subst::Binding;
use crate::term::Term;
use smallvec::SmallVec;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered pair of terms whose equality unification must establish.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constraint {
    /// Left-hand term.
    pub left: Term,
    /// Right-hand term.
    pub right: Term,
}

impl Constraint {
    /// Build a constraint.
    #[must_use]
    pub fn new(left: Term, right: Term) -> Self {
        Constraint { left, right }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.left, self.right)
    }
}

type Worklist = SmallVec<[Constraint; 8]>;

/// Resolve a list of term-equality constraints into an ordered binding
/// list, or `None` on clash.
///
/// Failure is an expected outcome that prunes one search branch; it is
/// never surfaced as an error. No occurs-check is performed: binding a
/// variable to a term containing itself is not rejected.
#[must_use]
pub fn unify(constraints: Vec<Constraint>) -> Option<Vec<Binding>> {
    solve(constraints.into_iter().collect())
}

fn solve(mut worklist: Worklist) -> Option<Vec<Binding>> {
    if worklist.is_empty() {
        return Some(Vec::new());
    }
    let Constraint { left, right } = worklist.remove(0);

    // Identity-equal sides carry no information.
    if left == right {
        return solve(worklist);
    }

    match (left, right) {
        (Term::Variable(var), term) | (term, Term::Variable(var)) => {
            let binding = Binding::new(var, term);
            // Rewrite both sides of every remaining constraint so later
            // steps see a consistent, partially solved system.
            for constraint in &mut worklist {
                constraint.left = binding.apply(&constraint.left);
                constraint.right = binding.apply(&constraint.right);
            }
            let mut bindings = solve(worklist)?;
            bindings.insert(0, binding);
            Some(bindings)
        }
        // A constant unifies only with an identical constant or a variable,
        // both already handled.
        (Term::Constant(_), _) | (_, Term::Constant(_)) => None,
        (Term::Application(f, f_args), Term::Application(g, g_args)) => {
            if f != g || f_args.len() != g_args.len() {
                return None;
            }
            for (i, (l, r)) in f_args.into_iter().zip(g_args).enumerate() {
                worklist.insert(i, Constraint::new(l, r));
            }
            solve(worklist)
        }
    }
}
