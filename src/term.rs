//! First-order terms and atoms.

use crate::symbols::{Constant, Functor, Predicate, Variable};
use indexmap::IndexSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A first-order term: a variable, an interned constant, or a compound
/// application of a functor to ordered arguments. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Term {
    /// A variable that can be bound during unification (e.g. `X`).
    Variable(Variable),
    /// An interned constant (e.g. `z`, `alice`).
    Constant(Constant),
    /// A compound term: functor plus ordered arguments (e.g. `s(z)`).
    Application(Functor, Vec<Term>),
}

impl Term {
    /// The set of variables reachable in this term, deduplicated by
    /// identity, in first-occurrence order.
    #[must_use]
    pub fn variables(&self) -> IndexSet<Variable> {
        let mut out = IndexSet::new();
        self.collect_variables(&mut out);
        out
    }

    /// Whether this term contains no variables.
    #[must_use]
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(_) => true,
            Term::Application(_, args) => args.iter().all(Term::is_ground),
        }
    }

    fn collect_variables(&self, out: &mut IndexSet<Variable>) {
        match self {
            Term::Variable(var) => {
                out.insert(var.clone());
            }
            Term::Constant(_) => {}
            Term::Application(_, args) => {
                for arg in args {
                    arg.collect_variables(out);
                }
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(var) => write!(f, "{var}"),
            Term::Constant(constant) => write!(f, "{constant}"),
            Term::Application(functor, args) => {
                write!(f, "{functor}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A predicate applied to ordered terms (e.g. `add(z, Y, Y)`).
///
/// An atom plays three roles: asserted as a fact, appearing as a rule head
/// or body element, and posed as a query goal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Atom {
    /// The predicate labeling this atom.
    pub predicate: Predicate,
    /// The ordered arguments.
    pub terms: Vec<Term>,
}

impl Atom {
    /// Build an atom from a predicate and arguments.
    #[must_use]
    pub fn new(predicate: Predicate, terms: Vec<Term>) -> Self {
        Atom { predicate, terms }
    }

    /// The set of variables in this atom's arguments, in first-occurrence
    /// order.
    #[must_use]
    pub fn variables(&self) -> IndexSet<Variable> {
        let mut out = IndexSet::new();
        for term in &self.terms {
            term.collect_variables(&mut out);
        }
        out
    }

    /// Whether this atom could resolve against `other`'s clause head:
    /// same predicate identity and same argument count.
    #[must_use]
    pub fn matches(&self, other: &Atom) -> bool {
        self.predicate == other.predicate && self.terms.len() == other.terms.len()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "{}", self.predicate);
        }
        write!(f, "{}(", self.predicate)?;
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{term}")?;
        }
        write!(f, ")")
    }
}
