//! The clause store: append-only facts and rules, plus standardizing-apart.

use crate::solve::Solver;
use crate::subst::Binding;
use crate::term::{Atom, Term};
use indexmap::IndexSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A Horn clause: the head holds if every body atom holds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    /// The conclusion of the rule.
    pub head: Atom,
    /// The conditions that must all be proven.
    pub body: Vec<Atom>,
}

impl Rule {
    /// Build a rule from its head and body atoms.
    #[must_use]
    pub fn new(head: Atom, body: Vec<Atom>) -> Self {
        Rule { head, body }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        for (i, atom) in self.body.iter().enumerate() {
            write!(f, "{}{atom}", if i == 0 { " :- " } else { ", " })?;
        }
        Ok(())
    }
}

/// Rename every variable in `atoms` to a fresh identity, preserving display
/// names, and rewrite the atoms under the induced renaming.
///
/// All renaming targets are brand-new variables, so folding the bindings in
/// order cannot capture anything.
fn standardize_apart(atoms: &mut [&mut Atom]) {
    let mut originals: IndexSet<_> = IndexSet::new();
    for atom in atoms.iter() {
        originals.extend(atom.variables());
    }
    let renaming: Vec<Binding> = originals
        .into_iter()
        .map(|var| {
            let fresh = var.renamed();
            Binding::new(var, Term::Variable(fresh))
        })
        .collect();
    for atom in atoms {
        for term in &mut atom.terms {
            *term = crate::subst::apply_all(term, &renaming);
        }
    }
}

impl Atom {
    /// A copy of this fact whose variables are all fresh (standardized
    /// apart), with display names preserved.
    #[must_use]
    pub fn renamed(&self) -> Atom {
        let mut fact = self.clone();
        standardize_apart(&mut [&mut fact]);
        fact
    }
}

impl Rule {
    /// A copy of this rule whose variables are all fresh, with head and
    /// body renamed consistently so shared variables stay shared.
    #[must_use]
    pub fn renamed(&self) -> Rule {
        let mut rule = self.clone();
        let mut atoms: Vec<&mut Atom> = Vec::with_capacity(1 + rule.body.len());
        atoms.push(&mut rule.head);
        atoms.extend(rule.body.iter_mut());
        standardize_apart(&mut atoms);
        rule
    }
}

/// The clause store and query entry point.
///
/// Facts and rules are appended in load order and kept read-only during a
/// query; load order is the tie-break order of the search. Mutating the
/// store while a [`Solver`] from it is still being pulled is not supported.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    pub(crate) facts: Vec<Atom>,
    pub(crate) rules: Vec<Rule>,
}

impl Engine {
    /// Create an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from preloaded facts and rules, preserving order.
    #[must_use]
    pub fn with_clauses(facts: Vec<Atom>, rules: Vec<Rule>) -> Self {
        Engine { facts, rules }
    }

    /// Append a fact. Facts may contain variables; they are standardized
    /// apart on every resolution attempt.
    pub fn add_fact(&mut self, fact: Atom) {
        log::debug!("fact[{}]: {fact}", self.facts.len());
        self.facts.push(fact);
    }

    /// Append a rule.
    pub fn add_rule(&mut self, rule: Rule) {
        log::debug!("rule[{}]: {rule}", self.rules.len());
        self.rules.push(rule);
    }

    /// The stored facts, in load order.
    #[must_use]
    pub fn facts(&self) -> &[Atom] {
        &self.facts
    }

    /// The stored rules, in load order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Start a query over an ordered goal list.
    ///
    /// Returns a pull-based [`Solver`] enumerating ground answers one at a
    /// time. Independent queries need independent solvers; abandoning one
    /// solver mid-enumeration does not affect another.
    #[must_use]
    pub fn solve(&self, goals: Vec<Atom>) -> Solver<'_> {
        Solver::new(self, goals)
    }
}
