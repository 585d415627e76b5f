//! # Hornlog
//!
//! A minimal Horn-clause logic engine in Rust, in the spirit of a small
//! Prolog: facts and rules over first-order terms, queried by syntactic
//! unification and breadth-first resolution, with answers pulled one at a
//! time.
//!
//! ## Features
//!
//! - Identity-based terms: constants, functors and predicates are interned
//!   through a [`SymbolTable`]; variables are unique per mint
//! - Unification without occurs-check, clause standardizing-apart
//! - Resumable breadth-first search yielding ground answers on demand
//! - Optional Prolog-style text syntax behind the `parsing` feature
//!
//! ## Example
//!
//! ```rust
//! use hornlog::{Atom, Engine, SymbolTable, Term, Variable};
//!
//! let mut symbols = SymbolTable::new();
//! let parent = symbols.predicate("parent");
//! let tom = Term::Constant(symbols.constant("tom"));
//! let bob = Term::Constant(symbols.constant("bob"));
//!
//! let mut engine = Engine::new();
//! engine.add_fact(Atom::new(parent.clone(), vec![tom.clone(), bob.clone()]));
//!
//! let who = Variable::fresh("Who");
//! let mut answers = engine.solve(vec![Atom::new(
//!     parent,
//!     vec![tom, Term::Variable(who.clone())],
//! )]);
//! let answer = answers.next().unwrap();
//! assert_eq!(answer.get(&who), Some(&bob));
//! ```

/// Clause store and standardizing-apart.
pub mod engine;
/// Interned symbols and variables.
pub mod symbols;
/// Variable bindings and ordered substitution.
pub mod subst;
/// First-order terms and atoms.
pub mod term;
/// Unification of term-equality constraints.
pub mod unify;

/// Breadth-first resolution and the pull-based answer sequence.
pub mod solve;

/// Prolog-style clause and query text syntax.
#[cfg(feature = "parsing")]
pub mod parse;

pub use engine::{Engine, Rule};
pub use solve::{Solution, Solver};
pub use subst::{apply_all, Binding};
pub use symbols::{Constant, Functor, Predicate, SymbolTable, Variable};
pub use term::{Atom, Term};
pub use unify::{unify, Constraint};

#[cfg(feature = "parsing")]
pub use parse::{parse_program, parse_query, ParseError};
