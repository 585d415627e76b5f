//! Breadth-first resolution over partial-proof states.
//!
//! A query is a FIFO queue of `(goals, bindings)` states. Each pull resumes
//! the queue exactly where the previous pull stopped, expands states until
//! one yields a fully ground answer, and returns it; an empty queue is a
//! stable exhaustion signal. One pull may take unbounded time on an
//! infinite search space; callers wanting bounded latency must impose
//! their own budget and cancel by dropping the solver.

use crate::engine::Engine;
use crate::subst::{apply_all, Binding};
use crate::symbols::Variable;
use crate::term::{Atom, Term};
use crate::unify::{unify, Constraint};
use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use std::collections::VecDeque;
use std::fmt;

/// One branch of the derivation tree: the goals still to prove and the
/// bindings accumulated so far, in derivation order.
#[derive(Debug, Clone)]
struct SearchState {
    goals: Vec<Atom>,
    bindings: Vec<Binding>,
}

/// A ground answer: every query variable mapped to a variable-free term,
/// in first-occurrence order of the original goal list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    bindings: IndexMap<Variable, Term>,
}

impl Solution {
    /// The ground term bound to a query variable, if it is one.
    #[must_use]
    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// All query-variable bindings, in first-occurrence order.
    #[must_use]
    pub fn bindings(&self) -> &IndexMap<Variable, Term> {
        &self.bindings
    }

    /// Number of query variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the query had no variables at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return write!(f, "true");
        }
        for (i, (var, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var} -> {term}")?;
        }
        Ok(())
    }
}

/// A resumable query over one [`Engine`].
///
/// `next_solution` (also available through [`Iterator`]) returns the next
/// ground answer, or `None` once the search space is exhausted. Each solver
/// owns its queue: independent queries never share state, and dropping a
/// solver cancels its search.
#[derive(Debug)]
pub struct Solver<'a> {
    engine: &'a Engine,
    query_vars: IndexSet<Variable>,
    queue: VecDeque<SearchState>,
}

impl<'a> Solver<'a> {
    pub(crate) fn new(engine: &'a Engine, goals: Vec<Atom>) -> Self {
        // The query variables are fixed once, from the original goal list.
        let mut query_vars = IndexSet::new();
        for goal in &goals {
            query_vars.extend(goal.variables());
        }
        let mut queue = VecDeque::new();
        queue.push_back(SearchState {
            goals,
            bindings: Vec::new(),
        });
        Solver {
            engine,
            query_vars,
            queue,
        }
    }

    /// Pull the next ground answer, resuming from wherever the previous
    /// pull left the queue. Returns `None` on exhaustion, and keeps
    /// returning `None` thereafter.
    pub fn next_solution(&mut self) -> Option<Solution> {
        let engine = self.engine;
        while let Some(state) = self.queue.pop_front() {
            trace!(
                "expanding state: {} goals, {} bindings, {} queued",
                state.goals.len(),
                state.bindings.len(),
                self.queue.len()
            );

            let Some((goal, deferred)) = state.goals.split_first() else {
                // Candidate solution: accept only if every query variable
                // came out ground, otherwise drop the branch silently.
                if let Some(solution) = self.ground_answer(&state.bindings) {
                    debug!("answer: {solution}");
                    return Some(solution);
                }
                trace!("discarding goal-complete but non-ground candidate");
                continue;
            };

            let applied: Vec<Term> = goal
                .terms
                .iter()
                .map(|term| apply_all(term, &state.bindings))
                .collect();

            // Facts first, then rules; within each kind, store order.
            for fact in engine.facts.iter().filter(|fact| fact.matches(goal)) {
                let fresh = fact.renamed();
                let constraints = applied
                    .iter()
                    .cloned()
                    .zip(fresh.terms)
                    .map(|(left, right)| Constraint::new(left, right))
                    .collect();
                if let Some(new_bindings) = unify(constraints) {
                    let mut bindings = state.bindings.clone();
                    bindings.extend(new_bindings);
                    self.queue.push_back(SearchState {
                        goals: deferred.to_vec(),
                        bindings,
                    });
                }
            }

            for rule in engine.rules.iter().filter(|rule| rule.head.matches(goal)) {
                let fresh = rule.renamed();
                let constraints = applied
                    .iter()
                    .cloned()
                    .zip(fresh.head.terms)
                    .map(|(left, right)| Constraint::new(left, right))
                    .collect();
                if let Some(new_bindings) = unify(constraints) {
                    // Body atoms go after the goals already deferred from
                    // this state, not before.
                    let mut goals = deferred.to_vec();
                    goals.extend(fresh.body);
                    let mut bindings = state.bindings.clone();
                    bindings.extend(new_bindings);
                    self.queue.push_back(SearchState { goals, bindings });
                }
            }
        }
        None
    }

    fn ground_answer(&self, bindings: &[Binding]) -> Option<Solution> {
        let mut out = IndexMap::new();
        for var in &self.query_vars {
            let term = apply_all(&Term::Variable(var.clone()), bindings);
            if !term.is_ground() {
                return None;
            }
            out.insert(var.clone(), term);
        }
        Some(Solution { bindings: out })
    }
}

impl Iterator for Solver<'_> {
    type Item = Solution;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_solution()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Rule;
    use crate::symbols::SymbolTable;

    #[test]
    fn absent_predicate_exhausts_on_the_first_pull() {
        let mut symbols = SymbolTable::new();
        let engine = Engine::new();
        let goal = Atom::new(
            symbols.predicate("missing"),
            vec![Term::Variable(Variable::fresh("X"))],
        );

        let mut solver = engine.solve(vec![goal]);
        assert!(solver.next_solution().is_none());
        // Exhaustion is stable.
        assert!(solver.next_solution().is_none());
    }

    #[test]
    fn variable_free_query_yields_one_empty_solution() {
        let mut symbols = SymbolTable::new();
        let p = symbols.predicate("p");
        let a = Term::Constant(symbols.constant("a"));

        let mut engine = Engine::new();
        engine.add_fact(Atom::new(p.clone(), vec![a.clone()]));

        let mut solver = engine.solve(vec![Atom::new(p, vec![a])]);
        let solution = solver.next_solution().expect("fact is provable");
        assert!(solution.is_empty());
        assert_eq!(solution.to_string(), "true");
        assert!(solver.next_solution().is_none());
    }

    #[test]
    fn goal_complete_but_non_ground_candidates_are_discarded() {
        let mut symbols = SymbolTable::new();
        let p = symbols.predicate("p");

        // Store: p(X). A query p(A) empties its goal list but leaves A
        // bound to an unconstrained fresh variable, so no answer is
        // accepted.
        let mut engine = Engine::new();
        engine.add_fact(Atom::new(p.clone(), vec![Term::Variable(Variable::fresh("X"))]));

        let mut solver = engine.solve(vec![Atom::new(
            p,
            vec![Term::Variable(Variable::fresh("A"))],
        )]);
        assert!(solver.next_solution().is_none());
    }

    #[test]
    fn facts_are_tried_before_rules() {
        let mut symbols = SymbolTable::new();
        let p = symbols.predicate("p");
        let q = symbols.predicate("q");
        let a = Term::Constant(symbols.constant("a"));
        let b = Term::Constant(symbols.constant("b"));

        // Store: rule p(b) :- q(b) listed "before" the fact is irrelevant;
        // the fact branch is enqueued first regardless.
        let mut engine = Engine::new();
        engine.add_rule(Rule::new(
            Atom::new(p.clone(), vec![b.clone()]),
            vec![Atom::new(q.clone(), vec![b.clone()])],
        ));
        engine.add_fact(Atom::new(p.clone(), vec![a.clone()]));
        engine.add_fact(Atom::new(q, vec![b.clone()]));

        let x = Variable::fresh("X");
        let answers: Vec<Solution> = engine
            .solve(vec![Atom::new(p, vec![Term::Variable(x.clone())])])
            .collect();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].get(&x), Some(&a));
        assert_eq!(answers[1].get(&x), Some(&b));
    }

    #[test]
    fn store_order_breaks_ties_within_facts() {
        let mut symbols = SymbolTable::new();
        let p = symbols.predicate("p");
        let names: Vec<Term> = ["first", "second", "third"]
            .iter()
            .map(|name| Term::Constant(symbols.constant(name)))
            .collect();

        let mut engine = Engine::new();
        for name in &names {
            engine.add_fact(Atom::new(p.clone(), vec![name.clone()]));
        }

        let x = Variable::fresh("X");
        let answers: Vec<Term> = engine
            .solve(vec![Atom::new(p, vec![Term::Variable(x.clone())])])
            .map(|solution| solution.get(&x).cloned().expect("bound"))
            .collect();
        assert_eq!(answers, names);
    }

    #[test]
    fn arity_mismatch_is_exhaustion_not_an_error() {
        let mut symbols = SymbolTable::new();
        let p = symbols.predicate("p");
        let a = Term::Constant(symbols.constant("a"));

        let mut engine = Engine::new();
        engine.add_fact(Atom::new(p.clone(), vec![a.clone(), a.clone()]));

        let mut solver = engine.solve(vec![Atom::new(p, vec![a])]);
        assert!(solver.next_solution().is_none());
    }
}
