//! Prolog-style text syntax for clauses and queries.
//!
//! Identifiers starting with an uppercase letter or `_` are variables;
//! everything else names a constant, functor or predicate and is interned
//! through the caller's [`SymbolTable`]. Each clause (and each query) is
//! one variable scope: every occurrence of a name within it resolves to
//! the same variable identity, except `_`, which is fresh per occurrence.
//!
//! ```text
//! add(z, Y, Y).
//! add(s(X), Y, s(Z)) :- add(X, Y, Z).
//! ?- add(X, Y, s(s(z))).
//! ```

use crate::engine::Rule;
use crate::symbols::{SymbolTable, Variable};
use crate::term::{Atom, Term};
use indexmap::IndexMap;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace1, not_line_ending, satisfy},
    combinator::{all_consuming, opt, recognize, value},
    multi::{many0, many0_count, separated_list1},
    sequence::{pair, preceded, terminated},
    IResult,
};
use thiserror::Error;

/// Errors from turning text into clauses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input does not match the clause grammar.
    #[error("syntax error near `{0}`")]
    Syntax(String),
    /// A variable name appeared in functor position, e.g. `X(a)`.
    #[error("variable `{0}` cannot be used as a functor")]
    VariableFunctor(String),
    /// A variable name appeared in predicate position, e.g. `X :- p`.
    #[error("variable `{0}` cannot be used as a predicate")]
    VariablePredicate(String),
}

#[derive(Debug, Clone)]
enum RawTerm {
    Name(String),
    Compound(String, Vec<RawTerm>),
}

type RawAtom = (String, Vec<RawTerm>);

#[derive(Debug)]
struct RawClause {
    head: RawAtom,
    body: Option<Vec<RawAtom>>,
}

/// Whitespace and `%` line comments.
fn sp(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0_count(alt((
            value((), multispace1),
            value((), pair(char('%'), not_line_ending)),
        ))),
    )(input)
}

fn ident(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
        many0_count(satisfy(|c: char| c.is_ascii_alphanumeric() || c == '_')),
    ))(input)
}

fn args_list(input: &str) -> IResult<&str, Vec<RawTerm>> {
    let (input, _) = preceded(sp, char('('))(input)?;
    let (input, args) = separated_list1(preceded(sp, char(',')), raw_term)(input)?;
    let (input, _) = preceded(sp, char(')'))(input)?;
    Ok((input, args))
}

fn raw_term(input: &str) -> IResult<&str, RawTerm> {
    let (input, name) = preceded(sp, ident)(input)?;
    let (input, args) = opt(args_list)(input)?;
    let raw = match args {
        Some(args) => RawTerm::Compound(name.to_string(), args),
        None => RawTerm::Name(name.to_string()),
    };
    Ok((input, raw))
}

fn raw_atom(input: &str) -> IResult<&str, RawAtom> {
    let (input, name) = preceded(sp, ident)(input)?;
    let (input, args) = opt(args_list)(input)?;
    Ok((input, (name.to_string(), args.unwrap_or_default())))
}

fn raw_clause(input: &str) -> IResult<&str, RawClause> {
    let (input, head) = raw_atom(input)?;
    let (input, body) = opt(preceded(
        preceded(sp, tag(":-")),
        separated_list1(preceded(sp, char(',')), raw_atom),
    ))(input)?;
    let (input, _) = preceded(sp, char('.'))(input)?;
    Ok((input, RawClause { head, body }))
}

fn raw_program(input: &str) -> IResult<&str, Vec<RawClause>> {
    all_consuming(terminated(many0(raw_clause), sp))(input)
}

fn raw_goals(input: &str) -> IResult<&str, Vec<RawAtom>> {
    let (input, _) = opt(preceded(sp, tag("?-")))(input)?;
    let (input, goals) = separated_list1(preceded(sp, char(',')), raw_atom)(input)?;
    let (input, _) = opt(preceded(sp, char('.')))(input)?;
    Ok((input, goals))
}

fn raw_query(input: &str) -> IResult<&str, Vec<RawAtom>> {
    all_consuming(terminated(raw_goals, sp))(input)
}

fn is_variable_name(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase() || c == '_')
}

fn syntax_error(input: &str, err: nom::Err<nom::error::Error<&str>>) -> ParseError {
    let near = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
        nom::Err::Incomplete(_) => input,
    };
    ParseError::Syntax(near.chars().take(24).collect())
}

/// Per-clause variable scope: one identity per name, `_` always fresh.
type Scope = IndexMap<String, Variable>;

fn resolve_term(
    raw: &RawTerm,
    symbols: &mut SymbolTable,
    scope: &mut Scope,
) -> Result<Term, ParseError> {
    match raw {
        RawTerm::Name(name) if name == "_" => Ok(Term::Variable(Variable::fresh("_"))),
        RawTerm::Name(name) if is_variable_name(name) => {
            let var = scope
                .entry(name.clone())
                .or_insert_with(|| Variable::fresh(name.clone()));
            Ok(Term::Variable(var.clone()))
        }
        RawTerm::Name(name) => Ok(Term::Constant(symbols.constant(name))),
        RawTerm::Compound(name, args) => {
            if is_variable_name(name) {
                return Err(ParseError::VariableFunctor(name.clone()));
            }
            let functor = symbols.functor(name);
            let args = args
                .iter()
                .map(|arg| resolve_term(arg, symbols, scope))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Term::Application(functor, args))
        }
    }
}

fn resolve_atom(
    raw: &RawAtom,
    symbols: &mut SymbolTable,
    scope: &mut Scope,
) -> Result<Atom, ParseError> {
    let (name, args) = raw;
    if is_variable_name(name) {
        return Err(ParseError::VariablePredicate(name.clone()));
    }
    let predicate = symbols.predicate(name);
    let terms = args
        .iter()
        .map(|arg| resolve_term(arg, symbols, scope))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Atom::new(predicate, terms))
}

/// Parse a program: a sequence of facts (`atom.`) and rules
/// (`head :- body, ... .`), returned in source order.
///
/// # Errors
///
/// Returns a [`ParseError`] on malformed syntax or a variable in functor or
/// predicate position.
pub fn parse_program(
    input: &str,
    symbols: &mut SymbolTable,
) -> Result<(Vec<Atom>, Vec<Rule>), ParseError> {
    let (_, clauses) = raw_program(input).map_err(|err| syntax_error(input, err))?;

    let mut facts = Vec::new();
    let mut rules = Vec::new();
    for clause in &clauses {
        let mut scope = Scope::new();
        let head = resolve_atom(&clause.head, symbols, &mut scope)?;
        match &clause.body {
            None => facts.push(head),
            Some(body) => {
                let body = body
                    .iter()
                    .map(|atom| resolve_atom(atom, symbols, &mut scope))
                    .collect::<Result<Vec<_>, _>>()?;
                rules.push(Rule::new(head, body));
            }
        }
    }
    Ok((facts, rules))
}

/// Parse a query: comma-separated goals with an optional `?-` prefix and an
/// optional trailing `.`. The whole query is one variable scope.
///
/// # Errors
///
/// Returns a [`ParseError`] on malformed syntax or a variable in functor or
/// predicate position.
pub fn parse_query(input: &str, symbols: &mut SymbolTable) -> Result<Vec<Atom>, ParseError> {
    let (_, raw_goals) = raw_query(input).map_err(|err| syntax_error(input, err))?;

    let mut scope = Scope::new();
    raw_goals
        .iter()
        .map(|goal| resolve_atom(goal, symbols, &mut scope))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_facts_and_rules_in_order() {
        let mut symbols = SymbolTable::new();
        let source = "
            % Peano addition
            add(z, Y, Y).
            add(s(X), Y, s(Z)) :- add(X, Y, Z).
        ";
        let (facts, rules) = parse_program(source, &mut symbols).expect("valid program");

        assert_eq!(facts.len(), 1);
        assert_eq!(rules.len(), 1);
        assert_eq!(facts[0].to_string(), "add(z, Y, Y)");
        assert_eq!(
            rules[0].to_string(),
            "add(s(X), Y, s(Z)) :- add(X, Y, Z)"
        );
    }

    #[test]
    fn one_scope_per_clause() {
        let mut symbols = SymbolTable::new();
        let (facts, _) =
            parse_program("p(X, X).\nq(X).", &mut symbols).expect("valid program");

        // Within a clause the two X occurrences share one identity.
        assert_eq!(facts[0].terms[0], facts[0].terms[1]);
        // Across clauses they do not.
        assert_ne!(facts[0].terms[0], facts[1].terms[0]);
    }

    #[test]
    fn rule_head_and_body_share_the_clause_scope() {
        let mut symbols = SymbolTable::new();
        let (_, rules) =
            parse_program("p(X) :- q(X), r(X).", &mut symbols).expect("valid program");

        let rule = &rules[0];
        assert_eq!(rule.head.terms[0], rule.body[0].terms[0]);
        assert_eq!(rule.head.terms[0], rule.body[1].terms[0]);
    }

    #[test]
    fn anonymous_variable_is_fresh_per_occurrence() {
        let mut symbols = SymbolTable::new();
        let (facts, _) = parse_program("p(_, _).", &mut symbols).expect("valid program");
        assert_ne!(facts[0].terms[0], facts[0].terms[1]);
    }

    #[test]
    fn constants_are_interned_across_clauses() {
        let mut symbols = SymbolTable::new();
        let (facts, _) = parse_program("p(a).\nq(a).", &mut symbols).expect("valid program");
        assert_eq!(facts[0].terms[0], facts[1].terms[0]);
        assert_eq!(symbols.constant_count(), 1);
    }

    #[test]
    fn queries_support_prefix_and_period() {
        let mut symbols = SymbolTable::new();
        for source in ["?- add(X, Y, z).", "add(X, Y, z)", "add(X,Y,z)."] {
            let goals = parse_query(source, &mut symbols).expect("valid query");
            assert_eq!(goals.len(), 1);
            assert_eq!(goals[0].terms.len(), 3);
        }
    }

    #[test]
    fn query_goals_share_one_scope() {
        let mut symbols = SymbolTable::new();
        let goals = parse_query("p(X), q(X)", &mut symbols).expect("valid query");
        assert_eq!(goals[0].terms[0], goals[1].terms[0]);
    }

    #[test]
    fn zero_arity_atoms_parse() {
        let mut symbols = SymbolTable::new();
        let (facts, rules) =
            parse_program("sunny.\nhappy :- sunny.", &mut symbols).expect("valid program");
        assert!(facts[0].terms.is_empty());
        assert_eq!(rules[0].body[0].to_string(), "sunny");
    }

    #[test]
    fn variable_in_functor_position_is_rejected() {
        let mut symbols = SymbolTable::new();
        let err = parse_program("p(X(a)).", &mut symbols).unwrap_err();
        assert_eq!(err, ParseError::VariableFunctor("X".to_string()));
    }

    #[test]
    fn variable_in_predicate_position_is_rejected() {
        let mut symbols = SymbolTable::new();
        let err = parse_program("X(a).", &mut symbols).unwrap_err();
        assert_eq!(err, ParseError::VariablePredicate("X".to_string()));
    }

    #[test]
    fn missing_period_is_a_syntax_error() {
        let mut symbols = SymbolTable::new();
        let err = parse_program("p(a)", &mut symbols).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn trailing_garbage_is_a_syntax_error() {
        let mut symbols = SymbolTable::new();
        let err = parse_program("p(a). )", &mut symbols).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }
}
