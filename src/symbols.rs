//! Interned symbols and fresh-variable minting.
//!
//! Constants, functors and predicates are canonicalized through a
//! [`SymbolTable`]: interning the same name twice yields the same identity,
//! so the engine compares symbols by identity alone and never by name.
//! Variables are the opposite: every mint produces a distinct identity, and
//! two variables sharing a display name are still different variables.

use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Process-wide source of variable identities. Variables are minted when a
/// clause is built or standardized apart, never during unification.
static NEXT_VARIABLE_ID: AtomicU64 = AtomicU64::new(0);

/// A logic variable: a unique identity plus a display name.
///
/// Equality and hashing use the identity only. Two variables named `X` from
/// different clause scopes compare unequal.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variable {
    id: u64,
    name: String,
}

impl Variable {
    /// Mint a variable with a new identity and the given display name.
    pub fn fresh(name: impl Into<String>) -> Self {
        Variable {
            id: NEXT_VARIABLE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    /// Mint a distinct variable that keeps this one's display name.
    /// This is the single step of standardizing a clause apart.
    #[must_use]
    pub fn renamed(&self) -> Self {
        Self::fresh(self.name.clone())
    }

    /// The display name. Not unique across variables.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw identity (for debugging).
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An interned constant symbol (e.g. `z`, `alice`).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constant {
    id: u32,
    name: String,
}

impl Constant {
    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An interned functor symbol labeling a compound term (e.g. the `s` in
/// `s(z)`). Two applications unify structurally only when their functor
/// identities and argument counts match.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Functor {
    id: u32,
    name: String,
}

impl Functor {
    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Functor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Functor {}

impl Hash for Functor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Functor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An interned predicate symbol labeling a fact, rule head or goal.
/// Predicates never appear inside a term.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Predicate {
    id: u32,
    name: String,
}

impl Predicate {
    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Predicate {}

impl Hash for Predicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Canonicalization tables for constants, functors and predicates, one per
/// kind. A table lives as long as the session: identities are only
/// comparable between symbols interned through the same table.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    constants: IndexMap<String, u32>,
    functors: IndexMap<String, u32>,
    predicates: IndexMap<String, u32>,
}

impl SymbolTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a constant name (get-or-create).
    pub fn constant(&mut self, name: &str) -> Constant {
        let id = Self::intern(&mut self.constants, name);
        Constant {
            id,
            name: name.to_string(),
        }
    }

    /// Intern a functor name (get-or-create).
    pub fn functor(&mut self, name: &str) -> Functor {
        let id = Self::intern(&mut self.functors, name);
        Functor {
            id,
            name: name.to_string(),
        }
    }

    /// Intern a predicate name (get-or-create).
    pub fn predicate(&mut self, name: &str) -> Predicate {
        let id = Self::intern(&mut self.predicates, name);
        Predicate {
            id,
            name: name.to_string(),
        }
    }

    /// Number of distinct constant names interned so far.
    #[must_use]
    pub fn constant_count(&self) -> usize {
        self.constants.len()
    }

    /// Number of distinct functor names interned so far.
    #[must_use]
    pub fn functor_count(&self) -> usize {
        self.functors.len()
    }

    /// Number of distinct predicate names interned so far.
    #[must_use]
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    fn intern(table: &mut IndexMap<String, u32>, name: &str) -> u32 {
        if let Some(&id) = table.get(name) {
            return id;
        }
        let id = u32::try_from(table.len()).unwrap_or(u32::MAX);
        table.insert(name.to_string(), id);
        id
    }
}
