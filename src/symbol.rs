//! Symbol types and utilities for context-free grammars.
//!
//! This module defines the core `Symbol` type used by every other module:
//! terminals, nonterminals, epsilon, and the end-of-input marker.

use std::cmp::Ordering;
use std::fmt;

/// A symbol in a context-free grammar.
///
/// Names are opaque strings rather than single characters, so multi-character
/// terminals (`id`, `+`, `while`, ...) can be represented directly: grammar
/// data arrives as structured `(lhs, rhs)` name pairs, not a compact textual
/// grammar notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A terminal symbol, named by the caller.
    Terminal(String),
    /// A nonterminal symbol, named by the caller.
    Nonterminal(String),
    /// The empty string (ε).
    Epsilon,
    /// The end-of-input marker ($).
    EndMarker,
}

impl Symbol {
    /// Creates a terminal symbol.
    pub fn terminal(name: impl Into<String>) -> Self {
        Symbol::Terminal(name.into())
    }

    /// Creates a nonterminal symbol.
    pub fn nonterminal(name: impl Into<String>) -> Self {
        Symbol::Nonterminal(name.into())
    }

    /// Checks if this symbol is a terminal.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Checks if this symbol is a nonterminal.
    #[inline]
    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }

    /// Checks if this symbol is epsilon (ε).
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    /// Checks if this symbol is the end marker ($).
    #[inline]
    pub fn is_end_marker(&self) -> bool {
        matches!(self, Symbol::EndMarker)
    }

    /// Returns the name backing this symbol, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Symbol::Terminal(s) | Symbol::Nonterminal(s) => Some(s),
            Symbol::Epsilon | Symbol::EndMarker => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(s) | Symbol::Nonterminal(s) => write!(f, "{s}"),
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::EndMarker => write!(f, "$"),
        }
    }
}

/// Custom ordering for symbols, used for canonical (order-independent) state
/// identity: item sets are kept in `BTreeSet`s, so items and the symbols they
/// hold must be totally ordered.
///
/// Order: Epsilon < Terminals < Nonterminals < EndMarker.
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Symbol::Epsilon, Symbol::Epsilon) => Ordering::Equal,
            (Symbol::Epsilon, _) => Ordering::Less,
            (_, Symbol::Epsilon) => Ordering::Greater,

            (Symbol::EndMarker, Symbol::EndMarker) => Ordering::Equal,
            (Symbol::EndMarker, _) => Ordering::Greater,
            (_, Symbol::EndMarker) => Ordering::Less,

            (Symbol::Terminal(a), Symbol::Terminal(b)) => a.cmp(b),
            (Symbol::Terminal(_), Symbol::Nonterminal(_)) => Ordering::Less,
            (Symbol::Nonterminal(_), Symbol::Terminal(_)) => Ordering::Greater,
            (Symbol::Nonterminal(a), Symbol::Nonterminal(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
