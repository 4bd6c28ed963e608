//! Error types for grammar validation, table construction, and parsing.

use thiserror::Error;

/// A parser generation scheme, named here only so conflict/error messages can
/// say which table-building pass they occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Ll1,
    Lr0,
    Slr1,
    Lr1,
    Lalr1,
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Scheme::Ll1 => "LL(1)",
            Scheme::Lr0 => "LR(0)",
            Scheme::Slr1 => "SLR(1)",
            Scheme::Lr1 => "LR(1)",
            Scheme::Lalr1 => "LALR(1)",
        };
        write!(f, "{name}")
    }
}

/// Errors that can occur while building or driving a grammar's parser tables.
#[derive(Error, Debug)]
pub enum Error {
    /// The grammar data itself is malformed: empty, references an unknown
    /// symbol, or names the reserved end marker as a caller-supplied symbol.
    #[error("invalid grammar: {0}")]
    InvalidGrammar(String),

    /// Table construction found a cell that two distinct actions both want.
    #[error("{scheme} construction conflict at state {state}, symbol {symbol}: {detail}")]
    ConstructionConflict {
        scheme: Scheme,
        state: usize,
        symbol: String,
        detail: String,
    },

    /// The driver reached a state/symbol pair with no action in the table.
    #[error("parse error: no action for symbol {symbol} in state {state}")]
    NoAction { state: usize, symbol: String },

    /// The LL(1) driver's stack top (a terminal) does not match the next
    /// input token.
    #[error("parse error: expected {expected}, found {found}")]
    UnexpectedTerminal { expected: String, found: String },

    /// An invariant this crate is supposed to maintain internally was
    /// violated; this is a bug in this crate, never a caller mistake.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, Error>;
