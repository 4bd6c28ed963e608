//! Grammar module for context-free grammars.
//!
//! This module provides the data structures for working with context-free
//! grammars: productions and the grammar they belong to. Grammars are built
//! directly from structured data (a list of `(lhs, rhs)` name pairs), not
//! parsed from a textual grammar notation.

use crate::error::{Error, Result};
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A production rule in a context-free grammar.
///
/// Represents a rule of the form: LHS → RHS, where LHS is a single
/// nonterminal and RHS is a sequence of symbols (possibly empty, meaning ε).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Production {
    /// Left-hand side (always a nonterminal).
    pub lhs: Symbol,
    /// Right-hand side (sequence of symbols).
    pub rhs: Vec<Symbol>,
    /// Position of this production in the caller's declaration order.
    ///
    /// Tables report reductions by production, and declaration order gives
    /// callers a stable way to name one ("reduce by production 3") without
    /// this crate inventing its own numbering scheme.
    pub index: usize,
}

impl Production {
    fn new(lhs: Symbol, rhs: Vec<Symbol>, index: usize) -> Self {
        Self { lhs, rhs, index }
    }

    /// Builds the synthetic `S' → S` production LR automaton construction
    /// seeds itself with. Its `index` is `usize::MAX`, never a valid
    /// declaration index, so it can't be confused with a caller production.
    pub(crate) fn new_augmented(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self {
            lhs,
            rhs,
            index: usize::MAX,
        }
    }

    /// True if this is the synthetic augmented start production.
    pub fn is_augmented(&self) -> bool {
        self.index == usize::MAX
    }

    /// True if this production's right-hand side is ε (empty, or an explicit
    /// `[Symbol::Epsilon]`).
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty() || self.rhs == [Symbol::Epsilon]
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_epsilon() {
            write!(f, "{} → ε", self.lhs)
        } else {
            let rhs_str = self
                .rhs
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            write!(f, "{} → {}", self.lhs, rhs_str)
        }
    }
}

/// A context-free grammar.
///
/// Holds all productions plus the derived sets (terminals, non-terminals,
/// start symbol) and an index from each non-terminal to its productions.
#[derive(Debug, Clone)]
pub struct Grammar {
    /// All productions, in declaration order.
    productions: Vec<Production>,
    /// All nonterminal symbols.
    nonterminals: HashSet<Symbol>,
    /// All terminal symbols.
    terminals: HashSet<Symbol>,
    /// The start symbol.
    start_symbol: Symbol,
    /// Map from nonterminals to their productions, in declaration order.
    production_map: HashMap<Symbol, Vec<Production>>,
}

impl Grammar {
    /// Builds a grammar from a list of `(lhs, rhs)` productions and a start
    /// symbol name.
    ///
    /// `rhs` entries name terminals and non-terminals by string; an empty
    /// `rhs` (or one containing only `"e"`/`"ε"`) denotes ε. Every name that
    /// is never used as an `lhs` is treated as a terminal. `$` is reserved
    /// for the end marker and rejected if it appears in caller data.
    pub fn new(
        productions: Vec<(String, Vec<String>)>,
        start: impl Into<String>,
    ) -> Result<Self> {
        if productions.is_empty() {
            return Err(Error::InvalidGrammar(
                "a grammar must declare at least one production".to_string(),
            ));
        }

        let start = start.into();

        let lhs_nonterminals: HashSet<String> =
            productions.iter().map(|(lhs, _)| lhs.clone()).collect();

        for (lhs, rhs) in &productions {
            if lhs == "$" || lhs.is_empty() {
                return Err(Error::InvalidGrammar(format!(
                    "invalid left-hand side name: {lhs:?}"
                )));
            }
            for name in rhs {
                if name == "$" {
                    return Err(Error::InvalidGrammar(
                        "\"$\" is reserved for the end marker and cannot appear in a production"
                            .to_string(),
                    ));
                }
            }
        }

        if !lhs_nonterminals.contains(&start) {
            return Err(Error::InvalidGrammar(format!(
                "start symbol {start:?} has no productions"
            )));
        }

        let mut built = Vec::with_capacity(productions.len());
        let mut terminals = HashSet::new();
        let mut rhs_nonterminals = HashSet::new();

        for (index, (lhs, rhs)) in productions.into_iter().enumerate() {
            let lhs_symbol = Symbol::nonterminal(lhs);

            let is_epsilon_rhs =
                rhs.is_empty() || (rhs.len() == 1 && (rhs[0] == "e" || rhs[0] == "ε"));

            let rhs_symbols = if is_epsilon_rhs {
                Vec::new()
            } else {
                rhs.into_iter()
                    .map(|name| {
                        if lhs_nonterminals.contains(&name) {
                            rhs_nonterminals.insert(name.clone());
                            Symbol::nonterminal(name)
                        } else {
                            terminals.insert(Symbol::terminal(name.clone()));
                            Symbol::terminal(name)
                        }
                    })
                    .collect()
            };

            built.push(Production::new(lhs_symbol, rhs_symbols, index));
        }

        let nonterminals: HashSet<Symbol> = lhs_nonterminals
            .iter()
            .cloned()
            .map(Symbol::nonterminal)
            .collect();

        let start_symbol = Symbol::nonterminal(start);

        let mut production_map: HashMap<Symbol, Vec<Production>> = HashMap::new();
        for prod in &built {
            production_map
                .entry(prod.lhs.clone())
                .or_default()
                .push(prod.clone());
        }

        Ok(Self {
            productions: built,
            nonterminals,
            terminals,
            start_symbol,
            production_map,
        })
    }

    /// Returns all productions for a given nonterminal, in declaration order.
    pub fn productions_for(&self, nt: &Symbol) -> &[Production] {
        self.production_map
            .get(nt)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns all productions in the grammar, in declaration order.
    pub fn all_productions(&self) -> &[Production] {
        &self.productions
    }

    /// Returns all nonterminals in the grammar.
    pub fn nonterminals(&self) -> &HashSet<Symbol> {
        &self.nonterminals
    }

    /// Returns all terminals in the grammar.
    pub fn terminals(&self) -> &HashSet<Symbol> {
        &self.terminals
    }

    /// Returns the start symbol.
    pub fn start_symbol(&self) -> &Symbol {
        &self.start_symbol
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prod in &self.productions {
            writeln!(f, "{prod}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arithmetic_grammar() -> Grammar {
        Grammar::new(
            vec![
                ("E".to_string(), vec!["E".to_string(), "+".to_string(), "T".to_string()]),
                ("E".to_string(), vec!["T".to_string()]),
                ("T".to_string(), vec!["T".to_string(), "*".to_string(), "F".to_string()]),
                ("T".to_string(), vec!["F".to_string()]),
                ("F".to_string(), vec!["(".to_string(), "E".to_string(), ")".to_string()]),
                ("F".to_string(), vec!["id".to_string()]),
            ],
            "E",
        )
        .unwrap()
    }

    #[test]
    fn classifies_terminals_and_nonterminals() {
        let grammar = arithmetic_grammar();
        assert!(grammar.nonterminals().contains(&Symbol::nonterminal("E")));
        assert!(grammar.nonterminals().contains(&Symbol::nonterminal("F")));
        assert!(grammar.terminals().contains(&Symbol::terminal("id")));
        assert!(grammar.terminals().contains(&Symbol::terminal("+")));
        assert!(!grammar.terminals().contains(&Symbol::terminal("E")));
    }

    #[test]
    fn productions_for_nonterminal_preserve_declaration_order() {
        let grammar = arithmetic_grammar();
        let e_prods = grammar.productions_for(&Symbol::nonterminal("E"));
        assert_eq!(e_prods.len(), 2);
        assert_eq!(e_prods[0].index, 0);
        assert_eq!(e_prods[1].index, 1);
    }

    #[test]
    fn empty_rhs_is_epsilon() {
        let grammar = Grammar::new(
            vec![
                ("S".to_string(), vec!["a".to_string(), "S".to_string()]),
                ("S".to_string(), vec![]),
            ],
            "S",
        )
        .unwrap();
        let prods = grammar.productions_for(&Symbol::nonterminal("S"));
        assert!(prods[1].is_epsilon());
    }

    #[test]
    fn rejects_empty_grammar() {
        assert!(Grammar::new(vec![], "S").is_err());
    }

    #[test]
    fn rejects_start_symbol_with_no_productions() {
        let result = Grammar::new(
            vec![("A".to_string(), vec!["a".to_string()])],
            "S",
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_dollar_in_production_data() {
        let result = Grammar::new(
            vec![("S".to_string(), vec!["$".to_string()])],
            "S",
        );
        assert!(result.is_err());
    }
}
