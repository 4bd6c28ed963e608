//! LR(0) items, closure, and goto.
//!
//! Shared by the LR(0) and SLR(1) table builders, which differ only in how
//! they decide *when* to reduce, not in the automaton itself.

use crate::grammar::{Grammar, Production};
use crate::symbol::Symbol;
use std::collections::BTreeSet;

/// An LR(0) item: a production with a dot position, e.g. `A → α•β`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lr0Item {
    pub production: Production,
    pub dot: usize,
}

impl Lr0Item {
    pub fn new(production: Production, dot: usize) -> Self {
        Self { production, dot }
    }

    /// The symbol immediately after the dot, if any.
    pub fn symbol_after_dot(&self) -> Option<&Symbol> {
        self.production.rhs.get(self.dot)
    }

    /// True when the dot has reached the end of the production (a reduce item).
    pub fn is_reduce_item(&self) -> bool {
        self.dot >= self.production.rhs.len()
    }

    fn advanced(&self) -> Self {
        Self::new(self.production.clone(), self.dot + 1)
    }
}

/// A state in the LR(0) automaton: a set of items, kept in a `BTreeSet` so
/// two states built from the same items always compare equal and hash the
/// same way regardless of discovery order.
pub type Lr0ItemSet = BTreeSet<Lr0Item>;

/// Computes the closure of a set of LR(0) items: for each item `[A → α•Bβ]`
/// with B a nonterminal, adds `[B → •γ]` for every production `B → γ`, until
/// no more items can be added.
pub fn closure(grammar: &Grammar, items: Lr0ItemSet) -> Lr0ItemSet {
    let mut result = items;
    let mut changed = true;

    while changed {
        changed = false;
        let current = result.clone();

        for item in &current {
            if let Some(symbol) = item.symbol_after_dot() {
                if symbol.is_nonterminal() {
                    for production in grammar.productions_for(symbol) {
                        let new_item = Lr0Item::new(production.clone(), 0);
                        if result.insert(new_item) {
                            changed = true;
                        }
                    }
                }
            }
        }
    }

    result
}

/// Computes goto(I, X): the closure of every item in `items` with its dot
/// advanced past `symbol`.
pub fn goto(grammar: &Grammar, items: &Lr0ItemSet, symbol: &Symbol) -> Lr0ItemSet {
    let moved: Lr0ItemSet = items
        .iter()
        .filter(|item| item.symbol_after_dot() == Some(symbol))
        .map(Lr0Item::advanced)
        .collect();

    closure(grammar, moved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar() -> Grammar {
        Grammar::new(
            vec![
                ("S".to_string(), vec!["A".to_string(), "a".to_string()]),
                ("A".to_string(), vec!["a".to_string()]),
            ],
            "S",
        )
        .unwrap()
    }

    #[test]
    fn closure_adds_productions_for_nonterminal_after_dot() {
        let grammar = grammar();
        let start = grammar.productions_for(&Symbol::nonterminal("S"))[0].clone();
        let seed = Lr0ItemSet::from([Lr0Item::new(start, 0)]);
        let closed = closure(&grammar, seed);
        assert!(closed
            .iter()
            .any(|item| item.production.lhs == Symbol::nonterminal("A") && item.dot == 0));
    }

    #[test]
    fn goto_on_absent_symbol_is_empty() {
        let grammar = grammar();
        let start = grammar.productions_for(&Symbol::nonterminal("S"))[0].clone();
        let seed = closure(&grammar, Lr0ItemSet::from([Lr0Item::new(start, 0)]));
        let moved = goto(&grammar, &seed, &Symbol::terminal("zzz"));
        assert!(moved.is_empty());
    }
}
