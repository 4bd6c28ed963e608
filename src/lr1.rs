//! LR(1) items, closure, and goto.
//!
//! An LR(1) item augments an LR(0) item with a single lookahead terminal,
//! so closures only propagate the reductions that can actually follow in
//! context, instead of relying on a nonterminal's whole FOLLOW set as SLR(1)
//! does.

use crate::grammar::{Grammar, Production};
use crate::sets::{first_of_string, FirstSets};
use crate::symbol::Symbol;
use std::collections::BTreeSet;

/// An LR(1) item: a production, a dot position, and one lookahead terminal,
/// e.g. `[A → α•β, a]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lr1Item {
    pub production: Production,
    pub dot: usize,
    pub lookahead: Symbol,
}

impl Lr1Item {
    pub fn new(production: Production, dot: usize, lookahead: Symbol) -> Self {
        Self {
            production,
            dot,
            lookahead,
        }
    }

    pub fn symbol_after_dot(&self) -> Option<&Symbol> {
        self.production.rhs.get(self.dot)
    }

    pub fn is_reduce_item(&self) -> bool {
        self.dot >= self.production.rhs.len()
    }

    fn advanced(&self) -> Self {
        Self::new(self.production.clone(), self.dot + 1, self.lookahead.clone())
    }

    /// This item's LR(0) core: the same item with the lookahead dropped.
    /// LALR(1) states are discovered by grouping LR(1) states that share a
    /// core.
    pub fn core(&self) -> (Production, usize) {
        (self.production.clone(), self.dot)
    }
}

/// A state in the LR(1) automaton: a set of items, in `BTreeSet` form for
/// the same canonical-identity reason as `Lr0ItemSet`.
pub type Lr1ItemSet = BTreeSet<Lr1Item>;

/// Computes the closure of a set of LR(1) items.
///
/// For each item `[A → α•Bβ, a]` with B a nonterminal, adds `[B → •γ, b]`
/// for every production `B → γ` and every terminal `b` in FIRST(βa).
pub fn closure(grammar: &Grammar, first_sets: &FirstSets, items: Lr1ItemSet) -> Lr1ItemSet {
    let mut result = items;
    let mut changed = true;

    while changed {
        changed = false;
        let current = result.clone();

        for item in &current {
            let Some(symbol) = item.symbol_after_dot() else {
                continue;
            };
            if !symbol.is_nonterminal() {
                continue;
            }

            let mut lookahead_string: Vec<Symbol> =
                item.production.rhs[item.dot + 1..].to_vec();
            lookahead_string.push(item.lookahead.clone());
            let lookaheads = first_of_string(first_sets, &lookahead_string);

            for production in grammar.productions_for(symbol) {
                for lookahead in &lookaheads {
                    if lookahead.is_epsilon() {
                        continue;
                    }
                    let new_item = Lr1Item::new(production.clone(), 0, lookahead.clone());
                    if result.insert(new_item) {
                        changed = true;
                    }
                }
            }
        }
    }

    result
}

/// Computes goto(I, X) for an LR(1) state: the closure of every item in
/// `items` with its dot advanced past `symbol`, lookaheads carried through
/// unchanged.
pub fn goto(
    grammar: &Grammar,
    first_sets: &FirstSets,
    items: &Lr1ItemSet,
    symbol: &Symbol,
) -> Lr1ItemSet {
    let moved: Lr1ItemSet = items
        .iter()
        .filter(|item| item.symbol_after_dot() == Some(symbol))
        .map(Lr1Item::advanced)
        .collect();

    closure(grammar, first_sets, moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sets::compute_first_sets;

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
    fn closure_propagates_lookahead_from_trailing_context() {
        let grammar = grammar();
        let first_sets = compute_first_sets(&grammar);
        let start = grammar.productions_for(&Symbol::nonterminal("S"))[0].clone();
        let seed = Lr1ItemSet::from([Lr1Item::new(start, 0, Symbol::EndMarker)]);
        let closed = closure(&grammar, &first_sets, seed);

        assert!(closed.iter().any(|item| {
            item.production.lhs == Symbol::nonterminal("A")
                && item.dot == 0
                && item.lookahead == Symbol::terminal("a")
        }));
    }
}
