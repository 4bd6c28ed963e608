//! Canonical automaton construction: the worklist loop shared by LR(0),
//! SLR(1), LR(1), and (before core-merging) LALR(1) table construction.

use crate::grammar::{Grammar, Production};
use crate::lr0::{self, Lr0ItemSet};
use crate::lr1::{self, Lr1ItemSet};
use crate::sets::FirstSets;
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::trace;

/// A canonical collection of states plus the shift/goto transitions between
/// them, discovered in breadth-first order starting from state 0.
pub struct Automaton<S> {
    pub states: Vec<S>,
    pub transitions: HashMap<(usize, Symbol), usize>,
}

/// The augmented production `S' → S` used to seed both automata.
///
/// `S'` is named by suffixing the grammar's start symbol with `'`. If that
/// name is already taken by one of the grammar's own terminals or
/// nonterminals, another `'` is appended, and so on, until the name is free.
pub fn augment(grammar: &Grammar) -> Production {
    let start = grammar.start_symbol();

    let mut augmented_name = format!("{start}'");
    while grammar.nonterminals().contains(&Symbol::nonterminal(augmented_name.clone()))
        || grammar.terminals().contains(&Symbol::terminal(augmented_name.clone()))
    {
        augmented_name.push('\'');
    }

    trace!(start = %start, augmented = %augmented_name, "augmenting grammar with synthetic start production");

    Production::new_augmented(Symbol::nonterminal(augmented_name), vec![start.clone()])
}

/// Shared behavior item sets need to expose to the worklist loop, so
/// `build_lr0_automaton` and `build_lr1_automaton` can share the same shape
/// without forcing LR(0) and LR(1) items into one representation.
trait ItemSetLike {
    /// Symbols immediately after a dot, in first-seen order. Iteration order
    /// here decides the order new states are discovered in, so it must be
    /// stable across rebuilds of the same grammar: a `HashSet` would let
    /// unrelated hashing details reshuffle state indices from run to run.
    fn symbols_after_dot(&self) -> Vec<Symbol>;
}

impl ItemSetLike for Lr0ItemSet {
    fn symbols_after_dot(&self) -> Vec<Symbol> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for item in self.iter() {
            if let Some(symbol) = item.symbol_after_dot() {
                if seen.insert(symbol.clone()) {
                    ordered.push(symbol.clone());
                }
            }
        }
        ordered
    }
}

impl ItemSetLike for Lr1ItemSet {
    fn symbols_after_dot(&self) -> Vec<Symbol> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for item in self.iter() {
            if let Some(symbol) = item.symbol_after_dot() {
                if seen.insert(symbol.clone()) {
                    ordered.push(symbol.clone());
                }
            }
        }
        ordered
    }
}

/// Builds the canonical LR(0) collection of item sets for `grammar`,
/// seeded from `start_production` (`S' → S`).
pub fn build_lr0_automaton(
    grammar: &Grammar,
    start_production: &Production,
) -> Automaton<Lr0ItemSet> {
    let initial = lr0::closure(
        grammar,
        Lr0ItemSet::from([lr0::Lr0Item::new(start_production.clone(), 0)]),
    );

    let mut states = vec![initial.clone()];
    let mut index: HashMap<Lr0ItemSet, usize> = HashMap::from([(initial, 0)]);
    let mut transitions = HashMap::new();
    let mut worklist: VecDeque<usize> = VecDeque::from([0]);

    while let Some(state_id) = worklist.pop_front() {
        let symbols = states[state_id].symbols_after_dot();

        for symbol in symbols {
            let next = lr0::goto(grammar, &states[state_id], &symbol);
            if next.is_empty() {
                continue;
            }

            let next_id = *index.entry(next.clone()).or_insert_with(|| {
                let id = states.len();
                states.push(next);
                worklist.push_back(id);
                id
            });

            trace!(from = state_id, to = next_id, %symbol, "lr0 transition");
            transitions.insert((state_id, symbol), next_id);
        }
    }

    Automaton { states, transitions }
}

/// Builds the canonical LR(1) collection of item sets for `grammar`, seeded
/// from `start_production` with lookahead `$`.
pub fn build_lr1_automaton(
    grammar: &Grammar,
    first_sets: &FirstSets,
    start_production: &Production,
) -> Automaton<Lr1ItemSet> {
    let initial = lr1::closure(
        grammar,
        first_sets,
        Lr1ItemSet::from([lr1::Lr1Item::new(
            start_production.clone(),
            0,
            Symbol::EndMarker,
        )]),
    );

    let mut states = vec![initial.clone()];
    let mut index: HashMap<Lr1ItemSet, usize> = HashMap::from([(initial, 0)]);
    let mut transitions = HashMap::new();
    let mut worklist: VecDeque<usize> = VecDeque::from([0]);

    while let Some(state_id) = worklist.pop_front() {
        let symbols = states[state_id].symbols_after_dot();

        for symbol in symbols {
            let next = lr1::goto(grammar, first_sets, &states[state_id], &symbol);
            if next.is_empty() {
                continue;
            }

            let next_id = *index.entry(next.clone()).or_insert_with(|| {
                let id = states.len();
                states.push(next);
                worklist.push_back(id);
                id
            });

            trace!(from = state_id, to = next_id, %symbol, "lr1 transition");
            transitions.insert((state_id, symbol), next_id);
        }
    }

    Automaton { states, transitions }
}
