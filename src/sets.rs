//! FIRST and FOLLOW set computation for context-free grammars.
//!
//! Implements the fixed-point algorithms from Aho et al., "Compilers:
//! Principles, Techniques, and Tools" (2nd Edition), section 4.4.

use crate::grammar::Grammar;
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};

/// Maps each symbol to its FIRST set.
pub type FirstSets = HashMap<Symbol, HashSet<Symbol>>;

/// Maps each nonterminal to its FOLLOW set.
pub type FollowSets = HashMap<Symbol, HashSet<Symbol>>;

/// Computes the FIRST sets for every terminal and nonterminal in the grammar.
///
/// FIRST(a) = {a} for a terminal a. For a nonterminal A with production
/// A → X1 X2 ... Xn, FIRST(A) accumulates FIRST(Xi) - {ε} for the leading
/// run of nullable Xi, plus ε itself if the whole run is nullable. Iterates
/// to a fixed point since a production's contribution depends on other
/// productions' FIRST sets, which may still be growing.
pub fn compute_first_sets(grammar: &Grammar) -> FirstSets {
    let mut first_sets: FirstSets = HashMap::new();

    for terminal in grammar.terminals() {
        first_sets.insert(terminal.clone(), HashSet::from([terminal.clone()]));
    }

    first_sets.insert(Symbol::Epsilon, HashSet::from([Symbol::Epsilon]));
    first_sets.insert(Symbol::EndMarker, HashSet::from([Symbol::EndMarker]));

    for nonterminal in grammar.nonterminals() {
        first_sets.insert(nonterminal.clone(), HashSet::new());
    }

    let mut changed = true;
    while changed {
        changed = false;

        for production in grammar.all_productions() {
            let lhs = &production.lhs;
            let current_first = first_sets.get(lhs).unwrap().clone();

            let rhs_first = first_of_string(&first_sets, &production.rhs);

            let new_first: HashSet<Symbol> = current_first.union(&rhs_first).cloned().collect();

            if new_first.len() != current_first.len() {
                first_sets.insert(lhs.clone(), new_first);
                changed = true;
            }
        }
    }

    first_sets
}

/// Computes FIRST of a string of symbols (e.g. the right-hand side of a
/// production, or the symbols following a dot in an LR item).
///
/// Walks the string left to right, accumulating FIRST(Xi) - {ε} for as long
/// as every preceding Xi is nullable; ε is added to the result only if the
/// whole string is nullable (including the empty string itself).
pub fn first_of_string(first_sets: &FirstSets, symbols: &[Symbol]) -> HashSet<Symbol> {
    let mut result = HashSet::new();
    let mut nullable_prefix = true;

    for symbol in symbols {
        if !nullable_prefix {
            break;
        }

        let first_sym = first_sets.get(symbol).cloned().unwrap_or_default();

        for sym in &first_sym {
            if !sym.is_epsilon() {
                result.insert(sym.clone());
            }
        }

        nullable_prefix = first_sym.contains(&Symbol::Epsilon);
    }

    if nullable_prefix {
        result.insert(Symbol::Epsilon);
    }

    result
}

/// Computes the FOLLOW sets for every nonterminal in the grammar.
///
/// FOLLOW(start) always contains $. For a production A → α B β, FIRST(β) -
/// {ε} is added to FOLLOW(B); if β is nullable (including empty), FOLLOW(A)
/// is added to FOLLOW(B) too. Iterates to a fixed point for the same reason
/// as `compute_first_sets`.
pub fn compute_follow_sets(grammar: &Grammar, first_sets: &FirstSets) -> FollowSets {
    let mut follow_sets: FollowSets = HashMap::new();

    for nonterminal in grammar.nonterminals() {
        follow_sets.insert(nonterminal.clone(), HashSet::new());
    }

    let start_symbol = grammar.start_symbol();
    follow_sets
        .get_mut(start_symbol)
        .unwrap()
        .insert(Symbol::EndMarker);

    let mut changed = true;
    while changed {
        changed = false;

        for production in grammar.all_productions() {
            let lhs = &production.lhs;
            let rhs = &production.rhs;

            for (i, symbol) in rhs.iter().enumerate() {
                if !symbol.is_nonterminal() {
                    continue;
                }

                let current_follow = follow_sets.get(symbol).unwrap().clone();
                let mut new_follow = current_follow.clone();

                let beta = &rhs[i + 1..];
                let first_beta = first_of_string(first_sets, beta);

                for sym in &first_beta {
                    if !sym.is_epsilon() {
                        new_follow.insert(sym.clone());
                    }
                }

                if beta.is_empty() || first_beta.contains(&Symbol::Epsilon) {
                    let follow_lhs = follow_sets.get(lhs).unwrap().clone();
                    new_follow = new_follow.union(&follow_lhs).cloned().collect();
                }

                if new_follow.len() != current_follow.len() {
                    follow_sets.insert(symbol.clone(), new_follow);
                    changed = true;
                }
            }
        }
    }

    follow_sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn grammar_with_epsilon() -> Grammar {
        Grammar::new(
            vec![
                ("S".to_string(), vec!["A".to_string(), "B".to_string()]),
                ("A".to_string(), vec!["a".to_string(), "A".to_string()]),
                ("A".to_string(), vec![]),
                ("B".to_string(), vec!["b".to_string()]),
            ],
            "S",
        )
        .unwrap()
    }

    #[test]
    fn nullable_nonterminal_contributes_epsilon_to_first() {
        let grammar = grammar_with_epsilon();
        let first = compute_first_sets(&grammar);
        assert!(first[&Symbol::nonterminal("A")].contains(&Symbol::Epsilon));
        assert!(first[&Symbol::nonterminal("A")].contains(&Symbol::terminal("a")));
    }

    #[test]
    fn follow_of_nullable_symbol_includes_what_comes_after() {
        let grammar = grammar_with_epsilon();
        let first = compute_first_sets(&grammar);
        let follow = compute_follow_sets(&grammar, &first);
        assert!(follow[&Symbol::nonterminal("A")].contains(&Symbol::terminal("b")));
    }

    #[test]
    fn follow_of_start_symbol_contains_end_marker() {
        let grammar = grammar_with_epsilon();
        let first = compute_first_sets(&grammar);
        let follow = compute_follow_sets(&grammar, &first);
        assert!(follow[&Symbol::nonterminal("S")].contains(&Symbol::EndMarker));
    }

    #[test]
    fn first_of_string_is_end_marker_only_for_empty_string() {
        let first = FirstSets::new();
        let result = first_of_string(&first, &[]);
        assert_eq!(result, HashSet::from([Symbol::Epsilon]));
    }
}
