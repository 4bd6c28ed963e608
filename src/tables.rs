//! ACTION/GOTO table assembly for LR(0), SLR(1), LR(1), and LALR(1), plus
//! the LL(1) predictive parse table.

use crate::automaton::Automaton;
use crate::error::{Error, Result, Scheme};
use crate::grammar::{Grammar, Production};
use crate::lr0::Lr0ItemSet;
use crate::lr1::Lr1ItemSet;
use crate::sets::{first_of_string, FirstSets, FollowSets};
use crate::symbol::Symbol;
use std::collections::HashMap;
use tracing::warn;

/// One entry in an LR ACTION table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(Production),
    Accept,
}

impl Action {
    fn describe(&self) -> String {
        match self {
            Action::Shift(s) => format!("shift to {s}"),
            Action::Reduce(p) => format!("reduce by {p}"),
            Action::Accept => "accept".to_string(),
        }
    }
}

/// An LR parser's ACTION and GOTO tables.
#[derive(Debug, Clone)]
pub struct Table {
    pub action: HashMap<(usize, Symbol), Action>,
    pub goto: HashMap<(usize, Symbol), usize>,
    pub num_states: usize,
}

/// Inserts `action` at `(state, symbol)`, failing if a different action is
/// already there. Two `Reduce` actions naming the same production (which can
/// happen after LALR(1) core-merging folds several LR(1) states together)
/// compare equal and are not a conflict.
fn set_action(
    table: &mut HashMap<(usize, Symbol), Action>,
    scheme: Scheme,
    state: usize,
    symbol: Symbol,
    action: Action,
) -> Result<()> {
    let key = (state, symbol.clone());
    if let Some(existing) = table.get(&key) {
        if existing != &action {
            warn!(
                %scheme,
                state,
                %symbol,
                existing = %existing.describe(),
                attempted = %action.describe(),
                "construction conflict"
            );
            return Err(Error::ConstructionConflict {
                scheme,
                state,
                symbol: symbol.to_string(),
                detail: format!("{} vs {}", existing.describe(), action.describe()),
            });
        }
        return Ok(());
    }
    table.insert(key, action);
    Ok(())
}

fn goto_table_for_state(
    transitions: &HashMap<(usize, Symbol), usize>,
    state_id: usize,
) -> impl Iterator<Item = (&Symbol, &usize)> {
    transitions
        .iter()
        .filter(move |((src, _), _)| *src == state_id)
        .map(|((_, symbol), dst)| (symbol, dst))
}

/// Builds the LR(0) ACTION/GOTO tables: reduce items reduce unconditionally,
/// on every terminal and `$`, regardless of context.
pub fn build_lr0_table(
    automaton: &Automaton<Lr0ItemSet>,
    start_production: &Production,
    grammar: &Grammar,
) -> Result<Table> {
    let mut action = HashMap::new();
    let mut goto = HashMap::new();

    for (state_id, state) in automaton.states.iter().enumerate() {
        for item in state {
            if !item.is_reduce_item() {
                if let Some(symbol) = item.symbol_after_dot() {
                    if symbol.is_terminal() || symbol.is_end_marker() {
                        if let Some(&next) = automaton.transitions.get(&(state_id, symbol.clone())) {
                            set_action(&mut action, Scheme::Lr0, state_id, symbol.clone(), Action::Shift(next))?;
                        }
                    }
                }
            } else if item.production.lhs == start_production.lhs {
                set_action(&mut action, Scheme::Lr0, state_id, Symbol::EndMarker, Action::Accept)?;
            } else {
                for terminal in grammar.terminals().iter().cloned().chain([Symbol::EndMarker]) {
                    set_action(
                        &mut action,
                        Scheme::Lr0,
                        state_id,
                        terminal,
                        Action::Reduce(item.production.clone()),
                    )?;
                }
            }
        }

        for (symbol, &next) in goto_table_for_state(&automaton.transitions, state_id) {
            if symbol.is_nonterminal() {
                goto.insert((state_id, symbol.clone()), next);
            }
        }
    }

    Ok(Table {
        action,
        goto,
        num_states: automaton.states.len(),
    })
}

/// Builds the SLR(1) ACTION/GOTO tables: reduce items reduce on
/// FOLLOW(lhs) instead of every terminal.
pub fn build_slr1_table(
    automaton: &Automaton<Lr0ItemSet>,
    start_production: &Production,
    follow_sets: &FollowSets,
) -> Result<Table> {
    let mut action = HashMap::new();
    let mut goto = HashMap::new();

    for (state_id, state) in automaton.states.iter().enumerate() {
        for item in state {
            if !item.is_reduce_item() {
                if let Some(symbol) = item.symbol_after_dot() {
                    if symbol.is_terminal() || symbol.is_end_marker() {
                        if let Some(&next) = automaton.transitions.get(&(state_id, symbol.clone())) {
                            set_action(&mut action, Scheme::Slr1, state_id, symbol.clone(), Action::Shift(next))?;
                        }
                    }
                }
            } else if item.production.lhs == start_production.lhs {
                set_action(&mut action, Scheme::Slr1, state_id, Symbol::EndMarker, Action::Accept)?;
            } else {
                let follow = follow_sets.get(&item.production.lhs).cloned().unwrap_or_default();
                for terminal in follow {
                    set_action(
                        &mut action,
                        Scheme::Slr1,
                        state_id,
                        terminal,
                        Action::Reduce(item.production.clone()),
                    )?;
                }
            }
        }

        for (symbol, &next) in goto_table_for_state(&automaton.transitions, state_id) {
            if symbol.is_nonterminal() {
                goto.insert((state_id, symbol.clone()), next);
            }
        }
    }

    Ok(Table {
        action,
        goto,
        num_states: automaton.states.len(),
    })
}

/// Builds ACTION/GOTO tables from an automaton of LR(1) item sets (used
/// directly for LR(1), and after core-merging for LALR(1)). Reduce items
/// reduce only on their own item lookahead.
pub fn build_lr1_style_table(
    automaton: &Automaton<Lr1ItemSet>,
    start_production: &Production,
    scheme: Scheme,
) -> Result<Table> {
    let mut action = HashMap::new();
    let mut goto = HashMap::new();

    for (state_id, state) in automaton.states.iter().enumerate() {
        for item in state {
            if !item.is_reduce_item() {
                if let Some(symbol) = item.symbol_after_dot() {
                    if symbol.is_terminal() || symbol.is_end_marker() {
                        if let Some(&next) = automaton.transitions.get(&(state_id, symbol.clone())) {
                            set_action(&mut action, scheme, state_id, symbol.clone(), Action::Shift(next))?;
                        }
                    }
                }
            } else if item.production.lhs == start_production.lhs
                && item.lookahead == Symbol::EndMarker
            {
                set_action(&mut action, scheme, state_id, Symbol::EndMarker, Action::Accept)?;
            } else {
                set_action(
                    &mut action,
                    scheme,
                    state_id,
                    item.lookahead.clone(),
                    Action::Reduce(item.production.clone()),
                )?;
            }
        }

        for (symbol, &next) in goto_table_for_state(&automaton.transitions, state_id) {
            if symbol.is_nonterminal() {
                goto.insert((state_id, symbol.clone()), next);
            }
        }
    }

    Ok(Table {
        action,
        goto,
        num_states: automaton.states.len(),
    })
}

/// Builds the LL(1) parse table `M[A, a] = production`.
///
/// For a production `A → α`: for each terminal in FIRST(α), add it; if
/// ε ∈ FIRST(α), also add it for each terminal in FOLLOW(A). A cell written
/// twice with different productions means the grammar is not LL(1).
pub fn build_ll1_table(
    grammar: &Grammar,
    first_sets: &FirstSets,
    follow_sets: &FollowSets,
) -> Result<HashMap<(Symbol, Symbol), Production>> {
    let mut table: HashMap<(Symbol, Symbol), Production> = HashMap::new();

    let mut insert = |nonterminal: Symbol,
                       terminal: Symbol,
                       production: &Production|
     -> Result<()> {
        let key = (nonterminal, terminal);
        if let Some(existing) = table.get(&key) {
            if existing != production {
                return Err(Error::ConstructionConflict {
                    scheme: Scheme::Ll1,
                    state: 0,
                    symbol: key.1.to_string(),
                    detail: format!(
                        "M[{}, {}] set by both {existing} and {production}",
                        key.0, key.1
                    ),
                });
            }
            return Ok(());
        }
        table.insert(key, production.clone());
        Ok(())
    };

    for production in grammar.all_productions() {
        let first_alpha = first_of_string(first_sets, &production.rhs);

        for symbol in &first_alpha {
            if !symbol.is_epsilon() {
                insert(production.lhs.clone(), symbol.clone(), production)?;
            }
        }

        if first_alpha.contains(&Symbol::Epsilon) {
            let follow_lhs = follow_sets.get(&production.lhs).cloned().unwrap_or_default();
            for symbol in follow_lhs {
                insert(production.lhs.clone(), symbol, production)?;
            }
        }
    }

    Ok(table)
}
