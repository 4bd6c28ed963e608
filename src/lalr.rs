//! LALR(1) construction by core-merging the canonical LR(1) automaton.
//!
//! This is the simple (if not the most memory-efficient) route to LALR(1):
//! build the full canonical LR(1) collection, then merge any two states that
//! share the same LR(0) core (production + dot, lookahead dropped) by
//! unioning their lookaheads. The canonical on-the-fly construction that
//! never materializes the full LR(1) collection is more involved and isn't
//! needed for the grammar sizes this crate targets.

use crate::automaton::{augment, build_lr1_automaton, Automaton};
use crate::error::{Error, Result};
use crate::grammar::{Grammar, Production};
use crate::lr1::{Lr1Item, Lr1ItemSet};
use crate::sets::FirstSets;
use crate::symbol::Symbol;
use std::collections::BTreeMap;
use tracing::debug;

/// Builds the LALR(1) automaton for `grammar`: same state shape as LR(1),
/// but with same-core states merged.
pub fn build_lalr1_automaton(
    grammar: &Grammar,
    first_sets: &FirstSets,
) -> Result<(Production, Automaton<Lr1ItemSet>)> {
    let start_production = augment(grammar);
    let lr1 = build_lr1_automaton(grammar, first_sets, &start_production);

    // Assign each LR(1) state's core a merged-state id, in order of first
    // appearance so state 0 (the LR(1) start state's core) stays state 0.
    let mut core_order: Vec<Vec<(Production, usize)>> = Vec::new();
    let mut core_to_merged: BTreeMap<Vec<(Production, usize)>, usize> = BTreeMap::new();
    let mut old_to_merged: Vec<usize> = Vec::with_capacity(lr1.states.len());

    for state in &lr1.states {
        let mut core: Vec<(Production, usize)> =
            state.iter().map(Lr1Item::core).collect();
        core.sort();
        core.dedup();

        let merged_id = *core_to_merged.entry(core.clone()).or_insert_with(|| {
            let id = core_order.len();
            core_order.push(core);
            id
        });
        old_to_merged.push(merged_id);
    }

    debug!(
        lr1_states = lr1.states.len(),
        lalr_states = core_order.len(),
        "merged LR(1) states by core"
    );

    // Union lookaheads of every old state mapped to each merged state.
    let mut merged_states: Vec<Lr1ItemSet> = vec![Lr1ItemSet::new(); core_order.len()];
    for (old_id, state) in lr1.states.iter().enumerate() {
        let merged_id = old_to_merged[old_id];
        for item in state {
            merged_states[merged_id].insert(item.clone());
        }
    }

    // Remap transitions; a merge is only valid LALR(1) if every old
    // transition out of states sharing a merged id agrees on all others
    // once mapped, which holds by construction for LR(1) states sharing an
    // LR(0) core (they have identical goto structure over the grammar).
    let mut merged_transitions = std::collections::HashMap::new();
    for ((old_src, symbol), &old_dst) in &lr1.transitions {
        let merged_src = old_to_merged[*old_src];
        let merged_dst = old_to_merged[old_dst];
        let key = (merged_src, symbol.clone());

        if let Some(&existing) = merged_transitions.get(&key) {
            if existing != merged_dst {
                return Err(Error::Internal(format!(
                    "LALR(1) core merge produced inconsistent goto for state {merged_src}, symbol {symbol}"
                )));
            }
        } else {
            merged_transitions.insert(key, merged_dst);
        }
    }

    Ok((
        start_production,
        Automaton {
            states: merged_states,
            transitions: merged_transitions,
        },
    ))
}
