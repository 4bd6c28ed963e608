//! Parse drivers: the stack machines that walk a built table over an input
//! token stream.
//!
//! One `LrDriver` serves all four LR schemes (LR(0), SLR(1), LR(1),
//! LALR(1)) since they only differ in how their table was built, not in how
//! it's driven. `LlDriver` is the separate top-down stack machine LL(1)
//! needs.

use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use crate::tables::{Action, Table};
use std::collections::HashMap;

/// Drives an LR ACTION/GOTO table over a token stream.
pub struct LrDriver<'a> {
    table: &'a Table,
}

impl<'a> LrDriver<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// Parses `tokens` (terminal symbols, `$` appended automatically).
    /// Returns `Ok(())` on accept, or the `Error` explaining why the input
    /// was rejected.
    pub fn parse(&self, tokens: &[Symbol]) -> Result<()> {
        let mut input: Vec<Symbol> = tokens.to_vec();
        input.push(Symbol::EndMarker);

        let mut state_stack: Vec<usize> = vec![0];
        let mut input_index = 0;

        loop {
            let state = *state_stack.last().unwrap();
            let current = &input[input_index];
            let key = (state, current.clone());

            match self.table.action.get(&key) {
                Some(Action::Accept) => return Ok(()),
                Some(Action::Shift(next)) => {
                    state_stack.push(*next);
                    input_index += 1;
                }
                Some(Action::Reduce(production)) => {
                    let pop_count = if production.is_epsilon() {
                        0
                    } else {
                        production.rhs.len()
                    };
                    for _ in 0..pop_count {
                        state_stack.pop();
                    }

                    let state_after_pop = *state_stack.last().unwrap();
                    let goto_key = (state_after_pop, production.lhs.clone());
                    match self.table.goto.get(&goto_key) {
                        Some(&next) => state_stack.push(next),
                        None => {
                            return Err(Error::Internal(format!(
                                "no goto entry for state {state_after_pop}, nonterminal {}",
                                production.lhs
                            )))
                        }
                    }
                }
                None => {
                    return Err(Error::NoAction {
                        state,
                        symbol: current.to_string(),
                    })
                }
            }
        }
    }
}

/// Drives the LL(1) predictive parse table over a token stream.
pub struct LlDriver<'a> {
    grammar: &'a Grammar,
    table: &'a HashMap<(Symbol, Symbol), crate::grammar::Production>,
}

impl<'a> LlDriver<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a HashMap<(Symbol, Symbol), crate::grammar::Production>) -> Self {
        Self { grammar, table }
    }

    /// Parses `tokens` (terminal symbols, `$` appended automatically).
    pub fn parse(&self, tokens: &[Symbol]) -> Result<()> {
        let mut input: Vec<Symbol> = tokens.to_vec();
        input.push(Symbol::EndMarker);

        let mut stack: Vec<Symbol> = vec![Symbol::EndMarker, self.grammar.start_symbol().clone()];
        let mut input_index = 0;

        while let Some(top) = stack.last().cloned() {
            let current = &input[input_index];

            if top == *current {
                stack.pop();
                input_index += 1;
                if top.is_end_marker() {
                    return Ok(());
                }
                continue;
            }

            if top.is_nonterminal() {
                let key = (top.clone(), current.clone());
                match self.table.get(&key) {
                    Some(production) => {
                        stack.pop();
                        if !production.is_epsilon() {
                            for symbol in production.rhs.iter().rev() {
                                stack.push(symbol.clone());
                            }
                        }
                    }
                    None => {
                        return Err(Error::NoAction {
                            state: 0,
                            symbol: current.to_string(),
                        })
                    }
                }
            } else {
                return Err(Error::UnexpectedTerminal {
                    expected: top.to_string(),
                    found: current.to_string(),
                });
            }
        }

        Err(Error::Internal(
            "LL(1) driver exited its loop without consuming the end marker".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{augment, build_lr1_automaton};
    use crate::sets::{compute_first_sets, compute_follow_sets};
    use crate::tables::{build_ll1_table, build_lr1_style_table};
    use crate::error::Scheme;

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
    fn lr1_driver_accepts_and_rejects_arithmetic_expressions() {
        let grammar = arithmetic_grammar();
        let first = compute_first_sets(&grammar);
        let start = augment(&grammar);
        let automaton = build_lr1_automaton(&grammar, &first, &start);
        let table = build_lr1_style_table(&automaton, &start, Scheme::Lr1).unwrap();
        let driver = LrDriver::new(&table);

        let accept = vec![
            Symbol::terminal("id"),
            Symbol::terminal("+"),
            Symbol::terminal("id"),
            Symbol::terminal("*"),
            Symbol::terminal("id"),
        ];
        assert!(driver.parse(&accept).is_ok());

        let reject = vec![Symbol::terminal("id"), Symbol::terminal("+")];
        assert!(driver.parse(&reject).is_err());
    }

    #[test]
    fn ll1_driver_rejects_left_recursive_grammar_at_construction() {
        let grammar = arithmetic_grammar();
        let first = compute_first_sets(&grammar);
        let follow = compute_follow_sets(&grammar, &first);
        assert!(build_ll1_table(&grammar, &first, &follow).is_err());
    }

    #[test]
    fn ll1_driver_accepts_right_recursive_grammar() {
        let grammar = Grammar::new(
            vec![
                ("S".to_string(), vec!["a".to_string(), "S".to_string()]),
                ("S".to_string(), vec![]),
            ],
            "S",
        )
        .unwrap();
        let first = compute_first_sets(&grammar);
        let follow = compute_follow_sets(&grammar, &first);
        let table = build_ll1_table(&grammar, &first, &follow).unwrap();
        let driver = LlDriver::new(&grammar, &table);

        assert!(driver.parse(&[]).is_ok());
        assert!(driver
            .parse(&[Symbol::terminal("a"), Symbol::terminal("a")])
            .is_ok());
        assert!(driver.parse(&[Symbol::terminal("b")]).is_err());
    }
}
