//! Table-driven parser construction for context-free grammars.
//!
//! Builds ACTION/GOTO (or LL(1) predictive) tables for a grammar under one
//! of five parsing schemes — LL(1), LR(0), SLR(1), LR(1), LALR(1) — and
//! drives them over a token stream. Construction reports *why* a grammar
//! does not fit a scheme (a specific conflict) rather than only that it
//! doesn't.

pub mod automaton;
pub mod driver;
pub mod error;
pub mod grammar;
pub mod lalr;
pub mod lr0;
pub mod lr1;
pub mod sets;
pub mod symbol;
pub mod tables;

use automaton::{augment, build_lr0_automaton, build_lr1_automaton};
use driver::{LlDriver, LrDriver};
use grammar::Production;
use lalr::build_lalr1_automaton;
use sets::{compute_first_sets, compute_follow_sets};
use std::collections::HashMap;
use tables::{build_ll1_table, build_lr0_table, build_lr1_style_table, build_slr1_table, Table};
use tracing::info;

pub use error::{Error, Result, Scheme};
pub use grammar::Grammar;
pub use symbol::Symbol;

/// A built LR parser: an owned grammar plus its ACTION/GOTO tables.
pub struct LrParser {
    grammar: Grammar,
    table: Table,
}

impl LrParser {
    /// Parses `tokens` against this parser's table. See [`driver::LrDriver`].
    pub fn parse(&self, tokens: &[Symbol]) -> Result<()> {
        LrDriver::new(&self.table).parse(tokens)
    }

    /// The grammar this parser was built from.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

/// A built LL(1) parser: an owned grammar plus its predictive parse table.
pub struct LlParser {
    grammar: Grammar,
    table: HashMap<(Symbol, Symbol), Production>,
}

impl LlParser {
    /// Parses `tokens` against this parser's table. See [`driver::LlDriver`].
    pub fn parse(&self, tokens: &[Symbol]) -> Result<()> {
        LlDriver::new(&self.grammar, &self.table).parse(tokens)
    }

    /// The grammar this parser was built from.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

/// A parser built under one of the five supported schemes.
pub enum Parser {
    Lr(LrParser),
    Ll(LlParser),
}

impl Parser {
    /// Parses `tokens`, dispatching to the underlying LR or LL driver.
    pub fn parse(&self, tokens: &[Symbol]) -> Result<()> {
        match self {
            Parser::Lr(parser) => parser.parse(tokens),
            Parser::Ll(parser) => parser.parse(tokens),
        }
    }

    pub fn grammar(&self) -> &Grammar {
        match self {
            Parser::Lr(parser) => parser.grammar(),
            Parser::Ll(parser) => parser.grammar(),
        }
    }
}

/// Builds a parser for `grammar` under `scheme`.
///
/// Fails with a [`Error::ConstructionConflict`] naming the offending state
/// and symbol if the grammar does not fit the requested scheme.
pub fn build(grammar: Grammar, scheme: Scheme) -> Result<Parser> {
    info!(%scheme, "building parser");

    let first_sets = compute_first_sets(&grammar);

    match scheme {
        Scheme::Ll1 => {
            let follow_sets = compute_follow_sets(&grammar, &first_sets);
            let table = build_ll1_table(&grammar, &first_sets, &follow_sets)?;
            Ok(Parser::Ll(LlParser { grammar, table }))
        }
        Scheme::Lr0 => {
            let start = augment(&grammar);
            let automaton = build_lr0_automaton(&grammar, &start);
            let table = build_lr0_table(&automaton, &start, &grammar)?;
            Ok(Parser::Lr(LrParser { grammar, table }))
        }
        Scheme::Slr1 => {
            let follow_sets = compute_follow_sets(&grammar, &first_sets);
            let start = augment(&grammar);
            let automaton = build_lr0_automaton(&grammar, &start);
            let table = build_slr1_table(&automaton, &start, &follow_sets)?;
            Ok(Parser::Lr(LrParser { grammar, table }))
        }
        Scheme::Lr1 => {
            let start = augment(&grammar);
            let automaton = build_lr1_automaton(&grammar, &first_sets, &start);
            let table = build_lr1_style_table(&automaton, &start, Scheme::Lr1)?;
            Ok(Parser::Lr(LrParser { grammar, table }))
        }
        Scheme::Lalr1 => {
            let (start, automaton) = build_lalr1_automaton(&grammar, &first_sets)?;
            let table = build_lr1_style_table(&automaton, &start, Scheme::Lalr1)?;
            Ok(Parser::Lr(LrParser { grammar, table }))
        }
    }
}

/// Converts caller-named tokens into terminal symbols for [`Parser::parse`].
pub fn tokens<I, S>(names: I) -> Vec<Symbol>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Symbol::terminal).collect()
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
    fn lr0_rejects_the_classic_ambiguous_expression_grammar() {
        let grammar = arithmetic_grammar();
        assert!(build(grammar, Scheme::Lr0).is_err());
    }

    #[test]
    fn slr1_accepts_it_and_parses_a_nested_expression() {
        let grammar = arithmetic_grammar();
        let parser = build(grammar, Scheme::Slr1).unwrap();
        let input = tokens(["id", "+", "id", "*", "(", "id", "+", "id", ")"]);
        assert!(parser.parse(&input).is_ok());
    }

    #[test]
    fn lalr1_and_lr1_agree_on_acceptance() {
        let grammar = arithmetic_grammar();
        let input = tokens(["id", "*", "id"]);

        let lalr = build(arithmetic_grammar(), Scheme::Lalr1).unwrap();
        let lr1 = build(grammar, Scheme::Lr1).unwrap();

        assert!(lalr.parse(&input).is_ok());
        assert!(lr1.parse(&input).is_ok());
    }

    #[test]
    fn ll1_rejects_left_recursive_grammar_at_construction() {
        let grammar = arithmetic_grammar();
        assert!(build(grammar, Scheme::Ll1).is_err());
    }
}
