//! End-to-end LL(1) scenarios: the same expression language, once in its
//! natural left-recursive form (rejected) and once with left recursion
//! eliminated (accepted).

use grammar_tables::{build, tokens, Error, Grammar, Scheme};

fn left_recursive_expression_grammar() -> Grammar {
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

/// `E -> T E' ; E' -> + T E' | e ; T -> F T' ; T' -> * F T' | e ; F -> ( E ) | id`
fn right_recursive_expression_grammar() -> Grammar {
    Grammar::new(
        vec![
            ("E".to_string(), vec!["T".to_string(), "E'".to_string()]),
            ("E'".to_string(), vec!["+".to_string(), "T".to_string(), "E'".to_string()]),
            ("E'".to_string(), vec![]),
            ("T".to_string(), vec!["F".to_string(), "T'".to_string()]),
            ("T'".to_string(), vec!["*".to_string(), "F".to_string(), "T'".to_string()]),
            ("T'".to_string(), vec![]),
            ("F".to_string(), vec!["(".to_string(), "E".to_string(), ")".to_string()]),
            ("F".to_string(), vec!["id".to_string()]),
        ],
        "E",
    )
    .unwrap()
}

#[test]
fn ll1_construction_fails_on_the_left_recursive_grammar() {
    let err = build(left_recursive_expression_grammar(), Scheme::Ll1).unwrap_err();
    match err {
        Error::ConstructionConflict { scheme, .. } => assert_eq!(scheme, Scheme::Ll1),
        other => panic!("expected a construction conflict, got {other:?}"),
    }
}

#[test]
fn ll1_accepts_the_left_recursion_eliminated_grammar() {
    let parser = build(right_recursive_expression_grammar(), Scheme::Ll1)
        .expect("left-recursion-eliminated grammar is LL(1)");
    let input = tokens(["id", "+", "id", "*", "(", "id", "+", "id", ")"]);
    assert!(parser.parse(&input).is_ok());
}

#[test]
fn ll1_rejects_malformed_input_on_the_eliminated_grammar() {
    let parser = build(right_recursive_expression_grammar(), Scheme::Ll1).unwrap();
    let input = tokens(["id", "+"]);
    assert!(parser.parse(&input).is_err());
}
