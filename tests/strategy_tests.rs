//! Strategy registry extension and composite derivation, exercised through
//! the matchers that bind against them.

use std::sync::Arc;

use futures::executor::block_on;
use specfold::prelude::*;

#[test]
fn option_strategies_format_present_and_absent_values() {
    let mut registry = build_default_strategy_registry();
    registry.register_option_of::<i32>().unwrap();

    let fmt = registry.formatter::<Option<i32>>().unwrap();
    assert_eq!(fmt.render(&Some(7)), "Some(7)");
    assert_eq!(fmt.render(&None), "None");
}

#[test]
fn optional_values_compare_through_the_composite() {
    let mut registry = build_default_strategy_registry();
    registry.register_option_of::<i32>().unwrap();
    let registry = Arc::new(registry);

    let fail = block_on(
        expect(Some(7))
            .with_registry(Arc::clone(&registry))
            .equals(None)
            .unwrap()
            .evaluate(),
    );
    assert_eq!(fail.message(), Some("Expected None but found Some(7)"));

    let pass = block_on(
        expect(None::<i32>)
            .with_registry(registry)
            .equals(None)
            .unwrap()
            .evaluate(),
    );
    assert!(pass.is_pass());
}

#[derive(Debug, Clone, PartialEq)]
struct Temperature(i32);

#[test]
fn a_user_type_matches_through_an_extended_registry() {
    let mut registry = build_default_strategy_registry();
    registry.register_equality::<Temperature>(|a, b| a.0 == b.0);
    registry.register_formatter::<Temperature>(|t| format!("{}C", t.0));
    let registry = Arc::new(registry);

    let fail = block_on(
        expect(Temperature(20))
            .with_registry(Arc::clone(&registry))
            .equals(Temperature(25))
            .unwrap()
            .evaluate(),
    );
    assert_eq!(fail.message(), Some("Expected 25C but found 20C"));

    let pass = block_on(
        expect(Temperature(20))
            .with_registry(registry)
            .equals(Temperature(20))
            .unwrap()
            .evaluate(),
    );
    assert!(pass.is_pass());
}

#[test]
fn sequence_composite_compares_whole_vectors() {
    let mut registry = build_default_strategy_registry();
    registry.register_sequence_of::<i32>().unwrap();
    let registry = Arc::new(registry);

    let fail = block_on(
        expect(vec![1, 2])
            .with_registry(registry)
            .equals(vec![1, 3])
            .unwrap()
            .evaluate(),
    );
    assert_eq!(fail.message(), Some("Expected [1, 3] but found [1, 2]"));
}

#[test]
fn faults_are_values_with_their_own_strategies() {
    let fail = block_on(
        expect(Fault::new("Parse", "bad token"))
            .equals(Fault::new("Parse", "eof"))
            .unwrap()
            .evaluate(),
    );
    let message = fail.message().unwrap();
    assert!(message.contains("Parse: eof"));
    assert!(message.contains("Parse: bad token"));
}
