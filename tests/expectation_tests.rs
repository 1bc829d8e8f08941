//! Matcher semantics: equality, containment, async completion, negation, and
//! compound aggregation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::executor::block_on;
use specfold::prelude::*;

#[test]
fn equality_passes_and_fails_with_exact_messages() {
    let pass = block_on(expect(5).equals(5).unwrap().evaluate());
    assert!(pass.is_pass());

    let fail = block_on(expect(5).equals(6).unwrap().evaluate());
    assert_eq!(fail.message(), Some("Expected 6 but found 5"));
}

#[test]
fn negated_equality_flips_the_verdict_and_the_wording() {
    let pass = block_on(expect(5).not().equals(6).unwrap().evaluate());
    assert!(pass.is_pass());

    let fail = block_on(expect(5).not().equals(5).unwrap().evaluate());
    assert_eq!(fail.message(), Some("Expected 5 to not equal 5"));
}

#[test]
fn negation_is_involutive() {
    let plain = block_on(expect(5).equals(5).unwrap().evaluate());
    let doubled = block_on(expect(5).not().not().equals(5).unwrap().evaluate());
    assert_eq!(plain, doubled);

    let plain = block_on(expect(vec![1, 2]).contains(3).unwrap().evaluate());
    let doubled = block_on(expect(vec![1, 2]).not().not().contains(3).unwrap().evaluate());
    assert_eq!(plain, doubled);
}

#[test]
fn negation_does_not_force_the_deferred_computation() {
    let forced = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&forced);
    let handle = expect_with(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(11)
    })
    .not()
    .not();

    // Neither negation nor matcher binding materializes the value.
    let expectation = handle.equals(11).unwrap();
    assert_eq!(forced.load(Ordering::SeqCst), 0);

    block_on(expectation.evaluate()).assert_passed();
    assert_eq!(forced.load(Ordering::SeqCst), 1);

    // Each evaluation re-invokes the factory; idempotence is the caller's.
    block_on(expectation.evaluate()).assert_passed();
    assert_eq!(forced.load(Ordering::SeqCst), 2);
}

#[test]
fn a_failing_deferred_computation_errors_the_equality_matcher() {
    let handle: specfold::Expect<i32> = expect_with(|| Err(Fault::new("Setup", "no fixture")));
    let result = block_on(handle.equals(1).unwrap().evaluate());
    assert_eq!(result.fault().map(|f| f.kind.as_str()), Some("Setup"));
}

#[test]
fn containment_passes_on_membership_and_lists_elements_on_failure() {
    let pass = block_on(expect(vec![1, 2, 3]).contains(2).unwrap().evaluate());
    assert!(pass.is_pass());

    let fail = block_on(expect(vec![1, 2, 3]).contains(9).unwrap().evaluate());
    let message = fail.message().unwrap();
    assert!(message.contains("1, 2, 3"));
    assert!(message.contains('9'));
}

#[test]
fn negated_containment_flips_membership() {
    let pass = block_on(expect(vec![1, 2, 3]).not().contains(9).unwrap().evaluate());
    assert!(pass.is_pass());

    let fail = block_on(expect(vec![1, 2, 3]).not().contains(2).unwrap().evaluate());
    assert!(fail.message().unwrap().contains("to not contain 2"));
}

#[test]
fn listing_cap_truncates_the_diagnostic_not_the_search() {
    let items: Vec<i32> = (1..=10).collect();

    let fail = block_on(
        expect(items.clone())
            .listing_cap(4)
            .contains(99)
            .unwrap()
            .evaluate(),
    );
    let message = fail.message().unwrap().to_string();
    assert!(message.contains("1, 2, 3, 4"));
    assert!(message.contains("and 6 more"));

    // An element past the cap is still found.
    let pass = block_on(expect(items).listing_cap(4).contains(9).unwrap().evaluate());
    assert!(pass.is_pass());
}

#[tokio::test]
async fn completion_compares_the_resolved_value() {
    let pass = expect_future(|| async { Ok(42) })
        .completes_with(42)
        .unwrap()
        .evaluate()
        .await;
    assert!(pass.is_pass());

    let fail = expect_future(|| async { Ok(41) })
        .completes_with(42)
        .unwrap()
        .evaluate()
        .await;
    assert_eq!(fail.message(), Some("Expected 42 but found 41"));
}

#[tokio::test]
async fn rejection_fails_with_the_cause_cited() {
    let result = expect_future(|| async { Err::<i32, _>(Fault::new("Eval", "boom")) })
        .completes_with(42)
        .unwrap()
        .evaluate()
        .await;
    let message = result.message().unwrap();
    assert!(message.contains("boom"));
    assert!(message.contains("42"));
}

#[tokio::test]
async fn negated_completion_treats_rejection_as_a_pass() {
    let result = expect_future(|| async { Err::<i32, _>(Fault::new("Eval", "boom")) })
        .not()
        .completes_with(42)
        .unwrap()
        .evaluate()
        .await;
    assert!(result.is_pass());
}

#[tokio::test]
async fn negated_completion_on_a_resolved_match_fails() {
    let result = expect_future(|| async { Ok(7) })
        .not()
        .completes_with(7)
        .unwrap()
        .evaluate()
        .await;
    assert!(!result.is_pass());
}

#[derive(Clone, PartialEq)]
struct Unregistered(u8);

#[test]
fn matcher_construction_fails_for_an_unregistered_type() {
    let err = expect(Unregistered(1)).equals(Unregistered(1)).unwrap_err();
    assert!(err.type_name.contains("Unregistered"));
}

#[test]
fn empty_compound_passes() {
    let result = block_on(Expectation::all(Vec::new()).evaluate());
    assert!(result.is_pass());
}

#[test]
fn compound_combines_failures_regardless_of_ordering() {
    let failing = expect(1).equals(2).unwrap();
    let passing = expect(3).equals(3).unwrap();

    let fail_first = block_on(Expectation::all(vec![failing.clone(), passing.clone()]).evaluate());
    let fail_last = block_on(Expectation::all(vec![passing, failing]).evaluate());
    assert_eq!(fail_first.message(), Some("Expected 2 but found 1"));
    assert_eq!(fail_first, fail_last);
}

#[test]
fn compound_lists_every_failure() {
    let first = expect(1).equals(2).unwrap();
    let second = expect(5).equals(6).unwrap();
    let result = block_on(Expectation::all(vec![first, second]).evaluate());
    let message = result.message().unwrap();
    assert!(message.contains("Expected 2 but found 1"));
    assert!(message.contains("Expected 6 but found 5"));
}

#[test]
fn compound_passes_when_every_inner_passes() {
    let result = block_on(
        Expectation::all(vec![
            expect(1).equals(1).unwrap(),
            expect(vec![1, 2]).contains(2).unwrap(),
        ])
        .evaluate(),
    );
    assert!(result.is_pass());
}

#[test]
fn compound_errors_dominate_failures() {
    let failing = expect(1).equals(2).unwrap();
    let errored = expect_with(|| Err::<i32, _>(Fault::new("Setup", "down")))
        .equals(1)
        .unwrap();
    let result = block_on(Expectation::all(vec![failing, errored]).evaluate());
    assert_eq!(result.fault().map(|f| f.message.as_str()), Some("down"));
}
