//! Undo Tests
//!
//! Applying the undo of a successful result restores the previous state.

use crate::common::*;
use proptest::prelude::*;

#[test]
fn test_undo_restores_replaced_lines() {
    let engine = engine();
    let mut sign = sign(&["before"]);
    let result = engine.offer(&mut sign, &SIGN_LINES, vec!["after".to_string()]);

    let undone = engine.undo(&mut sign, &result);
    assert!(undone.is_successful());
    assert_eq!(sign.lines, Some(vec!["before".to_string()]));
}

#[test]
fn test_undo_of_addition_removes_the_key() {
    let engine = engine();
    let mut banner = Banner::default();
    let result = engine.offer(&mut banner, &BANNER_PATTERNS, vec![]);
    assert!(result.is_successful());

    engine.undo(&mut banner, &result);
    assert_eq!(banner.patterns, None);
}

#[test]
fn test_undo_of_reset_delete_restores_flag() {
    let engine = engine();
    let mut sign = Sign {
        glowing: true,
        ..Sign::default()
    };
    let result = engine.remove(&mut sign, &GLOWING);
    assert!(!sign.glowing);

    engine.undo(&mut sign, &result);
    assert!(sign.glowing);
}

#[test]
fn test_undo_of_failure_changes_nothing() {
    let engine = engine();
    let mut hopper = hopper(3);
    let failed = engine.offer(&mut hopper, &COOLDOWN, 0);
    assert_eq!(failed.status(), TransactionStatus::Failure);

    assert!(engine.undo(&mut hopper, &failed).is_no_data());
    assert_eq!(hopper.cooldown, Some(3));
}

#[test]
fn test_undo_of_bundle_restores_every_key() {
    let engine = engine();
    let mut banner = red_banner();
    let bundle = Manipulator::new()
        .with(&DYE_COLOR, DyeColor::Blue)
        .with(&BANNER_PATTERNS, vec![Pattern::new("border", DyeColor::Black)]);

    let result = engine.offer_manipulator(&mut banner, bundle, &MergeStrategy::Replace);
    assert!(result.is_successful());
    assert_eq!(banner.base, Some(DyeColor::Blue));

    engine.undo(&mut banner, &result);
    assert_eq!(banner, red_banner());
}

proptest! {
    #[test]
    fn test_undo_round_trips_cooldown(v1 in 1i32..=1000, v2 in 1i32..=1000) {
        prop_assume!(v1 != v2);
        let engine = engine();
        let mut hopper = hopper(v1);

        let result = engine.offer(&mut hopper, &COOLDOWN, v2);
        prop_assert!(result.is_successful());
        prop_assert_eq!(engine.get(&hopper, &COOLDOWN), Some(v2));

        let undone = engine.undo(&mut hopper, &result);
        prop_assert!(undone.is_successful());
        prop_assert_eq!(engine.get(&hopper, &COOLDOWN), Some(v1));
    }

    #[test]
    fn test_undo_of_addition_round_trips(value in 1i32..=1000) {
        let engine = engine();
        let mut hopper = Hopper::default();

        let result = engine.offer(&mut hopper, &COOLDOWN, value);
        engine.undo(&mut hopper, &result);
        prop_assert_eq!(hopper.cooldown, None);
    }
}
