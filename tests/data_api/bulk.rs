//! Bundle Tests
//!
//! Offering a bundle to a banner that already holds a base color and an
//! empty pattern list, under every merge strategy.

use crate::common::*;

fn stripe() -> Pattern {
    Pattern::new("stripe", DyeColor::White)
}

fn incoming() -> Manipulator {
    Manipulator::new()
        .with(&DYE_COLOR, DyeColor::Blue)
        .with(&BANNER_PATTERNS, vec![stripe()])
}

// ============================================================================
// Merge strategies
// ============================================================================

#[test]
fn test_replace_writes_the_incoming_bundle() {
    let engine = engine();
    let mut banner = red_banner();
    let result = engine.offer_manipulator(&mut banner, incoming(), &MergeStrategy::Replace);

    assert!(result.is_successful());
    assert_eq!(banner.base, Some(DyeColor::Blue));
    assert_eq!(banner.patterns, Some(vec![stripe()]));
    assert_eq!(result.replaced().len(), 2);
}

#[test]
fn test_merge_favor_new_writes_the_incoming_bundle() {
    let engine = engine();
    let mut banner = red_banner();
    engine.offer_manipulator(&mut banner, incoming(), &MergeStrategy::MergeFavorNew);

    assert_eq!(banner.base, Some(DyeColor::Blue));
    assert_eq!(banner.patterns, Some(vec![stripe()]));
}

#[test]
fn test_ignore_all_leaves_the_banner_untouched() {
    let engine = engine();
    let mut banner = red_banner();
    let result = engine.offer_manipulator(&mut banner, incoming(), &MergeStrategy::IgnoreAll);

    assert!(result.is_no_data());
    assert_eq!(banner, red_banner());
}

#[test]
fn test_merge_favor_original_keeps_existing_values() {
    let engine = engine();
    let mut banner = red_banner();
    let result =
        engine.offer_manipulator(&mut banner, incoming(), &MergeStrategy::MergeFavorOriginal);

    assert!(result.is_no_data());
    assert_eq!(banner, red_banner());
}

#[test]
fn test_merge_favor_original_fills_missing_keys() {
    let engine = engine();
    let mut banner = Banner {
        base: Some(DyeColor::Red),
        patterns: None,
    };
    let result =
        engine.offer_manipulator(&mut banner, incoming(), &MergeStrategy::MergeFavorOriginal);

    assert!(result.is_successful());
    assert_eq!(banner.base, Some(DyeColor::Red));
    assert_eq!(banner.patterns, Some(vec![stripe()]));
}

#[test]
fn test_ignore_all_on_empty_host_writes_nothing() {
    let engine = engine();
    let mut banner = Banner::default();
    let result = engine.offer_manipulator(&mut banner, incoming(), &MergeStrategy::IgnoreAll);

    assert!(result.is_no_data());
    assert_eq!(banner, Banner::default());
}

#[test]
fn test_closure_merge_function() {
    let engine = engine();
    let mut banner = red_banner();
    let colors_only = |_: Option<&Manipulator>, mut bundle: Manipulator| {
        bundle.retain(|id| id == DYE_COLOR.id());
        bundle
    };
    engine.offer_manipulator(&mut banner, incoming(), &colors_only);

    assert_eq!(banner.base, Some(DyeColor::Blue));
    assert_eq!(banner.patterns, Some(Vec::new()));
}

// ============================================================================
// Folding
// ============================================================================

#[test]
fn test_bundle_with_partial_failure_reports_both() {
    let engine = engine();
    let mut sign = sign(&["a"]);
    let too_many: Vec<String> = (0..6).map(|i| i.to_string()).collect();
    let bundle = Manipulator::new()
        .with(&GLOWING, true)
        .with(&SIGN_LINES, too_many);

    let result = engine.offer_manipulator(&mut sign, bundle, &MergeStrategy::Replace);
    assert_eq!(result.status(), TransactionStatus::Failure);
    assert_eq!(result.successful_value(&GLOWING).map(|v| *v.get()), Some(true));
    assert!(result.rejected_value(&SIGN_LINES).is_some());
    assert!(sign.glowing);
}

#[test]
fn test_empty_bundle_is_no_data() {
    let engine = engine();
    let mut sign = Sign::default();
    let result = engine.offer_all(&mut sign, Vec::new());
    assert!(result.is_no_data());
}

// ============================================================================
// Snapshots and copies
// ============================================================================

#[test]
fn test_manipulator_snapshots_host_values() {
    let engine = engine();
    let banner = red_banner();
    let snapshot = engine.manipulator(&banner);

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.get(&DYE_COLOR), Some(&DyeColor::Red));
    assert_eq!(snapshot.get(&BANNER_PATTERNS), Some(&Vec::new()));

    let keys = engine.keys(&banner);
    assert!(keys.contains(DYE_COLOR.id()));
    assert!(keys.contains(BANNER_PATTERNS.id()));
}

#[test]
fn test_copy_between_hosts_of_the_same_type() {
    let engine = engine();
    let source = Banner {
        base: Some(DyeColor::Black),
        patterns: Some(vec![stripe()]),
    };
    let mut target = red_banner();

    let result = engine.copy_from(&source, &mut target, &MergeStrategy::Replace);
    assert!(result.is_successful());
    assert_eq!(target, source);
}

#[test]
fn test_copy_onto_host_missing_a_key_reports_failure() {
    let engine = engine();
    let source = Banner {
        base: Some(DyeColor::Blue),
        patterns: Some(vec![stripe()]),
    };
    let mut shield = ItemStack::new(ItemKind::Shield);

    let result = engine.copy_from(&source, &mut shield, &MergeStrategy::Replace);
    assert_eq!(result.status(), TransactionStatus::Failure);
    assert_eq!(shield.color, Some(DyeColor::Blue));
    assert_eq!(result.successful_value(&DYE_COLOR).map(|v| *v.get()), Some(DyeColor::Blue));
}
