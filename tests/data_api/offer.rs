//! Offer and Remove Tests

use crate::common::*;

// ============================================================================
// Offer
// ============================================================================

#[test]
fn test_offer_new_value_records_success_only() {
    let engine = engine();
    let mut sign = Sign::default();
    let lines = vec!["Hello".to_string(), "World".to_string()];

    let result = engine.offer(&mut sign, &SIGN_LINES, lines.clone());
    assert!(result.is_successful());
    assert_eq!(result.successful_value(&SIGN_LINES).unwrap().get(), &lines);
    assert!(result.replaced().is_empty());
    assert_eq!(sign.lines, Some(lines));
}

#[test]
fn test_offer_replacing_value_records_old_and_new() {
    let engine = engine();
    let mut sign = sign(&["old"]);

    let result = engine.offer(&mut sign, &SIGN_LINES, vec!["new".to_string()]);
    assert!(result.is_successful());
    assert_eq!(
        result.replaced_value(&SIGN_LINES).unwrap().get(),
        &vec!["old".to_string()]
    );
    assert_eq!(
        result.successful_value(&SIGN_LINES).unwrap().get(),
        &vec!["new".to_string()]
    );
}

#[test]
fn test_offer_same_value_is_success_no_data() {
    let engine = engine();
    let mut sign = sign(&["same"]);
    let result = engine.offer(&mut sign, &SIGN_LINES, vec!["same".to_string()]);
    assert!(result.is_no_data());
}

#[test]
fn test_setter_rejection_is_failure() {
    let engine = engine();
    let mut sign = sign(&["keep"]);
    let too_many: Vec<String> = (0..5).map(|i| i.to_string()).collect();

    let result = engine.offer(&mut sign, &SIGN_LINES, too_many);
    assert_eq!(result.status(), TransactionStatus::Failure);
    assert_eq!(result.rejected().len(), 1);
    assert_eq!(sign.lines, Some(vec!["keep".to_string()]));
}

#[test]
fn test_partial_write_is_error_status() {
    let engine = engine();
    let mut chest = Chest {
        storage_broken: true,
        ..Chest::default()
    };

    let result = engine.offer(&mut chest, &LOCK_TOKEN, "secret".to_string());
    assert_eq!(result.status(), TransactionStatus::Error);
    // The lock flag was written before the failure
    assert!(chest.locked);
    assert_eq!(chest.lock, None);
}

#[test]
fn test_offer_value_and_offer_any() {
    let engine = engine();
    let mut banner = Banner::default();

    let color = ImmutableValue::new(DYE_COLOR.clone(), DyeColor::White, DyeColor::Blue);
    assert!(engine.offer_value(&mut banner, &color).is_successful());
    assert_eq!(banner.base, Some(DyeColor::Blue));

    let patterns = ImmutableValue::of(
        BANNER_PATTERNS.clone(),
        vec![Pattern::new("stripe", DyeColor::Black)],
    );
    assert!(engine.offer_any(&mut banner, &patterns.erase()).is_successful());
    assert_eq!(banner.patterns.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_offer_any_for_unknown_key_fails() {
    let engine = engine();
    let mut banner = Banner::default();
    let stray = ImmutableValue::of(Key::<u8>::plain(KeyId::from_static("demo:stray")), 1);
    let result = engine.offer_any(&mut banner, &stray.erase());
    assert_eq!(result.status(), TransactionStatus::Failure);
    assert!(result.is_empty());
}

#[test]
fn test_offer_single_appends_to_list() {
    let engine = engine();
    let mut banner = red_banner();

    let stripe = Pattern::new("stripe", DyeColor::White);
    let cross = Pattern::new("cross", DyeColor::Black);
    assert!(engine
        .offer_single(&mut banner, &BANNER_PATTERNS, stripe.clone())
        .is_successful());
    engine.offer_single(&mut banner, &BANNER_PATTERNS, cross.clone());
    assert_eq!(banner.patterns, Some(vec![stripe.clone(), cross.clone()]));

    assert!(engine
        .remove_single(&mut banner, &BANNER_PATTERNS, &stripe)
        .is_successful());
    assert_eq!(banner.patterns, Some(vec![cross]));
}

#[test]
fn test_transform_applies_function_to_current_value() {
    let engine = engine();
    let mut sign = sign(&["hello"]);
    let result = engine.transform(&mut sign, &SIGN_LINES, |lines| {
        lines.iter().map(|line| line.to_uppercase()).collect()
    });
    assert!(result.is_successful());
    assert_eq!(sign.lines, Some(vec!["HELLO".to_string()]));
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn test_get_value_carries_default() {
    let engine = engine();
    let banner = red_banner();
    let value = engine.get_value(&banner, &DYE_COLOR).unwrap();
    assert_eq!(*value.get(), DyeColor::Red);
    assert_eq!(*value.default_value(), DyeColor::White);
    assert!(!value.as_immutable().erase().is_default());
}

// ============================================================================
// Remove
// ============================================================================

#[test]
fn test_remove_reports_old_value() {
    let engine = engine();
    let mut sign = sign(&["gone"]);
    let result = engine.remove(&mut sign, &SIGN_LINES);
    assert!(result.is_successful());
    assert_eq!(
        result.replaced_value(&SIGN_LINES).unwrap().get(),
        &vec!["gone".to_string()]
    );
    assert!(result.successful().is_empty());
    assert_eq!(sign.lines, None);
}

#[test]
fn test_remove_absent_value_is_no_data() {
    let engine = engine();
    let mut sign = Sign::default();
    assert!(engine.remove(&mut sign, &SIGN_LINES).is_no_data());
}

#[test]
fn test_remove_without_remover_fails() {
    let engine = engine();
    let mut banner = red_banner();
    let result = engine.remove(&mut banner, &DYE_COLOR);
    assert_eq!(result.status(), TransactionStatus::Failure);
    assert_eq!(banner.base, Some(DyeColor::Red));
}

#[test]
fn test_remove_with_reset_writes_default() {
    let engine = engine();
    let mut sign = Sign {
        glowing: true,
        ..Sign::default()
    };
    let result = engine.remove(&mut sign, &GLOWING);
    assert!(result.is_successful());
    assert_eq!(result.replaced_value(&GLOWING).map(|v| *v.get()), Some(true));
    assert_eq!(result.successful_value(&GLOWING).map(|v| *v.get()), Some(false));
    assert!(!sign.glowing);
}
