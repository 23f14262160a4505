//! Bounded Cooldown Tests
//!
//! A hopper cooldown bounded to `[1, i32::MAX]` with default 8.

use crate::common::*;

#[test]
fn test_below_minimum_is_rejected_and_prior_value_kept() {
    let engine = engine();
    let mut hopper = hopper(5);

    let result = engine.offer(&mut hopper, &COOLDOWN, 0);
    assert_eq!(result.status(), TransactionStatus::Failure);
    assert_eq!(result.rejected_value(&COOLDOWN).map(|v| *v.get()), Some(0));
    assert_eq!(engine.get(&hopper, &COOLDOWN), Some(5));
}

#[test]
fn test_below_minimum_on_fresh_hopper_reports_no_value() {
    let engine = engine();
    let mut hopper = Hopper::default();

    let result = engine.offer(&mut hopper, &COOLDOWN, 0);
    assert_eq!(result.status(), TransactionStatus::Failure);
    assert_eq!(engine.get(&hopper, &COOLDOWN), None);
    assert_eq!(engine.lookup(&hopper, &COOLDOWN), Lookup::Absent);
}

#[test]
fn test_provider_set_rejects_out_of_bounds() {
    let engine = engine();
    let mut hopper = hopper(5);
    let provider = engine.dispatch(&hopper, &COOLDOWN).found().unwrap();

    assert!(!provider.set(&mut hopper, 0).unwrap_or(true));
    assert_eq!(hopper.cooldown, Some(5));
    assert!(provider.set(&mut hopper, 1).unwrap());
    assert_eq!(hopper.cooldown, Some(1));
}

#[test]
fn test_value_carries_bounds_and_default() {
    let engine = engine();
    let hopper = hopper(20);
    let value = engine.get_value(&hopper, &COOLDOWN).unwrap();

    assert_eq!(*value.get(), 20);
    assert_eq!(*value.default_value(), DEFAULT_COOLDOWN);
    let bounds = value.bounds().unwrap();
    assert_eq!(*bounds.min(), 1);
    assert_eq!(*bounds.max(), i32::MAX);
}

#[test]
fn test_mutable_value_refuses_out_of_bounds_set() {
    let engine = engine();
    let hopper = hopper(20);
    let mut value = engine.get_value(&hopper, &COOLDOWN).unwrap();

    assert!(value.set(0).is_err());
    assert_eq!(*value.get(), 20);
    assert!(value.set(i32::MAX).is_ok());
}

#[test]
fn test_maximum_is_accepted() {
    let engine = engine();
    let mut hopper = Hopper::default();
    assert!(engine.offer(&mut hopper, &COOLDOWN, i32::MAX).is_successful());
    assert_eq!(hopper.cooldown, Some(i32::MAX));
}

// ============================================================================
// Degenerate range
// ============================================================================

#[derive(Debug, Default)]
struct Dropper {
    cooldown: Option<i32>,
}

#[test]
fn test_degenerate_range_accepts_only_its_single_value() {
    let mut builder = ProviderRegistry::builder();
    builder
        .register::<Dropper>()
        .create(&COOLDOWN)
        .get(|dropper| dropper.cooldown)
        .set(|dropper, cooldown| {
            dropper.cooldown = Some(cooldown);
            true
        })
        .bounds(4, 4)
        .build();
    let engine = DataEngine::with_config(builder.build().unwrap(), DataConfig::default());
    let mut dropper = Dropper::default();

    for rejected in [i32::MIN, 0, 3, 5, i32::MAX] {
        let result = engine.offer(&mut dropper, &COOLDOWN, rejected);
        assert_eq!(result.status(), TransactionStatus::Failure, "{rejected}");
        assert_eq!(dropper.cooldown, None);
    }
    assert!(engine.offer(&mut dropper, &COOLDOWN, 4).is_successful());
    assert_eq!(dropper.cooldown, Some(4));
}

#[test]
fn test_degenerate_bounds_on_values() {
    let bounds = Bounds::new(4, 4).unwrap();
    assert!(ImmutableValue::bounded(COOLDOWN.clone(), 4, 4, bounds.clone()).is_ok());
    assert!(ImmutableValue::bounded(COOLDOWN.clone(), 4, 3, bounds.clone()).is_err());
    assert!(ImmutableValue::bounded(COOLDOWN.clone(), 4, 5, bounds).is_err());
}
