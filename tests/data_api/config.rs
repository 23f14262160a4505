//! Engine Configuration Tests

use crate::common::*;
use facet_data::CONFIG_FILE_NAME;
use tempfile::TempDir;

#[test]
fn test_open_writes_default_config() {
    let dir = TempDir::new().unwrap();
    let engine = DataEngine::open(registry(), dir.path()).unwrap();

    let path = dir.path().join(CONFIG_FILE_NAME);
    assert!(path.exists());
    assert_eq!(engine.config(), DataConfig::default());
    assert_eq!(DataConfig::from_file(&path).unwrap(), DataConfig::default());
}

#[test]
fn test_open_reads_existing_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[cache]\nenabled = false\n\n[transaction]\nskip_unchanged = false\n",
    )
    .unwrap();

    let engine = DataEngine::open(registry(), dir.path()).unwrap();
    let config = engine.config();
    assert!(!config.cache.enabled);
    assert!(!config.transaction.skip_unchanged);
    assert!(config.dispatch.strict_value_types);
    assert!(!engine.interner().policy().enabled);
}

#[test]
fn test_open_rejects_malformed_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[cache\nenabled = ").unwrap();
    assert!(DataEngine::open(registry(), dir.path()).is_err());
}

#[test]
fn test_skip_unchanged_off_calls_the_setter() {
    let mut config = DataConfig::default();
    config.transaction.skip_unchanged = false;
    let engine = engine_with(config);
    let mut sign = sign(&["same"]);

    let result = engine.offer(&mut sign, &SIGN_LINES, vec!["same".to_string()]);
    assert!(result.is_successful());
    assert!(!result.is_no_data());
    assert_eq!(result.replaced_value(&SIGN_LINES), result.successful_value(&SIGN_LINES));
}

#[test]
fn test_update_config_applies_to_running_engine() {
    let engine = engine();
    let mut sign = sign(&["same"]);
    assert!(engine
        .offer(&mut sign, &SIGN_LINES, vec!["same".to_string()])
        .is_no_data());

    engine.update_config(|config| config.transaction.skip_unchanged = false);
    assert!(!engine
        .offer(&mut sign, &SIGN_LINES, vec!["same".to_string()])
        .is_no_data());

    engine.update_config(|config| config.cache.enabled = false);
    assert!(!engine.interner().policy().enabled);
}
