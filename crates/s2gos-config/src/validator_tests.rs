use super::*;
use std::path::PathBuf;

#[test]
fn test_validate_default_config() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_empty_title() {
    let mut config = Config::default();
    config.service.title = "  ".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "service.title"));
}

#[test]
fn test_validate_zero_workers() {
    let mut config = Config::default();
    config.jobs.max_workers = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert_eq!(
        result.errors[0].to_string(),
        "jobs.max_workers: max_workers must be greater than 0"
    );
}

#[test]
fn test_validate_large_pool_warning() {
    let mut config = Config::default();
    config.jobs.max_workers = 500;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].path, "jobs.max_workers");
}

#[test]
fn test_validate_log_level() {
    let mut config = Config::default();
    config.logging.level = "loud".to_string();
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "logging.level"));

    config.logging.level = "DEBUG".to_string();
    assert!(ConfigValidator::validate(&config).is_valid());

    config.logging.level = "info,s2gos_jobs=trace".to_string();
    assert!(ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_validate_empty_log_dir() {
    let mut config = Config::default();
    config.logging.log_dir = Some(PathBuf::new());
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "logging.log_dir"));
}

#[test]
fn test_validation_collects_all_errors() {
    let mut config = Config::default();
    config.service.title = String::new();
    config.jobs.max_workers = 0;
    config.logging.level = "verbose".to_string();

    let result = ConfigValidator::validate(&config);
    assert_eq!(result.errors.len(), 3);
}
