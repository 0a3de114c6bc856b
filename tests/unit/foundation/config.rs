use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = CueConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.history_limit, 50);
    assert_eq!(cfg.removal_tolerance, 0.0);
    assert!(cfg.default_enabled);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = CueConfig::from_json_str(r#"{ "history_limit": 3 }"#).unwrap();
    assert_eq!(cfg.history_limit, 3);
    assert!(cfg.default_enabled);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(CueConfig::from_json_str(r#"{ "history_limit": 0 }"#).is_err());
    assert!(CueConfig::from_json_str(r#"{ "removal_tolerance": -1.0 }"#).is_err());
    assert!(CueConfig::from_json_str(r#"{ "unknown": true }"#).is_err());
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = CueConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}
