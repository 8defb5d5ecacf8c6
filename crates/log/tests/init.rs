use craft_log::{Config, Format, LogError};

#[test]
fn init_test_is_idempotent() {
    craft_log::init_test();
    craft_log::init_test();
    tracing::info!(target: "craft_log::tests", "captured by the test writer");
}

#[test]
fn explicit_init_after_test_init_reports_conflict() {
    craft_log::init_test();
    let result = craft_log::init_with(Config {
        format: Format::Json,
        ..Config::test()
    });
    assert!(matches!(result, Err(LogError::Init(_))));
}

#[test]
fn config_deserializes_from_json() {
    let config: Config = serde_json::from_str(r#"{"level": "warn", "format": "pretty"}"#).unwrap();
    assert_eq!(config.level, "warn");
    assert_eq!(config.format, Format::Pretty);
    assert!(config.ansi);
}
