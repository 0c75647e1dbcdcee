use gqload_logging::{
    build_env_filter, init_logging_from_config, init_simple_tracing, LogFormat, LogLevel,
    LoggingConfig,
};

#[test]
fn test_logging_config_from_yaml() {
    let yaml_config = r#"
level: debug
format: json
include_location: true
"#;

    let config: LoggingConfig = serde_yaml::from_str(yaml_config).unwrap();

    assert_eq!(config.level, LogLevel::Debug);
    assert_eq!(config.format, LogFormat::Json);
    assert!(config.include_location);

    init_logging_from_config(&config, None).unwrap();
    tracing::debug!(operation = "getAnnouncement", "json logging initialized");
}

#[test]
fn test_repeated_initialization_is_harmless() {
    let config = LoggingConfig::default();
    init_logging_from_config(&config, Some("warn")).unwrap();
    init_logging_from_config(&config, None).unwrap();
    init_simple_tracing("debug").unwrap();
}

#[test]
fn test_env_filter_prefers_explicit_level() {
    let filter = build_env_filter(Some("gqload_http=trace"));
    assert_eq!(filter.to_string(), "gqload_http=trace");
}
