use std::collections::HashMap;

use super::*;

fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
    let map: HashMap<&str, &str> = pairs.iter().copied().collect();
    Settings::from_lookup(&|key: &str| map.get(key).map(|v| (*v).to_string()))
}

#[test]
fn defaults_match_documented_values() {
    let s = settings(&[]).unwrap();
    assert_eq!(s.host, "0.0.0.0");
    assert_eq!(s.port, 8000);
    assert_eq!(s.environment, "development");
    assert_eq!(s.log_level, LogLevel::Warn);
    assert_eq!(s.log_format, LogFormat::Text);
    assert_eq!(s.prompts_dir, PathBuf::from("prompts"));
    assert_eq!(s.default_provider, ProviderKind::OpenAi);
    assert_eq!(s.bind_addr(), "0.0.0.0:8000");
}

#[test]
fn overrides_are_applied() {
    let s = settings(&[
        ("HOST", "127.0.0.1"),
        ("PORT", "9100"),
        ("ENVIRONMENT", "production"),
        ("LOG_LEVEL", "INFO"),
        ("LOG_FORMAT", "json"),
        ("PROMPTS_DIR", "/etc/summary/prompts"),
        ("DEFAULT_AI_PROVIDER", "gemini"),
        ("GOOGLE_API_KEY", "g-key"),
    ])
    .unwrap();
    assert_eq!(s.bind_addr(), "127.0.0.1:9100");
    assert_eq!(s.environment, "production");
    assert_eq!(s.log_level, LogLevel::Info);
    assert_eq!(s.log_format, LogFormat::Json);
    assert_eq!(s.prompts_dir, PathBuf::from("/etc/summary/prompts"));
    assert_eq!(s.default_provider, ProviderKind::Gemini);
    assert_eq!(s.llm.gemini.api_key, "g-key");
}

#[test]
fn log_level_accepts_python_style_names() {
    assert_eq!(settings(&[("LOG_LEVEL", "WARNING")]).unwrap().log_level, LogLevel::Warn);
    assert_eq!(settings(&[("LOG_LEVEL", "debug")]).unwrap().log_level, LogLevel::Debug);
    assert_eq!(settings(&[("LOG_LEVEL", "CRITICAL")]).unwrap().log_level, LogLevel::Error);
    assert_eq!(LogLevel::Warn.as_filter(), "warn");
}

#[test]
fn invalid_port_errors() {
    let err = settings(&[("PORT", "eighty")]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
}

#[test]
fn invalid_log_level_errors() {
    assert!(settings(&[("LOG_LEVEL", "loud")]).is_err());
}

#[test]
fn invalid_log_format_errors() {
    assert!(settings(&[("LOG_FORMAT", "xml")]).is_err());
}

#[test]
fn unsupported_default_provider_errors() {
    let err = settings(&[("DEFAULT_AI_PROVIDER", "claude")]).unwrap_err();
    assert!(matches!(err, ConfigError::Llm(LlmError::UnsupportedProvider(_))));
}

#[test]
fn invalid_openai_mode_errors() {
    let err = settings(&[("OPENAI_API_MODE", "batch")]).unwrap_err();
    assert!(err.to_string().contains("OPENAI_API_MODE"));
}
