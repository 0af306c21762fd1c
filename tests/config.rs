use sentrygram::cli::Cli;
use sentrygram::config::{Config, TelegramConfig};
use sentrygram::formatting::DEFAULT_TEMPLATE;
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

fn cli_for(file: &NamedTempFile) -> Cli {
    Cli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    }
}

#[test]
#[serial]
fn test_load_full_valid_config() {
    let file = config_file(
        r#"
        log_level = "debug"
        [telegram]
        api_origin = "http://localhost:8081"
        api_token = "123456:ABC-DEF"
        receivers = """
-100123
-100456/42
"""
        message_template = "{title}"
        proxy = "socks5://127.0.0.1:1080"
        timeout_seconds = 10
    "#,
    );

    let config = Config::load(&cli_for(&file)).unwrap();

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.telegram.api_origin, "http://localhost:8081");
    assert_eq!(config.telegram.api_token, "123456:ABC-DEF");
    assert_eq!(config.telegram.receivers, "-100123\n-100456/42\n");
    assert_eq!(config.telegram.message_template, "{title}");
    assert_eq!(config.telegram.proxy(), Some("socks5://127.0.0.1:1080"));
    assert_eq!(config.telegram.timeout_seconds, 10);
    assert!(config.telegram.is_configured());
}

#[test]
#[serial]
fn test_load_default_values() {
    let file = config_file("");

    let config = Config::load(&cli_for(&file)).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.telegram.api_origin, "https://api.telegram.org");
    assert_eq!(config.telegram.message_template, DEFAULT_TEMPLATE);
    assert!(!config.telegram.is_configured());
}

#[test]
#[serial]
fn test_missing_config_file_uses_defaults() {
    let cli = Cli {
        config: Some(PathBuf::from("/nonexistent/sentrygram.toml")),
        ..Default::default()
    };

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.telegram, TelegramConfig::default());
}

#[test]
#[serial]
fn test_partial_telegram_section_keeps_defaults() {
    let file = config_file(
        r#"
        [telegram]
        api_token = "api:token"
        receivers = "123"
    "#,
    );

    let config = Config::load(&cli_for(&file)).unwrap();

    assert_eq!(config.log_level, "info");
    assert_eq!(config.telegram.api_origin, "https://api.telegram.org");
    assert_eq!(config.telegram.message_template, DEFAULT_TEMPLATE);
    assert_eq!(config.telegram.proxy, None);
    assert_eq!(config.telegram.timeout_seconds, 30);
}

#[test]
#[serial]
fn test_invalid_value_type() {
    let file = config_file(
        r#"
        [telegram]
        timeout_seconds = "soon"
    "#,
    );

    assert!(Config::load(&cli_for(&file)).is_err());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let file = config_file(
        r#"
        [telegram]
        api_token = "file:token"
        receivers = "123"
    "#,
    );
    std::env::set_var("SENTRYGRAM_TELEGRAM__API_TOKEN", "env:token");
    std::env::set_var("SENTRYGRAM_LOG_LEVEL", "trace");

    let config = Config::load(&cli_for(&file));

    std::env::remove_var("SENTRYGRAM_TELEGRAM__API_TOKEN");
    std::env::remove_var("SENTRYGRAM_LOG_LEVEL");

    let config = config.unwrap();
    assert_eq!(config.telegram.api_token, "env:token");
    assert_eq!(config.log_level, "trace");
    assert_eq!(config.telegram.receivers, "123");
}

#[test]
#[serial]
fn test_cli_overrides_file() {
    let file = config_file(
        r#"
        log_level = "warn"
        [telegram]
        api_origin = "http://from-file"
        api_token = "api:token"
    "#,
    );
    let cli = Cli {
        log_level: Some("debug".to_string()),
        api_origin: Some("http://from-cli".to_string()),
        proxy: Some("http://proxy:3128".to_string()),
        ..cli_for(&file)
    };

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.telegram.api_origin, "http://from-cli");
    assert_eq!(config.telegram.proxy(), Some("http://proxy:3128"));
    assert_eq!(config.telegram.api_token, "api:token");
}
