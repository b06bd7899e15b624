use std::io::Write;

use serial_test::serial;
use verso_core::FailurePolicy;

use super::*;

const ENV_KEYS: [&str; 14] = [
    "VERSO_CONFIG",
    "VERSO_ALGOLIA_APP_ID",
    "VERSO_ALGOLIA_API_KEY",
    "VERSO_ALGOLIA_INDEX",
    "VERSO_ALGOLIA_BASE_URL",
    "VERSO_WEBHOOK_SECRET",
    "VERSO_GATEWAY_BIND",
    "VERSO_GATEWAY_PORT",
    "VERSO_ENABLED",
    "VERSO_IGNORE_SLUGS",
    "VERSO_PIPELINE_FAILURE_POLICY",
    "VERSO_PIPELINE_CONCURRENCY",
    "VERSO_PIPELINE_EXTRACT_TIMEOUT",
    "RUST_LOG",
];

fn clear_env() {
    for key in ENV_KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn missing_file_uses_defaults() {
    clear_env();
    let config = Config::load(Path::new("/nonexistent/verso.toml")).unwrap();
    assert_eq!(config.gateway.bind, "127.0.0.1");
    assert_eq!(config.gateway.port, 8090);
    assert_eq!(config.gateway.rate_limit, 120);
    assert_eq!(config.gateway.rate_window_secs, 60);
    assert!(config.gateway.secret.is_none());
    assert!(!config.controls.enabled);
    assert!(config.controls.ignore_slugs.is_empty());
    assert_eq!(config.pipeline.failure_policy, FailurePolicy::Abort);
    assert_eq!(config.pipeline.selectors, "p,pre,td,li");
    assert_eq!(config.algolia.timeout_secs, 30);
}

#[test]
#[serial]
fn parses_full_file() {
    clear_env();
    let file = write_config(
        r#"
[pipeline]
failure_policy = "skip"
concurrency = 8
extract_timeout_secs = 3

[algolia]
app_id = "APP"
api_key = "key"
index = "blog"

[algolia.settings]
searchableAttributes = ["title", "html"]

[gateway]
port = 9000
secret = "hook"

[controls]
enabled = true
ignore_slugs = ["about", "contact"]
"#,
    );
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.pipeline.failure_policy, FailurePolicy::Skip);
    assert_eq!(config.pipeline.concurrency, 8);
    assert_eq!(config.pipeline.extract_timeout_secs, 3);
    assert_eq!(config.algolia.app_id, "APP");
    assert_eq!(config.algolia.api_key.as_ref().map(Secret::expose), Some("key"));
    assert_eq!(config.algolia.settings.searchable_attributes, ["title", "html"]);
    assert!(config.algolia.settings.distinct);
    assert_eq!(config.gateway.port, 9000);
    assert_eq!(config.gateway.secret.as_ref().map(Secret::expose), Some("hook"));
    assert!(config.controls.enabled);
    assert_eq!(config.controls.ignore_slugs, ["about", "contact"]);
}

#[test]
#[serial]
fn malformed_file_is_an_error() {
    clear_env();
    let file = write_config("[gateway\nport = ");
    let err = Config::load(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse config file"));
}

#[test]
#[serial]
fn zero_pipeline_values_are_rejected() {
    clear_env();
    let file = write_config("[pipeline]\nconcurrency = 0\n");
    let err = Config::load(file.path()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("invalid [pipeline] section"));
    assert!(msg.contains("concurrency"));

    unsafe { std::env::set_var("VERSO_PIPELINE_EXTRACT_TIMEOUT", "0") };
    let err = Config::load(Path::new("/nonexistent/verso.toml")).unwrap_err();
    clear_env();
    assert!(format!("{err:#}").contains("extract_timeout_secs"));
}

#[test]
#[serial]
fn rate_window_from_file() {
    clear_env();
    let file = write_config("[gateway]\nrate_limit = 10\nrate_window_secs = 5\n");
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.gateway.rate_limit, 10);
    assert_eq!(config.gateway.rate_window_secs, 5);
}

#[test]
#[serial]
fn env_overrides_file_values() {
    clear_env();
    let file = write_config("[algolia]\napp_id = \"FILE\"\n[gateway]\nport = 9000\n");
    unsafe {
        std::env::set_var("VERSO_ALGOLIA_APP_ID", "ENV");
        std::env::set_var("VERSO_ALGOLIA_API_KEY", "env-key");
        std::env::set_var("VERSO_ALGOLIA_INDEX", "posts");
        std::env::set_var("VERSO_GATEWAY_PORT", "9100");
        std::env::set_var("VERSO_WEBHOOK_SECRET", "s3cret");
        std::env::set_var("VERSO_ENABLED", "1");
        std::env::set_var("VERSO_IGNORE_SLUGS", " about, ,contact ");
    }
    let config = Config::load(file.path()).unwrap();
    clear_env();

    assert_eq!(config.algolia.app_id, "ENV");
    assert_eq!(config.algolia.index, "posts");
    assert_eq!(config.gateway.port, 9100);
    assert_eq!(config.gateway.secret.as_ref().map(Secret::expose), Some("s3cret"));
    assert!(config.controls.enabled);
    assert_eq!(config.controls.ignore_slugs, ["about", "contact"]);
}

#[test]
#[serial]
fn pipeline_env_overrides() {
    clear_env();
    unsafe {
        std::env::set_var("VERSO_PIPELINE_FAILURE_POLICY", "skip");
        std::env::set_var("VERSO_PIPELINE_CONCURRENCY", "2");
        std::env::set_var("VERSO_PIPELINE_EXTRACT_TIMEOUT", "5");
    }
    let config = Config::load(Path::new("/nonexistent/verso.toml")).unwrap();
    clear_env();

    assert_eq!(config.pipeline.failure_policy, FailurePolicy::Skip);
    assert_eq!(config.pipeline.concurrency, 2);
    assert_eq!(config.pipeline.extract_timeout_secs, 5);
}

#[test]
#[serial]
fn invalid_env_values_are_ignored() {
    clear_env();
    unsafe {
        std::env::set_var("VERSO_PIPELINE_FAILURE_POLICY", "explode");
        std::env::set_var("VERSO_GATEWAY_PORT", "not-a-port");
        std::env::set_var("VERSO_ENABLED", "maybe");
    }
    let config = Config::load(Path::new("/nonexistent/verso.toml")).unwrap();
    clear_env();

    assert_eq!(config.pipeline.failure_policy, FailurePolicy::Abort);
    assert_eq!(config.gateway.port, 8090);
    assert!(!config.controls.enabled);
}

#[test]
#[serial]
fn enabled_flag_accepts_words() {
    clear_env();
    unsafe { std::env::set_var("VERSO_ENABLED", "true") };
    let config = Config::load(Path::new("/nonexistent/verso.toml")).unwrap();
    clear_env();
    assert!(config.controls.enabled);
}

#[test]
fn secret_debug_is_redacted() {
    let secret = Secret::new("my-api-key");
    assert_eq!(format!("{secret:?}"), "[REDACTED]");
    assert_eq!(format!("{secret}"), "[REDACTED]");
    assert_eq!(secret.expose(), "my-api-key");
}

#[test]
fn config_debug_hides_credentials() {
    let mut config = Config::default();
    config.algolia.api_key = Some(Secret::new("hunter2"));
    config.gateway.secret = Some(Secret::new("hook-secret"));
    let dbg = format!("{config:?}");
    assert!(!dbg.contains("hunter2"));
    assert!(!dbg.contains("hook-secret"));
}

#[test]
fn search_index_requires_credentials() {
    let config = Config::default();
    let err = config.search_index().unwrap_err();
    assert!(matches!(err, IndexError::Config(_)));
}

#[test]
fn search_index_with_credentials() {
    let mut config = Config::default();
    config.algolia.app_id = "APP".into();
    config.algolia.api_key = Some(Secret::new("key"));
    config.algolia.index = "blog".into();
    config.algolia.base_url = Some("http://127.0.0.1:1".into());
    let index = config.search_index().unwrap();
    assert_eq!(index.index_name(), "blog");
}

#[tokio::test]
async fn static_controls_from_config() {
    let mut config = Config::default();
    config.controls.enabled = true;
    config.controls.ignore_slugs = vec!["about".into()];
    let controls = config.control_source().controls().await;
    assert!(controls.enabled);
    assert_eq!(controls.ignore_slugs, ["about"]);
}

#[tokio::test]
async fn file_controls_take_precedence() {
    let file = write_config("enabled = false\n");
    let mut config = Config::default();
    config.controls.enabled = true;
    config.controls.file = Some(file.path().to_path_buf());
    assert!(!config.control_source().controls().await.enabled);
}

#[test]
#[serial]
fn config_path_resolution_order() {
    clear_env();
    assert_eq!(
        resolve_config_path(Some(Path::new("a.toml"))),
        PathBuf::from("a.toml")
    );
    assert_eq!(resolve_config_path(None), PathBuf::from("config/default.toml"));
    unsafe { std::env::set_var("VERSO_CONFIG", "/etc/verso.toml") };
    assert_eq!(resolve_config_path(None), PathBuf::from("/etc/verso.toml"));
    clear_env();
}
