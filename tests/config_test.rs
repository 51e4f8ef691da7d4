//! Configuration loading and builder validation.

use std::io::Write;
use std::path::Path;

use stowaway::{CacheWriteMode, Stowaway, StowawayError, WorkerConfig};

#[test]
fn defaults_match_chat_deployment() {
    let config = WorkerConfig::default();
    assert_eq!(config.version, "github-chat-v1.0.0");
    assert_eq!(config.seed_urls[..2], ["/", "/index.html"]);
    assert_eq!(config.api_hosts, vec!["api.github.com"]);
    assert_eq!(config.offline_document, "/index.html");
    assert_eq!(config.sync_tag, "github-chat-sync");
    assert_eq!(config.notification.action_title, "View Chat");
}

#[test]
fn load_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
version = "chat-v2"
scope = "https://chat.example.com/"
seed_urls = ["/", "/app.js"]
api_hosts = ["api.example.com", "api.github.com"]
cache_write_mode = "await"

[notification]
action_title = "Open"
vibrate = [100]
"#
    )
    .unwrap();

    let config = WorkerConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.version, "chat-v2");
    assert_eq!(config.seed_urls, vec!["/", "/app.js"]);
    assert_eq!(config.api_hosts.len(), 2);
    assert_eq!(config.cache_write_mode, CacheWriteMode::Await);
    assert_eq!(config.notification.action_title, "Open");
    assert_eq!(config.notification.vibrate, vec![100]);
    // untouched fields keep their defaults
    assert_eq!(config.notification.action, "view");
    assert_eq!(config.sync_tag, "github-chat-sync");
}

#[test]
fn missing_explicit_path_is_configuration_error() {
    let err = WorkerConfig::load(Some(Path::new("/nonexistent/stowaway.toml"))).unwrap_err();
    assert!(matches!(err, StowawayError::Configuration(_)));
}

#[test]
fn builder_accepts_loaded_config() {
    let config = WorkerConfig::from_toml(
        r#"
version = "from-file"
scope = "https://chat.example.com/app/"
seed_urls = ["./", "index.html"]
"#,
    )
    .unwrap();

    let controller = Stowaway::builder().config(config).build().unwrap();

    assert_eq!(controller.version(), "from-file");
    let seeds: Vec<&str> = controller.seed_urls().iter().map(|u| u.as_str()).collect();
    assert_eq!(
        seeds,
        vec![
            "https://chat.example.com/app/",
            "https://chat.example.com/app/index.html"
        ]
    );
}

#[test]
fn builder_rejects_empty_version() {
    let err = Stowaway::builder().version("  ").build().err().unwrap();
    assert!(matches!(err, StowawayError::Configuration(_)));
}

#[test]
fn builder_rejects_relative_scope() {
    let err = Stowaway::builder().scope("/not-absolute").build().err().unwrap();
    assert!(matches!(err, StowawayError::InvalidUrl(_)));
}
