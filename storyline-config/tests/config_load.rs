use serial_test::serial;
use std::{fs, path::PathBuf};
use storyline_common::observability::LogFormat;
use storyline_config::StorylineConfigLoader;
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
server:
  host: 127.0.0.1
  port: 8088
site:
  base_url: "${STORYLINE_TEST_HOME}"
  timeout_secs: 10
logging:
  format: json
  filter: "storyline=debug"
  stderr: false
  "#;
    let p = write_yaml(&tmp, "storyline.yaml", file_yaml);

    temp_env::with_var(
        "STORYLINE_TEST_HOME",
        Some("https://www.example.com/"),
        || {
            let config = StorylineConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load system config");

            assert_eq!(config.server.bind_addr(), "127.0.0.1:8088");
            assert_eq!(config.site.base_url, "https://www.example.com/");
            assert_eq!(config.site.timeout_secs, 10);
            assert_eq!(config.logging.format, LogFormat::Json);
            assert_eq!(config.logging.filter, "storyline=debug");
            assert!(!config.logging.stderr);
        },
    );
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "storyline.yaml", "server:\n  port: 8088\n");

    temp_env::with_vars(
        [
            ("STORYLINE__SERVER__PORT", Some("9191")),
            ("STORYLINE__SITE__TIMEOUT_SECS", Some("3")),
        ],
        || {
            let config = StorylineConfigLoader::new().with_file(&p).load().unwrap();
            assert_eq!(config.server.port, 9191);
            assert_eq!(config.site.timeout_secs, 3);
        },
    );
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.yaml");
    assert!(StorylineConfigLoader::new().with_file(&missing).load().is_err());
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.yaml");
    let config = StorylineConfigLoader::new()
        .with_optional_file(&missing)
        .load()
        .unwrap();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.site.base_url, "https://time.com/");
}
