use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use webroot::config::{Config, LISTEN_ENV, WEBROOT_ENV};
use webroot::http::connection::ConnectionLimits;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:10000");
    assert_eq!(cfg.server.backlog, 1);
    assert_eq!(cfg.server.max_request_bytes, 8192);
    assert_eq!(cfg.server.read_timeout_secs, None);
    assert_eq!(cfg.static_files.root, PathBuf::from("webroot"));
}

#[test]
fn test_config_empty_yaml_uses_defaults() {
    let cfg = Config::from_yaml_str("").unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:10000");

    let cfg = Config::from_yaml_str("  \n").unwrap();
    assert_eq!(cfg.static_files.root, PathBuf::from("webroot"));
}

#[test]
fn test_config_full_yaml() {
    let yaml = r#"
server:
  listen_addr: "0.0.0.0:8000"
  backlog: 16
  max_request_bytes: 1024
  read_timeout_secs: 5
static_files:
  root: "/srv/www"
"#;
    let cfg = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(cfg.server.listen_addr, "0.0.0.0:8000");
    assert_eq!(cfg.server.backlog, 16);
    assert_eq!(cfg.server.max_request_bytes, 1024);
    assert_eq!(cfg.server.read_timeout_secs, Some(5));
    assert_eq!(cfg.static_files.root, PathBuf::from("/srv/www"));
}

#[test]
fn test_config_partial_yaml_fills_defaults() {
    let yaml = r#"
static_files:
  root: "public"
"#;
    let cfg = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:10000");
    assert_eq!(cfg.server.max_request_bytes, 8192);
    assert_eq!(cfg.static_files.root, PathBuf::from("public"));
}

#[test]
fn test_config_invalid_yaml_is_error() {
    let yaml = "server:\n  backlog: not-a-number\n";
    assert!(Config::from_yaml_str(yaml).is_err());
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server:\n  listen_addr: \"127.0.0.1:9000\"").unwrap();

    let cfg = Config::from_file(file.path()).unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:9000");
}

#[test]
fn test_config_from_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::from_file(dir.path().join("nope.yaml"));

    assert!(result.is_err());
}

#[test]
fn test_config_env_overrides() {
    let env: HashMap<&str, &str> = HashMap::from([
        (LISTEN_ENV, "0.0.0.0:3000"),
        (WEBROOT_ENV, "/tmp/site"),
    ]);

    let mut cfg = Config::default();
    cfg.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.static_files.root, PathBuf::from("/tmp/site"));
}

#[test]
fn test_config_no_overrides_keeps_file_values() {
    let mut cfg = Config::from_yaml_str("server:\n  listen_addr: \"127.0.0.1:8123\"\n").unwrap();
    cfg.apply_overrides(|_| None);

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8123");
    assert_eq!(cfg.static_files.root, PathBuf::from("webroot"));
}

#[test]
fn test_config_connection_limits() {
    let cfg = Config::from_yaml_str("server:\n  max_request_bytes: 512\n  read_timeout_secs: 2\n")
        .unwrap();
    let limits = ConnectionLimits::from(&cfg.server);

    assert_eq!(limits.max_request_bytes, 512);
    assert_eq!(limits.read_timeout, Some(std::time::Duration::from_secs(2)));
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.server.listen_addr, cfg2.server.listen_addr);
}
