//! Integration tests for configuration resolution and persistence.
//!
//! These tests exercise the layered store and the typed settings through
//! the public API of the iniq crate.

use std::fs;
use std::path::{Path, PathBuf};

use iniq::config::{self, Config, ConfigError, Store, Value};
use iniq::env::Env;
use pretty_assertions::assert_eq;

fn store_with_env(vars: &[(&str, &str)]) -> Store {
    let mut store = Store::new(Env::mock(vars.iter().copied()));
    config::register_defaults(&mut store);
    store
}

fn write_file(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("iniq.yaml");
    fs::write(&path, content).unwrap();
    path
}

// ---------------------------------------------------------------------------
// precedence
// ---------------------------------------------------------------------------

#[test]
fn override_beats_file_and_file_beats_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "user: file-user\nsudo-nopasswd: false\n");

    let mut store = store_with_env(&[]);
    store.init(Some(&path)).unwrap();
    store.set("user", "flag-user");

    assert_eq!(store.get("user"), Some(Value::from("flag-user")));
    assert!(!store.get_bool("sudo-nopasswd").unwrap());
}

#[test]
fn env_var_sets_bool_without_file_or_override() {
    let mut store = store_with_env(&[("INIQ_SSH_NO_ROOT", "true")]);
    store.init(Some(Path::new("/nonexistent/path"))).unwrap();
    assert!(store.get_bool("ssh-no-root").unwrap());
}

#[test]
fn env_beats_file_but_not_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "backup: false\nyes: false\n");

    let mut store = store_with_env(&[("INIQ_BACKUP", "true"), ("INIQ_YES", "true")]);
    store.init(Some(&path)).unwrap();
    store.set("yes", false);

    let config = Config::from_store(&store).unwrap();
    assert!(config.backup);
    assert!(!config.yes);
}

#[test]
fn flag_and_file_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "user: config-user\nssh-no-root: false\nssh-no-password: false\n",
    );

    let mut store = store_with_env(&[]);
    store.init(Some(&path)).unwrap();
    store.set("user", "cli-user");
    store.set("ssh-no-root", true);

    let config = Config::from_store(&store).unwrap();
    assert_eq!(
        config,
        Config {
            user: "cli-user".into(),
            ssh_no_root: true,
            ssh_no_password: false,
            ..Config::default()
        }
    );
}

// ---------------------------------------------------------------------------
// defaults and missing files
// ---------------------------------------------------------------------------

#[test]
fn empty_file_keeps_true_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "");

    let mut store = store_with_env(&[]);
    store.init(Some(&path)).unwrap();
    let config = Config::from_store(&store).unwrap();

    assert!(config.sudo_nopasswd);
    assert!(config.ssh_no_root);
    assert!(config.ssh_no_password);
    assert_eq!(config, Config::default());
}

#[test]
fn missing_file_falls_back_silently() {
    let mut store = store_with_env(&[]);
    store.init(Some(Path::new("/nonexistent/path"))).unwrap();
    assert_eq!(store.get_string("user").unwrap(), "");
    assert!(store.config_file_used().is_none());
}

#[test]
fn missing_home_file_falls_back_silently() {
    let home = tempfile::tempdir().unwrap();
    let mut store = store_with_env(&[]).with_home_dir(home.path());
    store.init(None).unwrap();
    assert_eq!(Config::from_store(&store).unwrap(), Config::default());
}

#[test]
fn malformed_file_aborts_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "user: \"unterminated\nkeys: [\n");

    let err = store_with_env(&[]).init(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::ParseFile { .. }), "{err:?}");
}

#[test]
fn unknown_keys_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "user: alice\nfavourite-colour: blue\nnested:\n  a: [1, 2]\n");

    let mut store = store_with_env(&[]);
    store.init(Some(&path)).unwrap();
    let config = Config::from_store(&store).unwrap();
    assert_eq!(config.user, "alice");
}

// ---------------------------------------------------------------------------
// sequences and coercion
// ---------------------------------------------------------------------------

#[test]
fn keys_preserve_order_and_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "keys: [github:alice, gitlab:alice, github:alice]\n",
    );

    let mut store = store_with_env(&[]);
    store.init(Some(&path)).unwrap();
    let config = Config::from_store(&store).unwrap();
    assert_eq!(config.keys, vec!["github:alice", "gitlab:alice", "github:alice"]);
}

#[test]
fn scalar_where_list_expected_becomes_single_item() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "keys: github:alice\n");

    let mut store = store_with_env(&[]);
    store.init(Some(&path)).unwrap();
    assert_eq!(Config::from_store(&store).unwrap().keys, vec!["github:alice"]);
}

#[test]
fn list_where_bool_expected_is_a_type_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "dry-run: [yes]\n");

    let mut store = store_with_env(&[]);
    store.init(Some(&path)).unwrap();
    match Config::from_store(&store).unwrap_err() {
        ConfigError::InvalidType { key, expected, .. } => {
            assert_eq!(key, "dry-run");
            assert_eq!(expected, "bool");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn mapping_under_schema_key_is_a_type_error() {
    let dir = tempfile::tempdir().unwrap();
    let cases = [
        ("ssh-no-root: {enabled: false}\n", "ssh-no-root", "bool"),
        ("keys: {github: alice}\n", "keys", "list"),
        ("user: {name: bob}\n", "user", "string"),
    ];

    for (content, expected_key, expected_type) in cases {
        let path = write_file(dir.path(), content);
        let mut store = store_with_env(&[]);
        store.init(Some(&path)).unwrap();

        match Config::from_store(&store).unwrap_err() {
            ConfigError::InvalidType { key, expected, found } => {
                assert_eq!(key, expected_key);
                assert_eq!(expected, expected_type);
                assert!(found.starts_with("mapping"), "{found}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[test]
fn env_value_replaces_mapping_in_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "ssh-no-root: {enabled: false}\n");

    let mut store = store_with_env(&[("INIQ_SSH_NO_ROOT", "false")]);
    store.init(Some(&path)).unwrap();
    assert!(!Config::from_store(&store).unwrap().ssh_no_root);
}

#[test]
fn unparseable_env_bool_is_a_type_error() {
    let store = store_with_env(&[("INIQ_STATUS", "sometimes")]);
    let err = Config::from_store(&store).unwrap_err();
    assert!(err.to_string().contains("`status`"), "{err}");
}

// ---------------------------------------------------------------------------
// persistence
// ---------------------------------------------------------------------------

#[test]
fn flatten_write_read_unmarshal_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let configs = [
        Config::default(),
        Config {
            user: "deploy".into(),
            password: true,
            keys: vec!["github:alice".into(), "gitlab:bob".into()],
            sudo_nopasswd: false,
            skip_sudo: true,
            ssh_no_root: false,
            ssh_no_password: false,
            all: true,
            backup: true,
            verbose: true,
            quiet: false,
            yes: true,
            dry_run: false,
            status: true,
        },
        Config {
            user: "123".into(),
            ..Config::default()
        },
    ];

    for (i, original) in configs.iter().enumerate() {
        let path = dir.path().join(format!("round-trip-{i}.yaml"));

        let mut writer = store_with_env(&[]);
        for (name, value) in original.flatten() {
            writer.set(name, value);
        }
        writer.write_file(&path).unwrap();

        let mut reader = store_with_env(&[]);
        reader.init(Some(&path)).unwrap();
        assert_eq!(&Config::from_store(&reader).unwrap(), original);
    }
}

#[test]
fn save_config_writes_home_file_that_is_discovered() {
    let home = tempfile::tempdir().unwrap();
    let config = Config {
        user: "alice".into(),
        keys: vec!["github:alice".into()],
        ..Config::default()
    };

    let mut store = store_with_env(&[]).with_home_dir(home.path());
    let written = config::save_config(&mut store, &config, None).unwrap();
    assert_eq!(written, home.path().join(".iniq.yaml"));

    let mut reread = store_with_env(&[]).with_home_dir(home.path());
    reread.init(None).unwrap();
    assert_eq!(reread.config_file_used(), Some(written.as_path()));
    assert_eq!(Config::from_store(&reread).unwrap(), config);
}

#[test]
fn display_reports_file_and_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "user: alice\n");

    let mut store = store_with_env(&[]);
    store.init(Some(&path)).unwrap();
    store.set("dry-run", true);

    let text = config::display(&store);
    assert!(text.starts_with("Using config file: "));
    assert!(text.contains("  user: alice\n"));
    assert!(text.contains("  dry-run: true\n"));
    assert_eq!(text.lines().count(), 1 + 14);
}
