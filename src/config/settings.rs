//! Typed settings and the field table that maps them onto store keys.
//!
//! [`Key`] enumerates every setting together with its external name, type
//! and compiled-in default. Both directions of materialization walk
//! `Key::iter()`, so reading and writing can never drift apart.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

use super::store::Store;
use super::value::Value;
use super::ConfigError;

/// Resolved settings handed to the provisioning features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Account to create or configure.
    pub user: String,
    /// Prompt for and set a password for `user`.
    pub password: bool,
    /// Public key sources in `provider:identity` form, e.g. `github:alice`.
    pub keys: Vec<String>,
    pub sudo_nopasswd: bool,
    pub skip_sudo: bool,
    pub ssh_no_root: bool,
    pub ssh_no_password: bool,
    /// Apply every hardening step.
    pub all: bool,
    /// Back up files before modifying them.
    pub backup: bool,
    pub verbose: bool,
    pub quiet: bool,
    /// Assume "yes" for every confirmation prompt.
    pub yes: bool,
    pub dry_run: bool,
    /// Report current system state instead of changing it.
    pub status: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: false,
            keys: Vec::new(),
            sudo_nopasswd: true,
            skip_sudo: false,
            ssh_no_root: true,
            ssh_no_password: true,
            all: false,
            backup: false,
            verbose: false,
            quiet: false,
            yes: false,
            dry_run: false,
            status: false,
        }
    }
}

/// Declared type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Str,
    Bool,
    List,
}

/// Every setting, named by its external (kebab-case) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Key {
    User,
    Password,
    Keys,
    SudoNopasswd,
    SkipSudo,
    SshNoRoot,
    SshNoPassword,
    All,
    Backup,
    Verbose,
    Quiet,
    Yes,
    DryRun,
    Status,
}

impl Key {
    /// External key used in the file, the environment and the store.
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn kind(self) -> Kind {
        match self {
            Key::User => Kind::Str,
            Key::Keys => Kind::List,
            Key::Password
            | Key::SudoNopasswd
            | Key::SkipSudo
            | Key::SshNoRoot
            | Key::SshNoPassword
            | Key::All
            | Key::Backup
            | Key::Verbose
            | Key::Quiet
            | Key::Yes
            | Key::DryRun
            | Key::Status => Kind::Bool,
        }
    }
}

impl Kind {
    /// Value a setting takes when no layer defines it.
    pub fn zero(self) -> Value {
        match self {
            Kind::Str => Value::Str(String::new()),
            Kind::Bool => Value::Bool(false),
            Kind::List => Value::List(Vec::new()),
        }
    }
}

impl Config {
    /// Read one field as a store value.
    pub fn get(&self, key: Key) -> Value {
        match key {
            Key::User => Value::Str(self.user.clone()),
            Key::Password => Value::Bool(self.password),
            Key::Keys => Value::List(self.keys.clone()),
            Key::SudoNopasswd => Value::Bool(self.sudo_nopasswd),
            Key::SkipSudo => Value::Bool(self.skip_sudo),
            Key::SshNoRoot => Value::Bool(self.ssh_no_root),
            Key::SshNoPassword => Value::Bool(self.ssh_no_password),
            Key::All => Value::Bool(self.all),
            Key::Backup => Value::Bool(self.backup),
            Key::Verbose => Value::Bool(self.verbose),
            Key::Quiet => Value::Bool(self.quiet),
            Key::Yes => Value::Bool(self.yes),
            Key::DryRun => Value::Bool(self.dry_run),
            Key::Status => Value::Bool(self.status),
        }
    }

    /// Materialize a `Config` from the merged store.
    ///
    /// Absent keys take the zero value of their type; call
    /// [`register_defaults`] first so `true` defaults survive.
    pub fn from_store(store: &Store) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        for key in Key::iter() {
            let value = store.get(key.name()).unwrap_or_else(|| key.kind().zero());
            config.set(key, &value)?;
        }
        Ok(config)
    }

    /// Coerce `value` to the type of `key` and store it in that field.
    pub fn set(&mut self, key: Key, value: &Value) -> Result<(), ConfigError> {
        let name = key.name();
        match key {
            Key::User => self.user = value.to_string_value(name)?,
            Key::Password => self.password = value.to_bool(name)?,
            Key::Keys => self.keys = value.to_list(name)?,
            Key::SudoNopasswd => self.sudo_nopasswd = value.to_bool(name)?,
            Key::SkipSudo => self.skip_sudo = value.to_bool(name)?,
            Key::SshNoRoot => self.ssh_no_root = value.to_bool(name)?,
            Key::SshNoPassword => self.ssh_no_password = value.to_bool(name)?,
            Key::All => self.all = value.to_bool(name)?,
            Key::Backup => self.backup = value.to_bool(name)?,
            Key::Verbose => self.verbose = value.to_bool(name)?,
            Key::Quiet => self.quiet = value.to_bool(name)?,
            Key::Yes => self.yes = value.to_bool(name)?,
            Key::DryRun => self.dry_run = value.to_bool(name)?,
            Key::Status => self.status = value.to_bool(name)?,
        }
        Ok(())
    }

    /// Flatten into `external key → value` pairs, in declaration order.
    pub fn flatten(&self) -> IndexMap<&'static str, Value> {
        Key::iter().map(|key| (key.name(), self.get(key))).collect()
    }
}

/// Seed the defaults layer with every setting's compiled-in default.
pub fn register_defaults(store: &mut Store) {
    for (name, value) in Config::default().flatten() {
        store.set_default(name, value);
    }
}

/// Persist `config` to `path`, or to `~/.iniq.yaml` when no path is given.
///
/// Every field becomes an override in `store` before the write. Returns the
/// path that was written.
pub fn save_config(
    store: &mut Store,
    config: &Config,
    path: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    let target = match path {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => store.default_config_path()?,
    };

    for (name, value) in config.flatten() {
        store.set(name, value);
    }
    store.write_file(&target)?;
    Ok(target)
}

/// Human-readable listing of the config source and every resolved key.
pub fn display(store: &Store) -> String {
    let mut out = String::new();

    match store.config_file_used() {
        Some(path) => {
            let _ = writeln!(out, "Using config file: {}", path.display());
        }
        None => {
            let searched: Vec<_> = store
                .search_paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            let _ = writeln!(out, "No config file found (searched: {})", searched.join(", "));
        }
    }

    for (key, value) in store.all_settings() {
        let _ = writeln!(out, "  {key}: {value}");
    }

    out
}
