//! Layered key/value store.
//!
//! Precedence (highest to lowest):
//! 1. Explicit overrides (`set`, fed from CLI flags)
//! 2. Environment variables (`INIQ_<KEY>`)
//! 3. Config file (explicit `--config` path or `~/.iniq.yaml`)
//! 4. Compiled-in defaults (`set_default`)
//!
//! Layers shadow each other per key. Nothing is deep-merged: a list in a
//! higher layer replaces the lower one wholesale.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::ConfigError;
use super::value::{self, Value};
use crate::constants::{CONFIG_EXTENSIONS, CONFIG_STEM, DEFAULT_CONFIG_EXTENSION, ENV_PREFIX};
use crate::env::Env;

/// The merged view over defaults, file, environment and overrides.
///
/// The host owns a single instance for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Store {
    env: Env,
    env_prefix: String,
    home_dir: Option<PathBuf>,
    defaults: IndexMap<String, Value>,
    file: IndexMap<String, Value>,
    overrides: IndexMap<String, Value>,
    config_file: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
}

impl Store {
    /// Create an empty store reading environment variables from `env`.
    pub fn new(env: Env) -> Self {
        Self {
            env,
            env_prefix: ENV_PREFIX.to_string(),
            home_dir: dirs::home_dir(),
            defaults: IndexMap::new(),
            file: IndexMap::new(),
            overrides: IndexMap::new(),
            config_file: None,
            search_paths: Vec::new(),
        }
    }

    /// Replace the home directory used for discovery and default save paths.
    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home.into());
        self
    }

    /// Locate and read the config file.
    ///
    /// With an explicit path only that file is considered; otherwise the
    /// home directory is searched for `.iniq.yaml` / `.iniq.yml`. A missing or
    /// unreadable file leaves the file layer empty and is not an error.
    /// Malformed YAML or content that is not valid UTF-8 is.
    pub fn init(&mut self, explicit: Option<&Path>) -> Result<(), ConfigError> {
        self.file.clear();
        self.config_file = None;
        self.search_paths = match explicit {
            Some(path) if !path.as_os_str().is_empty() => vec![path.to_path_buf()],
            _ => {
                let home = self.home_dir.as_deref().ok_or(ConfigError::HomeDirUnavailable)?;
                CONFIG_EXTENSIONS
                    .iter()
                    .map(|ext| home.join(format!("{CONFIG_STEM}.{ext}")))
                    .collect()
            }
        };

        let mut found = None;
        for path in &self.search_paths {
            match fs::read_to_string(path) {
                Ok(content) => {
                    found = Some((path.clone(), content));
                    break;
                }
                Err(source) if source.kind() == ErrorKind::InvalidData => {
                    return Err(ConfigError::ReadFile {
                        path: path.clone(),
                        source,
                    });
                }
                Err(_) => {}
            }
        }

        let Some((path, content)) = found else {
            return Ok(());
        };

        self.file = parse_file(&path, &content)?;
        self.config_file = Some(path);
        Ok(())
    }

    /// Install a lowest-precedence default for `key`.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        self.defaults.insert(normalize_key(key), value.into());
    }

    /// Install a highest-precedence override for `key`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.overrides.insert(normalize_key(key), value.into());
    }

    /// Resolve `key` through all layers. `None` when no layer defines it.
    pub fn get(&self, key: &str) -> Option<Value> {
        let key = normalize_key(key);
        if let Some(value) = self.overrides.get(&key) {
            return Some(value.clone());
        }
        if let Some(raw) = self.env.non_empty(&self.env_var_name(&key)) {
            return Some(Value::Str(raw));
        }
        self.file
            .get(&key)
            .or_else(|| self.defaults.get(&key))
            .cloned()
    }

    /// Resolve `key` as a string; empty when absent.
    pub fn get_string(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .map_or_else(|| Ok(String::new()), |v| v.to_string_value(key))
    }

    /// Resolve `key` as a bool; `false` when absent.
    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        self.get(key).map_or(Ok(false), |v| v.to_bool(key))
    }

    /// Resolve `key` as a list of strings; empty when absent.
    pub fn get_string_list(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        self.get(key).map_or_else(|| Ok(Vec::new()), |v| v.to_list(key))
    }

    /// Every key known to the defaults, file or override layers, sorted.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.defaults
            .keys()
            .chain(self.file.keys())
            .chain(self.overrides.keys())
            .map(String::as_str)
            .collect()
    }

    /// The fully merged view, keyed and ordered by name.
    pub fn all_settings(&self) -> BTreeMap<String, Value> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }

    /// Write the override layer to `path` as YAML, creating parent directories.
    pub fn write_file(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = serde_yaml_ng::to_string(&self.overrides).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        write_private(path, yaml.as_bytes()).map_err(|source| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The config file that was read by [`Store::init`], if any.
    pub fn config_file_used(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Paths considered by the last [`Store::init`].
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// `~/.iniq.yaml`, the target for saves without an explicit path.
    pub fn default_config_path(&self) -> Result<PathBuf, ConfigError> {
        self.home_dir
            .as_deref()
            .map(|home| home.join(format!("{CONFIG_STEM}.{DEFAULT_CONFIG_EXTENSION}")))
            .ok_or(ConfigError::HomeDirUnavailable)
    }

    /// Environment variable consulted for `key`: `ssh-no-root` → `INIQ_SSH_NO_ROOT`.
    pub fn env_var_name(&self, key: &str) -> String {
        format!(
            "{}_{}",
            self.env_prefix,
            key.replace(['-', '.'], "_").to_uppercase()
        )
    }
}

fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

/// Parse a config document into flat `dotted.key → value` pairs.
fn parse_file(path: &Path, content: &str) -> Result<IndexMap<String, Value>, ConfigError> {
    let doc: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(content).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })?;

    let mut flat = IndexMap::new();
    match doc {
        serde_yaml_ng::Value::Null => {}
        serde_yaml_ng::Value::Mapping(map) => flatten_mapping(&map, "", &mut flat),
        _ => {
            return Err(ConfigError::NotAMapping {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(flat)
}

fn flatten_mapping(
    map: &serde_yaml_ng::Mapping,
    prefix: &str,
    out: &mut IndexMap<String, Value>,
) {
    for (raw_key, node) in map {
        let name = match raw_key {
            serde_yaml_ng::Value::String(s) => s.clone(),
            serde_yaml_ng::Value::Bool(b) => b.to_string(),
            serde_yaml_ng::Value::Number(n) => n.to_string(),
            // Composite or null keys cannot be addressed by name.
            _ => continue,
        };
        let key = if prefix.is_empty() {
            normalize_key(&name)
        } else {
            format!("{prefix}.{}", normalize_key(&name))
        };

        match node {
            serde_yaml_ng::Value::Mapping(nested) => {
                out.insert(key.clone(), Value::Map);
                flatten_mapping(nested, &key, out);
            }
            other => {
                if let Some(value) = value::from_yaml(other) {
                    out.insert(key, value);
                }
            }
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents)
}
