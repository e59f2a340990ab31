//! Clap argument types and the mapping from supplied flags to overrides.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use iniq::config::{Key, Store, Value};

/// Provision users, SSH keys and sudo on a fresh host.
#[derive(Parser, Debug)]
#[command(name = "iniq", version = iniq::constants::VERSION)]
pub struct Cli {
    /// Config file to read (default: ~/.iniq.yaml).
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect or persist the resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print version and build information.
    Version,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the config file in use and every resolved setting.
    Show,
    /// Write the resolved settings to a file (default: ~/.iniq.yaml).
    Save {
        /// Destination path.
        path: Option<PathBuf>,
    },
    /// Print the config file in use, or where `save` would write.
    Path,
}

/// Settings supplied on the command line.
///
/// Every field is optional: a flag the user did not pass must not shadow
/// the config file or environment. Boolean flags accept `--flag`,
/// `--flag=true` and `--flag=false`.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Account to create or configure.
    #[arg(long, short = 'u', global = true)]
    pub user: Option<String>,

    /// Prompt for and set a password for the user.
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub password: Option<bool>,

    /// SSH key source as provider:identity (repeatable, comma-separated).
    #[arg(long = "key", short = 'k', global = true, value_delimiter = ',', value_name = "PROVIDER:ID")]
    pub keys: Vec<String>,

    /// Grant passwordless sudo.
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub sudo_nopasswd: Option<bool>,

    /// Leave sudo configuration untouched.
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub skip_sudo: Option<bool>,

    /// Disable SSH root login.
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub ssh_no_root: Option<bool>,

    /// Disable SSH password authentication.
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub ssh_no_password: Option<bool>,

    /// Apply every hardening step.
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub all: Option<bool>,

    /// Back up files before modifying them.
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub backup: Option<bool>,

    /// Enable debug logging.
    #[arg(long, short = 'v', global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub verbose: Option<bool>,

    /// Only log errors.
    #[arg(long, short = 'q', global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub quiet: Option<bool>,

    /// Answer yes to every prompt.
    #[arg(long, short = 'y', global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub yes: Option<bool>,

    /// Show what would change without changing it.
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub dry_run: Option<bool>,

    /// Report current system state.
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub status: Option<bool>,
}

impl Overrides {
    /// The flags that were actually supplied, keyed by setting.
    pub fn supplied(&self) -> Vec<(Key, Value)> {
        let mut out = Vec::new();
        if let Some(user) = &self.user {
            out.push((Key::User, Value::Str(user.clone())));
        }
        if !self.keys.is_empty() {
            out.push((Key::Keys, Value::List(self.keys.clone())));
        }

        let flags = [
            (Key::Password, self.password),
            (Key::SudoNopasswd, self.sudo_nopasswd),
            (Key::SkipSudo, self.skip_sudo),
            (Key::SshNoRoot, self.ssh_no_root),
            (Key::SshNoPassword, self.ssh_no_password),
            (Key::All, self.all),
            (Key::Backup, self.backup),
            (Key::Verbose, self.verbose),
            (Key::Quiet, self.quiet),
            (Key::Yes, self.yes),
            (Key::DryRun, self.dry_run),
            (Key::Status, self.status),
        ];
        out.extend(
            flags
                .into_iter()
                .filter_map(|(key, flag)| flag.map(|b| (key, Value::Bool(b)))),
        );
        out
    }

    /// Install every supplied flag as a store override. Returns how many.
    pub fn apply(&self, store: &mut Store) -> usize {
        let supplied = self.supplied();
        for (key, value) in &supplied {
            store.set(key.name(), value.clone());
        }
        supplied.len()
    }
}
