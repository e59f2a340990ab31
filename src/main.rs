//! iniq — system provisioning CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use cli::args::{Cli, Command, ConfigAction, Overrides};
use iniq::config::{self, Config, Store};
use iniq::constants;
use iniq::env::Env;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        config: config_path,
        overrides,
        command,
    } = Cli::parse();

    match command {
        Command::Config { action } => {
            let (mut store, config) = bootstrap(config_path, &overrides)?;
            run_config(action, &mut store, &config)
        }
        Command::Version => run_version(),
    }
}

/// Resolve settings: defaults < file < environment < supplied flags.
fn bootstrap(config_path: Option<PathBuf>, overrides: &Overrides) -> Result<(Store, Config)> {
    let mut store = Store::new(Env::real());
    config::register_defaults(&mut store);
    store
        .init(config_path.as_deref())
        .context("failed to load configuration")?;

    let applied = overrides.apply(&mut store);
    let config = Config::from_store(&store).context("invalid configuration")?;

    cli::init_logging(&config);
    match store.config_file_used() {
        Some(path) => tracing::debug!(path = %path.display(), "using config file"),
        None => tracing::debug!(searched = ?store.search_paths(), "no config file found"),
    }
    tracing::debug!(overrides = applied, "applied command-line overrides");

    Ok((store, config))
}

fn run_config(action: ConfigAction, store: &mut Store, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", config::display(store));
        }
        ConfigAction::Save { path } => {
            let written = config::save_config(store, config, path.as_deref())
                .context("failed to save configuration")?;
            tracing::info!(path = %written.display(), "configuration saved");
            println!(
                "  {} Saved configuration to {}",
                "✔".green().bold(),
                written.display().to_string().bold(),
            );
        }
        ConfigAction::Path => match store.config_file_used() {
            Some(path) => println!("{}", path.display()),
            None => {
                let target = store
                    .default_config_path()
                    .context("failed to determine default config path")?;
                println!("{} {}", target.display(), "(not present)".dimmed());
            }
        },
    }
    Ok(())
}

/// Print version and build information.
fn run_version() -> Result<()> {
    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
    Ok(())
}
