use crate::models::Config;
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "events.toml";

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub config: PathBuf,
    pub init_config: bool,
    pub verbose: bool,
}

pub fn command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .version(env!("CARGO_PKG_VERSION"))
        .about(about)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value(DEFAULT_CONFIG_FILE),
        )
        .arg(
            Arg::new("init-config")
                .long("init-config")
                .help("Write the default configuration file and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log per-field extraction and parsing decisions")
                .action(ArgAction::SetTrue),
        )
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
            init_config: matches.get_flag("init-config"),
            verbose: matches.get_flag("verbose"),
        }
    }

    pub fn parse(name: &'static str, about: &'static str) -> Self {
        Self::from_matches(&command(name, about).get_matches())
    }

    /// Resolves the configuration, or `None` once `--init-config` has written it.
    pub fn load_config(&self) -> Result<Option<Config>> {
        if self.init_config {
            println!("📝 Writing default configuration file: {}", self.config.display());
            Config::default()
                .save_to_file(&self.config)
                .with_context(|| format!("Failed to write config: {}", self.config.display()))?;
            return Ok(None);
        }

        if self.config.exists() {
            println!("📋 Loading configuration from: {}", self.config.display());
        }
        let config = Config::load_or_default(&self.config)
            .with_context(|| format!("Failed to load config: {}", self.config.display()))?;
        Ok(Some(config))
    }
}
