//! CLI argument definitions
//!
//! Run-mode resolution and merging of CLI values onto the config.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::{AppError, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "bjut-daily")]
#[command(about = "BJUT daily health report submitter", version)]
#[command(
    after_help = "Run it from cron every 15-30 minutes; the reporting window is detected automatically."
)]
pub(crate) struct Cli {
    /// Config file (JSON), created with a blank template if it does not exist
    #[arg(short = 'c', long = "config-file", value_name = "PATH")]
    pub(crate) config_file: Option<PathBuf>,

    /// Portal username (overrides the config file)
    #[arg(short = 'u', long = "user", value_name = "USERNAME")]
    pub(crate) user: Option<String>,

    /// Portal password (overrides the config file)
    #[arg(short = 'p', long = "pass", value_name = "PASSWORD")]
    pub(crate) pass: Option<String>,

    /// Proxy server url (e.g. http://127.0.0.1:8888)
    #[arg(short = 'x', long, value_name = "URL")]
    pub(crate) proxy: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short = 't', long, value_name = "SECS")]
    pub(crate) timeout: Option<u64>,

    /// Verbose output (debug logging)
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// Where the run gets its credentials from
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunMode {
    /// Config file, persisted after a password login
    ConfigFile(PathBuf),
    /// `--user` and `--pass` only; nothing is written to disk
    Inline,
}

impl Cli {
    pub(crate) fn run_mode(&self) -> Result<RunMode, AppError> {
        if let Some(path) = &self.config_file {
            return Ok(RunMode::ConfigFile(path.clone()));
        }
        match (&self.user, &self.pass) {
            (Some(_), Some(_)) => Ok(RunMode::Inline),
            (None, None) => Config::default_path()
                .map(RunMode::ConfigFile)
                .ok_or(AppError::NoConfigDir),
            _ => Err(AppError::InvalidArguments {
                reason: "--user and --pass must be given together when no --config-file is used"
                    .to_string(),
            }),
        }
    }

    /// Merge CLI values into the config (CLI args take precedence)
    pub(crate) fn apply_to(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(user) = &self.user {
            config.username = user.clone();
        }
        if let Some(pass) = &self.pass {
            config.password = pass.clone();
        }
        if let Some(proxy) = &self.proxy {
            config.proxy = Some(proxy.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        config.validate()
    }

    pub(crate) fn inline_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        self.apply_to(&mut config)?;
        Ok(config)
    }
}
