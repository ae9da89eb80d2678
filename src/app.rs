use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{debug, warn};

use crate::cli::{Cli, RunMode};
use crate::config::{Config, ConfigFile};
use crate::consts::BASE_URL;
use crate::error::{AppError, LoginError};
use crate::portal::{HttpSession, Reporter, SessionOptions};

/// Exit status for configuration and argument errors
pub(crate) const EXIT_CONFIG: u8 = 2;

/// How a single invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Reported,
    /// Window closed or already filed
    NothingToDo,
    /// First run: a blank config was written
    TemplateCreated,
    /// Login or report failed; the next scheduled run may succeed
    Failed,
    /// The refreshed session could not be persisted
    Fatal,
}

impl Outcome {
    pub(crate) fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Reported | Outcome::NothingToDo | Outcome::TemplateCreated => {
                ExitCode::SUCCESS
            }
            Outcome::Failed => ExitCode::FAILURE,
            Outcome::Fatal => ExitCode::from(EXIT_CONFIG),
        }
    }
}

/// Config plus the file it should be persisted to
fn load_config(cli: &Cli) -> Result<Option<(Config, Option<PathBuf>)>, AppError> {
    match cli.run_mode()? {
        RunMode::ConfigFile(path) => match Config::load_or_create(&path)? {
            ConfigFile::Created => {
                warn!(
                    "First time run, please fill in the blank of config file ({})",
                    path.display()
                );
                Ok(None)
            }
            ConfigFile::Loaded(mut config) => {
                cli.apply_to(&mut config)?;
                Ok(Some((config, Some(path))))
            }
        },
        RunMode::Inline => Ok(Some((cli.inline_config()?, None))),
    }
}

pub(crate) fn run(cli: &Cli) -> Result<Outcome, AppError> {
    let Some((config, config_path)) = load_config(cli)? else {
        return Ok(Outcome::TemplateCreated);
    };

    let session = HttpSession::new(SessionOptions {
        base_url: BASE_URL.to_string(),
        timeout: config.timeout(),
        proxy: config.proxy.clone(),
    })?;
    let mut reporter = Reporter::new(session, config, config_path);

    match reporter.login() {
        Ok(_) => {}
        Err(LoginError::Persist(_)) => return Ok(Outcome::Fatal),
        Err(_) => return Ok(Outcome::Failed),
    }

    let outcome = match reporter.report() {
        Ok(_) => Outcome::Reported,
        Err(err) if err.is_informational() => Outcome::NothingToDo,
        Err(_) => Outcome::Failed,
    };
    debug!(?outcome, "Run finished");
    Ok(outcome)
}
