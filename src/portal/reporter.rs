//! Login and daily report flow against the portal.
//!
//! Each run tries the stored session token first, falls back to a password
//! login, then submits at most one report. Nothing is retried here; the
//! caller is expected to be re-run by an external scheduler.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::session::Session;
use super::types::{Envelope, ReportStatus};
use crate::config::Config;
use crate::consts::{
    API_GET_SETTING, API_INDEX, API_LOGIN, API_REPORT, REPORT_FORM, SESSION_COOKIE,
};
use crate::error::{LoginError, ReportError, RequestError, TokenLoginError};

/// How the session got authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoginMethod {
    Token,
    Password,
}

pub(crate) struct Reporter<S: Session> {
    session: S,
    config: Config,
    /// Where a refreshed token gets written; `None` for inline credentials.
    config_path: Option<PathBuf>,
    authenticated: bool,
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<Envelope<T>, RequestError> {
    serde_json::from_str(body).map_err(RequestError::from)
}

impl<S: Session> Reporter<S> {
    pub(crate) fn new(session: S, config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            session,
            config,
            config_path,
            authenticated: false,
        }
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[cfg(test)]
    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &S {
        &self.session
    }

    /// Restore a session from an `eai-sess` token via the settings endpoint.
    pub(crate) fn login_by_token(&mut self, token: &str) -> Result<(), TokenLoginError> {
        if token.is_empty() {
            debug!("eai_sess is empty");
            return Err(TokenLoginError::Empty);
        }
        self.session.set_cookie(SESSION_COOKIE, token);

        let response = match self.session.get_direct(API_GET_SETTING) {
            Ok(response) => response,
            Err(err) => {
                if err.is_timeout() {
                    warn!("Request timed out while checking cookie");
                } else {
                    warn!("Exception while checking cookie: {err}");
                }
                self.session.set_cookie(SESSION_COOKIE, "");
                return Err(err.into());
            }
        };

        let code = decode::<Value>(&response.body).ok().map(|env| env.e);
        if response.is_ok() && code == Some(0) {
            debug!("cookie login finished");
            self.authenticated = true;
            self.config.session_token = token.to_string();
            return Ok(());
        }

        debug!("cookie login failed, session expired");
        // A stale cookie must not be mistaken for a fresh one after password login.
        self.session.set_cookie(SESSION_COOKIE, "");
        Err(TokenLoginError::Expired {
            status: response.status,
            code,
        })
    }

    /// Token login first, then username and password from the config.
    pub(crate) fn login(&mut self) -> Result<LoginMethod, LoginError> {
        let result = self.try_login();
        match &result {
            Ok(method) => debug!("Logged in via {method:?}"),
            Err(LoginError::Request(err)) if err.is_timeout() => {
                warn!("Request timed out while logging in");
            }
            Err(err @ LoginError::Request(_)) => warn!("{err}"),
            Err(err) => error!("{err}"),
        }
        result
    }

    fn try_login(&mut self) -> Result<LoginMethod, LoginError> {
        let token = self.config.session_token.clone();
        match self.login_by_token(&token) {
            Ok(()) => return Ok(LoginMethod::Token),
            Err(err) => debug!("Token login unavailable: {err}"),
        }

        if self.config.username.is_empty() {
            return Err(LoginError::MissingUsername);
        }
        if self.config.password.is_empty() {
            return Err(LoginError::MissingPassword);
        }

        let form = [
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ];
        let response = self.session.post_form(API_LOGIN, &form)?;
        debug!("Login return JSON: {}", response.body);

        let reply = decode::<Value>(&response.body)?;
        match reply.e {
            0 => {}
            1 => return Err(LoginError::InvalidCredentials),
            code => {
                return Err(LoginError::Server {
                    code,
                    message: reply.message().to_string(),
                });
            }
        }

        self.authenticated = true;
        match self.session.cookie(SESSION_COOKIE) {
            Some(token) => {
                debug!("Login finished, eai-sess={token}");
                self.config.session_token = token;
                self.persist()?;
            }
            None => warn!("Login finished but the portal set no eai-sess cookie"),
        }
        Ok(LoginMethod::Password)
    }

    fn persist(&self) -> Result<(), LoginError> {
        let Some(path) = &self.config_path else {
            debug!("No config file, session token not persisted");
            return Ok(());
        };
        self.config.save(path)?;
        Ok(())
    }

    /// Check the daily window and submit when it is open and unfiled.
    ///
    /// Returns the window's date label on a successful submission.
    pub(crate) fn report(&mut self) -> Result<String, ReportError> {
        if !self.is_authenticated() {
            debug!("Reporting without an authenticated session");
        }
        let result = self.try_report();
        match &result {
            Ok(date) => info!("Report for [{date}] finished"),
            Err(err) if err.is_informational() => info!("{err}"),
            Err(ReportError::Request(err)) if err.is_timeout() => {
                warn!("Request timed out while reporting");
            }
            Err(err @ ReportError::Request(_)) => warn!("{err}"),
            Err(err) => error!("{err}"),
        }
        result
    }

    fn try_report(&mut self) -> Result<String, ReportError> {
        let response = self.session.get(API_INDEX)?;
        let index = decode::<ReportStatus>(&response.body)?;
        let message = index.message().to_string();
        let Some(status) = index.d else {
            return Err(ReportError::MissingStatus {
                code: index.e,
                message,
            });
        };
        debug!(?status, "Report index");

        if !status.window_open {
            return Err(ReportError::NotInWindow);
        }
        if status.already_reported {
            return Err(ReportError::AlreadyReported {
                date: status.date_label,
            });
        }

        let response = self.session.post_form(API_REPORT, &REPORT_FORM)?;
        let reply = decode::<Value>(&response.body)?;
        if reply.e != 0 {
            return Err(ReportError::Rejected {
                date: status.date_label,
                code: reply.e,
                message: reply.message().to_string(),
            });
        }
        Ok(status.date_label)
    }
}
