use std::time::Duration;

use tracing::{debug, warn};
use ureq::http::{Response as HttpResponse, Uri};
use ureq::tls::TlsConfig;
use ureq::{Agent, Cookie};

use crate::consts::USER_AGENT;
use crate::error::{AppError, RequestError};

/// Raw reply from the portal
#[derive(Debug, Clone)]
pub(crate) struct Response {
    pub(crate) status: u16,
    pub(crate) body: String,
}

impl Response {
    pub(crate) fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Cookie-carrying client context used by the reporter.
///
/// Paths are relative to the portal base URL.
pub(crate) trait Session {
    /// An empty value removes the cookie.
    fn set_cookie(&mut self, name: &str, value: &str);

    fn cookie(&self, name: &str) -> Option<String>;

    fn get(&mut self, path: &str) -> Result<Response, RequestError>;

    /// GET that hands back a 3xx instead of following it
    fn get_direct(&mut self, path: &str) -> Result<Response, RequestError>;

    fn post_form(&mut self, path: &str, form: &[(&str, &str)]) -> Result<Response, RequestError>;
}

#[derive(Debug, Clone)]
pub(crate) struct SessionOptions {
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) proxy: Option<String>,
}

/// Blocking `ureq` session: fixed user agent, no certificate checks,
/// explicit proxy only (environment proxies are ignored). Cookies live in the
/// agent's jar, which also picks up `Set-Cookie` on redirect hops.
pub(crate) struct HttpSession {
    agent: Agent,
    base_url: String,
    base_uri: Uri,
}

impl HttpSession {
    pub(crate) fn new(options: SessionOptions) -> Result<Self, AppError> {
        let base_url = options.base_url.trim_end_matches('/').to_string();
        let base_uri: Uri = base_url.parse().map_err(|_| AppError::InvalidBaseUrl {
            url: base_url.clone(),
        })?;

        let proxy = match options.proxy.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => {
                let proxy = ureq::Proxy::new(url).map_err(|e| AppError::InvalidProxy {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
                debug!("Proxy set to: {url}");
                Some(proxy)
            }
            None => None,
        };

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(options.timeout))
            .http_status_as_error(false)
            .proxy(proxy)
            .tls_config(TlsConfig::builder().disable_verification(true).build())
            .build()
            .into();

        Ok(Self {
            agent,
            base_url,
            base_uri,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn finish(mut response: HttpResponse<ureq::Body>) -> Result<Response, RequestError> {
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        if status >= 400 {
            return Err(RequestError::Status(status));
        }
        Ok(Response { status, body })
    }
}

impl Session for HttpSession {
    fn set_cookie(&mut self, name: &str, value: &str) {
        // Path=/ on the portal host; Max-Age=0 evicts the stored cookie.
        let raw = if value.is_empty() {
            format!("{name}=; Path=/; Max-Age=0")
        } else {
            format!("{name}={value}; Path=/")
        };
        let cookie = match Cookie::parse(raw, &self.base_uri) {
            Ok(cookie) => cookie,
            Err(err) => {
                warn!("Failed to build cookie {name}: {err}");
                return;
            }
        };
        let mut jar = self.agent.cookie_jar_lock();
        if let Err(err) = jar.insert(cookie, &self.base_uri) {
            debug!("Cookie {name} not stored: {err}");
        }
        jar.release();
    }

    fn cookie(&self, name: &str) -> Option<String> {
        let jar = self.agent.cookie_jar_lock();
        let value = jar
            .iter()
            .filter(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_string())
            .last();
        jar.release();
        value
    }

    fn get(&mut self, path: &str) -> Result<Response, RequestError> {
        let response = self
            .agent
            .get(self.url(path))
            .header("User-Agent", USER_AGENT)
            .call()?;
        Self::finish(response)
    }

    fn get_direct(&mut self, path: &str) -> Result<Response, RequestError> {
        let response = self
            .agent
            .get(self.url(path))
            .header("User-Agent", USER_AGENT)
            .config()
            .max_redirects(0)
            .max_redirects_will_error(false)
            .build()
            .call()?;
        Self::finish(response)
    }

    fn post_form(&mut self, path: &str, form: &[(&str, &str)]) -> Result<Response, RequestError> {
        let response = self
            .agent
            .post(self.url(path))
            .header("User-Agent", USER_AGENT)
            .send_form(form.iter().copied())?;
        Self::finish(response)
    }
}
