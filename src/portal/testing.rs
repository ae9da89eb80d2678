use std::collections::{BTreeMap, HashMap, VecDeque};

use super::session::{Response, Session};
use crate::consts::SESSION_COOKIE;
use crate::error::RequestError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    /// GET with redirects disabled
    GetDirect,
    Post,
}

/// One request seen by [`ScriptedSession`]
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) form: Vec<(String, String)>,
    /// Session cookie sent with the request
    pub(crate) session_cookie: Option<String>,
}

struct Scripted {
    result: Result<Response, RequestError>,
    set_cookie: Option<(String, String)>,
}

/// In-memory portal: replies are queued per path and every call is recorded.
#[derive(Default)]
pub(crate) struct ScriptedSession {
    replies: HashMap<String, VecDeque<Scripted>>,
    cookies: BTreeMap<String, String>,
    pub(crate) calls: Vec<Call>,
}

impl ScriptedSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(mut self, path: &str, scripted: Scripted) -> Self {
        self.replies
            .entry(path.to_string())
            .or_default()
            .push_back(scripted);
        self
    }

    pub(crate) fn reply(self, path: &str, status: u16, body: &str) -> Self {
        self.push(
            path,
            Scripted {
                result: Ok(Response {
                    status,
                    body: body.to_string(),
                }),
                set_cookie: None,
            },
        )
    }

    /// 200 reply that also sets a cookie on the session
    pub(crate) fn reply_with_cookie(self, path: &str, body: &str, name: &str, value: &str) -> Self {
        self.push(
            path,
            Scripted {
                result: Ok(Response {
                    status: 200,
                    body: body.to_string(),
                }),
                set_cookie: Some((name.to_string(), value.to_string())),
            },
        )
    }

    pub(crate) fn fail(self, path: &str, err: RequestError) -> Self {
        self.push(
            path,
            Scripted {
                result: Err(err),
                set_cookie: None,
            },
        )
    }

    pub(crate) fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    fn answer(
        &mut self,
        method: Method,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<Response, RequestError> {
        self.calls.push(Call {
            method,
            path: path.to_string(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            session_cookie: self.cookies.get(SESSION_COOKIE).cloned(),
        });

        let Some(scripted) = self.replies.get_mut(path).and_then(VecDeque::pop_front) else {
            return Err(RequestError::Transport(format!("no scripted reply for {path}")));
        };
        if let Some((name, value)) = &scripted.set_cookie {
            self.set_cookie(name, value);
        }
        scripted.result
    }
}

impl Session for ScriptedSession {
    fn set_cookie(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.cookies.remove(name);
        } else {
            self.cookies.insert(name.to_string(), value.to_string());
        }
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }

    fn get(&mut self, path: &str) -> Result<Response, RequestError> {
        self.answer(Method::Get, path, &[])
    }

    fn get_direct(&mut self, path: &str) -> Result<Response, RequestError> {
        self.answer(Method::GetDirect, path, &[])
    }

    fn post_form(&mut self, path: &str, form: &[(&str, &str)]) -> Result<Response, RequestError> {
        self.answer(Method::Post, path, form)
    }
}
