/// Portal host every request is sent to
pub(crate) const BASE_URL: &str = "https://itsapp.bjut.edu.cn";

pub(crate) const API_LOGIN: &str = "/uc/wap/login/check";
pub(crate) const API_GET_SETTING: &str = "/xisuncov/wap/open-report/get-setting";
pub(crate) const API_INDEX: &str = "/xisuncov/wap/open-report/index";
pub(crate) const API_REPORT: &str = "/xisuncov/wap/open-report/save";

/// Cookie carrying the authenticated portal session
pub(crate) const SESSION_COOKIE: &str = "eai-sess";

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/79.0.3945.130 Safari/537.36";

/// Per-request timeout in seconds when the config does not set one
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Fixed form body of a daily submission
pub(crate) const REPORT_FORM: [(&str, &str); 1] = [("tw", "1")];

/// Directory name under the platform config dir
pub(crate) const APP_DIR: &str = "bjut-daily";
pub(crate) const CONFIG_FILE_NAME: &str = "config.json";
