use crate::error::{BadEnvVarSnafu, KampusResult, ParseNumberSnafu};
use dotenvy::var;
use snafu::ResultExt;
use std::{env::VarError, sync::Arc, time::Duration};

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    api_config: Arc<ApiConfig>,
    session_days: i64,
    max_upload_bytes: usize,
    secure_cookies: bool,
}

impl RuntimeConfiguration {
    pub fn new() -> KampusResult<Self> {
        Ok(Self {
            api_config: Arc::new(ApiConfig::new()?),
            session_days: optional_number("KAMPUS_SESSION_DAYS", 5)?,
            max_upload_bytes: optional_number("KAMPUS_MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            secure_cookies: matches!(
                var("KAMPUS_SECURE_COOKIES").as_deref().map(str::trim),
                Ok("1" | "true")
            ),
        })
    }

    pub fn from_api_config(api_config: ApiConfig) -> Self {
        Self {
            api_config: Arc::new(api_config),
            session_days: 5,
            max_upload_bytes: 5 * 1024 * 1024,
            secure_cookies: false,
        }
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub const fn session_days(&self) -> i64 {
        self.session_days
    }

    pub const fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub const fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }
}

#[derive(Debug)]
pub struct ApiConfig {
    base_url: String,
    timeout: Duration,
}

impl ApiConfig {
    pub fn new() -> KampusResult<Self> {
        let base_url = var("KAMPUS_API_BASE_URL").context(BadEnvVarSnafu {
            name: "KAMPUS_API_BASE_URL",
        })?;
        let timeout_secs = optional_number("KAMPUS_API_TIMEOUT_SECS", 10)?;

        Ok(Self::with_base_url(base_url, Duration::from_secs(timeout_secs)))
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, timeout }
    }

    ///`path` is relative to the API root, eg. `mahasiswa/4`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn optional_number<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    name: &'static str,
    default: T,
) -> KampusResult<T> {
    match var(name) {
        Ok(raw) => raw.trim().parse().context(ParseNumberSnafu { name }),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(default),
        Err(source) => Err(source).context(BadEnvVarSnafu { name }),
    }
}
