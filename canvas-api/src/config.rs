use std::env::{self, VarError};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://colostate.instructure.com";
pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Everything needed to talk to one Canvas instance as one user.
#[derive(Debug, Clone)]
pub struct Config {
    base_url: Url,
    token: Token,
    per_page: u32,
    timeout: Duration,
}

impl Config {
    /// Reads `CANVAS_TOKEN` (required), `CANVAS_URL`, `CANVAS_PER_PAGE` and `CANVAS_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let token = env::var("CANVAS_TOKEN").context("CANVAS_TOKEN must be set")?;
        let base_url = env_or("CANVAS_URL", DEFAULT_BASE_URL.to_owned())?;
        let per_page = env_or("CANVAS_PER_PAGE", DEFAULT_PER_PAGE)?;
        let timeout_secs = env_or("CANVAS_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs())?;

        Ok(Self::new(parse_base_url(&base_url)?, Token::new(token))
            .with_per_page(per_page)
            .with_timeout(Duration::from_secs(timeout_secs)))
    }

    pub fn new(base_url: Url, token: Token) -> Self {
        Self {
            base_url,
            token,
            per_page: DEFAULT_PER_PAGE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

pub fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(base_url).with_context(|| format!("`{base_url}` is not a valid Canvas URL"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|err| anyhow!("could not parse {key}=`{value}`: {err}")),
        Err(VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("could not read {key}")),
    }
}

/// A Canvas access token, wrapped so we don't print it by accident.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for Token {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(<hidden>)")
    }
}
