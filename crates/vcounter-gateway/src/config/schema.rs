use serde::Deserialize;
use vcounter_core::error::{CounterError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub http: HttpSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            http: HttpSection::default(),
            store: StoreSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CounterError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.http.validate()?;
        self.store.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Route serving the counter.
    #[serde(default = "default_route")]
    pub route: String,

    /// When false, 500 bodies carry a generic message and the detail only goes to the log.
    #[serde(default = "default_expose_error_detail")]
    pub expose_error_detail: bool,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            route: default_route(),
            expose_error_detail: default_expose_error_detail(),
        }
    }
}

impl HttpSection {
    pub fn validate(&self) -> Result<()> {
        if !self.route.starts_with('/') {
            return Err(CounterError::Config("http.route must start with '/'".into()));
        }
        if self.route == "/healthz" || self.route == "/readyz" || self.route == "/metrics" {
            return Err(CounterError::Config(format!(
                "http.route collides with operational endpoint {}",
                self.route
            )));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:7071".into()
}
fn default_route() -> String {
    "/GetVisitorCount".into()
}
fn default_expose_error_detail() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Cosmos,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub database: String,

    #[serde(default)]
    pub container: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            endpoint: String::new(),
            key: String::new(),
            database: String::new(),
            container: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=60000).contains(&self.request_timeout_ms) {
            return Err(CounterError::Config(
                "store.request_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if self.backend == StoreBackend::Memory {
            return Ok(());
        }

        for (name, value) in [
            ("store.endpoint (COSMOS_ENDPOINT)", &self.endpoint),
            ("store.key (COSMOS_KEY)", &self.key),
            ("store.database (COSMOS_DATABASE)", &self.database),
            ("store.container (COSMOS_CONTAINER)", &self.container),
        ] {
            if value.trim().is_empty() {
                return Err(CounterError::Config(format!("{name} is required")));
            }
        }
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(CounterError::Config(
                "store.endpoint must be an http(s) URL".into(),
            ));
        }
        Ok(())
    }
}

fn default_request_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: default_level(), format: default_format() }
    }
}

impl LoggingSection {
    pub fn validate(&self) -> Result<()> {
        match self.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(CounterError::Config(format!(
                "logging.format must be 'text' or 'json', got '{other}'"
            ))),
        }
    }
}

fn default_level() -> String {
    "info".into()
}
fn default_format() -> String {
    "text".into()
}
