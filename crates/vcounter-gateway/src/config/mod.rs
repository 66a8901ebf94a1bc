//! Service config loader (strict parsing + env overrides).
//!
//! Order: YAML file (optional at the default path) -> `COSMOS_*` environment
//! overrides -> `validate()`. Anything missing after that is a startup error.

pub mod schema;

use std::{fs, io, path::Path};

use vcounter_core::error::{CounterError, Result};

pub use schema::{HttpSection, LoggingSection, ServiceConfig, StoreBackend, StoreSection};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "VCOUNTER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "vcounter.yaml";

/// Resolve the config path and load it, then apply process env overrides.
pub fn load() -> Result<ServiceConfig> {
    let explicit = std::env::var(CONFIG_PATH_ENV).ok();
    let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

    let mut cfg = match fs::read_to_string(path) {
        Ok(s) => parse(&s)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
            ServiceConfig::default()
        }
        Err(e) => {
            return Err(CounterError::Config(format!(
                "read config {} failed: {e}",
                Path::new(path).display()
            )))
        }
    };

    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok());
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg = parse(s)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse(s: &str) -> Result<ServiceConfig> {
    serde_yaml::from_str(s).map_err(|e| CounterError::Config(format!("invalid yaml: {e}")))
}

/// Overlay `COSMOS_ENDPOINT`, `COSMOS_KEY`, `COSMOS_DATABASE`, `COSMOS_CONTAINER`.
///
/// `lookup` is injected so tests do not have to mutate the process environment.
pub fn apply_env_overrides<F>(cfg: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let store = &mut cfg.store;
    for (var, slot) in [
        ("COSMOS_ENDPOINT", &mut store.endpoint),
        ("COSMOS_KEY", &mut store.key),
        ("COSMOS_DATABASE", &mut store.database),
        ("COSMOS_CONTAINER", &mut store.container),
    ] {
        if let Some(v) = lookup(var).filter(|v| !v.is_empty()) {
            *slot = v;
        }
    }
}
