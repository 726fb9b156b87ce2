use anyhow::{Context, Result};
use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_BUCKET: &str = "property_images";

/// Runtime configuration, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub supabase_url: String,
    pub anon_key: String,
    /// Used for view counting and seeding when set
    pub service_key: Option<String>,
    pub storage_bucket: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            bind_addr: try_load("BIND_ADDR", DEFAULT_BIND_ADDR)?,
            port: try_load("PORT", DEFAULT_PORT)?,
            supabase_url: required("SUPABASE_URL")?,
            anon_key: required("SUPABASE_ANON_KEY")?,
            service_key: optional("SUPABASE_SERVICE_KEY"),
            storage_bucket: try_load("STORAGE_BUCKET", DEFAULT_BUCKET)?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn required(key: &str) -> Result<String> {
    optional(key).with_context(|| format!("Environment variable {key} must be set"))
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = optional(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow::anyhow!("Invalid {key} value '{raw}': {e}")
    })
}
