//! Configuration layering and logging setup for the binary.
//!
//! Layers, lowest first: profile defaults, an optional config file (any
//! format the `config` crate detects from the extension), `COURSEVAULT_*`
//! environment variables, then command-line overrides.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use coursevault_core::{ConfigProfile, SiteConfig};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Values given on the command line; `None` leaves lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub courses_root: Option<PathBuf>,
    pub bind: Option<String>,
    pub enable_caching: Option<bool>,
}

/// Build the effective configuration and validate it.
pub fn load_config(
    profile: ConfigProfile,
    file: Option<&Path>,
    overrides: &Overrides,
) -> Result<SiteConfig> {
    let mut builder = Config::builder().add_source(
        Config::try_from(&profile.create_config()).context("Failed to encode profile defaults")?,
    );
    if let Some(file) = file {
        builder = builder.add_source(File::from(file).required(true));
    }
    builder = builder.add_source(Environment::with_prefix("COURSEVAULT").try_parsing(true));

    let mut site: SiteConfig = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    if let Some(root) = &overrides.courses_root {
        site.courses_root = root.clone();
    }
    if let Some(bind) = &overrides.bind {
        site.bind = bind.clone();
    }
    if let Some(enabled) = overrides.enable_caching {
        site.enable_caching = enabled;
    }

    site.courses_root = expand_path(&site.courses_root)?;
    site.validate()?;
    Ok(site)
}

/// Expand `~` and `$VARS` in a configured path.
fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path
        .to_str()
        .with_context(|| format!("Path is not valid UTF-8: {}", path.display()))?;
    let expanded = shellexpand::full(path_str)
        .with_context(|| format!("Failed to expand path: {}", path_str))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// How log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "human" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown log format '{}' (expected text or json)", other),
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `level`. `log` records from the library crates are
/// forwarded through the subscriber's log bridge.
pub fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_ascii_lowercase()));

    let result = match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
