//! Handles settings for the application.
//!
//! Values are read, in increasing priority, from the built-in defaults, an
//! optional TOML file (`config/taproom.toml` unless `--config` says
//! otherwise), `TAPROOM__*` environment variables and command line flags.
//!
//! ```toml
//! [app]
//! level = "debug"
//!
//! [server]
//! bind = "0.0.0.0"
//! port = 8080
//!
//! [pricing]
//! price_per_unit = 12.25
//! ```
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/taproom.toml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pricing {
    /// Price of one litre.
    pub price_per_unit: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            price_per_unit: engine::DEFAULT_PRICE_PER_UNIT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub pricing: Pricing,
}

#[derive(Debug, Parser)]
#[command(name = "taproom", version, about = "Beer dispenser tracking service")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the address to bind.
    #[arg(long)]
    bind: Option<String>,
    /// Override the port to listen on.
    #[arg(long)]
    port: Option<u16>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();

        let mut settings = Self::load(args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH))?;
        if let Some(bind) = args.bind {
            settings.server.bind = bind;
        }
        if let Some(port) = args.port {
            settings.server.port = port;
        }

        Ok(settings)
    }

    fn load(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TAPROOM").separator("__"))
            .build()?
            .try_deserialize()
    }
}
