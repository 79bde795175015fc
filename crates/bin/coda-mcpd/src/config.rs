use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use coda_api::DEFAULT_BASE_URL;
use coda_core::export::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(name = "coda-mcpd", version, about = "Coda MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "CODA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "CODA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(
        long,
        env = "CODA_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    request_timeout_secs: u64,

    #[arg(
        long,
        env = "CODA_EXPORT_POLL_INTERVAL_SECS",
        default_value_t = DEFAULT_POLL_INTERVAL.as_secs()
    )]
    export_poll_interval_secs: u64,

    #[arg(
        long,
        env = "CODA_EXPORT_MAX_ATTEMPTS",
        default_value_t = DEFAULT_MAX_ATTEMPTS
    )]
    export_max_attempts: u32,

    #[arg(long, env = "CODA_MCP_HTTP_ADDR")]
    mcp_http_addr: Option<SocketAddr>,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone)]
pub struct CodaConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub export_poll_interval: Duration,
    pub export_max_attempts: u32,
    pub mcp_http_addr: Option<SocketAddr>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),
    #[error("invalid {name} value: {value}")]
    InvalidSetting { name: &'static str, value: String },
}

impl CodaConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for CodaConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let api_key = args
            .api_key
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingSetting("CODA_API_KEY"))?;

        if args.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "CODA_BASE_URL",
                value: args.base_url,
            });
        }

        if args.export_max_attempts == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "CODA_EXPORT_MAX_ATTEMPTS",
                value: args.export_max_attempts.to_string(),
            });
        }

        Ok(Self {
            api_key,
            base_url: args.base_url,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            export_poll_interval: Duration::from_secs(args.export_poll_interval_secs),
            export_max_attempts: args.export_max_attempts,
            mcp_http_addr: args.mcp_http_addr,
        })
    }
}
