use coda_api::{ApiError, CodaClientConfig, HttpCodaClient};
use coda_core::{CodaControlPlane, ExportPolicy};

use crate::config::CodaConfig;

pub fn build_control(config: &CodaConfig) -> Result<CodaControlPlane<HttpCodaClient>, ApiError> {
    let client_config = CodaClientConfig::new(config.api_key.clone())
        .with_base_url(config.base_url.clone())
        .with_request_timeout(config.request_timeout);
    let client = HttpCodaClient::new(client_config)?;

    let export_policy = ExportPolicy::default()
        .with_poll_interval(config.export_poll_interval)
        .with_max_attempts(config.export_max_attempts);

    Ok(CodaControlPlane::new(client).with_export_policy(export_policy))
}
