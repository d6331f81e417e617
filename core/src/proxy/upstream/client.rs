//! Shared HTTP client construction and upstream response helpers

use reqwest::{Client, Response, Url};
use tokio::time::Duration;

use crate::config::TimeoutsConfig;
use crate::proxy::error::{extract_message, relay_status, GatewayError};

/// Build the HTTP client shared by every upstream call.
///
/// The total timeout bounds each outbound request; dropping the calling
/// future cancels the request.
pub fn build_http_client(timeouts: &TimeoutsConfig) -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_timeout))
        .timeout(Duration::from_secs(timeouts.request_timeout))
        .pool_max_idle_per_host(16)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .user_agent(concat!("admin-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Append path segments to a base URL, percent-encoding each one.
pub fn endpoint<'a, I>(base_url: &str, segments: I) -> Result<Url, GatewayError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = Url::parse(base_url).map_err(|e| {
        tracing::error!("Invalid upstream base URL {}: {}", base_url, e);
        GatewayError::Transport("Invalid upstream configuration".to_string())
    })?;

    url.path_segments_mut()
        .map_err(|_| {
            tracing::error!("Upstream base URL cannot take a path: {}", base_url);
            GatewayError::Transport("Invalid upstream configuration".to_string())
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Turn a non-success response into `GatewayError::Upstream` with an extracted message.
pub async fn upstream_failure(service: &str, response: Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::error!("{} upstream error {}: {}", service, status, body);

    let status = relay_status(status);
    GatewayError::Upstream {
        status,
        message: extract_message(status, &body),
    }
}

/// Log a transport failure and return the generic client-facing error.
pub fn transport_failure(context: &str, err: reqwest::Error) -> GatewayError {
    // Photo URLs carry the API key in the query string
    let err = err.without_url();
    if err.is_timeout() {
        tracing::error!("{}: upstream request timed out: {}", context, err);
    } else {
        tracing::error!("{}: {}", context, err);
    }
    GatewayError::Transport(context.to_string())
}
