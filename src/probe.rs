//! One-shot proxy connectivity probe, run before any browser session opens.

use std::time::Duration;

use log::info;

use crate::config::ProxyConfig;
use crate::error::JourneyError;

const PROBE_URL: &str = "http://ipinfo.io/ip";
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Issue a plain HTTP request through the proxy and return the egress IP it
/// reports. Any failure here is a connectivity error; the caller treats it
/// as fatal for the run.
pub async fn check(proxy: &ProxyConfig) -> Result<String, JourneyError> {
    info!("testing proxy connectivity: {}", proxy.server);

    let mut upstream = reqwest::Proxy::all(&proxy.server).map_err(|e| {
        JourneyError::Config(format!("invalid proxy URL '{}': {}", proxy.server, e))
    })?;
    if let Some(ref username) = proxy.username {
        upstream = upstream.basic_auth(username, proxy.password.as_deref().unwrap_or(""));
    }

    let client = reqwest::Client::builder()
        .proxy(upstream)
        .timeout(PROBE_TIMEOUT)
        .build()
        .map_err(|e| JourneyError::Connection(format!("probe client: {}", e)))?;

    let response = client
        .get(PROBE_URL)
        .send()
        .await
        .map_err(|e| JourneyError::Connection(format!("proxy probe failed: {}", e)))?;
    let response = response
        .error_for_status()
        .map_err(|e| JourneyError::Connection(format!("proxy probe failed: {}", e)))?;
    let ip = response
        .text()
        .await
        .map_err(|e| JourneyError::Connection(format!("proxy probe read failed: {}", e)))?;

    let ip = ip.trim().to_string();
    info!("proxy connectivity ok, egress IP: {}", ip);
    Ok(ip)
}
