use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Builds the HTTP client shared by the capture and availability requests
///
/// Per-request timeouts are applied by the callers, since capture and
/// availability requests have different budgets.
///
/// # Example
///
/// ```no_run
/// use archivelinks::config::UserAgentConfig;
/// use archivelinks::archive::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the client used by the fallback capture transport
///
/// It never follows redirects and speaks HTTP/1.1 only, so a capture request
/// that trips over the primary client's connection handling still has a
/// different path to the service.
pub fn build_beacon_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .http1_only()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let config = UserAgentConfig::default();
        assert!(build_http_client(&config).is_ok());
        assert!(build_beacon_client(&config).is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        let config = UserAgentConfig {
            name: "TestArchiver".to_string(),
            version: "1.0".to_string(),
            contact_url: None,
        };
        assert_eq!(config.header_value(), "TestArchiver/1.0");
    }
}
