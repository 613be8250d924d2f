//! Registry reachability check

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::lookup_host;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

/// Host whose DNS resolution stands in for "the package registry is reachable"
pub const REGISTRY_HOST: &str = "registry.yarnpkg.com";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Answers whether package installation can go online
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// Resolves the registry host, then the configured HTTPS proxy
#[derive(Debug, Clone)]
pub struct DnsConnectivity {
    host: String,
    timeout: Duration,
}

impl Default for DnsConnectivity {
    fn default() -> Self {
        Self {
            host: REGISTRY_HOST.to_string(),
            timeout: LOOKUP_TIMEOUT,
        }
    }
}

impl DnsConnectivity {
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            timeout,
        }
    }

    async fn resolves(&self, host: &str) -> bool {
        let lookup = lookup_host((host, 443));
        match timeout(self.timeout, lookup).await {
            Ok(Ok(mut addrs)) => addrs.next().is_some(),
            Ok(Err(e)) => {
                debug!(host, error = %e, "lookup failed");
                false
            }
            Err(_) => {
                debug!(host, "lookup timed out");
                false
            }
        }
    }
}

/// Host part of an `https_proxy` style value
pub fn proxy_host(proxy: &str) -> Option<String> {
    Url::parse(proxy)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

#[async_trait]
impl Connectivity for DnsConnectivity {
    async fn is_online(&self) -> bool {
        if self.resolves(&self.host).await {
            return true;
        }

        // Behind a proxy the registry may not resolve locally
        let proxy = std::env::var("https_proxy")
            .or_else(|_| std::env::var("HTTPS_PROXY"))
            .ok();
        match proxy.as_deref().and_then(proxy_host) {
            Some(host) => self.resolves(&host).await,
            None => false,
        }
    }
}

/// Fixed answer, for offline mode and tests
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

#[async_trait]
impl Connectivity for StaticConnectivity {
    async fn is_online(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_host() {
        assert_eq!(
            proxy_host("http://proxy.corp.example:3128").as_deref(),
            Some("proxy.corp.example")
        );
        assert_eq!(proxy_host("not a url"), None);
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_offline() {
        let connectivity =
            DnsConnectivity::new("does-not-exist.invalid", Duration::from_millis(500));
        assert!(!connectivity.resolves("does-not-exist.invalid").await);
    }

    #[tokio::test]
    async fn test_static_connectivity() {
        assert!(StaticConnectivity(true).is_online().await);
        assert!(!StaticConnectivity(false).is_online().await);
    }
}
