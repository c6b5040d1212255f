//! Post-deploy health verification.
//!
//! The poller is the only retry loop in Shipway: fixed-interval GETs with a
//! bounded attempt budget. Deployers never retry on their own.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of post-deploy verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// A 2xx response was observed within the attempt budget.
    Healthy,

    /// The attempt budget was exhausted without a 2xx response.
    Unhealthy,

    /// No health URL was configured; nothing was verified.
    Skipped,
}

/// One liveness probe against a URL.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// True when the endpoint answered with a 2xx status.
    async fn probe(&self, url: &str) -> bool;
}

/// reqwest-backed probe.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("shipway/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn probe(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Polls a health URL at a fixed interval with a bounded attempt budget.
pub struct HealthPoller {
    probe: Box<dyn HealthProbe>,
    interval: Duration,
    max_attempts: u32,
}

impl HealthPoller {
    /// Poller backed by a real HTTP client.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self::with_probe(Box::new(HttpProbe::new()), interval, max_attempts)
    }

    /// Poller with an injected probe (used by tests).
    pub fn with_probe(probe: Box<dyn HealthProbe>, interval: Duration, max_attempts: u32) -> Self {
        Self {
            probe,
            interval,
            max_attempts,
        }
    }

    /// Poll until the first 2xx response or the attempt budget runs out.
    ///
    /// `None` yields [`HealthStatus::Skipped`] without issuing a single
    /// request. A success on attempt m performs exactly m requests; the
    /// interval sleep happens between attempts, never after the last one.
    pub async fn poll(&self, url: Option<&str>) -> HealthStatus {
        let Some(url) = url else {
            info!("no health URL configured, skipping verification");
            return HealthStatus::Skipped;
        };

        for attempt in 1..=self.max_attempts {
            if self.probe.probe(url).await {
                info!(url, attempt, "health check passed");
                return HealthStatus::Healthy;
            }
            debug!(url, attempt, max_attempts = self.max_attempts, "health probe failed");
            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        warn!(url, attempts = self.max_attempts, "health check exhausted attempt budget");
        HealthStatus::Unhealthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Probe fake that succeeds from a given attempt onward and counts calls.
    struct ScriptedProbe {
        calls: Arc<AtomicU32>,
        healthy_from: u32,
    }

    impl ScriptedProbe {
        fn new(healthy_from: u32) -> (Self, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            (
                Self {
                    calls: calls.clone(),
                    healthy_from,
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl HealthProbe for ScriptedProbe {
        async fn probe(&self, _url: &str) -> bool {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.healthy_from != 0 && call >= self.healthy_from
        }
    }

    #[tokio::test]
    async fn test_no_url_is_skipped_without_requests() {
        let (probe, calls) = ScriptedProbe::new(1);
        let poller = HealthPoller::with_probe(Box::new(probe), Duration::ZERO, 5);

        assert_eq!(poller.poll(None).await, HealthStatus::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_healthy_on_attempt_m_performs_exactly_m_requests() {
        let (probe, calls) = ScriptedProbe::new(3);
        let poller = HealthPoller::with_probe(Box::new(probe), Duration::ZERO, 10);

        assert_eq!(
            poller.poll(Some("http://localhost/health")).await,
            HealthStatus::Healthy
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3, "no extra polling after success");
    }

    #[tokio::test]
    async fn test_exhaustion_performs_exactly_max_attempts() {
        let (probe, calls) = ScriptedProbe::new(0);
        let poller = HealthPoller::with_probe(Box::new(probe), Duration::ZERO, 30);

        assert_eq!(
            poller.poll(Some("http://localhost/health")).await,
            HealthStatus::Unhealthy
        );
        assert_eq!(calls.load(Ordering::SeqCst), 30);
    }

    #[tokio::test]
    async fn test_immediate_success_performs_one_request() {
        let (probe, calls) = ScriptedProbe::new(1);
        let poller = HealthPoller::with_probe(Box::new(probe), Duration::ZERO, 30);

        assert_eq!(
            poller.poll(Some("http://localhost/health")).await,
            HealthStatus::Healthy
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
