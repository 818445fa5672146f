//! Coordinator configuration.

use std::time::Duration;

/// Coordinator configuration.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Base URLs of the remote agents, one worker per entry.
    pub agent_urls: Vec<String>,

    /// Upper bound on one timed dequeue attempt. Workers re-check
    /// cancellation after each expiry, so this bounds shutdown latency,
    /// not correctness.
    pub poll_interval: Duration,

    /// Timeout applied to each HTTP round trip against an agent.
    pub request_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            agent_urls: Vec::new(),
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoordinatorConfig::default();
        assert!(config.agent_urls.is_empty());
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }
}
