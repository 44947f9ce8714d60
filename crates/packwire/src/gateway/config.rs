// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tunables for the gateway runtime, built with a chained-setter idiom.

use std::time::Duration;

/// Configuration for a [`super::Gateway`].
///
/// Construct with a named profile and refine with chained setters, e.g.
/// `GatewayConfig::default_profile().timeout(Duration::from_secs(1)).max_in_flight(64)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub(crate) timeout: Duration,
    pub(crate) max_in_flight: usize,
}

impl GatewayConfig {
    /// Balanced defaults: a one-second timeout, 256 requests in flight.
    pub fn default_profile() -> Self {
        Self { timeout: Duration::from_secs(1), max_in_flight: 256 }
    }

    /// No timeout, unbounded in-flight requests. Suited to trusted, in-process tests.
    pub fn unbounded() -> Self {
        Self { timeout: Duration::from_secs(3600), max_in_flight: usize::MAX }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::default_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_setters_override_profile() {
        let config = GatewayConfig::default_profile().timeout(Duration::from_millis(50)).max_in_flight(4);
        assert_eq!(config.timeout, Duration::from_millis(50));
        assert_eq!(config.max_in_flight, 4);
    }
}
