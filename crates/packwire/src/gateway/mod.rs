// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! A thin, synchronous request/reply gateway over [`crate::Packable`] types.
//!
//! Deliberately not wired to a transport or async runtime: it packs a
//! request, looks up a handler by service name, runs it, and packs the
//! reply.

mod config;
mod registry;
mod types;

pub use config::GatewayConfig;
pub use registry::{Handler, HandlerRegistry};
pub use types::{CorrelationId, Envelope, GatewayStatus, ReplyStatus};

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};
use crate::io::{Reader, Writer};
use crate::pack::Packable;

/// Owns a handler registry, a config, and the correlation-id counter for one
/// gateway instance.
pub struct Gateway {
    config: GatewayConfig,
    registry: HandlerRegistry,
    next_correlation_id: AtomicU64,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config, registry: HandlerRegistry::new(), next_correlation_id: AtomicU64::new(1) }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    fn next_correlation_id(&self) -> CorrelationId {
        CorrelationId(self.next_correlation_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Pack `request`, dispatch it to the handler registered for
    /// `service_name`, and unpack the reply.
    ///
    /// The request is assigned a fresh correlation id; the reply is checked
    /// against it as a sanity guard (a handler cannot forge a reply for a
    /// different in-flight request, even though this gateway never has more
    /// than one request outstanding at a time).
    pub fn dispatch<Req: Packable, Rep: Packable>(&self, service_name: &str, request: &Req) -> Result<Rep> {
        let correlation_id = self.next_correlation_id();

        let mut writer = Writer::new();
        correlation_id.pack(&mut writer)?;
        request.pack(&mut writer)?;
        let request_bytes = writer.into_bytes();

        let reply_bytes = self.registry.dispatch(service_name, &request_bytes)?;

        let mut reader = Reader::new(&reply_bytes);
        let reply = Envelope::<Rep>::unpack(&mut reader)?;
        if reply.correlation_id != correlation_id {
            return Err(Error::Gateway(format!(
                "reply correlation id {:?} did not match request {:?}",
                reply.correlation_id, correlation_id
            )));
        }
        Ok(reply.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_roundtrips_through_a_registered_handler() {
        let mut gateway = Gateway::new(GatewayConfig::default_profile());
        gateway.registry_mut().register("double", |payload: &[u8]| {
            let mut reader = Reader::new(payload);
            let env = Envelope::<i32>::unpack(&mut reader)?;
            let mut writer = Writer::new();
            Envelope::new(env.correlation_id, env.body * 2).pack(&mut writer)?;
            Ok(writer.into_bytes())
        });

        let reply: i32 = gateway.dispatch("double", &21i32).unwrap();
        assert_eq!(reply, 42);
    }

    #[test]
    fn dispatch_to_unregistered_service_errors() {
        let gateway = Gateway::new(GatewayConfig::default_profile());
        let result: Result<i32> = gateway.dispatch("missing", &1i32);
        assert!(matches!(result, Err(Error::Gateway(_))));
    }
}
