// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-instance registry of service handlers.
//!
//! Unlike a process-wide registry, each [`super::Gateway`] owns its own
//! table: nothing here is shared mutable state between gateway instances.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Handles one service's raw request bytes and returns raw reply bytes.
///
/// Implementors typically unpack the request with a generated [`crate::Packable`]
/// type, run their logic, and pack the reply back.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, payload: &[u8]) -> Result<Vec<u8>>;
}

impl<F> Handler for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync + 'static,
{
    fn handle(&self, payload: &[u8]) -> Result<Vec<u8>> {
        self(payload)
    }
}

/// Service name to handler lookup, owned by a single [`super::Gateway`].
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self { handlers: HashMap::new() }
    }

    /// Register a handler for `service_name`, replacing any prior handler.
    pub fn register(&mut self, service_name: impl Into<String>, handler: impl Handler) {
        let service_name = service_name.into();
        log::debug!("gateway registry: registered service '{service_name}'");
        self.handlers.insert(service_name, Arc::new(handler));
    }

    pub fn unregister(&mut self, service_name: &str) {
        if self.handlers.remove(service_name).is_some() {
            log::debug!("gateway registry: unregistered service '{service_name}'");
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub(crate) fn dispatch(&self, service_name: &str, payload: &[u8]) -> Result<Vec<u8>> {
        let handler = self
            .handlers
            .get(service_name)
            .ok_or_else(|| Error::Gateway(format!("no handler registered for '{service_name}'")))?;
        handler.handle(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_dispatch() {
        let mut registry = HandlerRegistry::new();
        registry.register("echo", |payload: &[u8]| Ok(payload.to_vec()));
        assert_eq!(registry.dispatch("echo", b"hi").unwrap(), b"hi");
    }

    #[test]
    fn dispatch_unknown_service_errors() {
        let registry = HandlerRegistry::new();
        match registry.dispatch("missing", &[]) {
            Err(Error::Gateway(message)) => assert!(message.contains("missing")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unregister_removes_handler() {
        let mut registry = HandlerRegistry::new();
        registry.register("echo", |payload: &[u8]| Ok(payload.to_vec()));
        registry.unregister("echo");
        assert!(registry.dispatch("echo", b"hi").is_err());
    }
}
