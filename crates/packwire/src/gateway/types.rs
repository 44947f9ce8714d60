// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request/reply correlation types for the gateway runtime.

use crate::io::{Reader, Writer};
use crate::pack::Packable;
use crate::Result;

/// Correlates a reply with the request that produced it.
///
/// A plain monotonic counter stands in for the writer-GUID + sequence-number
/// pair a real transport would use; the gateway has no writer identity of
/// its own to mix in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CorrelationId(pub u64);

impl CorrelationId {
    pub fn zero() -> Self {
        Self(0)
    }
}

impl Packable for CorrelationId {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        self.0.pack(writer)
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        Ok(Self(u64::unpack(reader)?))
    }
}

/// A payload tagged with its correlation id, sent in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<T> {
    pub correlation_id: CorrelationId,
    pub body: T,
}

impl<T> Envelope<T> {
    pub fn new(correlation_id: CorrelationId, body: T) -> Self {
        Self { correlation_id, body }
    }
}

impl<T: Packable> Packable for Envelope<T> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        self.correlation_id.pack(writer)?;
        self.body.pack(writer)
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        let correlation_id = CorrelationId::unpack(reader)?;
        let body = T::unpack(reader)?;
        Ok(Self { correlation_id, body })
    }
}

/// Status a handler attaches to its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum GatewayStatus {
    #[default]
    Ok = 0,
    ServiceNotFound = 1,
    HandlerFailed = 2,
}

impl GatewayStatus {
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::Ok,
            1 => Self::ServiceNotFound,
            _ => Self::HandlerFailed,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Header prepended to a gateway reply's packed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplyStatus {
    pub correlation_id: CorrelationId,
    pub status: GatewayStatus,
}

impl Packable for ReplyStatus {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        self.correlation_id.pack(writer)?;
        self.status.as_i32().pack(writer)
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        let correlation_id = CorrelationId::unpack(reader)?;
        let status = GatewayStatus::from_i32(i32::unpack(reader)?);
        Ok(Self { correlation_id, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{Reader, Writer};

    #[test]
    fn envelope_roundtrip() {
        let env = Envelope::new(CorrelationId(7), 42i32);
        let mut w = Writer::new();
        env.pack(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let back = Envelope::<i32>::unpack(&mut r).unwrap();
        assert_eq!(back, env);
    }

    #[test]
    fn reply_status_roundtrip() {
        let status = ReplyStatus { correlation_id: CorrelationId(3), status: GatewayStatus::ServiceNotFound };
        let mut w = Writer::new();
        status.pack(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(ReplyStatus::unpack(&mut r).unwrap(), status);
    }
}
