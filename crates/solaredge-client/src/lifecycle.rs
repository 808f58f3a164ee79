//! Transport ownership and release

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::transport::Transport;

/// Who is responsible for closing the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Built by the client; closed when the client is closed or dropped
    Owned,
    /// Supplied by the caller; never closed by the client
    Borrowed,
}

/// Transport plus the bookkeeping that guarantees it is closed at most once
pub(crate) struct TransportHandle {
    transport: Arc<dyn Transport>,
    ownership: Ownership,
    closed: AtomicBool,
}

impl TransportHandle {
    pub(crate) fn owned(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, Ownership::Owned)
    }

    pub(crate) fn borrowed(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, Ownership::Borrowed)
    }

    fn new(transport: Arc<dyn Transport>, ownership: Ownership) -> Self {
        Self {
            transport,
            ownership,
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn get(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close an owned transport. Returns `true` only for the call that
    /// actually closed it; borrowed transports are left untouched.
    pub(crate) fn close(&self) -> bool {
        if self.ownership == Ownership::Borrowed {
            return false;
        }
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        debug!("Releasing owned transport");
        self.transport.close();
        true
    }
}

impl Drop for TransportHandle {
    fn drop(&mut self) {
        self.close();
    }
}
