// src/core/in_flight.rs
//! One registry of pending mutations, keyed by operation and resource.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Register,
    CreateJob,
    CreateApplication,
    UpdateApplicationStatus,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::Register => "register",
            Operation::CreateJob => "create_job",
            Operation::CreateApplication => "create_application",
            Operation::UpdateApplicationStatus => "update_application_status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKey {
    pub operation: Operation,
    pub resource: String,
}

impl OperationKey {
    pub fn new(operation: Operation, resource: impl ToString) -> Self {
        Self {
            operation,
            resource: resource.to_string(),
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operation.as_str(), self.resource)
    }
}

#[derive(Debug, Default)]
pub struct InFlight {
    pending: Mutex<HashSet<OperationKey>>,
}

impl InFlight {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<OperationKey>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim `key`. Returns `None` while another holder has it; the claim is
    /// released when the ticket drops.
    pub fn try_begin(self: &Arc<Self>, key: OperationKey) -> Option<InFlightTicket> {
        if !self.lock().insert(key.clone()) {
            debug!("Refusing duplicate request {}", key);
            return None;
        }
        Some(InFlightTicket {
            registry: Arc::clone(self),
            key,
        })
    }

    pub fn is_pending(&self, key: &OperationKey) -> bool {
        self.lock().contains(key)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }
}

#[derive(Debug)]
pub struct InFlightTicket {
    registry: Arc<InFlight>,
    key: OperationKey,
}

impl InFlightTicket {
    pub fn key(&self) -> &OperationKey {
        &self.key
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_is_refused_until_release() {
        let registry = InFlight::new();
        let key = OperationKey::new(Operation::CreateApplication, "7:3");

        let ticket = registry.try_begin(key.clone()).expect("first claim");
        assert!(registry.is_pending(&key));
        assert!(registry.try_begin(key.clone()).is_none());

        drop(ticket);
        assert!(!registry.is_pending(&key));
        assert!(registry.try_begin(key).is_some());
    }

    #[test]
    fn test_distinct_resources_do_not_block_each_other() {
        let registry = InFlight::new();
        let _a = registry
            .try_begin(OperationKey::new(Operation::UpdateApplicationStatus, 1))
            .unwrap();
        let _b = registry
            .try_begin(OperationKey::new(Operation::UpdateApplicationStatus, 2))
            .unwrap();
        let _c = registry
            .try_begin(OperationKey::new(Operation::CreateJob, 1))
            .unwrap();
        assert_eq!(registry.pending_count(), 3);
    }

    #[test]
    fn test_key_display() {
        let key = OperationKey::new(Operation::Login, "ana@correo.com");
        assert_eq!(key.to_string(), "login:ana@correo.com");
    }
}
