//! Trace collectors: where finished observations are shipped.

use async_trait::async_trait;
use parking_lot::Mutex;
use promptrail_core::TracingDeliveryError;
use std::sync::Arc;

use crate::record::TraceRecord;

/// Destination for batches of finished observations.
///
/// Errors are reported to the background delivery task, which logs and
/// drops them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TraceCollector: Send + Sync {
    /// Ship one batch.
    async fn export(&self, batch: Vec<TraceRecord>) -> Result<(), TracingDeliveryError>;
}

/// Collector that keeps every record in memory.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollector {
    records: Arc<Mutex<Vec<TraceRecord>>>,
}

impl MemoryCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records exported so far, in export order.
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().clone()
    }

    /// Find the first record with a name.
    pub fn find(&self, name: &str) -> Option<TraceRecord> {
        self.records.lock().iter().find(|r| r.name == name).cloned()
    }
}

#[async_trait]
impl TraceCollector for MemoryCollector {
    async fn export(&self, batch: Vec<TraceRecord>) -> Result<(), TracingDeliveryError> {
        self.records.lock().extend(batch);
        Ok(())
    }
}
