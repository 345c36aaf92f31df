//! Derived-document dispatch.
//!
//! The engine never renders PDFs or sends mail; at check-out it hands an
//! invoice id to an opaque sink and moves on. The sink is fire-and-forget:
//! the engine gets a job handle back and never inspects job status.

use async_trait::async_trait;
use tokio::sync::mpsc;
use ulid::Ulid;

/// Request to generate a derived document (invoice PDF and the like).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentJob {
    pub invoice_id: Ulid,
    pub booking_id: Ulid,
}

/// Opaque handle to dispatched work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobHandle(pub Ulid);

#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Dispatch a document job. Must not block on the work itself.
    async fn enqueue(&self, job: DocumentJob) -> JobHandle;
}

/// Channel-backed sink: jobs land on an unbounded queue consumed by an
/// external worker. Dropping the receiver turns dispatch into a logged no-op.
pub struct DocumentQueue {
    tx: mpsc::UnboundedSender<(JobHandle, DocumentJob)>,
}

impl DocumentQueue {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(JobHandle, DocumentJob)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl DocumentSink for DocumentQueue {
    async fn enqueue(&self, job: DocumentJob) -> JobHandle {
        let handle = JobHandle(Ulid::new());
        if self.tx.send((handle, job)).is_err() {
            tracing::warn!("document worker gone, job dropped");
        }
        metrics::counter!(crate::observability::DOCUMENTS_ENQUEUED_TOTAL).increment(1);
        handle
    }
}

/// Discards every job. For tests and hosts without a document worker.
pub struct NullSink;

#[async_trait]
impl DocumentSink for NullSink {
    async fn enqueue(&self, _job: DocumentJob) -> JobHandle {
        JobHandle(Ulid::new())
    }
}
