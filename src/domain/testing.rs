//! In-memory transports for exercising the registry without sockets.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use super::transport::{Transport, TransportError};

/// Records every payload it is asked to send.
///
/// Cloning shares the inbox, so a test keeps one clone to inspect while the
/// registry owns the other.
#[derive(Debug, Clone)]
pub(crate) struct RecordingTransport {
    label: &'static str,
    inbox: Arc<Mutex<Vec<String>>>,
    broken: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

impl RecordingTransport {
    pub(crate) fn new(label: &'static str) -> Self {
        Self {
            label,
            inbox: Arc::new(Mutex::new(Vec::new())),
            broken: Arc::new(AtomicBool::new(false)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A transport whose every send fails.
    pub(crate) fn failing(label: &'static str) -> Self {
        let transport = Self::new(label);
        transport.break_link();
        transport
    }

    /// Makes all subsequent sends fail.
    pub(crate) fn break_link(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    /// Whether [`Transport::close`] has been called.
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) async fn received(&self) -> Vec<String> {
        self.inbox.lock().await.clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, payload: &str) -> Result<(), TransportError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        self.inbox.lock().await.push(payload.to_string());
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn peer(&self) -> String {
        self.label.to_string()
    }
}
