// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Side-channel sinks for progress events.

use tokio::sync::mpsc;

use crate::types::{IndexProgress, ProgressEvent};

/// Receives conversation progress events in emission order.
///
/// Sinks must not fail the turn: delivery errors are swallowed.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Receives document-ingestion progress reports.
pub trait IndexProgressSink: Send + Sync {
    fn report(&self, progress: IndexProgress);
}

/// A sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn emit(&self, _event: ProgressEvent) {}
}

impl IndexProgressSink for NoopSink {
    fn report(&self, _progress: IndexProgress) {}
}

impl ProgressSink for mpsc::UnboundedSender<ProgressEvent> {
    fn emit(&self, event: ProgressEvent) {
        if self.send(event).is_err() {
            tracing::debug!("progress receiver dropped");
        }
    }
}

impl IndexProgressSink for mpsc::UnboundedSender<IndexProgress> {
    fn report(&self, progress: IndexProgress) {
        if self.send(progress).is_err() {
            tracing::debug!("index progress receiver dropped");
        }
    }
}
