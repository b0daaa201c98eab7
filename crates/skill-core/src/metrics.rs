//! Dispatch counters.
//!
//! Plain atomics; the dispatcher is shared across requests behind an `Arc`.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

use crate::request::EventKind;

#[derive(Debug, Default)]
pub struct DispatchMetrics {
    pub requests_total: AtomicUsize,
    pub session_started_total: AtomicUsize,
    pub launch_total: AtomicUsize,
    pub intent_total: AtomicUsize,
    pub session_ended_total: AtomicUsize,
    /// Intents with no registered handler (answered with fallback speech).
    pub unrecognized_intent_total: AtomicUsize,
    pub authorization_rejected_total: AtomicUsize,
    pub handler_failed_total: AtomicUsize,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: usize,
    pub session_started_total: usize,
    pub launch_total: usize,
    pub intent_total: usize,
    pub session_ended_total: usize,
    pub unrecognized_intent_total: usize,
    pub authorization_rejected_total: usize,
    pub handler_failed_total: usize,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one handled phase.
    pub fn inc_kind(&self, kind: EventKind) {
        let counter = match kind {
            EventKind::SessionStarted => &self.session_started_total,
            EventKind::Launch => &self.launch_total,
            EventKind::Intent => &self.intent_total,
            EventKind::SessionEnded => &self.session_ended_total,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_unrecognized_intent(&self) {
        self.unrecognized_intent_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_authorization_rejected(&self) {
        self.authorization_rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_handler_failed(&self) {
        self.handler_failed_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            session_started_total: self.session_started_total.load(Ordering::Relaxed),
            launch_total: self.launch_total.load(Ordering::Relaxed),
            intent_total: self.intent_total.load(Ordering::Relaxed),
            session_ended_total: self.session_ended_total.load(Ordering::Relaxed),
            unrecognized_intent_total: self.unrecognized_intent_total.load(Ordering::Relaxed),
            authorization_rejected_total: self
                .authorization_rejected_total
                .load(Ordering::Relaxed),
            handler_failed_total: self.handler_failed_total.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_metrics_are_zero() {
        let snapshot = DispatchMetrics::new().snapshot();
        assert_eq!(snapshot.requests_total, 0);
        assert_eq!(snapshot.unrecognized_intent_total, 0);
    }

    #[test]
    fn inc_kind_touches_only_its_counter() {
        let metrics = DispatchMetrics::new();
        metrics.inc_kind(EventKind::Launch);
        metrics.inc_kind(EventKind::Launch);
        metrics.inc_kind(EventKind::SessionEnded);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.launch_total, 2);
        assert_eq!(snapshot.session_ended_total, 1);
        assert_eq!(snapshot.intent_total, 0);
        assert_eq!(snapshot.session_started_total, 0);
    }
}
