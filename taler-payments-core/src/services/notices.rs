//! Request-scoped notice collection.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::types::{Notice, NoticeSeverity};

#[derive(Default)]
struct Inner {
    seen: HashSet<(String, String)>,
    entries: Vec<Notice>,
}

/// Collector of user-facing outcome messages, deduplicated by
/// `(scope, code)`.
///
/// One instance lives for exactly one request — construct it fresh per save
/// so the dedup set never leaks across requests — and is shared by the
/// pipeline components via `Arc`.
#[derive(Default)]
pub struct SettingsNotices {
    inner: Mutex<Inner>,
}

impl SettingsNotices {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a notice, but only once per `(scope, code)` for the lifetime of
    /// this sink. Later calls with the same pair are silently dropped.
    pub fn add_once(
        &self,
        scope: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        severity: NoticeSeverity,
    ) {
        let scope = scope.into();
        let code = code.into();
        let mut inner = self.lock();
        if !inner.seen.insert((scope.clone(), code.clone())) {
            return;
        }
        inner.entries.push(Notice {
            scope,
            code,
            message: message.into(),
            severity,
        });
    }

    /// Whether a notice with this `(scope, code)` was recorded.
    #[must_use]
    pub fn has(&self, scope: &str, code: &str) -> bool {
        self.lock()
            .seen
            .contains(&(scope.to_string(), code.to_string()))
    }

    /// Snapshot of the recorded notices, in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<Notice> {
        self.lock().entries.clone()
    }

    /// Drain the recorded notices for display, resetting the sink.
    #[must_use]
    pub fn take(&self) -> Vec<Notice> {
        let mut inner = self.lock();
        inner.seen.clear();
        std::mem::take(&mut inner.entries)
    }
}
