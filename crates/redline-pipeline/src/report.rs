// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reporting of mutations the engine had to drop

use redline_core::{InvalidMutationError, Mutation};
use std::sync::Mutex;

/// A malformed mutation emitted by a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedMutation {
    pub rule: String,
    pub mutation: Mutation,
    pub error: InvalidMutationError,
}

/// Host-supplied sink for dropped mutations
pub trait MutationReporter: Send + Sync {
    fn report(&self, dropped: &DroppedMutation);
}

/// Logs dropped mutations as warnings
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl MutationReporter for TracingReporter {
    fn report(&self, dropped: &DroppedMutation) {
        tracing::warn!(
            rule = %dropped.rule,
            mutation = %dropped.mutation,
            "dropping invalid mutation: {}",
            dropped.error
        );
    }
}

/// Keeps every dropped mutation for later inspection
#[derive(Debug, Default)]
pub struct CollectingReporter {
    dropped: Mutex<Vec<DroppedMutation>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything reported so far
    pub fn take(&self) -> Vec<DroppedMutation> {
        match self.dropped.lock() {
            Ok(mut dropped) => std::mem::take(&mut *dropped),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl MutationReporter for CollectingReporter {
    fn report(&self, dropped: &DroppedMutation) {
        match self.dropped.lock() {
            Ok(mut list) => list.push(dropped.clone()),
            Err(poisoned) => poisoned.into_inner().push(dropped.clone()),
        }
    }
}

impl<R: MutationReporter + ?Sized> MutationReporter for std::sync::Arc<R> {
    fn report(&self, dropped: &DroppedMutation) {
        (**self).report(dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn dropped() -> DroppedMutation {
        DroppedMutation {
            rule: "test".to_string(),
            mutation: Mutation::delete(3, 1),
            error: InvalidMutationError::InvertedRange { from: 3, to: 1 },
        }
    }

    #[test]
    fn test_collecting_reporter_drains() {
        let reporter = CollectingReporter::new();
        reporter.report(&dropped());
        reporter.report(&dropped());

        assert_eq!(reporter.take().len(), 2);
        assert!(reporter.take().is_empty());
    }

    #[test]
    fn test_shared_reporter() {
        let reporter = Arc::new(CollectingReporter::new());
        let shared: Box<dyn MutationReporter> = Box::new(Arc::clone(&reporter));
        shared.report(&dropped());

        assert_eq!(reporter.take(), vec![dropped()]);
    }
}
