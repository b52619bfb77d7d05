//! Unit tests for the task workflow.


use crate::task::ports::{SideEffect, SideEffectQueue};
use std::sync::Mutex;

/// Queue double that records effects instead of delivering them.
#[derive(Debug, Default)]
pub(super) struct RecordingQueue {
    effects: Mutex<Vec<SideEffect>>,
}

impl RecordingQueue {
    pub(super) fn effects(&self) -> Vec<SideEffect> {
        self.effects
            .lock()
            .map(|effects| effects.clone())
            .unwrap_or_default()
    }
}

impl SideEffectQueue for RecordingQueue {
    fn enqueue(&self, effect: SideEffect) {
        if let Ok(mut effects) = self.effects.lock() {
            effects.push(effect);
        }
    }
}
