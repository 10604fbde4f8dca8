// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Session Observers

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::Serialize;

use crate::ticker::Tick;
use crate::types::{ChangeEvent, StatsSnapshot, ThresholdState};

/// View-side hooks, invoked synchronously after each session transition.
///
/// Every method has a no-op default so an observer only implements what it
/// renders.
pub trait SessionObserver {
    fn on_matrix_changed(&mut self, _snapshot: &StatsSnapshot) {}
    fn on_change_logged(&mut self, _event: &ChangeEvent) {}
    fn on_threshold_evaluated(&mut self, _state: ThresholdState) {}
    fn on_tick(&mut self, _tick: &Tick) {}
}

/// Owned copy of one observer notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum SessionEvent {
    MatrixChanged(StatsSnapshot),
    ChangeLogged(ChangeEvent),
    ThresholdEvaluated(ThresholdState),
    Tick(Tick),
}

/// Observer that buffers notifications for a host to drain later.
///
/// Clones share one queue, so the host keeps a clone while the session owns
/// the registered one. The queue is unbounded and must be drained after each
/// call; a single `pump` adds at most `MAX_CATCH_UP_TICKS` ticks' worth.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Rc<RefCell<VecDeque<SessionEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<SessionEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    fn push(&self, event: SessionEvent) {
        self.events.borrow_mut().push_back(event);
    }
}

impl SessionObserver for EventQueue {
    fn on_matrix_changed(&mut self, snapshot: &StatsSnapshot) {
        self.push(SessionEvent::MatrixChanged(snapshot.clone()));
    }

    fn on_change_logged(&mut self, event: &ChangeEvent) {
        self.push(SessionEvent::ChangeLogged(event.clone()));
    }

    fn on_threshold_evaluated(&mut self, state: ThresholdState) {
        self.push(SessionEvent::ThresholdEvaluated(state));
    }

    fn on_tick(&mut self, tick: &Tick) {
        self.push(SessionEvent::Tick(*tick));
    }
}
