//! Event consumers.
//!
//! Anything that reacts to a session (terminal output, celebration effects,
//! notifications) subscribes as an observer. Observers only ever see events;
//! they get no handle back into the controller.

use std::cell::RefCell;
use std::rc::Rc;

use crate::events::Event;

pub trait SessionObserver {
    fn on_event(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> SessionObserver for F {
    fn on_event(&mut self, event: &Event) {
        self(event)
    }
}

/// Shared, cloneable record of every event seen.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Number of recorded events of the given kind.
    pub fn count(&self, kind: &str) -> usize {
        self.events.borrow().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn last(&self) -> Option<Event> {
        self.events.borrow().last().cloned()
    }
}

impl SessionObserver for EventLog {
    fn on_event(&mut self, event: &Event) {
        self.events.borrow_mut().push(event.clone());
    }
}
