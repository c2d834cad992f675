use foundation::time::Time;

/// An event stamped with the engine time it was emitted at.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<E> {
    pub at: Time,
    pub event: E,
}

/// Ordered, in-memory record of what happened, for tracing and replay checks.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<Stamped<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, at: Time, event: E) {
        self.events.push(Stamped { at, event });
    }

    pub fn events(&self) -> &[Stamped<E>] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Stamped<E>> {
        std::mem::take(&mut self.events)
    }
}
