//! Scene-level event outbox
//!
//! Objects never reach into the director or the scene directly. Update and
//! collision hooks push typed events here; the owner drains them once the
//! frame's simulation work is done.

/// FIFO queue of game-defined events
#[derive(Debug)]
pub struct EventQueue<E> {
    pending: Vec<E>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Queue an event for the owner
    pub fn send(&mut self, event: E) {
        self.pending.push(event);
    }

    /// Take every queued event in send order
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.pending)
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Discard queued events
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestEvent {
        Scored(u32),
        Reset,
    }

    #[test]
    fn test_drain_preserves_order() {
        let mut queue = EventQueue::new();
        queue.send(TestEvent::Scored(1));
        queue.send(TestEvent::Reset);
        queue.send(TestEvent::Scored(2));
        assert_eq!(queue.len(), 3);

        let drained = queue.drain();
        assert_eq!(
            drained,
            vec![TestEvent::Scored(1), TestEvent::Reset, TestEvent::Scored(2)]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut queue = EventQueue::new();
        queue.send(TestEvent::Reset);
        queue.clear();
        assert!(queue.drain().is_empty());
    }
}
