/*!
 * Notification channel for the change registry.
 *
 * Each registry owns its own channel. Listeners are invoked synchronously,
 * in subscription order, on the thread that performed the registration.
 */

use std::fmt;

/// Events published by a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkEvent {
    /// The tracked work changed; call `get_work()` for details
    WorkPerformed,
}

/// Handle returned by `subscribe`, used to remove the listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Boxed listener callback
pub type Listener = Box<dyn FnMut(WorkEvent) + Send>;

/// Ordered list of listeners for a single registry instance
#[derive(Default)]
pub struct NotificationChannel {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl NotificationChannel {
    /// Create an empty channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and return its handle
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(WorkEvent) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the handle was unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver an event to every listener
    pub fn notify(&mut self, event: WorkEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    /// Number of subscribed listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
