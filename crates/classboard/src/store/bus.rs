use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A change callback. Carries no payload: listeners re-read the store.
pub type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Registry {
    next_key: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Registry of change listeners with synchronous fan-out.
///
/// The same callback may be registered any number of times; each registration
/// is a separate entry with its own [`Subscription`].
#[derive(Default)]
pub(crate) struct Bus {
    registry: Rc<RefCell<Registry>>,
}

impl Bus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, listener: Listener) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let key = registry.next_key;
        registry.next_key += 1;
        registry.listeners.push((key, listener));
        Subscription {
            registry: Rc::downgrade(&self.registry),
            key,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Invoke every listener registered at the time of the call, once each.
    ///
    /// The registry is not borrowed while listeners run, so a listener may
    /// subscribe, unsubscribe, or read the store.
    pub(crate) fn notify(&self) {
        let listeners: Vec<Listener> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

/// Handle returned by `subscribe`. Call [`Subscription::unsubscribe`] to remove the listener.
#[must_use = "keep the Subscription to be able to unsubscribe"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    key: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(key, _)| *key != self.key);
        }
    }

    #[cfg(test)]
    fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| r.borrow().listeners.iter().any(|(key, _)| *key == self.key))
    }
}
