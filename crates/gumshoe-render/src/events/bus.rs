use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::ecs::EntityId;

/// Payload carried by an emitted event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EventData {
    #[default]
    None,
    Entity(EntityId),
    Size { width: u32, height: u32 },
}

type Handler = Rc<RefCell<dyn FnMut(&EventData)>>;

struct Listener {
    id: u64,
    event: String,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<Listener>,
}

/// Single-threaded publish/subscribe hub.
///
/// Clones share the same listener registry.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Registry>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reg = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("listeners", &reg.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event`. The handler stays active until the
    /// returned [`Subscription`] is dropped or unsubscribed.
    pub fn on<F>(&self, event: &str, handler: F) -> Subscription
    where
        F: FnMut(&EventData) + 'static,
    {
        let mut reg = self.inner.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.listeners.push(Listener {
            id,
            event: event.to_string(),
            handler: Rc::new(RefCell::new(handler)),
        });

        Subscription {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Invokes every handler registered for `event`. Returns how many ran.
    ///
    /// The handler list is snapshotted first, so handlers may subscribe or
    /// unsubscribe while being notified. A handler that re-emits the event
    /// it is handling is not re-entered.
    pub fn emit(&self, event: &str, data: EventData) -> usize {
        let handlers: Vec<Handler> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event == event)
            .map(|l| Rc::clone(&l.handler))
            .collect();

        let mut ran = 0;
        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut h) => {
                    (*h)(&data);
                    ran += 1;
                }
                Err(_) => log::warn!("re-entrant emit of {event:?} skipped"),
            }
        }
        ran
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event == event)
            .count()
    }
}

/// Handle to a registered handler. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the handler"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Subscription {
    /// Removes the handler now.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// False once the bus itself is gone.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|reg| reg.borrow().listeners.iter().any(|l| l.id == self.id))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(reg) = self.registry.upgrade() {
            // Drop can run inside a handler while `emit` holds no borrow, but
            // guard anyway: a held borrow means we are mid-subscribe.
            if let Ok(mut reg) = reg.try_borrow_mut() {
                reg.listeners.retain(|l| l.id != self.id);
            }
        }
    }
}
