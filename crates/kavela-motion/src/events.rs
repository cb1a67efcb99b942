//! Click dispatch.
//!
//! Listeners are attached at the page level and see every click; they find
//! the element they care about by walking up from [`ClickEvent::target`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use kavela_dom::NodeId;

use crate::context::HostContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    target: NodeId,
    default_prevented: bool,
}

impl ClickEvent {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            default_prevented: false,
        }
    }

    /// The innermost element that was clicked.
    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub(crate) type ClickCallback = Rc<RefCell<dyn FnMut(&mut ClickEvent, &mut HostContext<'_>)>>;

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: BTreeMap<u64, ClickCallback>,
    next_id: u64,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ListenerRegistry {
    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Listeners in registration order.
    pub(crate) fn snapshot(&self) -> Vec<(u64, ClickCallback)> {
        self.listeners
            .iter()
            .map(|(&id, callback)| (id, Rc::clone(callback)))
            .collect()
    }
}

/// Registration of one click listener; removes it on drop.
#[must_use = "dropping a ListenerHandle removes the listener"]
pub struct ListenerHandle {
    registry: Weak<RefCell<ListenerRegistry>>,
    id: Option<u64>,
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle").field("id", &self.id).finish()
    }
}

impl ListenerHandle {
    pub(crate) fn register(
        registry: &Rc<RefCell<ListenerRegistry>>,
        callback: impl FnMut(&mut ClickEvent, &mut HostContext<'_>) + 'static,
    ) -> Self {
        let mut inner = registry.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, Rc::new(RefCell::new(callback)));
        Self {
            registry: Rc::downgrade(registry),
            id: Some(id),
        }
    }

    pub fn is_attached(&self) -> bool {
        match (self.id, self.registry.upgrade()) {
            (Some(id), Some(registry)) => registry.borrow().contains(id),
            _ => false,
        }
    }

    /// Detach the listener. Idempotent.
    pub fn remove(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().listeners.remove(&id);
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.remove();
    }
}
