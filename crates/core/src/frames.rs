//! Cooperative, single-threaded frame scheduling.
//!
//! Callbacks are one-shot, like a browser animation frame request. The
//! returned [`FrameHandle`] owns the registration: dropping it before the
//! frame runs cancels the callback and frees it.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

type FrameCallback = Box<dyn FnOnce(f64)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: BTreeMap<u64, FrameCallback>,
}

#[derive(Clone, Default)]
pub struct FrameScheduler {
    registry: Rc<RefCell<Registry>>,
}

#[must_use = "dropping the handle cancels the frame request"]
pub struct FrameHandle {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl FrameHandle {
    pub fn is_pending(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.borrow().callbacks.contains_key(&self.id))
            .unwrap_or(false)
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.try_borrow_mut() {
                registry.callbacks.remove(&self.id);
            }
        }
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self, callback: impl FnOnce(f64) + 'static) -> FrameHandle {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.insert(id, Box::new(callback));
        FrameHandle { id, registry: Rc::downgrade(&self.registry) }
    }

    pub fn pending(&self) -> usize {
        self.registry.borrow().callbacks.len()
    }

    /// Runs every callback registered before this call, in request order.
    /// Requests made from inside a callback wait for the next tick.
    pub fn tick(&self, timestamp_ms: f64) -> usize {
        let due = std::mem::take(&mut self.registry.borrow_mut().callbacks);
        let ran = due.len();
        for (_, callback) in due {
            callback(timestamp_ms);
        }
        ran
    }
}

/// Collapses bursts of input events (scroll, pointer move) into at most one
/// pending frame.
#[derive(Clone)]
pub struct FrameCoalescer {
    scheduler: FrameScheduler,
    ticking: Rc<Cell<bool>>,
    handle: Rc<RefCell<Option<FrameHandle>>>,
}

impl FrameCoalescer {
    pub fn new(scheduler: FrameScheduler) -> Self {
        Self {
            scheduler,
            ticking: Rc::new(Cell::new(false)),
            handle: Rc::new(RefCell::new(None)),
        }
    }

    /// Returns `true` when a new frame was requested, `false` when one is
    /// already waiting.
    pub fn schedule(&self, update: impl FnOnce(f64) + 'static) -> bool {
        if self.ticking.get() {
            return false;
        }
        self.ticking.set(true);

        let ticking = Rc::clone(&self.ticking);
        let handle = self.scheduler.request(move |timestamp| {
            update(timestamp);
            ticking.set(false);
        });
        *self.handle.borrow_mut() = Some(handle);
        true
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking.get()
    }

    /// Drops the pending frame, if any.
    pub fn cancel(&self) {
        self.handle.borrow_mut().take();
        self.ticking.set(false);
    }
}
