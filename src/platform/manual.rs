//! Deterministic in-process host
//!
//! Frames and key presses are delivered explicitly with `pump` and `press`.
//! Both collaborators are cheap shared handles, so a caller can keep a clone to
//! inspect what the indicator has scheduled or subscribed.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{FrameId, FrameScheduler, KeySource, ListenerId};
use crate::sim::{Indicator, RawKey};

#[derive(Debug, Default)]
struct FrameQueue {
    next_id: i32,
    pending: VecDeque<FrameId>,
    requested: u32,
    cancelled: u32,
}

/// Frame scheduler whose frames only fire through `pump`
#[derive(Debug, Clone, Default)]
pub struct ManualFrames {
    queue: Rc<RefCell<FrameQueue>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames requested and not yet fired or cancelled
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }

    /// Total frames ever requested
    pub fn requested(&self) -> u32 {
        self.queue.borrow().requested
    }

    /// Pending frames removed by `cancel_frame`
    pub fn cancelled(&self) -> u32 {
        self.queue.borrow().cancelled
    }

    /// Remove the oldest pending frame, as if it were about to fire
    pub fn take_next(&self) -> Option<FrameId> {
        self.queue.borrow_mut().pending.pop_front()
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> Option<FrameId> {
        let mut queue = self.queue.borrow_mut();
        queue.next_id += 1;
        let id = FrameId(queue.next_id);
        queue.pending.push_back(id);
        queue.requested += 1;
        Some(id)
    }

    fn cancel_frame(&mut self, id: FrameId) {
        let mut queue = self.queue.borrow_mut();
        if let Some(pos) = queue.pending.iter().position(|&p| p == id) {
            queue.pending.remove(pos);
            queue.cancelled += 1;
        }
    }
}

#[derive(Debug, Default)]
struct ListenerSet {
    next_id: u32,
    active: Vec<ListenerId>,
}

/// Keyboard source that only delivers presses through `press`
#[derive(Debug, Clone, Default)]
pub struct ManualKeys {
    listeners: Rc<RefCell<ListenerSet>>,
}

impl ManualKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().active.len()
    }

    pub fn is_listening(&self) -> bool {
        self.listener_count() > 0
    }
}

impl KeySource for ManualKeys {
    fn subscribe(&mut self) -> Option<ListenerId> {
        let mut set = self.listeners.borrow_mut();
        set.next_id += 1;
        let id = ListenerId(set.next_id);
        set.active.push(id);
        Some(id)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.borrow_mut().active.retain(|&l| l != id);
    }
}

/// Indicator wired to the manual host
pub type ManualIndicator<F> = Indicator<ManualFrames, ManualKeys, F>;

/// Fire the oldest pending frame at `time` (ms). Returns false if none was pending.
pub fn pump<F: FnMut(bool)>(indicator: &mut ManualIndicator<F>, time: f64) -> bool {
    if indicator.frames().take_next().is_none() {
        return false;
    }
    indicator.on_frame(time);
    true
}

/// Deliver a key press if a listener is installed. Returns whether it was delivered.
pub fn press<F: FnMut(bool)>(indicator: &mut ManualIndicator<F>, raw: &RawKey) -> bool {
    if !indicator.keys().is_listening() {
        return false;
    }
    indicator.on_key(raw);
    true
}
