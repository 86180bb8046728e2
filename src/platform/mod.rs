//! Platform abstraction layer
//!
//! The indicator talks to its environment through two collaborators:
//! - a frame scheduler (one callback per rendered frame, cancellable)
//! - a global keyboard source (subscribe/unsubscribe a press handler)
//!
//! `manual` drives both deterministically (tests, native demo); `web` binds them
//! to `requestAnimationFrame` and a `keydown` listener on `window`.

pub mod manual;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use manual::{ManualFrames, ManualKeys, press, pump};

/// Handle of a scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub i32);

/// Handle of an installed keyboard listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// Requests and cancels per-frame callbacks.
///
/// The host calls `Indicator::on_frame` with a monotonic timestamp (ms) once
/// for every successful `request_frame`, unless the frame is cancelled first.
pub trait FrameScheduler {
    /// Schedule one callback; `None` if the host refused
    fn request_frame(&mut self) -> Option<FrameId>;
    /// Cancel a pending callback (no-op if it already ran)
    fn cancel_frame(&mut self, id: FrameId);
}

/// Installs and removes the global key press handler.
///
/// While subscribed, the host calls `Indicator::on_key` for every key press,
/// in the order the presses happened.
pub trait KeySource {
    fn subscribe(&mut self) -> Option<ListenerId>;
    fn unsubscribe(&mut self, id: ListenerId);
}
