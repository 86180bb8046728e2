//! The skill-check indicator state machine
//!
//! `Idle -> Running -> Completed(outcome)`. Entering `Running` acquires a
//! scheduled frame and a keyboard listener; every exit (success, failure,
//! timeout, external cancel, re-activation, drop) goes through `release`, which
//! gives both back together and latches `completed`.

use super::arc::TargetArc;
use super::input::{RawKey, normalize_key};
use super::outcome::{Verdict, evaluate};
use super::state::{ActivationConfig, IndicatorState, Outcome, Phase, SkillCheckDescriptor};
use super::sweep::{SweepStep, advance};
use crate::consts::MIN_SPEED_MULTIPLIER;
use crate::platform::{FrameId, FrameScheduler, KeySource, ListenerId};
use crate::renderer::RotationTransform;

/// A rotating skill-check indicator bound to a frame scheduler, a keyboard
/// source and a completion callback.
///
/// The callback receives exactly one `bool` per activation: `true` for a
/// correct press inside the target arc, `false` otherwise (including timeout).
pub struct Indicator<S, K, F>
where
    S: FrameScheduler,
    K: KeySource,
    F: FnMut(bool),
{
    frames: S,
    keys: K,
    on_complete: F,

    phase: Phase,
    state: IndicatorState,
    descriptor: Option<SkillCheckDescriptor>,
    config: ActivationConfig,

    /// Pending frame callback, if any
    frame: Option<FrameId>,
    /// Installed keyboard listener, if any
    listener: Option<ListenerId>,
}

impl<S, K, F> Indicator<S, K, F>
where
    S: FrameScheduler,
    K: KeySource,
    F: FnMut(bool),
{
    pub fn new(frames: S, keys: K, on_complete: F) -> Self {
        Self {
            frames,
            keys,
            on_complete,
            phase: Phase::Idle,
            state: IndicatorState::default(),
            descriptor: None,
            config: ActivationConfig::default(),
            frame: None,
            listener: None,
        }
    }

    /// Start a fresh activation, superseding any sweep in progress
    pub fn activate(&mut self, descriptor: SkillCheckDescriptor, config: ActivationConfig) {
        if self.phase == Phase::Running {
            log::debug!("Superseding running skill check");
        }
        self.release();

        if config.effective_speed() != config.speed_multiplier {
            log::debug!(
                "Speed multiplier {} floored to {}",
                config.speed_multiplier,
                MIN_SPEED_MULTIPLIER
            );
        }

        self.state.reset();
        self.descriptor = Some(descriptor);
        self.config = config;

        self.listener = self.keys.subscribe();
        self.frame = self.frames.request_frame();
        if self.listener.is_none() || self.frame.is_none() {
            log::warn!("Host refused a frame or key listener; skill check may not progress");
        }
        self.phase = Phase::Running;

        log::debug!(
            "Skill check started: key {:?}, arc [{}, {}], {:.0} ms sweep",
            self.descriptor.as_ref().map(|d| d.key),
            self.config.target_arc().start,
            self.config.target_arc().end(),
            self.config.duration_ms()
        );
    }

    /// Frame callback at host timestamp `time` (ms)
    pub fn on_frame(&mut self, time: f64) {
        if !self.is_running() {
            return;
        }
        // This frame is firing; make sure nothing else stays queued
        if let Some(id) = self.frame.take() {
            self.frames.cancel_frame(id);
        }

        match advance(&mut self.state, time, self.config.speed_multiplier) {
            SweepStep::Advanced(_) => self.frame = self.frames.request_frame(),
            SweepStep::Closed => {
                log::debug!("Sweep closed without a qualifying press");
                self.finish(Outcome::Failure);
            }
        }
    }

    /// Keyboard callback for one press
    pub fn on_key(&mut self, raw: &RawKey) {
        if !self.is_running() {
            log::trace!("Ignoring key {:?}: no sweep running", raw.key);
            return;
        }
        let Some(descriptor) = self.descriptor.as_ref() else {
            return;
        };

        let candidate = normalize_key(raw);
        let verdict = evaluate(
            descriptor,
            &self.config.target_arc(),
            &candidate,
            self.state.current_angle,
        );

        match verdict {
            Verdict::Ignored => {
                log::trace!("Ignoring key {:?}: not an allowed key", candidate);
            }
            Verdict::Decided(outcome) => {
                self.state.last_pressed_key = Some(candidate);
                self.finish(outcome);
            }
        }
    }

    /// External teardown: stop the sweep without emitting a result
    pub fn cancel(&mut self) {
        if self.phase == Phase::Running {
            log::debug!("Skill check cancelled at {:.1} degrees", self.state.current_angle);
            self.phase = Phase::Idle;
        }
        self.release();
    }

    fn finish(&mut self, outcome: Outcome) {
        self.release();
        self.phase = Phase::Completed(outcome);
        log::info!(
            "Skill check {} at {:.1} degrees",
            if outcome.is_success() { "passed" } else { "failed" },
            self.state.current_angle
        );
        (self.on_complete)(outcome.is_success());
        self.state.last_pressed_key = None;
    }

    /// Give back the frame and the listener together and latch completion
    fn release(&mut self) {
        if let Some(id) = self.frame.take() {
            self.frames.cancel_frame(id);
        }
        if let Some(id) = self.listener.take() {
            self.keys.unsubscribe(id);
        }
        self.state.completed = true;
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running && !self.state.completed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &IndicatorState {
        &self.state
    }

    pub fn current_angle(&self) -> f64 {
        self.state.current_angle
    }

    pub fn descriptor(&self) -> Option<&SkillCheckDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn config(&self) -> &ActivationConfig {
        &self.config
    }

    pub fn target_arc(&self) -> TargetArc {
        self.config.target_arc()
    }

    /// Rotation to paint for the current angle
    pub fn transform(&self) -> RotationTransform {
        RotationTransform::around_dial(self.state.current_angle)
    }

    pub fn frames(&self) -> &S {
        &self.frames
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }
}

impl<S, K, F> Drop for Indicator<S, K, F>
where
    S: FrameScheduler,
    K: KeySource,
    F: FnMut(bool),
{
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::platform::{ManualFrames, ManualKeys, press, pump};
    use std::cell::RefCell;
    use std::rc::Rc;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    type Results = Rc<RefCell<Vec<bool>>>;

    fn indicator() -> (
        Indicator<ManualFrames, ManualKeys, impl FnMut(bool)>,
        ManualFrames,
        ManualKeys,
        Results,
    ) {
        let frames = ManualFrames::new();
        let keys = ManualKeys::new();
        let results: Results = Rc::default();
        let sink = results.clone();
        let ind = Indicator::new(frames.clone(), keys.clone(), move |ok: bool| {
            sink.borrow_mut().push(ok)
        });
        (ind, frames, keys, results)
    }

    /// Timestamp at which a speed-1 sweep started at t=0 reaches `angle`
    fn time_at(angle: f64) -> f64 {
        (angle - SWEEP_START_ANGLE) / SWEEP_DEGREES * BASE_DURATION_MS
    }

    fn key(c: &str) -> RawKey {
        RawKey::new(c, format!("Key{}", c.to_uppercase()))
    }

    #[test]
    fn test_activate_acquires_resources() {
        let (mut ind, frames, keys, results) = indicator();
        assert_eq!(ind.phase(), Phase::Idle);
        assert!(!frames.has_pending());

        ind.activate(SkillCheckDescriptor::new('e'), ActivationConfig::default());
        assert_eq!(ind.phase(), Phase::Running);
        assert_eq!(ind.current_angle(), -90.0);
        assert_eq!(frames.pending_count(), 1);
        assert_eq!(keys.listener_count(), 1);
        assert!(results.borrow().is_empty());
    }

    #[test]
    fn test_timeout_emits_failure_once() {
        let (mut ind, frames, keys, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::new(0.0, 30.0, 1.0));

        let mut frame = 0;
        while pump(&mut ind, frame as f64 * FRAME_MS) {
            assert!(frames.pending_count() <= 1);
            frame += 1;
        }

        assert_eq!(*results.borrow(), vec![false]);
        assert_eq!(ind.phase(), Phase::Completed(Outcome::Failure));
        assert_eq!(ind.current_angle(), SWEEP_END_ANGLE);
        assert!(!frames.has_pending());
        assert!(!keys.is_listening());
        assert!(ind.state().completed);
        // Sweep lasted 2000ms, to within one frame
        let closed_at = (frame - 1) as f64 * FRAME_MS;
        assert!(closed_at >= BASE_DURATION_MS - 1e-6);
        assert!(closed_at - BASE_DURATION_MS <= FRAME_MS + 1e-6);
    }

    #[test]
    fn test_correct_key_inside_arc() {
        let (mut ind, frames, keys, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::new(0.0, 30.0, 1.0));

        pump(&mut ind, 0.0);
        pump(&mut ind, time_at(15.0));
        assert!((ind.current_angle() - 15.0).abs() < 1e-9);

        assert!(press(&mut ind, &key("w")));
        assert_eq!(*results.borrow(), vec![true]);
        assert_eq!(ind.phase(), Phase::Completed(Outcome::Success));
        assert!(!frames.has_pending());
        assert!(!keys.is_listening());
        assert_eq!(ind.state().last_pressed_key, None);
    }

    #[test]
    fn test_correct_key_outside_arc() {
        let (mut ind, _, _, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::new(0.0, 30.0, 1.0));

        pump(&mut ind, 0.0);
        pump(&mut ind, time_at(50.0));
        press(&mut ind, &key("w"));
        assert_eq!(*results.borrow(), vec![false]);
    }

    #[test]
    fn test_allowed_keys() {
        let desc = SkillCheckDescriptor::new('w').with_allowed_keys(['w', 'a']);
        let (mut ind, frames, keys, results) = indicator();
        ind.activate(desc, ActivationConfig::new(0.0, 30.0, 1.0));
        pump(&mut ind, 0.0);
        pump(&mut ind, time_at(15.0));

        // Not allowed: ignored, sweep continues
        let before = ind.state().clone();
        press(&mut ind, &key("s"));
        assert!(results.borrow().is_empty());
        assert_eq!(*ind.state(), before);
        assert_eq!(ind.phase(), Phase::Running);
        assert_eq!(frames.pending_count(), 1);
        assert!(keys.is_listening());
        assert!(pump(&mut ind, time_at(16.0)));

        // Allowed but wrong: failure even inside the arc
        press(&mut ind, &key("a"));
        assert_eq!(*results.borrow(), vec![false]);
        assert!(!frames.has_pending());
    }

    #[test]
    fn test_uppercase_json_descriptor() {
        let desc: SkillCheckDescriptor =
            serde_json::from_str(r#"{"key":"W","keys":["W","A"]}"#).unwrap();
        let (mut ind, _, _, results) = indicator();
        ind.activate(desc, ActivationConfig::new(0.0, 30.0, 1.0));
        pump(&mut ind, 0.0);
        pump(&mut ind, time_at(15.0));

        press(&mut ind, &RawKey::new("W", "KeyW"));
        assert_eq!(*results.borrow(), vec![true]);
        assert_eq!(ind.phase(), Phase::Completed(Outcome::Success));
    }

    #[test]
    fn test_non_latin_layout() {
        let (mut ind, _, _, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::new(0.0, 30.0, 1.0));
        pump(&mut ind, 0.0);
        pump(&mut ind, time_at(10.0));

        press(&mut ind, &RawKey::new("ς", "KeyW"));
        assert_eq!(*results.borrow(), vec![true]);
    }

    #[test]
    fn test_digit_key() {
        let (mut ind, _, _, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('7'), ActivationConfig::new(-90.0, 30.0, 1.0));
        pump(&mut ind, 0.0);

        press(&mut ind, &RawKey::new("ז", "Digit7"));
        assert_eq!(*results.borrow(), vec![true]);
    }

    #[test]
    fn test_press_before_first_frame_uses_start_angle() {
        let (mut ind, _, _, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('e'), ActivationConfig::new(-90.0, 0.0, 1.0));
        press(&mut ind, &key("e"));
        assert_eq!(*results.borrow(), vec![true]);
    }

    #[test]
    fn test_key_queued_behind_timeout_is_ignored() {
        let (mut ind, _, _, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::new(260.0, 10.0, 1.0));
        pump(&mut ind, 0.0);
        pump(&mut ind, BASE_DURATION_MS);

        // The listener is gone, but a press already queued by the host still arrives
        ind.on_key(&key("w"));
        assert_eq!(*results.borrow(), vec![false]);
    }

    #[test]
    fn test_frame_queued_behind_key_is_ignored() {
        let (mut ind, frames, _, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::new(0.0, 30.0, 1.0));
        pump(&mut ind, 0.0);
        pump(&mut ind, time_at(20.0));
        press(&mut ind, &key("w"));

        // A timeout-triggering frame that was already in flight
        ind.on_frame(BASE_DURATION_MS * 2.0);
        assert_eq!(*results.borrow(), vec![true]);
        assert!(!frames.has_pending());
        assert!((ind.current_angle() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_presses_after_completion_ignored() {
        let (mut ind, _, _, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::new(0.0, 30.0, 1.0));
        pump(&mut ind, 0.0);
        press(&mut ind, &key("q"));
        assert!(!press(&mut ind, &key("w")));
        ind.on_key(&key("w"));
        assert_eq!(*results.borrow(), vec![false]);
    }

    #[test]
    fn test_reactivation_mid_sweep() {
        let (mut ind, frames, keys, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::new(0.0, 30.0, 1.0));
        for i in 0..30 {
            pump(&mut ind, i as f64 * FRAME_MS);
        }
        assert!(ind.current_angle() > -90.0);

        ind.activate(SkillCheckDescriptor::new('e'), ActivationConfig::new(100.0, 20.0, 2.0));
        assert_eq!(ind.current_angle(), -90.0);
        assert_eq!(ind.state().sweep_start_time, None);
        assert!(!ind.state().completed);
        assert_eq!(frames.pending_count(), 1);
        assert_eq!(frames.cancelled(), 1);
        assert_eq!(keys.listener_count(), 1);
        assert!(results.borrow().is_empty());

        // New sweep times from its own first frame, at double speed
        let start = 10_000.0;
        pump(&mut ind, start);
        pump(&mut ind, start + BASE_DURATION_MS / 2.0);
        assert_eq!(*results.borrow(), vec![false]);
        assert!(!frames.has_pending());
        assert!(!keys.is_listening());
    }

    #[test]
    fn test_cancel_releases_without_emitting() {
        let (mut ind, frames, keys, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::default());
        pump(&mut ind, 0.0);

        ind.cancel();
        assert_eq!(ind.phase(), Phase::Idle);
        assert!(!frames.has_pending());
        assert!(!keys.is_listening());
        ind.on_frame(5000.0);
        ind.on_key(&key("w"));
        assert!(results.borrow().is_empty());

        // Idle indicator can be started again
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::default());
        assert!(ind.is_running());
    }

    #[test]
    fn test_drop_releases() {
        let (mut ind, frames, keys, results) = indicator();
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::default());
        pump(&mut ind, 0.0);
        drop(ind);

        assert!(!frames.has_pending());
        assert!(!keys.is_listening());
        assert!(results.borrow().is_empty());
    }

    #[test]
    fn test_events_while_idle_ignored() {
        let (mut ind, frames, _, results) = indicator();
        ind.on_frame(0.0);
        ind.on_key(&key("w"));
        assert_eq!(ind.phase(), Phase::Idle);
        assert_eq!(frames.requested(), 0);
        assert!(results.borrow().is_empty());
    }

    #[test]
    fn test_transform_follows_angle() {
        let (mut ind, _, _, _) = indicator();
        ind.activate(SkillCheckDescriptor::new('w'), ActivationConfig::new(0.0, 30.0, 1.0));
        pump(&mut ind, 0.0);
        pump(&mut ind, 500.0);
        assert_eq!(ind.transform().to_svg(), "rotate(0, 250, 250)");
    }
}
