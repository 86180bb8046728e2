//! Browser host: `requestAnimationFrame` frames and a `keydown` listener on `window`
//!
//! Exposes `SkillCheckWidget` to JavaScript. The widget rotates an SVG element
//! every frame and reports the result through a JS callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;
use web_sys::{Element, KeyboardEvent, Window};

use super::{FrameId, FrameScheduler, KeySource, ListenerId};
use crate::consts::{DIAL_CENTER, DIAL_RADIUS};
use crate::renderer::target_arc_path;
use crate::settings::Settings;
use crate::sim::{ActivationConfig, Indicator, RawKey, SkillCheckDescriptor, roll_check};

type WebIndicator = Indicator<WebFrames, WebKeys, Box<dyn FnMut(bool)>>;

/// Set up panic hook and console logging when the module loads
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }
}

/// Frame scheduler backed by `requestAnimationFrame`.
///
/// One closure is created up front and handed to every request, so a frame
/// firing never drops the closure that is currently running.
pub struct WebFrames {
    window: Window,
    callback: Closure<dyn FnMut(f64)>,
}

impl WebFrames {
    fn new(window: Window, widget: Weak<RefCell<WidgetInner>>) -> Self {
        let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(widget) = widget.upgrade() else {
                return;
            };
            match widget.try_borrow_mut() {
                Ok(mut widget) => widget.on_frame(time),
                Err(_) => log::warn!("Frame fired while the widget was busy"),
            }
        });
        Self { window, callback }
    }
}

impl FrameScheduler for WebFrames {
    fn request_frame(&mut self) -> Option<FrameId> {
        self.window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .map(FrameId)
            .map_err(|e| log::error!("requestAnimationFrame failed: {:?}", e))
            .ok()
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if let Err(e) = self.window.cancel_animation_frame(id.0) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}

/// Keyboard source backed by a `keydown` listener on `window`
pub struct WebKeys {
    window: Window,
    callback: Closure<dyn FnMut(KeyboardEvent)>,
    next_id: u32,
}

impl WebKeys {
    fn new(window: Window, widget: Weak<RefCell<WidgetInner>>) -> Self {
        let callback = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let Some(widget) = widget.upgrade() else {
                return;
            };
            let raw = RawKey::new(event.key(), event.code());
            match widget.try_borrow_mut() {
                Ok(mut widget) => widget.indicator.on_key(&raw),
                Err(_) => log::warn!("Key {:?} arrived while the widget was busy", raw.key),
            }
        });
        Self {
            window,
            callback,
            next_id: 0,
        }
    }
}

impl KeySource for WebKeys {
    fn subscribe(&mut self) -> Option<ListenerId> {
        match self
            .window
            .add_event_listener_with_callback("keydown", self.callback.as_ref().unchecked_ref())
        {
            Ok(()) => {
                self.next_id += 1;
                Some(ListenerId(self.next_id))
            }
            Err(e) => {
                log::error!("Failed to add keydown listener: {:?}", e);
                None
            }
        }
    }

    fn unsubscribe(&mut self, _id: ListenerId) {
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("keydown", self.callback.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove keydown listener: {:?}", e);
        }
    }
}

struct WidgetInner {
    indicator: WebIndicator,
    /// Element rotated every frame
    pointer: Option<Element>,
    /// Path element outlining the target arc
    arc: Option<Element>,
}

impl WidgetInner {
    fn on_frame(&mut self, time: f64) {
        self.indicator.on_frame(time);
        self.paint_pointer();
    }

    fn paint_pointer(&self) {
        if let Some(el) = &self.pointer {
            let _ = el.set_attribute("transform", &self.indicator.transform().to_svg());
        }
    }

    fn paint_arc(&self) {
        if let Some(el) = &self.arc {
            let center = DVec2::new(DIAL_CENTER.0, DIAL_CENTER.1);
            let path = target_arc_path(&self.indicator.target_arc(), center, DIAL_RADIUS);
            let _ = el.set_attribute("d", &path);
        }
    }

    fn start(&mut self, descriptor: SkillCheckDescriptor, config: ActivationConfig) {
        self.indicator.activate(descriptor, config);
        self.paint_arc();
        self.paint_pointer();
    }
}

/// A skill-check indicator bound to an SVG element
#[wasm_bindgen]
pub struct SkillCheckWidget {
    inner: Rc<RefCell<WidgetInner>>,
}

#[wasm_bindgen]
impl SkillCheckWidget {
    /// `on_complete` is called with `true`/`false` once per activation
    #[wasm_bindgen(constructor)]
    pub fn new(pointer_id: &str, on_complete: js_sys::Function) -> Result<SkillCheckWidget, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let pointer = window
            .document()
            .and_then(|doc| doc.get_element_by_id(pointer_id));
        if pointer.is_none() {
            log::warn!("No element #{}; indicator will not be drawn", pointer_id);
        }

        // Deferred to a microtask so the callback may start the next check
        let report: Box<dyn FnMut(bool)> = Box::new(move |success: bool| {
            let callback = on_complete.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_bool(success)) {
                    log::error!("Completion callback threw: {:?}", e);
                }
            });
        });

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<WidgetInner>>| {
            RefCell::new(WidgetInner {
                indicator: Indicator::new(
                    WebFrames::new(window.clone(), weak.clone()),
                    WebKeys::new(window.clone(), weak.clone()),
                    report,
                ),
                pointer,
                arc: None,
            })
        });

        Ok(SkillCheckWidget { inner })
    }

    /// Outline the target arc on this path element
    #[wasm_bindgen(js_name = setArcElement)]
    pub fn set_arc_element(&self, arc_id: &str) -> Result<(), JsValue> {
        let arc = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.get_element_by_id(arc_id));
        let mut inner = self.borrow_mut()?;
        inner.arc = arc;
        inner.paint_arc();
        Ok(())
    }

    /// Start a check. `allowed_keys` is a string of accepted keys, e.g. "wasd".
    pub fn start(
        &self,
        key: &str,
        allowed_keys: Option<String>,
        target_start_angle: f64,
        target_arc_width: f64,
        speed_multiplier: f64,
    ) -> Result<(), JsValue> {
        let mut descriptor = SkillCheckDescriptor::from_key_str(key)
            .ok_or_else(|| JsValue::from_str("key must be a single character"))?;
        if let Some(keys) = allowed_keys {
            descriptor = descriptor.with_allowed_keys(keys.chars());
        }
        let config = ActivationConfig::new(target_start_angle, target_arc_width, speed_multiplier);

        self.borrow_mut()?.start(descriptor, config);
        Ok(())
    }

    /// Start a check rolled from the stored settings
    #[wasm_bindgen(js_name = startRolled)]
    pub fn start_rolled(&self, seed: f64) -> Result<(), JsValue> {
        let settings = Settings::load();
        let mut rng = Pcg32::seed_from_u64(seed as u64);
        let (descriptor, config) = roll_check(&settings, &mut rng);

        self.borrow_mut()?.start(descriptor, config);
        Ok(())
    }

    /// Stop the current check without reporting a result
    pub fn cancel(&self) -> Result<(), JsValue> {
        self.borrow_mut()?.indicator.cancel();
        Ok(())
    }

    #[wasm_bindgen(js_name = currentAngle)]
    pub fn current_angle(&self) -> f64 {
        self.inner
            .try_borrow()
            .map(|inner| inner.indicator.current_angle())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner
            .try_borrow()
            .map(|inner| inner.indicator.is_running())
            .unwrap_or(false)
    }
}

impl SkillCheckWidget {
    fn borrow_mut(&self) -> Result<std::cell::RefMut<'_, WidgetInner>, JsValue> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("skill check is busy"))
    }
}
