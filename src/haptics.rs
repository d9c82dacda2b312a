//! Haptic feedback
//!
//! Vibration is best-effort: hosts without a vibration API get [`NoHaptics`].

/// Vibration pattern in milliseconds (on, off, on, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapticPattern(pub &'static [u32]);

impl HapticPattern {
    /// Sector change
    pub const LEVEL_UP: HapticPattern = HapticPattern(&[30, 20, 30]);
    /// Ship destroyed
    pub const CRASH: HapticPattern = HapticPattern(&[80]);
    /// Shop purchase
    pub const PURCHASE: HapticPattern = HapticPattern(&[50]);
}

/// Something that can buzz the device
pub trait Haptics {
    fn pulse(&mut self, pattern: HapticPattern);
}

/// Silent sink for hosts without vibration
#[derive(Debug, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&mut self, _pattern: HapticPattern) {}
}

/// `navigator.vibrate` on the web
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct WebHaptics;

#[cfg(target_arch = "wasm32")]
impl Haptics for WebHaptics {
    fn pulse(&mut self, pattern: HapticPattern) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let steps = js_sys::Array::new();
        for ms in pattern.0 {
            steps.push(&wasm_bindgen::JsValue::from(*ms));
        }
        // Returns false when vibration is unsupported or blocked; nothing to do then
        let _ = window.navigator().vibrate_with_pattern(&steps);
    }
}

/// Records pulses for tests
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingHaptics {
    pub pulses: std::rc::Rc<std::cell::RefCell<Vec<HapticPattern>>>,
}

#[cfg(test)]
impl Haptics for RecordingHaptics {
    fn pulse(&mut self, pattern: HapticPattern) {
        self.pulses.borrow_mut().push(pattern);
    }
}
