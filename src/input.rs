use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

use crate::error::SetupError;
use crate::state::{Phase, SharedState};

/// Keys the shooter reacts to. Both WASD and ZQSD layouts are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    W,
    Z,
    A,
    Q,
    S,
    D,
    Space,
}

impl Key {
    const COUNT: usize = 7;

    pub fn from_event_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" => Some(Key::W),
            "z" => Some(Key::Z),
            "a" => Some(Key::A),
            "q" => Some(Key::Q),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            " " => Some(Key::Space),
            _ => None,
        }
    }
}

/// Latest keyboard and mouse state. No history is kept.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: [bool; Key::COUNT],
    pub mouse_x: f64,
    pub mouse_y: f64,
    pub firing: bool,
}

impl InputState {
    /// Returns false for keys outside the recognised set.
    pub fn set_key(&mut self, key: &str, down: bool) -> bool {
        match Key::from_event_key(key) {
            Some(k) => {
                self.pressed[k as usize] = down;
                true
            }
            None => false,
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.pressed[key as usize]
    }

    pub fn dash_held(&self) -> bool {
        self.is_down(Key::Space)
    }

    /// Normalised 8-way movement intent; zero when idle or when opposing keys cancel.
    pub fn direction(&self) -> (f64, f64) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.is_down(Key::W) || self.is_down(Key::Z) { dy -= 1.0; }
        if self.is_down(Key::S) { dy += 1.0; }
        if self.is_down(Key::A) || self.is_down(Key::Q) { dx -= 1.0; }
        if self.is_down(Key::D) { dx += 1.0; }

        let len = f64::hypot(dx, dy);
        if len == 0.0 {
            (0.0, 0.0)
        } else {
            (dx / len, dy / len)
        }
    }

    pub fn set_mouse(&mut self, x: f64, y: f64) {
        self.mouse_x = x;
        self.mouse_y = y;
    }

    pub fn release_all(&mut self) {
        self.pressed = [false; Key::COUNT];
        self.firing = false;
    }
}

pub fn setup_input(state: SharedState, canvas: &HtmlCanvasElement) -> Result<(), SetupError> {
    let window = web_sys::window().ok_or(SetupError::NoWindow)?;

    // Mouse move, relative to the canvas
    let state_mm = state.clone();
    let canvas_mm = canvas.clone();
    let mousemove = Closure::wrap(Box::new(move |e: MouseEvent| {
        let rect = canvas_mm.get_bounding_client_rect();
        state_mm.borrow_mut().input.set_mouse(
            e.client_x() as f64 - rect.left(),
            e.client_y() as f64 - rect.top(),
        );
    }) as Box<dyn FnMut(MouseEvent)>);
    let _ = canvas.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref());
    mousemove.forget();

    // Mouse down
    let state_md = state.clone();
    let mousedown = Closure::wrap(Box::new(move |e: MouseEvent| {
        if e.button() != 0 { return; }
        let mut s = state_md.borrow_mut();
        if s.phase == Phase::Playing {
            s.input.firing = true;
        }
    }) as Box<dyn FnMut(MouseEvent)>);
    let _ = canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref());
    mousedown.forget();

    // Mouse up
    let state_mu = state.clone();
    let mouseup = Closure::wrap(Box::new(move |e: MouseEvent| {
        if e.button() == 0 {
            state_mu.borrow_mut().input.firing = false;
        }
    }) as Box<dyn FnMut(MouseEvent)>);
    let _ = canvas.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref());
    mouseup.forget();

    // Key down
    let state_kd = state.clone();
    let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
        let mut s = state_kd.borrow_mut();
        if s.phase != Phase::Playing { return; }
        if s.input.set_key(&e.key(), true) && e.key() == " " {
            // Keep space from scrolling the page while dashing
            e.prevent_default();
        }
    }) as Box<dyn FnMut(KeyboardEvent)>);
    let _ = window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
    keydown.forget();

    // Key up
    let state_ku = state.clone();
    let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
        state_ku.borrow_mut().input.set_key(&e.key(), false);
    }) as Box<dyn FnMut(KeyboardEvent)>);
    let _ = window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref());
    keyup.forget();

    // Blur: no keyup arrives after alt-tab
    let state_blur = state;
    let blur = Closure::wrap(Box::new(move |_: web_sys::Event| {
        state_blur.borrow_mut().input.release_all();
    }) as Box<dyn FnMut(web_sys::Event)>);
    let _ = window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref());
    blur.forget();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_are_ignored() {
        let mut input = InputState::default();
        assert!(!input.set_key("ArrowUp", true));
        assert!(!input.set_key("Shift", true));
        assert_eq!(input.direction(), (0.0, 0.0));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let mut input = InputState::default();
        assert!(input.set_key("D", true));
        assert_eq!(input.direction(), (1.0, 0.0));
    }

    #[test]
    fn zqsd_layout_moves_like_wasd() {
        let mut input = InputState::default();
        input.set_key("z", true);
        input.set_key("q", true);
        let (dx, dy) = input.direction();
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((dx + h).abs() < 1e-12);
        assert!((dy + h).abs() < 1e-12);
    }

    #[test]
    fn diagonal_intent_is_unit_length() {
        let mut input = InputState::default();
        input.set_key("w", true);
        input.set_key("d", true);
        let (dx, dy) = input.direction();
        assert!((f64::hypot(dx, dy) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut input = InputState::default();
        input.set_key("a", true);
        input.set_key("d", true);
        assert_eq!(input.direction(), (0.0, 0.0));
    }

    #[test]
    fn alternate_keys_hold_independently() {
        let mut input = InputState::default();
        input.set_key("w", true);
        input.set_key("z", true);
        input.set_key("w", false);
        assert_eq!(input.direction(), (0.0, -1.0));
    }

    #[test]
    fn release_all_clears_keys_and_fire() {
        let mut input = InputState::default();
        input.set_key(" ", true);
        input.firing = true;
        input.release_all();
        assert!(!input.dash_held());
        assert!(!input.firing);
    }
}
