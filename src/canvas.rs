use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::constants::{CANVAS_HEIGHT_RATIO, CANVAS_ID};
use crate::error::SetupError;
use crate::state::SharedState;

pub fn find_canvas() -> Result<HtmlCanvasElement, SetupError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(SetupError::NoWindow)?;
    document
        .get_element_by_id(CANVAS_ID)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or(SetupError::MissingElement(CANVAS_ID))
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, SetupError> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or(SetupError::NoContext2d)
}

/// Full window width, 80% of its height.
pub fn canvas_size(inner_w: f64, inner_h: f64) -> (f64, f64) {
    (inner_w.floor(), (inner_h * CANVAS_HEIGHT_RATIO).floor())
}

pub fn resize(state: &SharedState, canvas: &HtmlCanvasElement) {
    let Some(window) = web_sys::window() else { return };
    let inner_w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let inner_h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let (w, h) = canvas_size(inner_w, inner_h);

    canvas.set_width(w as u32);
    canvas.set_height(h as u32);

    let mut s = state.borrow_mut();
    s.screen_w = w;
    s.screen_h = h;
}

pub fn setup_resize_handler(state: SharedState, canvas: HtmlCanvasElement) -> Result<(), SetupError> {
    let window = web_sys::window().ok_or(SetupError::NoWindow)?;
    let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
        resize(&state, &canvas);
    }) as Box<dyn FnMut(web_sys::Event)>);

    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_takes_most_of_the_window() {
        assert_eq!(canvas_size(1280.0, 720.0), (1280.0, 576.0));
        assert_eq!(canvas_size(1001.5, 333.0), (1001.0, 266.0));
    }
}
