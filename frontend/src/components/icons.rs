use gloo_timers::callback::Timeout;
use js_sys::{Function, Reflect};
use log::warn;
use wasm_bindgen::{JsCast, JsValue};

/// Runs `feather.replace()` when the icon script is on the page, turning
/// `data-feather` placeholders into inline SVGs. No script, no-op.
pub fn refresh() {
    let window = match web_sys::window() {
        Some(window) => window,
        None => return,
    };
    let feather = match Reflect::get(&window, &JsValue::from_str("feather")) {
        Ok(feather) if feather.is_object() => feather,
        _ => return,
    };
    if let Ok(replace) = Reflect::get(&feather, &JsValue::from_str("replace"))
        .and_then(|replace| replace.dyn_into::<Function>())
    {
        if let Err(err) = replace.call0(&feather) {
            warn!("Icon refresh failed: {:?}", err);
        }
    }
}

/// Deferred refresh for markup that is about to be rendered.
pub fn refresh_after(delay_ms: u32) {
    Timeout::new(delay_ms, refresh).forget();
}
