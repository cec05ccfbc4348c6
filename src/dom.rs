use js_sys::{Function, Reflect};
use navspy_core::{PageConfig, SectionBounds, SectionId, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, Window};

const CONFIG_GLOBAL: &str = "__NAVSPY_CONFIG";
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        if let Some(message) = error.message().as_string() {
            return message;
        }
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    "js error".to_string()
}

pub(crate) fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "missing window".to_string())
}

pub(crate) fn query_all(root: &web_sys::Document, selector: &str) -> Result<Vec<Element>, String> {
    let list = root.query_selector_all(selector).map_err(js_err)?;
    let mut elements = Vec::with_capacity(list.length() as usize);
    for index in 0..list.length() {
        let Some(node) = list.item(index) else {
            continue;
        };
        if let Ok(element) = node.dyn_into::<Element>() {
            elements.push(element);
        }
    }
    Ok(elements)
}

pub(crate) fn query_within(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub(crate) fn set_class(element: &Element, class: &str, enabled: bool) {
    let _ = element.class_list().toggle_with_force(class, enabled);
}

pub(crate) fn has_global(name: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    Reflect::get(&window, &JsValue::from_str(name))
        .map(|value| !value.is_undefined() && !value.is_null())
        .unwrap_or(false)
}

pub(crate) fn prefers_reduced_motion() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let Ok(match_media) = Reflect::get(&window, &"matchMedia".into()) else {
        return false;
    };
    let Ok(match_media) = match_media.dyn_into::<Function>() else {
        return false;
    };
    let Ok(query) = match_media.call1(&window, &REDUCED_MOTION_QUERY.into()) else {
        return false;
    };
    Reflect::get(&query, &"matches".into())
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

/// Monotonic milliseconds; falls back to the wall clock without `performance`.
pub(crate) fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Reads `window.__NAVSPY_CONFIG` when the page provides one.
pub(crate) fn load_page_config() -> PageConfig {
    let Some(window) = web_sys::window() else {
        return PageConfig::default();
    };
    let Ok(value) = Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) else {
        return PageConfig::default();
    };
    if value.is_null() || value.is_undefined() {
        return PageConfig::default();
    }
    let raw = match js_sys::JSON::stringify(&value) {
        Ok(raw) => raw.as_string().unwrap_or_default(),
        Err(err) => {
            gloo::console::warn!("page config: not serializable", js_err(err));
            return PageConfig::default();
        }
    };
    match PageConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            gloo::console::warn!("page config: invalid", err.to_string());
            PageConfig::default()
        }
    }
}

pub(crate) fn header_height(header: Option<&HtmlElement>) -> f64 {
    header
        .map(|header| header.offset_height() as f64)
        .unwrap_or(0.0)
}

pub(crate) fn read_viewport(window: &Window, header: Option<&HtmlElement>) -> Viewport {
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    Viewport::new(scroll_y, height, header_height(header))
}

/// Section extent in document coordinates.
pub(crate) fn measure(id: &SectionId, element: &Element, scroll_y: f64) -> SectionBounds {
    let rect = element.get_bounding_client_rect();
    SectionBounds::new(id.clone(), rect.top() + scroll_y, rect.height())
}
