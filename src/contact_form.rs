use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use navspy_core::form::{check_response, parse_response, resolve_endpoint, resolve_method};
use navspy_core::{PageConfig, StatusBoard, StatusTone, StatusView, SubmitError};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, FormData, HtmlElement, HtmlFormElement, Request, RequestInit, Response};

use crate::dom::{self, js_err};
use crate::runtime;

struct FormSettings {
    endpoint: String,
    method: String,
    hide_ms: u32,
    fade_ms: u32,
}

struct ContactForm {
    form: HtmlFormElement,
    status: Option<HtmlElement>,
    submit: Option<Element>,
    settings: FormSettings,
    board: RefCell<StatusBoard>,
    hide_timer: RefCell<Option<Timeout>>,
    clear_timer: RefCell<Option<Timeout>>,
}

impl ContactForm {
    fn new(
        form: HtmlFormElement,
        status: Option<HtmlElement>,
        submit: Option<Element>,
        settings: FormSettings,
    ) -> Self {
        Self {
            form,
            status,
            submit,
            settings,
            board: RefCell::new(StatusBoard::new()),
            hide_timer: RefCell::new(None),
            clear_timer: RefCell::new(None),
        }
    }
}

pub(crate) fn install(form: HtmlFormElement, config: &PageConfig) {
    let status = dom::query_within(&form, &config.status_selector)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok());
    let submit = dom::query_within(&form, &config.submit_selector);
    let settings = FormSettings {
        endpoint: resolve_endpoint(
            form.get_attribute("action").as_deref(),
            &config.form_endpoint,
        ),
        method: resolve_method(form.get_attribute("method").as_deref(), &config.form_method),
        hide_ms: config.status_hide_ms,
        fade_ms: config.status_fade_ms,
    };
    let handle = Rc::new(ContactForm::new(form.clone(), status, submit, settings));

    let listener = EventListener::new_with_options(
        &form,
        "submit",
        EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        },
        move |event| {
            // without fetch the browser submits the form itself
            if !dom::has_global("fetch") {
                return;
            }
            event.prevent_default();
            self::submit(Rc::clone(&handle));
        },
    );
    runtime::keep_listener(listener);
}

fn submit(handle: Rc<ContactForm>) {
    let generation = handle.board.borrow_mut().begin();
    handle.hide_timer.borrow_mut().take();
    handle.clear_timer.borrow_mut().take();
    let view = handle.board.borrow().view();
    render_status(handle.status.as_ref(), &view);
    set_submit_disabled(handle.submit.as_ref(), true);

    spawn_local(async move {
        let settings = &handle.settings;
        let result = send_form(&handle.form, &settings.endpoint, &settings.method).await;
        match &result {
            Err(SubmitError::Rejected(message)) => {
                gloo::console::warn!("form endpoint rejected submission", message.clone());
            }
            Err(err) => {
                gloo::console::warn!("form submission network error", err.to_string());
            }
            Ok(()) => {}
        }
        complete(&handle, generation, result);
    });
}

/// Applies a finished submission. A newer submission owns the status, the
/// button and the timers, so a stale one changes nothing.
fn complete(handle: &Rc<ContactForm>, generation: u64, result: Result<(), SubmitError>) -> bool {
    let outcome = handle.board.borrow_mut().finish(generation, result);
    let Some(outcome) = outcome else {
        return false;
    };
    render_status(handle.status.as_ref(), &outcome.view);
    if outcome.reset_form {
        handle.form.reset();
    }
    set_submit_disabled(handle.submit.as_ref(), false);
    schedule_hide(handle, generation);
    true
}

async fn send_form(
    form: &HtmlFormElement,
    endpoint: &str,
    method: &str,
) -> Result<(), SubmitError> {
    let network = |err| SubmitError::Network(js_err(err));
    let window =
        web_sys::window().ok_or_else(|| SubmitError::Network("missing window".to_string()))?;
    let body = FormData::new_with_form(form).map_err(network)?;

    let init = RequestInit::new();
    init.set_method(method);
    init.set_body(&body);
    let request = Request::new_with_str_and_init(endpoint, &init).map_err(network)?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(network)?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?;
    let response: Response = response.dyn_into().map_err(network)?;

    let malformed = |err| SubmitError::Malformed(js_err(err));
    let text = JsFuture::from(response.text().map_err(malformed)?)
        .await
        .map_err(malformed)?;
    let text = text.as_string().ok_or_else(|| {
        SubmitError::Malformed(format!("empty body (status {})", response.status()))
    })?;
    check_response(parse_response(&text)?)
}

fn schedule_hide(handle: &Rc<ContactForm>, generation: u64) {
    if handle.status.is_none() {
        return;
    }
    let hide_handle = Rc::clone(handle);
    let timer = Timeout::new(handle.settings.hide_ms, move || {
        if !hide_handle.board.borrow_mut().hide(generation) {
            return;
        }
        let view = hide_handle.board.borrow().view();
        render_status(hide_handle.status.as_ref(), &view);

        let clear_handle = Rc::clone(&hide_handle);
        let clear = Timeout::new(hide_handle.settings.fade_ms, move || {
            if !clear_handle.board.borrow_mut().clear(generation) {
                return;
            }
            let view = clear_handle.board.borrow().view();
            render_status(clear_handle.status.as_ref(), &view);
        });
        *hide_handle.clear_timer.borrow_mut() = Some(clear);
    });
    *handle.hide_timer.borrow_mut() = Some(timer);
}

fn render_status(status: Option<&HtmlElement>, view: &StatusView) {
    let Some(status) = status else {
        return;
    };
    // text stays in place while fading out
    if view.visible || view.text.is_empty() {
        status.set_text_content(Some(&view.text));
    }
    for class in StatusTone::ALL_CLASSES {
        let keep = view.tone.is_some_and(|tone| tone.class_name() == class);
        dom::set_class(status, class, keep);
    }
    let opacity = if view.visible { "1" } else { "0" };
    let _ = status.style().set_property("opacity", opacity);
}

fn set_submit_disabled(submit: Option<&Element>, disabled: bool) {
    if let Some(submit) = submit {
        let _ = submit.toggle_attribute_with_force("disabled", disabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloo::timers::future::TimeoutFuture;
    use navspy_core::messages::SUCCESS_MESSAGE;
    use navspy_core::FormStatus;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn status_element() -> HtmlElement {
        let document = web_sys::window().unwrap().document().unwrap();
        document
            .create_element("p")
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn status_fades_before_clearing() {
        let status = status_element();
        let mut board = StatusBoard::new();
        let generation = board.begin();
        let outcome = board.finish(generation, Ok(())).unwrap();
        render_status(Some(&status), &outcome.view);
        assert_eq!(status.text_content().unwrap_or_default(), SUCCESS_MESSAGE);
        assert!(status.class_list().contains("success"));
        assert_eq!(status.style().get_property_value("opacity").unwrap(), "1");

        board.hide(generation);
        render_status(Some(&status), &board.view());
        assert_eq!(status.text_content().unwrap_or_default(), SUCCESS_MESSAGE);
        assert_eq!(status.style().get_property_value("opacity").unwrap(), "0");

        board.clear(generation);
        render_status(Some(&status), &board.view());
        assert_eq!(status.text_content().unwrap_or_default(), "");
        assert!(!status.class_list().contains("success"));
        assert!(!status.class_list().contains("error"));
    }

    #[wasm_bindgen_test]
    fn failure_swaps_tone_class() {
        let status = status_element();
        let mut board = StatusBoard::new();
        let generation = board.begin();
        render_status(Some(&status), &board.view());
        assert!(!status.class_list().contains("error"));

        let outcome = board
            .finish(generation, Err(SubmitError::Rejected("Invalid form".to_string())))
            .unwrap();
        render_status(Some(&status), &outcome.view);
        assert_eq!(status.text_content().unwrap_or_default(), "Invalid form");
        assert!(status.class_list().contains("error"));
        assert!(!outcome.reset_form);
    }

    fn quick_form() -> Rc<ContactForm> {
        let document = web_sys::window().unwrap().document().unwrap();
        let form = document
            .create_element("form")
            .unwrap()
            .dyn_into::<HtmlFormElement>()
            .unwrap();
        let submit = document.create_element("button").unwrap();
        let settings = FormSettings {
            endpoint: "/send".to_string(),
            method: "POST".to_string(),
            hide_ms: 30,
            fade_ms: 60,
        };
        Rc::new(ContactForm::new(form, Some(status_element()), Some(submit), settings))
    }

    fn is_disabled(handle: &ContactForm) -> bool {
        handle.submit.as_ref().unwrap().has_attribute("disabled")
    }

    fn opacity(handle: &ContactForm) -> String {
        let status = handle.status.as_ref().unwrap();
        status.style().get_property_value("opacity").unwrap()
    }

    fn text(handle: &ContactForm) -> String {
        handle.status.as_ref().unwrap().text_content().unwrap_or_default()
    }

    #[wasm_bindgen_test]
    async fn status_hides_then_clears_after_configured_delays() {
        let handle = quick_form();
        let generation = handle.board.borrow_mut().begin();
        set_submit_disabled(handle.submit.as_ref(), true);
        assert!(complete(&handle, generation, Ok(())));
        assert!(!is_disabled(&handle));
        assert_eq!(text(&handle), SUCCESS_MESSAGE);
        assert_eq!(opacity(&handle), "1");

        // inside the hide delay nothing moves
        TimeoutFuture::new(5).await;
        assert_eq!(opacity(&handle), "1");

        TimeoutFuture::new(45).await;
        assert_eq!(opacity(&handle), "0");
        assert_eq!(text(&handle), SUCCESS_MESSAGE);

        TimeoutFuture::new(100).await;
        assert_eq!(text(&handle), "");
        assert_eq!(handle.board.borrow().status(), &FormStatus::Idle);
    }

    #[wasm_bindgen_test]
    async fn late_older_submission_leaves_newer_one_alone() {
        let handle = quick_form();
        let older = handle.board.borrow_mut().begin();
        let newer = handle.board.borrow_mut().begin();
        set_submit_disabled(handle.submit.as_ref(), true);

        assert!(complete(&handle, newer, Ok(())));
        assert!(!is_disabled(&handle));

        // a fresh click disables again while the older request lands late
        set_submit_disabled(handle.submit.as_ref(), true);
        let rejected = Err(SubmitError::Network("Failed to fetch".to_string()));
        assert!(!complete(&handle, older, rejected));
        assert!(is_disabled(&handle));
        assert_eq!(text(&handle), SUCCESS_MESSAGE);

        TimeoutFuture::new(150).await;
        assert_eq!(text(&handle), "");
        assert_eq!(opacity(&handle), "0");
        assert_eq!(handle.board.borrow().status(), &FormStatus::Idle);
    }
}
