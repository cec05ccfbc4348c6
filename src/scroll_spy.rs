use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use navspy_core::{
    EvaluationTrigger, SectionBounds, SectionId, ThrottleDecision, TrackerDecision, REVEALED_CLASS,
};
use web_sys::Document;

use crate::dom;
use crate::nav;
use crate::page::PageElements;
use crate::runtime::{self, PageState};

pub(crate) fn install(document: &Document) -> Result<(), String> {
    let window = dom::window()?;

    let listener = EventListener::new_with_options(
        &window,
        "scroll",
        EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: true,
        },
        move |_event| {
            request_tick(EvaluationTrigger::Scroll);
        },
    );
    runtime::keep_listener(listener);

    let listener = EventListener::new(&window, "resize", move |_event| {
        request_tick(EvaluationTrigger::Resize);
    });
    runtime::keep_listener(listener);

    let reveal_enabled = runtime::with_page(|state| state.config.reveal).unwrap_or(true);
    if !reveal_enabled {
        runtime::with_page(reveal_everything);
    }

    if document.ready_state() == "complete" {
        evaluate_now(EvaluationTrigger::Load);
    } else {
        evaluate_now(EvaluationTrigger::Scroll);
        let listener = EventListener::once(&window, "load", move |_event| {
            evaluate_now(EvaluationTrigger::Load);
        });
        runtime::keep_listener(listener);
    }
    Ok(())
}

/// Throttled entry point for scroll and resize events.
pub(crate) fn request_tick(trigger: EvaluationTrigger) {
    let now = dom::now_ms();
    let decision = runtime::with_page(|state| {
        let decision = state.throttle.poll(now);
        if decision != ThrottleDecision::Run {
            state.pending_trigger = Some(merge_trigger(state.pending_trigger, trigger));
        }
        decision
    });
    match decision {
        Some(ThrottleDecision::Run) => {
            evaluate_now(trigger);
        }
        Some(ThrottleDecision::Schedule(delay)) => {
            let timer = Timeout::new(delay, || {
                let trigger = runtime::with_page(|state| {
                    state.throttle.fire(dom::now_ms());
                    state.pending_trigger.take()
                })
                .flatten()
                .unwrap_or(EvaluationTrigger::Scroll);
                evaluate_now(trigger);
            });
            runtime::with_page(|state| {
                state.trailing_tick = Some(timer);
            });
        }
        Some(ThrottleDecision::Skip) | None => {}
    }
}

fn merge_trigger(pending: Option<EvaluationTrigger>, next: EvaluationTrigger) -> EvaluationTrigger {
    match (pending, next) {
        (Some(EvaluationTrigger::Resize), _) | (_, EvaluationTrigger::Resize) => {
            EvaluationTrigger::Resize
        }
        _ => next,
    }
}

/// Measures the page and updates link and reveal classes. Load always
/// repaints the links so the initial markup is brought in line.
pub(crate) fn evaluate_now(trigger: EvaluationTrigger) -> Option<TrackerDecision> {
    let window = dom::window().ok()?;
    runtime::with_page(|state| {
        let viewport = dom::read_viewport(&window, state.elements.header.as_ref());
        let bounds = measure_sections(&state.elements, viewport.scroll_y);

        let decision = state.tracker.evaluate(&bounds, &viewport, trigger);
        if decision != TrackerDecision::Keep || trigger == EvaluationTrigger::Load {
            nav::apply_active(&state.elements, state.tracker.active());
        }

        if state.config.reveal && !state.reveal.is_complete(&bounds) {
            let newly = state.reveal.update(&bounds, &viewport);
            mark_revealed(&state.elements, &newly);
        }
        decision
    })
}

pub(crate) fn measure_sections(elements: &PageElements, scroll_y: f64) -> Vec<SectionBounds> {
    elements
        .sections
        .iter()
        .map(|section| dom::measure(&section.id, &section.element, scroll_y))
        .collect()
}

fn reveal_everything(state: &mut PageState) {
    let bounds = measure_sections(&state.elements, 0.0);
    let newly = state.reveal.reveal_all(&bounds);
    mark_revealed(&state.elements, &newly);
}

fn mark_revealed(elements: &PageElements, ids: &[SectionId]) {
    for id in ids {
        if let Some(section) = elements.section(id) {
            dom::set_class(&section.element, REVEALED_CLASS, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn resize_outranks_scroll_when_merged() {
        assert_eq!(
            merge_trigger(None, EvaluationTrigger::Scroll),
            EvaluationTrigger::Scroll
        );
        assert_eq!(
            merge_trigger(Some(EvaluationTrigger::Resize), EvaluationTrigger::Scroll),
            EvaluationTrigger::Resize
        );
        assert_eq!(
            merge_trigger(Some(EvaluationTrigger::Scroll), EvaluationTrigger::Resize),
            EvaluationTrigger::Resize
        );
    }
}
