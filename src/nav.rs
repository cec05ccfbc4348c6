use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use navspy_core::{
    link_states, plan_scroll, EvaluationTrigger, ScrollBehavior, ScrollPlan, SectionId,
    ACTIVE_CLASS,
};
use web_sys::{Element, ScrollToOptions};

use crate::dom;
use crate::page::PageElements;
use crate::runtime;
use crate::scroll_spy;

pub(crate) fn apply_active(elements: &PageElements, active: Option<&SectionId>) {
    let states = link_states(&elements.bindings(), active);
    for (link, is_active) in elements.links.iter().zip(states) {
        dom::set_class(&link.element, ACTIVE_CLASS, is_active);
    }
}

pub(crate) fn install_link_handlers() {
    let links: Vec<(Element, Option<SectionId>)> = runtime::with_page(|state| {
        state
            .elements
            .links
            .iter()
            .map(|link| (link.element.clone(), link.binding.target.clone()))
            .collect()
    })
    .unwrap_or_default();

    for (element, target) in links {
        // bare "#" links keep their default behavior
        let Some(target) = target else {
            continue;
        };
        let listener = EventListener::new_with_options(
            &element,
            "click",
            EventListenerOptions {
                phase: EventListenerPhase::Bubble,
                passive: false,
            },
            move |event| {
                event.prevent_default();
                scroll_to_section(&target);
            },
        );
        runtime::keep_listener(listener);
    }
}

/// Scrolls so the section sits below the header. Returns false when the
/// section is not on the page.
pub(crate) fn scroll_to_section(id: &SectionId) -> bool {
    let Ok(window) = dom::window() else {
        return false;
    };
    let plan = runtime::with_page(|state| {
        let section = state.elements.section(id)?;
        let scroll_y = window.scroll_y().unwrap_or(0.0);
        let top = dom::measure(id, &section.element, scroll_y).top;
        Some(plan_scroll(
            top,
            dom::header_height(state.elements.header.as_ref()),
            state.config.header_padding,
            dom::prefers_reduced_motion(),
        ))
    })
    .flatten();
    let Some(plan) = plan else {
        return false;
    };
    window.scroll_to_with_scroll_to_options(&scroll_options(plan));
    schedule_settle();
    true
}

fn scroll_options(plan: ScrollPlan) -> ScrollToOptions {
    let options = ScrollToOptions::new();
    options.set_left(0.0);
    options.set_top(plan.top);
    options.set_behavior(match plan.behavior {
        ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
    });
    options
}

/// Re-evaluates once the scroll animation has had time to land.
fn schedule_settle() {
    runtime::with_page(|state| {
        let delay = state.config.settle_delay_ms;
        state.settle_timer = Some(Timeout::new(delay, || {
            scroll_spy::evaluate_now(EvaluationTrigger::Scroll);
        }));
    });
}
