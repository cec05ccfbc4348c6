use std::cell::RefCell;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use navspy_core::{ActiveTracker, EvaluationTrigger, PageConfig, RevealSet, Throttle};

use crate::page::PageElements;

pub(crate) struct PageState {
    pub(crate) config: PageConfig,
    pub(crate) elements: PageElements,
    pub(crate) tracker: ActiveTracker,
    pub(crate) reveal: RevealSet,
    pub(crate) throttle: Throttle,
    pub(crate) trailing_tick: Option<Timeout>,
    pub(crate) pending_trigger: Option<EvaluationTrigger>,
    pub(crate) settle_timer: Option<Timeout>,
}

impl PageState {
    pub(crate) fn new(config: PageConfig, elements: PageElements) -> Self {
        Self {
            tracker: ActiveTracker::new(config.tracker()),
            reveal: RevealSet::new(config.reveal_threshold),
            throttle: Throttle::new(config.throttle_ms),
            trailing_tick: None,
            pending_trigger: None,
            settle_timer: None,
            config,
            elements,
        }
    }
}

thread_local! {
    static PAGE: RefCell<Option<PageState>> = RefCell::new(None);
    static LISTENERS: RefCell<Vec<EventListener>> = RefCell::new(Vec::new());
}

pub(crate) fn install(state: PageState) {
    PAGE.with(|slot| {
        *slot.borrow_mut() = Some(state);
    });
}

pub(crate) fn is_installed() -> bool {
    PAGE.with(|slot| slot.borrow().is_some())
}

/// Runs `action` against the page state; `None` before the page is wired.
/// Callers must not re-enter from inside `action`.
pub(crate) fn with_page<R>(action: impl FnOnce(&mut PageState) -> R) -> Option<R> {
    PAGE.with(|slot| slot.borrow_mut().as_mut().map(action))
}

pub(crate) fn keep_listener(listener: EventListener) {
    LISTENERS.with(|listeners| listeners.borrow_mut().push(listener));
}

#[cfg(test)]
pub(crate) fn reset() {
    PAGE.with(|slot| slot.borrow_mut().take());
    LISTENERS.with(|listeners| listeners.borrow_mut().clear());
}
