pub mod config;
pub mod form;
pub mod geometry;
pub mod messages;
pub mod reveal;
pub mod scroll;
pub mod section_id;
pub mod throttle;
pub mod tracker;

pub use config::{PageConfig, ACTIVE_CLASS, REVEALED_CLASS};
pub use form::{FormStatus, StatusBoard, StatusTone, StatusView, SubmitError, SubmitResponse};
pub use geometry::{activation_band, Band, SectionBounds, Viewport};
pub use reveal::{visible_fraction, RevealSet};
pub use scroll::{plan_scroll, scroll_target, ScrollBehavior, ScrollPlan};
pub use section_id::{SectionId, SectionIdError};
pub use throttle::{Throttle, ThrottleDecision};
pub use tracker::{
    link_states, select_active, ActiveTracker, EvaluationTrigger, NavBinding, TrackerConfig,
    TrackerDecision,
};
