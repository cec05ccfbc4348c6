#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    Instant,
    #[default]
    Smooth,
}

impl ScrollBehavior {
    pub fn for_motion_preference(prefers_reduced_motion: bool) -> Self {
        if prefers_reduced_motion {
            ScrollBehavior::Instant
        } else {
            ScrollBehavior::Smooth
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollPlan {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// Offset that puts a section's top just below the sticky header.
pub fn scroll_target(section_top: f64, header_height: f64, header_padding: f64) -> f64 {
    let target = section_top - header_height.max(0.0) - header_padding.max(0.0);
    if target.is_finite() {
        target.max(0.0)
    } else {
        0.0
    }
}

pub fn plan_scroll(
    section_top: f64,
    header_height: f64,
    header_padding: f64,
    prefers_reduced_motion: bool,
) -> ScrollPlan {
    ScrollPlan {
        top: scroll_target(section_top, header_height, header_padding),
        behavior: ScrollBehavior::for_motion_preference(prefers_reduced_motion),
    }
}
