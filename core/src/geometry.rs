use crate::section_id::SectionId;

/// Scroll offsets at or below this count as the top of the page.
pub const PAGE_TOP_EPSILON: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: SectionId,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: SectionId, top: f64, height: f64) -> Self {
        Self { id, top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height.max(0.0)
    }

    pub fn intersects(&self, band: &Band) -> bool {
        self.top < band.bottom && self.bottom() > band.top
    }

    /// Distance from `y` to the nearest point of the section, zero when inside.
    pub fn distance_to(&self, y: f64) -> f64 {
        if y < self.top {
            self.top - y
        } else if y > self.bottom() {
            y - self.bottom()
        } else {
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
    pub header_height: f64,
}

impl Viewport {
    pub fn new(scroll_y: f64, height: f64, header_height: f64) -> Self {
        Self {
            scroll_y,
            height,
            header_height,
        }
    }

    pub fn at_page_top(&self) -> bool {
        self.scroll_y <= PAGE_TOP_EPSILON
    }

    pub fn bottom(&self) -> f64 {
        self.scroll_y + self.height.max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub top: f64,
    pub bottom: f64,
}

impl Band {
    pub fn center(&self) -> f64 {
        (self.top + self.bottom) * 0.5
    }

    pub fn distance_to(&self, section: &SectionBounds) -> f64 {
        if section.bottom() <= self.top {
            self.top - section.bottom()
        } else if section.top >= self.bottom {
            section.top - self.bottom
        } else {
            0.0
        }
    }
}

/// Builds the activation band in document coordinates. The band starts below
/// the header plus padding and ends `bottom_ratio` of the viewport above its
/// bottom edge; it collapses to a 1px band when the two cross.
pub fn activation_band(viewport: &Viewport, header_padding: f64, bottom_ratio: f64) -> Band {
    let top = viewport.scroll_y + viewport.header_height.max(0.0) + header_padding.max(0.0);
    let bottom_ratio = bottom_ratio.clamp(0.0, 1.0);
    let bottom = viewport.scroll_y + viewport.height.max(0.0) * (1.0 - bottom_ratio);
    if bottom <= top {
        return Band {
            top,
            bottom: top + 1.0,
        };
    }
    Band { top, bottom }
}
