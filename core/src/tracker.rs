use crate::geometry::{activation_band, Band, SectionBounds, Viewport};
use crate::section_id::SectionId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerConfig {
    pub header_padding: f64,
    pub band_bottom_ratio: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            header_padding: 15.0,
            band_bottom_ratio: 0.3,
        }
    }
}

impl TrackerConfig {
    pub fn band(&self, viewport: &Viewport) -> Band {
        activation_band(viewport, self.header_padding, self.band_bottom_ratio)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvaluationTrigger {
    Scroll,
    Resize,
    Load,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackerDecision {
    /// The active section changed to this one.
    Activate(SectionId),
    Keep,
    Clear,
}

/// A navigation link and the section it points at. Links whose target is not
/// an in-page section carry `None` and are never active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavBinding {
    pub target: Option<SectionId>,
}

impl NavBinding {
    pub fn from_href(href: &str) -> Self {
        Self {
            target: SectionId::from_href(href).ok(),
        }
    }

    pub fn points_at(&self, id: &SectionId) -> bool {
        self.target.as_ref() == Some(id)
    }
}

/// Picks the section intersecting the activation band whose extent is
/// nearest the band center. Sections are scanned in document order and equal
/// distances go to the later section.
pub fn select_active(
    sections: &[SectionBounds],
    viewport: &Viewport,
    config: &TrackerConfig,
) -> Option<SectionId> {
    let band = config.band(viewport);
    let center = band.center();
    let mut best: Option<(&SectionBounds, f64)> = None;
    for section in sections.iter().filter(|section| section.intersects(&band)) {
        let distance = section.distance_to(center);
        match best {
            Some((_, best_distance)) if distance > best_distance => {}
            _ => best = Some((section, distance)),
        }
    }
    best.map(|(section, _)| section.id.clone())
}

/// First section straddling the line just below the header.
pub fn select_at_header_line(
    sections: &[SectionBounds],
    viewport: &Viewport,
    config: &TrackerConfig,
) -> Option<SectionId> {
    let line = viewport.scroll_y + viewport.header_height.max(0.0) + config.header_padding.max(0.0);
    sections
        .iter()
        .find(|section| section.top <= line && section.bottom() > line)
        .map(|section| section.id.clone())
}

fn nearest_to_band(sections: &[SectionBounds], band: &Band) -> Option<SectionId> {
    let mut best: Option<(&SectionBounds, f64)> = None;
    for section in sections {
        let distance = band.distance_to(section);
        match best {
            Some((_, best_distance)) if distance > best_distance => {}
            _ => best = Some((section, distance)),
        }
    }
    best.map(|(section, _)| section.id.clone())
}

pub fn link_states(links: &[NavBinding], active: Option<&SectionId>) -> Vec<bool> {
    links
        .iter()
        .map(|link| active.is_some_and(|id| link.points_at(id)))
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct ActiveTracker {
    config: TrackerConfig,
    active: Option<SectionId>,
}

impl ActiveTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    /// Makes `id` the active section. Reports `Keep` when it already was.
    pub fn force(&mut self, id: SectionId) -> TrackerDecision {
        if self.active.as_ref() == Some(&id) {
            return TrackerDecision::Keep;
        }
        self.active = Some(id.clone());
        TrackerDecision::Activate(id)
    }

    pub fn evaluate(
        &mut self,
        sections: &[SectionBounds],
        viewport: &Viewport,
        trigger: EvaluationTrigger,
    ) -> TrackerDecision {
        if sections.is_empty() {
            return match self.active.take() {
                Some(_) => TrackerDecision::Clear,
                None => TrackerDecision::Keep,
            };
        }

        if trigger == EvaluationTrigger::Load {
            let id = select_at_header_line(sections, viewport, &self.config)
                .unwrap_or_else(|| sections[0].id.clone());
            return self.force(id);
        }

        if let Some(id) = select_active(sections, viewport, &self.config) {
            return self.force(id);
        }

        if viewport.at_page_top() {
            return self.force(sections[0].id.clone());
        }

        match trigger {
            EvaluationTrigger::Resize => self.settle_after_resize(sections, viewport),
            _ => TrackerDecision::Keep,
        }
    }

    fn settle_after_resize(
        &mut self,
        sections: &[SectionBounds],
        viewport: &Viewport,
    ) -> TrackerDecision {
        let band = self.config.band(viewport);
        let still_near = self.active.as_ref().is_some_and(|id| {
            sections
                .iter()
                .find(|section| &section.id == id)
                .is_some_and(|section| band.distance_to(section) <= viewport.height.max(0.0))
        });
        if still_near {
            return TrackerDecision::Keep;
        }
        match nearest_to_band(sections, &band) {
            Some(id) => self.force(id),
            None => TrackerDecision::Keep,
        }
    }
}
