use std::collections::HashSet;

use crate::geometry::{SectionBounds, Viewport};
use crate::section_id::SectionId;

/// Share of the section's height currently inside the viewport, in `[0, 1]`.
pub fn visible_fraction(section: &SectionBounds, viewport: &Viewport) -> f64 {
    let height = section.height.max(0.0);
    let overlap =
        (section.bottom().min(viewport.bottom()) - section.top.max(viewport.scroll_y)).max(0.0);
    if height <= 0.0 {
        // zero-height sections count as fully visible once inside the viewport
        let inside = section.top >= viewport.scroll_y && section.top <= viewport.bottom();
        return if inside { 1.0 } else { 0.0 };
    }
    (overlap / height).clamp(0.0, 1.0)
}

#[derive(Clone, Debug)]
pub struct RevealSet {
    threshold: f64,
    revealed: HashSet<SectionId>,
}

impl RevealSet {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            revealed: HashSet::new(),
        }
    }

    pub fn is_revealed(&self, id: &SectionId) -> bool {
        self.revealed.contains(id)
    }

    pub fn is_complete(&self, sections: &[SectionBounds]) -> bool {
        sections.iter().all(|section| self.revealed.contains(&section.id))
    }

    /// Returns sections revealed by this update, in document order.
    pub fn update(&mut self, sections: &[SectionBounds], viewport: &Viewport) -> Vec<SectionId> {
        let mut newly = Vec::new();
        for section in sections {
            if self.revealed.contains(&section.id) {
                continue;
            }
            let fraction = visible_fraction(section, viewport);
            if fraction > 0.0 && fraction >= self.threshold {
                self.revealed.insert(section.id.clone());
                newly.push(section.id.clone());
            }
        }
        newly
    }

    pub fn reveal_all(&mut self, sections: &[SectionBounds]) -> Vec<SectionId> {
        sections
            .iter()
            .filter(|section| self.revealed.insert(section.id.clone()))
            .map(|section| section.id.clone())
            .collect()
    }
}
