use serde::Deserialize;

use crate::form::{DEFAULT_FORM_ENDPOINT, DEFAULT_FORM_METHOD};
use crate::tracker::TrackerConfig;

pub const ACTIVE_CLASS: &str = "active";
pub const REVEALED_CLASS: &str = "is-visible";

/// Page wiring settings. Every field is optional in the serialized form.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub header_selector: String,
    pub nav_link_selector: String,
    pub section_selector: String,
    pub form_selector: String,
    pub status_selector: String,
    pub submit_selector: String,
    pub header_padding: f64,
    pub band_bottom_ratio: f64,
    pub reveal: bool,
    pub reveal_threshold: f64,
    pub throttle_ms: u32,
    pub settle_delay_ms: u32,
    pub status_hide_ms: u32,
    pub status_fade_ms: u32,
    pub form_endpoint: String,
    pub form_method: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            header_selector: "header".to_string(),
            nav_link_selector: r##"nav a[href^="#"]"##.to_string(),
            section_selector: ".section".to_string(),
            form_selector: "form.contact-form".to_string(),
            status_selector: ".form-status".to_string(),
            submit_selector: ".form-submit-btn".to_string(),
            header_padding: 15.0,
            band_bottom_ratio: 0.3,
            reveal: true,
            reveal_threshold: 0.1,
            throttle_ms: 100,
            settle_delay_ms: 700,
            status_hide_ms: 5_000,
            status_fade_ms: 300,
            form_endpoint: default_form_endpoint(),
            form_method: DEFAULT_FORM_METHOD.to_string(),
        }
    }
}

fn default_form_endpoint() -> String {
    if let Some(raw) = option_env!("NAVSPY_FORM_ENDPOINT") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    DEFAULT_FORM_ENDPOINT.to_string()
}

impl PageConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<PageConfig>(raw).map(PageConfig::sanitized)
    }

    pub fn sanitized(mut self) -> Self {
        let defaults = PageConfig::default();
        self.header_padding = finite_or(self.header_padding, defaults.header_padding).max(0.0);
        self.band_bottom_ratio =
            finite_or(self.band_bottom_ratio, defaults.band_bottom_ratio).clamp(0.0, 0.99);
        self.reveal_threshold =
            finite_or(self.reveal_threshold, defaults.reveal_threshold).clamp(0.0, 1.0);
        for (value, fallback) in [
            (&mut self.header_selector, defaults.header_selector),
            (&mut self.nav_link_selector, defaults.nav_link_selector),
            (&mut self.section_selector, defaults.section_selector),
            (&mut self.form_selector, defaults.form_selector),
            (&mut self.status_selector, defaults.status_selector),
            (&mut self.submit_selector, defaults.submit_selector),
            (&mut self.form_endpoint, defaults.form_endpoint),
            (&mut self.form_method, defaults.form_method),
        ] {
            if value.trim().is_empty() {
                *value = fallback;
            }
        }
        self
    }

    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig {
            header_padding: self.header_padding,
            band_bottom_ratio: self.band_bottom_ratio,
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PageConfig::from_json(r#"{"header_padding": 24, "reveal": false}"#).unwrap();
        assert_eq!(config.header_padding, 24.0);
        assert!(!config.reveal);
        assert_eq!(config.section_selector, ".section");
        assert_eq!(config.status_hide_ms, 5_000);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let config = PageConfig::from_json(
            r#"{"header_padding": -4, "band_bottom_ratio": 3.0, "reveal_threshold": -1, "form_method": ""}"#,
        )
        .unwrap();
        assert_eq!(config.header_padding, 0.0);
        assert_eq!(config.band_bottom_ratio, 0.99);
        assert_eq!(config.reveal_threshold, 0.0);
        assert_eq!(config.form_method, "POST");
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(PageConfig::from_json(r#"{"throttle_ms": "fast"}"#).is_err());
    }
}
