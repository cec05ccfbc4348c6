use serde::Deserialize;

use crate::messages::{CONNECTION_ERROR_MESSAGE, FAILURE_MESSAGE, SENDING_MESSAGE, SUCCESS_MESSAGE};

pub const DEFAULT_FORM_ENDPOINT: &str = "https://api.web3forms.com/submit";
pub const DEFAULT_FORM_METHOD: &str = "POST";

/// Body returned by the form endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("endpoint rejected submission: {0}")]
    Rejected(String),
}

impl SubmitError {
    /// Text shown to the visitor for this failure.
    pub fn display_message(&self) -> &str {
        match self {
            SubmitError::Network(_) | SubmitError::Malformed(_) => CONNECTION_ERROR_MESSAGE,
            SubmitError::Rejected(message) => message,
        }
    }
}

pub fn parse_response(body: &str) -> Result<SubmitResponse, SubmitError> {
    serde_json::from_str::<SubmitResponse>(body)
        .map_err(|err| SubmitError::Malformed(err.to_string()))
}

/// Folds a parsed response into success or a rejection carrying the text to
/// show. A blank server message falls back to the generic failure text.
pub fn check_response(response: SubmitResponse) -> Result<(), SubmitError> {
    if response.success {
        return Ok(());
    }
    let message = response
        .message
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| FAILURE_MESSAGE.to_string());
    Err(SubmitError::Rejected(message))
}

pub fn resolve_endpoint(action: Option<&str>, fallback: &str) -> String {
    match action.map(str::trim) {
        Some(action) if !action.is_empty() => action.to_string(),
        _ => fallback.to_string(),
    }
}

pub fn resolve_method(method: Option<&str>, fallback: &str) -> String {
    match method.map(str::trim) {
        Some(method) if !method.is_empty() => method.to_ascii_uppercase(),
        _ => fallback.to_ascii_uppercase(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Error,
}

impl StatusTone {
    pub const ALL_CLASSES: [&'static str; 2] = ["success", "error"];

    pub fn class_name(self) -> &'static str {
        match self {
            StatusTone::Success => "success",
            StatusTone::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Sending,
    Success,
    Failure(String),
}

impl FormStatus {
    pub fn text(&self) -> &str {
        match self {
            FormStatus::Idle => "",
            FormStatus::Sending => SENDING_MESSAGE,
            FormStatus::Success => SUCCESS_MESSAGE,
            FormStatus::Failure(message) => message,
        }
    }

    pub fn tone(&self) -> Option<StatusTone> {
        match self {
            FormStatus::Success => Some(StatusTone::Success),
            FormStatus::Failure(_) => Some(StatusTone::Error),
            FormStatus::Idle | FormStatus::Sending => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusView {
    pub text: String,
    pub tone: Option<StatusTone>,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishOutcome {
    pub view: StatusView,
    pub reset_form: bool,
}

/// Status line of one contact form. Every submission bumps the generation;
/// timers scheduled for an older generation are ignored.
#[derive(Clone, Debug, Default)]
pub struct StatusBoard {
    generation: u64,
    status: FormStatus,
    visible: bool,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn view(&self) -> StatusView {
        StatusView {
            text: self.status.text().to_string(),
            tone: self.status.tone(),
            visible: self.visible,
        }
    }

    pub fn begin(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.status = FormStatus::Sending;
        self.visible = true;
        self.generation
    }

    pub fn finish(
        &mut self,
        generation: u64,
        result: Result<(), SubmitError>,
    ) -> Option<FinishOutcome> {
        if generation != self.generation {
            return None;
        }
        let reset_form = result.is_ok();
        self.status = match result {
            Ok(()) => FormStatus::Success,
            Err(err) => FormStatus::Failure(err.display_message().to_string()),
        };
        self.visible = true;
        Some(FinishOutcome {
            view: self.view(),
            reset_form,
        })
    }

    /// Starts the fade-out; returns false for a stale generation.
    pub fn hide(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.visible = false;
        true
    }

    pub fn clear(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.status = FormStatus::Idle;
        self.visible = false;
        true
    }
}
