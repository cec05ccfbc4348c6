use std::fmt;

pub const FRAGMENT_PREFIX: char = '#';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionId(String);

impl SectionId {
    pub fn parse(value: &str) -> Result<Self, SectionIdError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SectionIdError::Empty);
        }
        if let Some((index, ch)) = value.char_indices().find(|(_, ch)| ch.is_whitespace()) {
            return Err(SectionIdError::InvalidCharacter { ch, index });
        }
        Ok(Self(value.to_string()))
    }

    /// Parses an in-page link target such as `#about`.
    pub fn from_href(href: &str) -> Result<Self, SectionIdError> {
        let href = href.trim();
        let Some(fragment) = href.strip_prefix(FRAGMENT_PREFIX) else {
            return Err(SectionIdError::NotFragment(href.to_string()));
        };
        Self::parse(fragment)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SectionId {
    type Err = SectionIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionIdError {
    Empty,
    NotFragment(String),
    InvalidCharacter { ch: char, index: usize },
}

impl fmt::Display for SectionIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionIdError::Empty => write!(f, "section id cannot be empty"),
            SectionIdError::NotFragment(href) => {
                write!(f, "link target '{href}' is not an in-page fragment")
            }
            SectionIdError::InvalidCharacter { ch, index } => {
                write!(f, "invalid character {ch:?} at position {index}")
            }
        }
    }
}

impl std::error::Error for SectionIdError {}
