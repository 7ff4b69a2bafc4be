//! Media descriptor derived from a local filename.

use serde::{Deserialize, Serialize};

/// What we know about a media file from its name alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl MediaDescriptor {
    /// Descriptor with a title only.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            season: None,
            episode: None,
        }
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_episode(mut self, season: u32, episode: u32) -> Self {
        self.season = Some(season);
        self.episode = Some(episode);
        self
    }

    /// Canonical `SxxEyy` tag, present only when both season and episode are.
    pub fn episode_tag(&self) -> Option<String> {
        match (self.season, self.episode) {
            (Some(season), Some(episode)) => Some(format!("S{:02}E{:02}", season, episode)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_tag() {
        let media = MediaDescriptor::new("Show").with_episode(1, 2);
        assert_eq!(media.episode_tag().as_deref(), Some("S01E02"));
        assert_eq!(media.episode_tag(), media.episode_tag());
    }

    #[test]
    fn test_episode_tag_requires_both_parts() {
        let mut media = MediaDescriptor::new("Show");
        media.season = Some(3);
        assert!(media.episode_tag().is_none());

        let mut media = MediaDescriptor::new("Show");
        media.episode = Some(3);
        assert!(media.episode_tag().is_none());
    }

    #[test]
    fn test_wide_episode_numbers() {
        let media = MediaDescriptor::new("Show").with_episode(12, 104);
        assert_eq!(media.episode_tag().as_deref(), Some("S12E104"));
    }
}
