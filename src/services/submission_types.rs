use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::database::entities::{content_submissions, submission_episodes, ContentType};
use crate::errors::{StudioError, StudioResult};

pub const MIN_TITLE_LENGTH: usize = 3;
pub const MIN_DESCRIPTION_LENGTH: usize = 20;
pub const DEFAULT_SERIES_STATUS: &str = "ongoing";

/// One episode as supplied by a creator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeInput {
    pub season_number: i32,
    pub episode_number: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub file_size_gb: f64,
}

/// Type-specific part of a submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPayload {
    Movie {
        #[serde(default)]
        video_url: Option<String>,
    },
    Series {
        #[serde(default)]
        episodes: Vec<EpisodeInput>,
        #[serde(default)]
        series_status: Option<String>,
    },
}

impl ContentPayload {
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentPayload::Movie { .. } => ContentType::Movie,
            ContentPayload::Series { .. } => ContentType::Series,
        }
    }

    pub fn episodes(&self) -> &[EpisodeInput] {
        match self {
            ContentPayload::Movie { .. } => &[],
            ContentPayload::Series { episodes, .. } => episodes,
        }
    }
}

/// Everything a creator sends to `submit_content`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub file_size_gb: f64,
    #[serde(flatten)]
    pub content: ContentPayload,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

fn check_size(label: &str, size_gb: f64) -> StudioResult<()> {
    if !size_gb.is_finite() || size_gb < 0.0 {
        return Err(StudioError::validation(format!(
            "{} file size must be a non-negative number of GB",
            label
        )));
    }
    Ok(())
}

/// Validate a batch of episodes, including collisions with `existing`
/// (season, episode) pairs already stored for the submission.
pub fn validate_episodes(
    episodes: &[EpisodeInput],
    existing: &HashSet<(i32, i32)>,
) -> StudioResult<()> {
    if episodes.is_empty() {
        return Err(StudioError::validation(
            "A series must contain at least one episode",
        ));
    }

    let mut seen = existing.clone();
    for episode in episodes {
        let label = format!(
            "Season {} episode {}",
            episode.season_number, episode.episode_number
        );
        if episode.season_number < 1 || episode.episode_number < 1 {
            return Err(StudioError::validation(format!(
                "{}: season and episode numbers start at 1",
                label
            )));
        }
        if !present(&episode.video_url) {
            return Err(StudioError::validation(format!(
                "{} is missing a video URL",
                label
            )));
        }
        check_size(&label, episode.file_size_gb)?;
        if !seen.insert((episode.season_number, episode.episode_number)) {
            return Err(StudioError::validation(format!("{} is duplicated", label)));
        }
    }
    Ok(())
}

impl SubmissionPayload {
    pub fn validate(&self) -> StudioResult<()> {
        if self.title.trim().chars().count() < MIN_TITLE_LENGTH {
            return Err(StudioError::validation(format!(
                "Title must be at least {} characters",
                MIN_TITLE_LENGTH
            )));
        }
        if self.description.trim().chars().count() < MIN_DESCRIPTION_LENGTH {
            return Err(StudioError::validation(format!(
                "Description must be at least {} characters",
                MIN_DESCRIPTION_LENGTH
            )));
        }
        if !present(&self.genre) {
            return Err(StudioError::validation("Genre is required"));
        }
        if !present(&self.thumbnail_url) {
            return Err(StudioError::validation("Thumbnail URL is required"));
        }
        check_size("Submission", self.file_size_gb)?;

        match &self.content {
            ContentPayload::Movie { video_url } => {
                if !present(video_url) {
                    return Err(StudioError::validation("A movie requires a video URL"));
                }
            }
            ContentPayload::Series { episodes, .. } => {
                validate_episodes(episodes, &HashSet::new())?;
            }
        }
        Ok(())
    }

    /// Storage charged at intake: the submission's own size plus every episode.
    pub fn total_size_gb(&self) -> f64 {
        self.file_size_gb
            + self
                .content
                .episodes()
                .iter()
                .map(|e| e.file_size_gb)
                .sum::<f64>()
    }
}

/// Structured summary stored alongside a series submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    #[serde(default = "default_total_seasons")]
    pub total_seasons: i32,
    #[serde(default)]
    pub total_episodes: i32,
    #[serde(default = "default_series_status")]
    pub status: String,
}

fn default_total_seasons() -> i32 {
    1
}

fn default_series_status() -> String {
    DEFAULT_SERIES_STATUS.to_string()
}

impl Default for SeriesData {
    fn default() -> Self {
        Self {
            total_seasons: default_total_seasons(),
            total_episodes: 0,
            status: default_series_status(),
        }
    }
}

impl SeriesData {
    /// Summarise a set of `(season, episode)` keys.
    pub fn from_episode_keys<I>(keys: I, status: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut total_seasons = 0;
        let mut total_episodes = 0;
        for (season, _) in keys {
            total_seasons = total_seasons.max(season);
            total_episodes += 1;
        }
        Self {
            total_seasons: total_seasons.max(1),
            total_episodes,
            status: status
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .unwrap_or_else(default_series_status),
        }
    }

    /// Decode the stored JSON, degrading to the default on absent or malformed input.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some(text) => serde_json::from_str(text).unwrap_or_else(|e| {
                warn!("Malformed series data {:?}, using defaults: {}", text, e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A stored submission together with its episodes.
#[derive(Clone, Debug, Serialize)]
pub struct SubmissionDetails {
    pub submission: content_submissions::Model,
    pub episodes: Vec<submission_episodes::Model>,
}

/// Result of `submit_content`.
#[derive(Clone, Debug, Serialize)]
pub struct SubmissionOutcome {
    pub submission: content_submissions::Model,
    pub episodes: Vec<submission_episodes::Model>,
    pub auto_approved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(season: i32, number: i32) -> EpisodeInput {
        EpisodeInput {
            season_number: season,
            episode_number: number,
            title: None,
            description: None,
            video_url: Some(format!("https://cdn.example/s{}e{}.mp4", season, number)),
            thumbnail_url: None,
            duration_minutes: None,
            file_size_gb: 0.5,
        }
    }

    fn movie_payload() -> SubmissionPayload {
        SubmissionPayload {
            title: "Echo".to_string(),
            description: "A sound engineer hears the future.".to_string(),
            genre: Some("thriller".to_string()),
            year: Some(2024),
            thumbnail_url: Some("https://cdn.example/echo.jpg".to_string()),
            banner_url: None,
            duration_minutes: Some(104),
            file_size_gb: 2.0,
            content: ContentPayload::Movie {
                video_url: Some("https://cdn.example/echo.mp4".to_string()),
            },
        }
    }

    #[test]
    fn test_valid_movie_passes() {
        assert!(movie_payload().validate().is_ok());
    }

    #[test]
    fn test_short_title_rejected() {
        let mut payload = movie_payload();
        payload.title = " ab ".to_string();
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("Title"));
    }

    #[test]
    fn test_short_description_rejected() {
        let mut payload = movie_payload();
        payload.description = "Too short".to_string();
        assert!(payload.validate().unwrap_err().to_string().contains("Description"));
    }

    #[test]
    fn test_movie_without_video_rejected() {
        let mut payload = movie_payload();
        payload.content = ContentPayload::Movie { video_url: None };
        assert!(payload.validate().unwrap_err().is_validation_error());
    }

    #[test]
    fn test_series_requires_episodes_with_video() {
        let mut payload = movie_payload();
        payload.content = ContentPayload::Series {
            episodes: vec![],
            series_status: None,
        };
        assert!(payload.validate().is_err());

        let mut missing_video = episode(1, 1);
        missing_video.video_url = Some("  ".to_string());
        payload.content = ContentPayload::Series {
            episodes: vec![episode(1, 2), missing_video],
            series_status: None,
        };
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("Season 1 episode 1 is missing a video URL"));
    }

    #[test]
    fn test_duplicate_episode_rejected() {
        let err = validate_episodes(&[episode(1, 1), episode(1, 1)], &HashSet::new()).unwrap_err();
        assert!(err.to_string().contains("duplicated"));

        let existing: HashSet<(i32, i32)> = [(2, 1)].into_iter().collect();
        assert!(validate_episodes(&[episode(2, 1)], &existing).is_err());
    }

    #[test]
    fn test_total_size_includes_episodes() {
        let mut payload = movie_payload();
        payload.file_size_gb = 1.0;
        payload.content = ContentPayload::Series {
            episodes: vec![episode(1, 1), episode(1, 2), episode(2, 1)],
            series_status: None,
        };
        assert!((payload.total_size_gb() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_payload_deserializes_tagged_type() {
        let json = serde_json::json!({
            "type": "series",
            "title": "Galaxy Quest",
            "description": "A crew of actors mistaken for heroes.",
            "genre": "comedy",
            "thumbnail_url": "https://cdn.example/gq.jpg",
            "episodes": [
                { "season_number": 1, "episode_number": 1, "video_url": "https://cdn.example/1.mp4" }
            ]
        });
        let payload: SubmissionPayload = serde_json::from_value(json).unwrap();
        assert_eq!(payload.content.content_type(), ContentType::Series);
        assert_eq!(payload.content.episodes().len(), 1);
    }

    #[test]
    fn test_series_data_summarises_keys() {
        let data = SeriesData::from_episode_keys(vec![(1, 1), (1, 2), (3, 1)], Some("completed"));
        assert_eq!(data.total_seasons, 3);
        assert_eq!(data.total_episodes, 3);
        assert_eq!(data.status, "completed");
    }

    #[test]
    fn test_malformed_series_data_degrades_to_default() {
        let data = SeriesData::parse_or_default(Some("{not json"));
        assert_eq!(data.total_seasons, 1);
        assert_eq!(data, SeriesData::default());

        let partial = SeriesData::parse_or_default(Some(r#"{"total_episodes": 4}"#));
        assert_eq!(partial.total_seasons, 1);
        assert_eq!(partial.total_episodes, 4);
    }
}
