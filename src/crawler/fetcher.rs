//! AniList fetch collaborator
//!
//! This module handles all API requests for the crawler, including:
//! - Building the HTTP client with proper user agent and timeouts
//! - Posting the GraphQL media query for one id at a time
//! - Classifying responses into a typed outcome
//!
//! The crawl loop only distinguishes three outcomes: the entry exists, it
//! does not, or the request failed in transit. The loop treats the last two
//! identically; the distinction exists so logs say which one happened.

use crate::config::ApiConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// GraphQL query for a single media entry
const MEDIA_QUERY: &str = r#"
query ($id: Int) {
    Media(id: $id, type: ANIME) {
        title { romaji english }
        startDate { year month day }
        endDate { year month day }
        coverImage { large }
        bannerImage
        format
        status
        episodes
        season
        description
        averageScore
        genres
        nextAiringEpisode { airingAt timeUntilAiring episode }
    }
}
"#;

/// Result of a fetch attempt for one media id
#[derive(Debug)]
pub enum FetchOutcome {
    /// The entry exists; its attributes as returned by the API
    Found(MediaAttributes),

    /// No entry exists at this id
    Absent,

    /// The request failed in transit or the response could not be decoded
    TransientError {
        /// Error description
        error: String,
    },
}

/// Raw attribute bag for one media entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAttributes {
    #[serde(default)]
    pub title: Option<MediaTitle>,
    #[serde(default)]
    pub start_date: Option<FuzzyDate>,
    #[serde(default)]
    pub end_date: Option<FuzzyDate>,
    #[serde(default)]
    pub cover_image: Option<CoverImage>,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub episodes: Option<i64>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub average_score: Option<i64>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub next_airing_episode: Option<AiringSchedule>,
}

/// Title variants for a media entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaTitle {
    #[serde(default)]
    pub romaji: Option<String>,
    #[serde(default)]
    pub english: Option<String>,
}

/// A date whose components may individually be unknown
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FuzzyDate {
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub month: Option<i64>,
    #[serde(default)]
    pub day: Option<i64>,
}

/// Cover image references
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverImage {
    #[serde(default)]
    pub large: Option<String>,
}

/// The next scheduled episode, present only for currently airing shows
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiringSchedule {
    #[serde(default)]
    pub airing_at: Option<i64>,
    #[serde(default)]
    pub time_until_airing: Option<i64>,
    #[serde(default)]
    pub episode: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct MediaResponse {
    #[serde(default)]
    data: Option<MediaData>,
}

#[derive(Debug, Deserialize)]
struct MediaData {
    #[serde(rename = "Media")]
    media: Option<MediaAttributes>,
}

/// Builds the HTTP client used for all API requests
///
/// # Arguments
///
/// * `config` - The API configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ApiConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one media entry by id
///
/// HTTP 404 and a null `Media` payload both mean the id has no entry. Any
/// transport failure, unexpected status, or undecodable body is reported as
/// transient.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `endpoint` - The GraphQL endpoint URL
/// * `id` - The media id to fetch
///
/// # Returns
///
/// A FetchOutcome classifying the response
pub async fn fetch_media(client: &Client, endpoint: &str, id: i64) -> FetchOutcome {
    let body = json!({
        "query": MEDIA_QUERY,
        "variables": { "id": id },
    });

    let response = match client.post(endpoint).json(&body).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchOutcome::TransientError {
                error: e.to_string(),
            }
        }
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return FetchOutcome::Absent;
    }
    if !status.is_success() {
        return FetchOutcome::TransientError {
            error: format!("unexpected status {}", status),
        };
    }

    match response.json::<MediaResponse>().await {
        Ok(MediaResponse {
            data:
                Some(MediaData {
                    media: Some(media),
                }),
        }) => FetchOutcome::Found(media),
        Ok(_) => FetchOutcome::Absent,
        Err(e) => FetchOutcome::TransientError {
            error: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    #[test]
    fn test_build_http_client() {
        let config = ApiConfig::default();
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_deserialize_full_media_response() {
        let body = r#"{
            "data": {
                "Media": {
                    "title": { "romaji": "Shingeki no Kyojin", "english": "Attack on Titan" },
                    "startDate": { "year": 2013, "month": 4, "day": 7 },
                    "endDate": { "year": 2013, "month": 9, "day": 29 },
                    "coverImage": { "large": "https://img.example/cover.png" },
                    "bannerImage": "https://img.example/banner.png",
                    "format": "TV",
                    "status": "FINISHED",
                    "episodes": 25,
                    "season": "SPRING",
                    "description": "Humanity fights back.",
                    "averageScore": 84,
                    "genres": ["Action", "Drama"],
                    "nextAiringEpisode": null
                }
            }
        }"#;

        let parsed: MediaResponse = serde_json::from_str(body).unwrap();
        let media = parsed.data.unwrap().media.unwrap();

        assert_eq!(media.title.as_ref().unwrap().romaji.as_deref(), Some("Shingeki no Kyojin"));
        assert_eq!(media.start_date.as_ref().unwrap().year, Some(2013));
        assert_eq!(media.episodes, Some(25));
        assert_eq!(media.genres.as_ref().unwrap().len(), 2);
        assert!(media.next_airing_episode.is_none());
    }

    #[test]
    fn test_deserialize_null_media_response() {
        let body = r#"{
            "errors": [{ "message": "Not Found.", "status": 404 }],
            "data": { "Media": null }
        }"#;

        let parsed: MediaResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.data.unwrap().media.is_none());
    }

    #[test]
    fn test_deserialize_airing_schedule() {
        let body = r#"{
            "data": {
                "Media": {
                    "title": { "romaji": "Ongoing Show" },
                    "nextAiringEpisode": {
                        "airingAt": 1700000000,
                        "timeUntilAiring": 86400,
                        "episode": 12
                    }
                }
            }
        }"#;

        let parsed: MediaResponse = serde_json::from_str(body).unwrap();
        let media = parsed.data.unwrap().media.unwrap();
        let schedule = media.next_airing_episode.unwrap();

        assert_eq!(schedule.airing_at, Some(1_700_000_000));
        assert_eq!(schedule.time_until_airing, Some(86_400));
        assert_eq!(schedule.episode, Some(12));
    }
}
