//! Record normalization
//!
//! Flattens the loosely structured API attribute bag into the fixed-width row
//! the store persists. List values are joined with `|`; nothing nested
//! survives past this point.

use crate::crawler::fetcher::{AiringSchedule, FuzzyDate, MediaAttributes};
use crate::storage::AnimeRecord;

/// Delimiter used when flattening list values into a single column
pub const LIST_DELIMITER: &str = "|";

/// Flattens one attribute bag into a stored row
///
/// Attributes map onto columns in schema order. `id`, `retrieved_at`, and
/// `version` occupy fixed trailing positions and never come from the bag
/// itself.
pub fn normalize(
    media: &MediaAttributes,
    id: i64,
    retrieved_at: &str,
    version: &str,
) -> AnimeRecord {
    AnimeRecord {
        id,
        name_romaji: media.title.as_ref().and_then(|t| t.romaji.clone()),
        name_english: media.title.as_ref().and_then(|t| t.english.clone()),
        starting_time: media.start_date.as_ref().and_then(format_fuzzy_date),
        ending_time: media.end_date.as_ref().and_then(format_fuzzy_date),
        cover_image: media.cover_image.as_ref().and_then(|c| c.large.clone()),
        banner_image: media.banner_image.clone(),
        airing_format: media.format.clone(),
        airing_status: media.status.clone(),
        airing_episodes: media.episodes,
        season: media.season.clone(),
        desc_para: media.description.clone(),
        average_score: media.average_score,
        genres: media.genres.as_ref().map(|g| g.join(LIST_DELIMITER)),
        next_airing_ep: media
            .next_airing_episode
            .as_ref()
            .map(join_airing_schedule),
        record_updated_on: retrieved_at.to_string(),
        retriever_version: version.to_string(),
    }
}

/// Renders a fuzzy date as "month/day/year"
///
/// Unknown components render as "?"; a date with no known component at all
/// stays null.
fn format_fuzzy_date(date: &FuzzyDate) -> Option<String> {
    if date.year.is_none() && date.month.is_none() && date.day.is_none() {
        return None;
    }

    Some(format!(
        "{}/{}/{}",
        component(date.month),
        component(date.day),
        component(date.year)
    ))
}

fn component(value: Option<i64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

/// Joins the airing sub-mapping values in declared field order
///
/// Order is airing_at, time_until_airing, episode; a missing value leaves an
/// empty segment so positions stay stable.
fn join_airing_schedule(schedule: &AiringSchedule) -> String {
    [
        schedule.airing_at,
        schedule.time_until_airing,
        schedule.episode,
    ]
    .iter()
    .map(|value| value.map_or_else(String::new, |v| v.to_string()))
    .collect::<Vec<_>>()
    .join(LIST_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::MediaTitle;

    fn bag() -> MediaAttributes {
        MediaAttributes {
            title: Some(MediaTitle {
                romaji: Some("Cowboy Bebop".to_string()),
                english: Some("Cowboy Bebop".to_string()),
            }),
            genres: Some(vec!["Action".to_string(), "Comedy".to_string()]),
            ..Default::default()
        }
    }

    #[test]
    fn test_genres_join_with_delimiter() {
        let record = normalize(&bag(), 1, "2024-01-01T00:00:00Z", "test-v1");
        assert_eq!(record.genres.as_deref(), Some("Action|Comedy"));
    }

    #[test]
    fn test_empty_genre_list_becomes_empty_string() {
        let mut media = bag();
        media.genres = Some(vec![]);
        let record = normalize(&media, 1, "2024-01-01T00:00:00Z", "test-v1");
        assert_eq!(record.genres.as_deref(), Some(""));
    }

    #[test]
    fn test_absent_genres_stay_null() {
        let mut media = bag();
        media.genres = None;
        let record = normalize(&media, 1, "2024-01-01T00:00:00Z", "test-v1");
        assert_eq!(record.genres, None);
    }

    #[test]
    fn test_null_next_airing_stays_null() {
        let record = normalize(&bag(), 1, "2024-01-01T00:00:00Z", "test-v1");
        assert_eq!(record.next_airing_ep, None);
    }

    #[test]
    fn test_next_airing_joins_in_declared_order() {
        let mut media = bag();
        media.next_airing_episode = Some(AiringSchedule {
            airing_at: Some(1),
            time_until_airing: Some(2),
            episode: Some(3),
        });
        let record = normalize(&media, 1, "2024-01-01T00:00:00Z", "test-v1");
        assert_eq!(record.next_airing_ep.as_deref(), Some("1|2|3"));
    }

    #[test]
    fn test_next_airing_missing_value_keeps_position() {
        let mut media = bag();
        media.next_airing_episode = Some(AiringSchedule {
            airing_at: Some(1),
            time_until_airing: None,
            episode: Some(3),
        });
        let record = normalize(&media, 1, "2024-01-01T00:00:00Z", "test-v1");
        assert_eq!(record.next_airing_ep.as_deref(), Some("1||3"));
    }

    #[test]
    fn test_fuzzy_date_renders_month_day_year() {
        let mut media = bag();
        media.start_date = Some(FuzzyDate {
            year: Some(2013),
            month: Some(4),
            day: Some(7),
        });
        let record = normalize(&media, 1, "2024-01-01T00:00:00Z", "test-v1");
        assert_eq!(record.starting_time.as_deref(), Some("4/7/2013"));
    }

    #[test]
    fn test_fuzzy_date_partial_components() {
        let mut media = bag();
        media.start_date = Some(FuzzyDate {
            year: Some(1998),
            month: None,
            day: None,
        });
        let record = normalize(&media, 1, "2024-01-01T00:00:00Z", "test-v1");
        assert_eq!(record.starting_time.as_deref(), Some("?/?/1998"));
    }

    #[test]
    fn test_fuzzy_date_all_unknown_stays_null() {
        let mut media = bag();
        media.start_date = Some(FuzzyDate::default());
        let record = normalize(&media, 1, "2024-01-01T00:00:00Z", "test-v1");
        assert_eq!(record.starting_time, None);
    }

    #[test]
    fn test_trailing_fields_come_from_arguments() {
        let record = normalize(&bag(), 42, "2024-06-01T12:00:00Z", "v-tag");
        assert_eq!(record.id, 42);
        assert_eq!(record.record_updated_on, "2024-06-01T12:00:00Z");
        assert_eq!(record.retriever_version, "v-tag");
    }
}
