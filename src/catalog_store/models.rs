//! Catalog models for the SQLite-backed song store.

use serde::{Deserialize, Serialize};

/// Returned lyrics are cut to this many characters in the public detail
/// view. Payload-size policy, not a storage limit.
pub const LYRICS_PREVIEW_MAX_CHARS: usize = 500;

/// A karaoke catalog entry as stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Song {
    pub id: String,
    pub title: String,
    /// External catalog identifier (the number typed into the machine).
    pub code: String,
    pub lyrics: Option<String>,
    pub performer: Option<String>,
}

/// Input for song creation. Link ids are applied idempotently.
#[derive(Clone, Debug, Default)]
pub struct NewSong {
    pub title: String,
    pub code: String,
    pub lyrics: Option<String>,
    pub performer: Option<String>,
    pub artist_ids: Vec<String>,
    pub category_ids: Vec<String>,
}

/// Tri-state for a nullable column in a partial update, distinguishing
/// "leave untouched" from "clear to NULL" from "set to a value".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }
}

/// Partial update for a song.
///
/// `None` scalar fields are left untouched. `artist_ids`/`category_ids`
/// replace the whole link set when supplied, even when empty; `None`
/// leaves existing links alone.
#[derive(Clone, Debug, Default)]
pub struct SongUpdate {
    pub title: Option<String>,
    pub code: Option<String>,
    pub lyrics: FieldUpdate<String>,
    pub performer: FieldUpdate<String>,
    pub artist_ids: Option<Vec<String>>,
    pub category_ids: Option<Vec<String>>,
}

impl SongUpdate {
    /// True when the update carries nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.code.is_none()
            && self.lyrics.is_keep()
            && self.performer.is_keep()
            && self.artist_ids.is_none()
            && self.category_ids.is_none()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

/// A category link resolved for the song detail view.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "icon_base64")]
    pub icon: Option<Vec<u8>>,
}

/// Full song view: core fields plus resolved links.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongDetail {
    pub id: String,
    pub title: String,
    pub code: String,
    pub lyrics: Option<String>,
    pub performer: Option<String>,
    pub artists: Vec<ArtistRef>,
    pub categories: Vec<CategoryRef>,
}

/// Compact song row for listings and search results. Lyrics are excluded
/// on purpose.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongListItem {
    pub id: String,
    pub title: String,
    pub code: String,
    pub performer: Option<String>,
}

/// A category annotated with description/icon drawn from one of its
/// song links.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "icon_base64")]
    pub icon: Option<Vec<u8>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Exactly one substring criterion per search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchCriteria {
    Title(String),
    Artist(String),
    Lyrics(String),
}

impl SearchCriteria {
    /// Builds a criterion from the raw optional query inputs.
    ///
    /// Precedence when several are present: title, then artist, then
    /// lyrics. Returns None when none is supplied; callers treat that as
    /// invalid input.
    pub fn from_inputs(
        title: Option<&str>,
        artist: Option<&str>,
        lyrics: Option<&str>,
    ) -> Option<Self> {
        if let Some(t) = non_blank(title) {
            Some(SearchCriteria::Title(t))
        } else if let Some(a) = non_blank(artist) {
            Some(SearchCriteria::Artist(a))
        } else {
            non_blank(lyrics).map(SearchCriteria::Lyrics)
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Serde helper: BLOB icons travel as base64 strings in JSON.
mod icon_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        icon: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        icon.as_ref()
            .map(|bytes| STANDARD.encode(bytes))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_criteria_requires_at_least_one_input() {
        assert_eq!(SearchCriteria::from_inputs(None, None, None), None);
        assert_eq!(SearchCriteria::from_inputs(Some("  "), Some(""), None), None);
    }

    #[test]
    fn test_search_criteria_title_takes_precedence() {
        let criteria =
            SearchCriteria::from_inputs(Some("friday"), Some("cure"), Some("love")).unwrap();
        assert_eq!(criteria, SearchCriteria::Title("friday".to_string()));
    }

    #[test]
    fn test_search_criteria_artist_before_lyrics() {
        let criteria = SearchCriteria::from_inputs(None, Some("cure"), Some("love")).unwrap();
        assert_eq!(criteria, SearchCriteria::Artist("cure".to_string()));

        let criteria = SearchCriteria::from_inputs(None, None, Some("love")).unwrap();
        assert_eq!(criteria, SearchCriteria::Lyrics("love".to_string()));
    }

    #[test]
    fn test_search_criteria_trims_input() {
        let criteria = SearchCriteria::from_inputs(Some("  friday "), None, None).unwrap();
        assert_eq!(criteria, SearchCriteria::Title("friday".to_string()));
    }

    #[test]
    fn test_song_update_is_empty() {
        assert!(SongUpdate::default().is_empty());

        let update = SongUpdate {
            lyrics: FieldUpdate::Clear,
            ..Default::default()
        };
        assert!(!update.is_empty());

        let update = SongUpdate {
            category_ids: Some(vec![]),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_category_icon_serializes_as_base64() {
        let summary = CategorySummary {
            id: "cat-1".to_string(),
            name: "Rock".to_string(),
            description: None,
            icon: Some(vec![0xde, 0xad, 0xbe, 0xef]),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["icon"], "3q2+7w==");

        let back: CategorySummary = serde_json::from_value(json).unwrap();
        assert_eq!(back.icon, Some(vec![0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn test_category_icon_null_round_trip() {
        let summary = CategorySummary {
            id: "cat-2".to_string(),
            name: "Pop".to_string(),
            description: Some("chart hits".to_string()),
            icon: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["icon"].is_null());

        let back: CategorySummary = serde_json::from_value(json).unwrap();
        assert_eq!(back.icon, None);
    }
}
