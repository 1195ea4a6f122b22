use async_trait::async_trait;
use chrono::Duration;

use super::{LibraryServer, PlexClient};
use crate::{
    Res,
    types::{
        DateWindow, LibrarySection, MediaItem, MediaKind, MetadataContainer, PlexMetadata,
        PlexResponse, SectionsContainer,
    },
    utils,
};

/// Query parameters for a release date search of a section.
///
/// Plex's `>>=` / `<<=` date operators are exclusive, so the requested range is
/// widened by a day on each side; results are narrowed back to the inclusive
/// window after decoding.
pub fn search_query(kind: MediaKind, window: &DateWindow) -> Vec<(String, String)> {
    let after = window.start - Duration::days(1);
    let before = window.end + Duration::days(1);
    vec![
        ("type".to_string(), kind.plex_type().to_string()),
        ("includeGuids".to_string(), "1".to_string()),
        (
            "originallyAvailableAt>>".to_string(),
            after.format("%Y-%m-%d").to_string(),
        ),
        (
            "originallyAvailableAt<<".to_string(),
            before.format("%Y-%m-%d").to_string(),
        ),
    ]
}

impl From<PlexMetadata> for MediaItem {
    fn from(metadata: PlexMetadata) -> Self {
        MediaItem {
            title: metadata.title,
            guids: metadata.guids,
            originally_available_at: metadata
                .originally_available_at
                .as_deref()
                .and_then(utils::parse_plex_date),
        }
    }
}

#[async_trait]
impl LibraryServer for PlexClient {
    async fn section(&self, name: &str) -> Res<LibrarySection> {
        let response: PlexResponse<SectionsContainer> =
            self.http.fetch_json(&self.request("/library/sections")).await?;

        response
            .media_container
            .directory
            .into_iter()
            .find(|d| d.title == name)
            .map(|d| LibrarySection {
                key: d.key,
                title: d.title,
                kind: MediaKind::from_plex(&d.section_type),
            })
            .ok_or_else(|| format!("Library section '{}' not found on the Plex server", name).into())
    }

    async fn search(&self, section: &LibrarySection, window: &DateWindow) -> Res<Vec<MediaItem>> {
        let mut request = self.request(&format!("/library/sections/{}/all", section.key));
        for (key, value) in search_query(section.kind, window) {
            request = request.query(key, value);
        }

        let response: PlexResponse<MetadataContainer> = self.http.fetch_json(&request).await?;

        Ok(response
            .media_container
            .metadata
            .into_iter()
            .map(MediaItem::from)
            .filter(|item| {
                item.originally_available_at
                    .is_some_and(|date| window.contains(date))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::Guid;

    fn window(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateWindow {
        DateWindow {
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn test_search_query_widens_window_by_a_day() {
        let query = search_query(MediaKind::Show, &window((2001, 3, 1), (2001, 3, 31)));

        assert!(query.contains(&("type".to_string(), "2".to_string())));
        assert!(query.contains(&("includeGuids".to_string(), "1".to_string())));
        assert!(query.contains(&(
            "originallyAvailableAt>>".to_string(),
            "2001-02-28".to_string()
        )));
        assert!(query.contains(&(
            "originallyAvailableAt<<".to_string(),
            "2001-04-01".to_string()
        )));
    }

    #[test]
    fn test_metadata_decodes_from_plex_json() {
        let json = r#"{
            "MediaContainer": {
                "size": 2,
                "Metadata": [
                    {
                        "title": "Alien",
                        "originallyAvailableAt": "1979-05-25",
                        "Guid": [{"id": "imdb://tt0078748"}, {"id": "tmdb://348"}]
                    },
                    {"title": "No Date"}
                ]
            }
        }"#;

        let response: PlexResponse<MetadataContainer> = serde_json::from_str(json).unwrap();
        let items: Vec<MediaItem> = response
            .media_container
            .metadata
            .into_iter()
            .map(MediaItem::from)
            .collect();

        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].originally_available_at,
            NaiveDate::from_ymd_opt(1979, 5, 25)
        );
        assert_eq!(
            items[0].guids[1],
            Guid {
                id: "tmdb://348".to_string()
            }
        );
        assert_eq!(items[1].originally_available_at, None);
        assert!(items[1].guids.is_empty());
    }

    #[test]
    fn test_sections_decode_and_kind_mapping() {
        let json = r#"{
            "MediaContainer": {
                "Directory": [
                    {"key": "1", "title": "Movies", "type": "movie"},
                    {"key": "2", "title": "TV Shows", "type": "show"},
                    {"key": "3", "title": "Music", "type": "artist"}
                ]
            }
        }"#;

        let response: PlexResponse<SectionsContainer> = serde_json::from_str(json).unwrap();
        let kinds: Vec<MediaKind> = response
            .media_container
            .directory
            .iter()
            .map(|d| MediaKind::from_plex(&d.section_type))
            .collect();

        assert_eq!(kinds, vec![MediaKind::Movie, MediaKind::Show, MediaKind::Movie]);
    }
}
