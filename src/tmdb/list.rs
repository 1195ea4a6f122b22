use async_trait::async_trait;
use serde_json::Value;

use super::{ListPublisher, TmdbClient};
use crate::{
    Res,
    http::HttpRequest,
    types::{AddListItemsRequest, ListEntry, ListId, TmdbListItem},
    warning,
};

/// TMDb media ids are numeric; anything else cannot be added to a list.
pub fn to_list_items(entries: &[ListEntry]) -> Vec<TmdbListItem> {
    entries
        .iter()
        .filter_map(|entry| match entry.id.parse::<u64>() {
            Ok(media_id) => Some(TmdbListItem {
                media_type: entry.kind.tmdb_media_type().to_string(),
                media_id,
            }),
            Err(_) => {
                warning!("Skipping non-numeric TMDb id '{}'", entry.id);
                None
            }
        })
        .collect()
}

#[async_trait]
impl ListPublisher for TmdbClient {
    async fn clear(&self, list_id: &ListId) -> Res<()> {
        let request = self.session_request(HttpRequest::get(
            self.url(&format!("/list/{}/clear", list_id)),
        ))?;
        let _: Value = self.http.fetch_json(&request).await?;
        Ok(())
    }

    async fn add_items(&self, list_id: &ListId, items: &[ListEntry]) -> Res<()> {
        let items = to_list_items(items);
        if items.is_empty() {
            return Ok(());
        }

        let request = self
            .session_request(HttpRequest::post(
                self.url(&format!("/list/{}/items", list_id)),
            ))?
            .json(&AddListItemsRequest { items })?;
        let _: Value = self.http.fetch_json(&request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaKind;

    #[test]
    fn test_to_list_items_maps_kind_and_skips_bad_ids() {
        let entries = vec![
            ListEntry {
                id: "550".to_string(),
                kind: MediaKind::Movie,
            },
            ListEntry {
                id: "1399".to_string(),
                kind: MediaKind::Show,
            },
            ListEntry {
                id: "tt0137523".to_string(),
                kind: MediaKind::Movie,
            },
        ];

        let items = to_list_items(&entries);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].media_type, "movie");
        assert_eq!(items[0].media_id, 550);
        assert_eq!(items[1].media_type, "tv");
        assert_eq!(items[1].media_id, 1399);
    }
}
