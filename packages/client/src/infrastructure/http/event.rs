//! イベント API の HTTP 実装
//!
//! 成功レスポンスは常に `data` フィールドから読みます。
//! 一覧で `data` がない場合は空リスト、単体で `data` がない場合は不正なレスポンスです。

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::domain::{ClientError, Event, EventDraft, EventId, EventRepository};
use crate::infrastructure::dto::http::{EventDraftDto, EventDto};

use super::client::{Access, ApiClient, INVALID_RESPONSE, require_data, take_data};

/// `/events` エンドポイントを呼び出す EventRepository 実装
pub struct HttpEventRepository {
    api: Arc<ApiClient>,
}

impl HttpEventRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

fn into_event(dto: EventDto) -> Result<Event, ClientError> {
    let id = dto.id;
    Event::try_from(dto).map_err(|e| {
        tracing::warn!("Event {} is invalid: {}", id, e);
        ClientError::Server(INVALID_RESPONSE.to_string())
    })
}

/// 一覧レスポンスの `data` を 1 件ずつ変換する
///
/// 形式が壊れた要素は警告を出して読み飛ばし、残りのイベントは返します。
fn events_from_body(body: Value) -> Result<Vec<Event>, ClientError> {
    let items: Vec<Value> = take_data(body)?.unwrap_or_default();

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<EventDto>(item) {
            Ok(dto) => into_event(dto).ok(),
            Err(e) => {
                tracing::warn!("Skipping malformed event at index {}: {}", index, e);
                None
            }
        })
        .collect())
}

#[async_trait]
impl EventRepository for HttpEventRepository {
    async fn list(&self) -> Result<Vec<Event>, ClientError> {
        let body = self.api.get("/events/all", "Failed to fetch events").await?;
        events_from_body(body)
    }

    async fn get(&self, event_id: EventId) -> Result<Event, ClientError> {
        let body = self
            .api
            .get(
                &format!("/events/{}", event_id),
                "Failed to fetch event details",
            )
            .await?;
        into_event(require_data(body)?)
    }

    async fn create(&self, draft: &EventDraft) -> Result<Event, ClientError> {
        let body = self
            .api
            .post("/events", &EventDraftDto::from(draft), "Failed to create event")
            .await?;
        into_event(require_data(body)?)
    }

    async fn update(&self, event_id: EventId, draft: &EventDraft) -> Result<Event, ClientError> {
        let body = self
            .api
            .put(
                &format!("/events/{}", event_id),
                &EventDraftDto::from(draft),
                "Failed to update event",
            )
            .await?;
        into_event(require_data(body)?)
    }

    async fn delete(&self, event_id: EventId) -> Result<(), ClientError> {
        self.api
            .delete(&format!("/events/{}", event_id), "Failed to delete event")
            .await?;
        Ok(())
    }

    async fn join(&self, event_id: EventId) -> Result<(), ClientError> {
        self.api
            .send::<Value>(
                Method::POST,
                &format!("/events/{}/join", event_id),
                None,
                Access::Authenticated,
                "Failed to join event",
            )
            .await?;
        Ok(())
    }

    async fn leave(&self, event_id: EventId) -> Result<(), ClientError> {
        self.api
            .delete(
                &format!("/events/{}/leave", event_id),
                "Failed to leave event",
            )
            .await?;
        Ok(())
    }
}
