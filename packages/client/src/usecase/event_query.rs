//! UseCase: 参加済み・作成済みイベントの一覧
//!
//! サマリー一覧の参加者リストは信頼できないため、参加済みイベントは詳細を
//! 1 件ずつ取得して判定します。作成済みイベントはサマリーの `owner_id` だけで
//! 判定でき、詳細の取得は行いません。

use std::sync::Arc;

use futures_util::future::try_join_all;

use crate::{
    domain::{ClientError, Event, EventRepository, UserId},
    infrastructure::TokenStore,
};

pub struct EventQueries {
    repository: Arc<dyn EventRepository>,
    token_store: TokenStore,
}

impl EventQueries {
    pub fn new(repository: Arc<dyn EventRepository>, token_store: TokenStore) -> Self {
        Self {
            repository,
            token_store,
        }
    }

    /// `user_id` が参加しているイベント（サマリー一覧の順序を保つ）
    ///
    /// 詳細の取得は並行して行い、1 件でも失敗したら全体が失敗します。
    pub async fn joined_by_user(&self, user_id: UserId) -> Result<Vec<Event>, ClientError> {
        let summaries = self.repository.list().await?;
        let details = try_join_all(
            summaries
                .iter()
                .map(|summary| self.repository.get(summary.id)),
        )
        .await?;

        let joined: Vec<Event> = details
            .into_iter()
            .filter(|event| event.has_participant(user_id))
            .collect();
        tracing::debug!(
            "User {} joined {} of {} events",
            user_id,
            joined.len(),
            summaries.len()
        );
        Ok(joined)
    }

    /// `user_id` が作成したイベント
    pub async fn created_by_user(&self, user_id: UserId) -> Result<Vec<Event>, ClientError> {
        let summaries = self.repository.list().await?;
        Ok(summaries
            .into_iter()
            .filter(|event| event.is_owned_by(user_id))
            .collect())
    }

    pub async fn joined_by_current_user(&self) -> Result<Vec<Event>, ClientError> {
        let user_id = self.current_user_id()?;
        self.joined_by_user(user_id).await
    }

    pub async fn created_by_current_user(&self) -> Result<Vec<Event>, ClientError> {
        let user_id = self.current_user_id()?;
        self.created_by_user(user_id).await
    }

    fn current_user_id(&self) -> Result<UserId, ClientError> {
        self.token_store
            .get()
            .user_id()
            .ok_or(ClientError::NotAuthenticated)
    }
}
