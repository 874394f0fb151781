//! UseCase: イベント一覧と参加状態の同期
//!
//! ## 状態の持ち方
//!
//! - `events`: 直近の再取得で得たイベント一覧（表示用）
//! - `pending_joined`: 参加 API が成功したが、まだ再取得に反映されていないイベント
//! - `in_flight`: リクエスト実行中のイベント（同じイベントへの重複操作を拒否）
//! - 世代番号: 再取得のたびに採番し、より新しい再取得が発行済みなら古い応答を捨てる
//!
//! 状態は `tokio::sync::Mutex` で保護しますが、ロックはネットワーク呼び出しを
//! またいで保持しません。操作同士が交差するのはリクエストの境界だけです。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 参加・退出と、その後の再取得による状態の置き換え
//! - ローカルでの拒否（満員・参加済み・参加処理中・実行中）
//! - 古い応答の破棄
//!
//! ### なぜこのテストが必要か
//! - 表示される参加人数は常にサーバーの値と一致しなければならない
//! - 満員のイベントへの参加はネットワークを使わずに拒否する必要がある

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tokio::sync::Mutex;

use crate::{
    domain::{
        ClientError, Event, EventDraft, EventId, EventRepository, JoinAffordance, JoinSignals,
        ParticipationView, Rejection,
    },
    infrastructure::TokenStore,
};

#[derive(Debug, Default)]
struct ParticipationState {
    events: Vec<Event>,
    /// 各イベントの内容を得た再取得の世代
    versions: HashMap<EventId, u64>,
    pending_joined: HashSet<EventId>,
    in_flight: HashSet<EventId>,
    next_generation: u64,
    /// 最後に発行した一覧の再取得
    latest_list: u64,
    /// 最後に発行した詳細の再取得（イベントごと）
    latest_detail: HashMap<EventId, u64>,
    last_error: Option<String>,
}

impl ParticipationState {
    fn issue(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    fn find(&self, event_id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// Replace the list with a fetched one. Entries refreshed by a newer detail
    /// fetch are kept.
    fn apply_list(&mut self, generation: u64, fetched: Vec<Event>) -> bool {
        if generation != self.latest_list {
            return false;
        }

        let mut versions = HashMap::with_capacity(fetched.len());
        let mut events = Vec::with_capacity(fetched.len());
        for fresh in fetched {
            let newer = self
                .versions
                .get(&fresh.id)
                .filter(|&&v| v > generation)
                .and_then(|&v| self.find(fresh.id).map(|kept| (v, kept.clone())));
            match newer {
                Some((version, kept)) => {
                    versions.insert(kept.id, version);
                    events.push(kept);
                }
                None => {
                    versions.insert(fresh.id, generation);
                    events.push(fresh);
                }
            }
        }

        self.events = events;
        self.versions = versions;
        true
    }

    fn apply_detail(&mut self, generation: u64, event: Event) -> bool {
        if !self.is_latest_detail(event.id, generation) {
            return false;
        }
        if self.versions.get(&event.id).is_some_and(|&v| v > generation) {
            return false;
        }

        self.versions.insert(event.id, generation);
        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => *slot = event,
            None => self.events.push(event),
        }
        true
    }

    fn is_latest_detail(&self, event_id: EventId, generation: u64) -> bool {
        self.latest_detail.get(&event_id) == Some(&generation)
    }

    fn remove(&mut self, event_id: EventId) {
        self.events.retain(|e| e.id != event_id);
        self.versions.remove(&event_id);
        self.pending_joined.remove(&event_id);
    }

    fn begin(&mut self, event_id: EventId) -> Result<(), ClientError> {
        if !self.in_flight.insert(event_id) {
            return Err(self.reject(Rejection::InFlight));
        }
        Ok(())
    }

    fn reject(&mut self, rejection: Rejection) -> ClientError {
        self.last_error = Some(rejection.to_string());
        ClientError::Rejected(rejection)
    }

    fn record<T>(&mut self, result: &Result<T, ClientError>) {
        match result {
            Ok(_) => self.last_error = None,
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }
}

/// イベント一覧と参加状態を管理するユースケース
pub struct ParticipationController {
    repository: Arc<dyn EventRepository>,
    token_store: TokenStore,
    state: Mutex<ParticipationState>,
}

impl ParticipationController {
    pub fn new(repository: Arc<dyn EventRepository>, token_store: TokenStore) -> Self {
        Self {
            repository,
            token_store,
            state: Mutex::new(ParticipationState::default()),
        }
    }

    /// イベント一覧を取得して表示状態を置き換える
    pub async fn load(&self) -> Result<(), ClientError> {
        self.resync_list().await
    }

    /// 1 件のイベントを詳細で取得し直す
    pub async fn refresh_event(&self, event_id: EventId) -> Result<(), ClientError> {
        self.resync_event(event_id).await
    }

    /// イベントに参加
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 参加成功（一覧は再取得済み、または再取得だけ失敗）
    /// * `Err(ClientError::AuthExpired)` - 参加後の再取得でセッション切れ（状態は破棄済み）
    /// * `Err(ClientError::Rejected)` - ローカルで拒否（ネットワーク呼び出しなし）
    /// * `Err(ClientError::NotAuthenticated)` - セッションにユーザー ID がない
    /// * `Err(_)` - バックエンドのエラー（状態は変更しない）
    pub async fn join_team(&self, event_id: EventId) -> Result<(), ClientError> {
        let user_id = self.token_store.get().user_id();

        {
            let mut state = self.state.lock().await;
            let Some(user_id) = user_id else {
                let error = ClientError::NotAuthenticated;
                state.last_error = Some(error.to_string());
                return Err(error);
            };
            if state.in_flight.contains(&event_id) {
                return Err(state.reject(Rejection::InFlight));
            }

            let pending = state.pending_joined.contains(&event_id);
            let rejection = match state.find(event_id) {
                Some(event) => JoinSignals::evaluate(event, Some(user_id), pending).rejection(),
                None if pending => Some(Rejection::PendingJoin),
                None => None,
            };
            if let Some(rejection) = rejection {
                tracing::debug!("Join on event {} rejected locally: {}", event_id, rejection);
                return Err(state.reject(rejection));
            }

            state.begin(event_id)?;
        }

        let result = self.repository.join(event_id).await;

        {
            let mut state = self.state.lock().await;
            state.in_flight.remove(&event_id);
            state.record(&result);
            result?;
            state.pending_joined.insert(event_id);
        }
        tracing::info!("Joined event {}", event_id);

        self.settle(self.resync_list().await, &format!("Joined event {}", event_id))
            .await
    }

    /// イベントから退出
    pub async fn leave_team(&self, event_id: EventId) -> Result<(), ClientError> {
        self.state.lock().await.begin(event_id)?;

        let result = self.repository.leave(event_id).await;

        {
            let mut state = self.state.lock().await;
            state.in_flight.remove(&event_id);
            state.record(&result);
            result?;
            state.pending_joined.remove(&event_id);
        }
        tracing::info!("Left event {}", event_id);

        self.settle(self.resync_event(event_id).await, &format!("Left event {}", event_id))
            .await
    }

    /// イベントを作成し、一覧を再取得
    pub async fn create_event(&self, draft: &EventDraft) -> Result<Event, ClientError> {
        let result = self.repository.create(draft).await;
        self.state.lock().await.record(&result);
        let created = result?;
        tracing::info!("Created event {} '{}'", created.id, created.title);

        self.settle(self.resync_list().await, &format!("Created event {}", created.id))
            .await?;
        Ok(created)
    }

    /// イベントを更新し、一覧を再取得
    pub async fn update_event(
        &self,
        event_id: EventId,
        draft: &EventDraft,
    ) -> Result<Event, ClientError> {
        self.state.lock().await.begin(event_id)?;

        let result = self.repository.update(event_id, draft).await;

        {
            let mut state = self.state.lock().await;
            state.in_flight.remove(&event_id);
            state.record(&result);
        }
        let updated = result?;
        tracing::info!("Updated event {}", event_id);

        self.settle(self.resync_list().await, &format!("Updated event {}", event_id))
            .await?;
        Ok(updated)
    }

    /// イベントを削除し、ローカルの一覧からも取り除く
    pub async fn delete_event(&self, event_id: EventId) -> Result<(), ClientError> {
        self.state.lock().await.begin(event_id)?;

        let result = self.repository.delete(event_id).await;

        let mut state = self.state.lock().await;
        state.in_flight.remove(&event_id);
        state.record(&result);
        result?;
        state.remove(event_id);
        tracing::info!("Deleted event {}", event_id);
        Ok(())
    }

    pub async fn events(&self) -> Vec<Event> {
        self.state.lock().await.events.clone()
    }

    pub async fn event(&self, event_id: EventId) -> Option<Event> {
        self.state.lock().await.find(event_id).cloned()
    }

    /// 参加ボタンの表示内容（イベントが一覧にない場合は `None`）
    pub async fn affordance(&self, event_id: EventId) -> Option<JoinAffordance> {
        let user_id = self.token_store.get().user_id();
        let state = self.state.lock().await;
        let event = state.find(event_id)?;
        let signals =
            JoinSignals::evaluate(event, user_id, state.pending_joined.contains(&event_id));
        Some(JoinAffordance::new(
            signals,
            state.in_flight.contains(&event_id),
        ))
    }

    pub async fn view_for(&self, event_id: EventId) -> Option<ParticipationView> {
        self.affordance(event_id).await.map(|a| a.view)
    }

    /// 直近の操作で発生したエラーメッセージ
    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    /// ログアウト時にすべての状態を破棄
    pub async fn reset(&self) {
        *self.state.lock().await = ParticipationState::default();
        tracing::debug!("Participation state cleared");
    }

    /// 変更が成功した後の再取得結果をまとめる
    ///
    /// 401 ではセッションが破棄されているため状態も捨ててエラーを返す。
    /// それ以外の失敗は変更自体の成功を覆さない。
    async fn settle(&self, resync: Result<(), ClientError>, done: &str) -> Result<(), ClientError> {
        match resync {
            Ok(()) => Ok(()),
            Err(ClientError::AuthExpired) => {
                tracing::warn!("{}, but the session expired before the refresh", done);
                self.reset().await;
                Err(ClientError::AuthExpired)
            }
            Err(e) => {
                tracing::warn!("{}, but the view could not be refreshed: {}", done, e);
                Ok(())
            }
        }
    }

    async fn resync_list(&self) -> Result<(), ClientError> {
        let generation = {
            let mut state = self.state.lock().await;
            let generation = state.issue();
            state.latest_list = generation;
            generation
        };

        let result = self.repository.list().await;

        let mut state = self.state.lock().await;
        match result {
            Ok(events) => {
                let count = events.len();
                if state.apply_list(generation, events) {
                    tracing::debug!("Event list replaced ({} events, generation {})", count, generation);
                } else {
                    tracing::debug!("Discarded stale event list (generation {})", generation);
                }
                Ok(())
            }
            Err(e) => {
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn resync_event(&self, event_id: EventId) -> Result<(), ClientError> {
        let generation = {
            let mut state = self.state.lock().await;
            let generation = state.issue();
            state.latest_detail.insert(event_id, generation);
            generation
        };

        let result = self.repository.get(event_id).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(event) => {
                if !state.apply_detail(generation, event) {
                    tracing::debug!("Discarded stale detail of event {}", event_id);
                }
                Ok(())
            }
            Err(ClientError::NotFound(_)) if state.is_latest_detail(event_id, generation) => {
                tracing::info!("Event {} no longer exists", event_id);
                state.remove(event_id);
                Ok(())
            }
            Err(e) => {
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
