//! Repository trait 定義
//!
//! ドメイン層が必要とする外部とのやり取りのインターフェースを定義します。
//! 具体的な実装（reqwest によるバックエンド呼び出し、ファイルストレージ）は
//! Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ClientError, Event, EventDraft, EventId, Profile, StorageError, UserId};

/// 認証 API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// アカウントを登録
    async fn signup(&self, email: &str, password: &str) -> Result<(), ClientError>;

    /// ログインしてベアラートークンを取得
    async fn login(&self, email: &str, password: &str) -> Result<String, ClientError>;
}

/// プロフィール API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// プロフィールを取得（存在しない場合は `ClientError::NotFound`）
    async fn get(&self, user_id: UserId) -> Result<Profile, ClientError>;

    /// プロフィールを作成
    async fn create(&self, profile: &Profile) -> Result<(), ClientError>;

    /// プロフィールを更新
    async fn update(&self, profile: &Profile) -> Result<(), ClientError>;
}

/// イベント API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// 全イベントのサマリー一覧を取得
    async fn list(&self) -> Result<Vec<Event>, ClientError>;

    /// イベントの詳細を取得（参加者リストはこちらが正）
    async fn get(&self, event_id: EventId) -> Result<Event, ClientError>;

    /// イベントを作成
    async fn create(&self, draft: &EventDraft) -> Result<Event, ClientError>;

    /// イベントを更新
    async fn update(&self, event_id: EventId, draft: &EventDraft) -> Result<Event, ClientError>;

    /// イベントを削除
    async fn delete(&self, event_id: EventId) -> Result<(), ClientError>;

    /// イベントに参加
    async fn join(&self, event_id: EventId) -> Result<(), ClientError>;

    /// イベントから退出
    async fn leave(&self, event_id: EventId) -> Result<(), ClientError>;
}

/// 文字列キー・文字列値のストレージ
///
/// 永続ストレージ（トークン保存用）とセッションスコープのストレージ
/// （プロフィール確認フラグ用）の両方がこの trait を実装します。
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
