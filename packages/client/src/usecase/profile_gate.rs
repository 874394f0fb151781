//! UseCase: プロフィール確認ゲート
//!
//! メイン画面に入る前に、ログイン中のユーザーがプロフィールを持っているかを
//! 1 セッションにつき 1 回だけ確認します。確認済みフラグには確認したユーザーの
//! ID を保存し、別のユーザーでログインした場合は再確認します。フラグは
//! セッションスコープのストレージにあるため、プロセスを再起動しても再確認されます。
//!
//! | 確認結果                     | 遷移            | フラグ   |
//! |------------------------------|-----------------|----------|
//! | プロフィールあり             | そのまま        | 保存     |
//! | 404                          | CreateProfile   | 保存しない |
//! | その他の HTTP エラー         | そのまま        | 保存     |
//! | 応答なし（ネットワーク障害） | そのまま        | 保存しない |
//! | 401                          | Login（共通処理） | 保存しない |

use std::sync::Arc;

use crate::{
    domain::{ClientError, KeyValueStorage, Navigator, ProfileRepository, Route, Session, UserId},
    infrastructure::TokenStore,
};

/// セッションスコープのストレージに保存するキー（値は確認済みのユーザー ID）
pub const PROFILE_CHECKED_KEY: &str = "profileCheckDone";

/// Lookup for "the profile of the caller" when the session has no user id
const SELF_USER_ID: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unchecked,
    Checked,
}

/// What the caller should do after `enter_main_view`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Render the main view
    Proceed,
    /// The user was sent to the profile creation screen
    ProfileRequired,
}

/// プロフィール確認ゲートのユースケース
pub struct ProfileGate {
    profiles: Arc<dyn ProfileRepository>,
    token_store: TokenStore,
    /// セッションスコープのストレージ（確認済みフラグ）
    session_storage: Arc<dyn KeyValueStorage>,
    navigator: Arc<dyn Navigator>,
}

impl ProfileGate {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        token_store: TokenStore,
        session_storage: Arc<dyn KeyValueStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            profiles,
            token_store,
            session_storage,
            navigator,
        }
    }

    /// 現在のセッションのユーザーについての確認状態
    pub fn state(&self) -> GateState {
        let session = self.token_store.get();
        if !session.is_authenticated() {
            return GateState::Unchecked;
        }
        self.state_for(subject(&session))
    }

    /// 確認済みフラグを消す（ログアウト・再ログイン時）
    pub fn reset(&self) {
        if let Err(e) = self.session_storage.remove(PROFILE_CHECKED_KEY) {
            tracing::warn!("Failed to clear profile check flag: {}", e);
        }
    }

    /// メイン画面に入る前の確認を実行
    ///
    /// # Returns
    ///
    /// * `Ok(GateOutcome::Proceed)` - メイン画面を表示してよい
    /// * `Ok(GateOutcome::ProfileRequired)` - プロフィール作成画面へ遷移済み
    /// * `Err(ClientError::NotAuthenticated)` - 未ログイン（ログイン画面へ遷移済み）
    /// * `Err(ClientError::AuthExpired)` - セッション切れ（ログイン画面へ遷移済み）
    pub async fn enter_main_view(&self) -> Result<GateOutcome, ClientError> {
        let session = self.token_store.get();
        if !session.is_authenticated() {
            self.navigator.navigate(Route::Login);
            return Err(ClientError::NotAuthenticated);
        }

        let user_id = subject(&session);
        if self.state_for(user_id) == GateState::Checked {
            return Ok(GateOutcome::Proceed);
        }

        match self.profiles.get(user_id).await {
            Ok(_) => {
                self.mark_checked(user_id);
                Ok(GateOutcome::Proceed)
            }
            Err(ClientError::NotFound(_)) => {
                tracing::info!("No profile for user {}, redirecting", user_id);
                self.navigator.navigate(Route::CreateProfile);
                Ok(GateOutcome::ProfileRequired)
            }
            Err(ClientError::AuthExpired) => Err(ClientError::AuthExpired),
            Err(ClientError::Network(e)) => {
                // retried on the next entry
                tracing::warn!("Profile check skipped, backend unreachable: {}", e);
                Ok(GateOutcome::Proceed)
            }
            Err(e) => {
                tracing::warn!("Profile check failed, letting the user through: {}", e);
                self.mark_checked(user_id);
                Ok(GateOutcome::Proceed)
            }
        }
    }

    fn state_for(&self, user_id: UserId) -> GateState {
        match self.session_storage.get(PROFILE_CHECKED_KEY) {
            Some(checked) if checked == user_id.to_string() => GateState::Checked,
            _ => GateState::Unchecked,
        }
    }

    fn mark_checked(&self, user_id: UserId) {
        if let Err(e) = self
            .session_storage
            .set(PROFILE_CHECKED_KEY, &user_id.to_string())
        {
            tracing::warn!("Failed to persist profile check flag: {}", e);
        }
    }
}

/// プロフィールの持ち主として問い合わせるユーザー ID
fn subject(session: &Session) -> UserId {
    session
        .user_id()
        .unwrap_or_else(|| UserId::new(SELF_USER_ID))
}
