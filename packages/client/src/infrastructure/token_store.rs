//! Bearer token persistence.
//!
//! `TokenStore` is the only place that knows the storage keys of the session.
//! It never fails towards its callers: storage write errors are logged and
//! the in-storage state is whatever the backend managed to keep.

use std::sync::Arc;

use crate::domain::{KeyValueStorage, Session, UserId};

pub const TOKEN_KEY: &str = "token";
pub const USER_ID_KEY: &str = "userId";

/// Session persistence on top of a `KeyValueStorage`
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Store a token and the user id decoded from it.
    ///
    /// A `None` user id removes any id left over from a previous session.
    pub fn set(&self, token: &str, user_id: Option<UserId>) {
        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            tracing::warn!("Failed to persist token: {}", e);
        }

        let result = match user_id {
            Some(id) => self.storage.set(USER_ID_KEY, &id.to_string()),
            None => self.storage.remove(USER_ID_KEY),
        };
        if let Err(e) = result {
            tracing::warn!("Failed to persist user id: {}", e);
        }
    }

    /// Current session. A stored user id without a token is ignored.
    pub fn get(&self) -> Session {
        let Some(token) = self.storage.get(TOKEN_KEY) else {
            return Session::anonymous();
        };

        let user_id = self
            .storage
            .get(USER_ID_KEY)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(UserId::new);

        Session::new(token, user_id)
    }

    /// Remove the session. Idempotent.
    ///
    /// Returns whether a token was present before the call.
    pub fn clear(&self) -> bool {
        let had_token = self.storage.get(TOKEN_KEY).is_some();

        for key in [TOKEN_KEY, USER_ID_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!("Failed to remove '{}' from storage: {}", key, e);
            }
        }

        had_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::MockKeyValueStorage, infrastructure::storage::InMemoryStorage};

    fn create_token_store() -> (TokenStore, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        (TokenStore::new(storage.clone()), storage)
    }

    #[test]
    fn test_get_on_empty_storage_returns_anonymous() {
        // テスト項目: 空のストレージからは匿名セッションが返される
        // given (前提条件):
        let (store, _) = create_token_store();

        // when (操作):
        let session = store.get();

        // then (期待する結果):
        assert_eq!(session, Session::anonymous());
    }

    #[test]
    fn test_set_then_get_returns_session() {
        // テスト項目: 保存したトークンとユーザー ID がセッションとして返される
        // given (前提条件):
        let (store, _) = create_token_store();

        // when (操作):
        store.set("abc", Some(UserId::new(5)));

        // then (期待する結果):
        let session = store.get();
        assert_eq!(session.token(), Some("abc"));
        assert_eq!(session.user_id(), Some(UserId::new(5)));
    }

    #[test]
    fn test_set_without_user_id_drops_stale_user_id() {
        // テスト項目: ユーザー ID なしで保存すると前回のユーザー ID が消える
        // given (前提条件):
        let (store, _) = create_token_store();
        store.set("old", Some(UserId::new(5)));

        // when (操作):
        store.set("new", None);

        // then (期待する結果):
        let session = store.get();
        assert_eq!(session.token(), Some("new"));
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn test_user_id_without_token_is_ignored() {
        // テスト項目: トークンがない状態で残ったユーザー ID は無視される
        // given (前提条件):
        let (store, storage) = create_token_store();
        storage.set(USER_ID_KEY, "5").unwrap();

        // when (操作):
        let session = store.get();

        // then (期待する結果):
        assert_eq!(session, Session::anonymous());
    }

    #[test]
    fn test_unparseable_user_id_is_absent() {
        // テスト項目: 数値でないユーザー ID は存在しないものとして扱われる
        // given (前提条件):
        let (store, storage) = create_token_store();
        storage.set(TOKEN_KEY, "abc").unwrap();
        storage.set(USER_ID_KEY, "NaN").unwrap();

        // when (操作):
        let session = store.get();

        // then (期待する結果):
        assert!(session.is_authenticated());
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        // テスト項目: clear は冪等で、トークンがあったかどうかを返す
        // given (前提条件):
        let (store, _) = create_token_store();
        store.set("abc", Some(UserId::new(5)));

        // when (操作):
        let first = store.clear();
        let second = store.clear();

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(store.get(), Session::anonymous());
    }

    #[test]
    fn test_storage_failure_does_not_propagate() {
        // テスト項目: ストレージの書き込み失敗は呼び出し元に伝播しない
        // given (前提条件):
        let mut storage = MockKeyValueStorage::new();
        storage.expect_set().returning(|_, _| {
            Err(crate::domain::StorageError::Io(std::io::Error::other(
                "disk full",
            )))
        });
        storage.expect_remove().returning(|_| Ok(()));
        storage.expect_get().returning(|_| None);
        let store = TokenStore::new(Arc::new(storage));

        // when (操作):
        store.set("abc", Some(UserId::new(5)));

        // then (期待する結果): パニックせず、保存されていない状態が見える
        assert_eq!(store.get(), Session::anonymous());
    }
}
