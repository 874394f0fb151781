//! InMemory KeyValueStorage 実装
//!
//! プロセスが終了すると内容は失われます。ブラウザの `sessionStorage` に相当し、
//! プロフィール確認フラグのような「このセッションの間だけ」有効な値を保持します。

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use crate::domain::{KeyValueStorage, StorageError};

/// インメモリ KeyValueStorage 実装
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // 値は常に完全な状態で書き込まれるため、poison されていても中身は使える
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}
