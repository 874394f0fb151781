//! `KeyValueStorage` の実装
//!
//! - `memory`: プロセスの寿命だけ生きるストレージ（セッションスコープ用）
//! - `file`: JSON ファイルに保存する永続ストレージ（トークン保存用）

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::InMemoryStorage;
