//! Navigator 実装
//!
//! 現在の画面と遷移履歴を保持するだけのシンプルな実装です。
//! ターミナル UI はこの状態を見てプロンプトを切り替えます。

use std::sync::{Mutex, MutexGuard};

use crate::domain::{Navigator, Route};

/// 遷移履歴を記録する Navigator
#[derive(Debug)]
pub struct RouteTracker {
    history: Mutex<Vec<Route>>,
}

impl RouteTracker {
    /// `initial` を現在の画面として作成
    pub fn new(initial: Route) -> Self {
        Self {
            history: Mutex::new(vec![initial]),
        }
    }

    /// 現在の画面
    pub fn current(&self) -> Route {
        self.guard().last().copied().unwrap_or(Route::Login)
    }

    /// 指定した画面への遷移回数（初期画面は数えない）
    pub fn count_navigations_to(&self, route: Route) -> usize {
        self.guard().iter().skip(1).filter(|r| **r == route).count()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Route>> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Navigator for RouteTracker {
    fn navigate(&self, route: Route) {
        tracing::info!("Navigating to {}", route);
        self.guard().push(route);
    }
}
