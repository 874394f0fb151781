//! Request layer shared by every HTTP repository.
//!
//! ## 責務
//!
//! - ベース URL の解決と `Authorization: Bearer <token>` の付与
//! - レスポンスボディの防御的なパース（空・非 JSON は空オブジェクトに縮退）
//! - ステータスコードから `ClientError` への変換
//! - 401 を受けた場合のグローバルなログアウトとログイン画面への遷移
//!
//! 401 の処理はここだけで行います。各リポジトリや UseCase は
//! `ClientError::AuthExpired` を受け取るだけで、自分ではログアウトしません。

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    config::ClientConfig,
    domain::{ClientError, Navigator, Route},
    infrastructure::{
        dto::http::{Envelope, error_message},
        token_store::TokenStore,
    },
};

pub const INVALID_RESPONSE: &str = "Invalid response format from server";

/// Whether a request carries the bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

/// reqwest を使ったバックエンドクライアント
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token_store: TokenStore,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// 新しい ApiClient を作成
    ///
    /// # Arguments
    ///
    /// * `config` - ベース URL とタイムアウト
    /// * `token_store` - ベアラートークンの取得元（401 で消去される）
    /// * `navigator` - 401 でログイン画面へ遷移させるための Navigator
    pub fn new(
        config: &ClientConfig,
        token_store: TokenStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token_store,
            navigator,
        })
    }

    /// Send a request and return the parsed body of a successful response.
    ///
    /// `fallback` is the message used when a failed response carries none.
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        access: Access,
        fallback: &str,
    ) -> Result<Value, ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);

        if access == Access::Authenticated {
            let session = self.token_store.get();
            let Some(token) = session.token() else {
                tracing::warn!("{} {} requires a session, redirecting to login", method, path);
                self.navigator.navigate(Route::Login);
                return Err(ClientError::AuthExpired);
            };
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!("{} {}", method, url);
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} {} failed: {}", method, path, e);
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to read response body of {} {}: {}", method, path, e);
            String::new()
        });
        let body = parse_body(&text);
        tracing::debug!("{} {} -> {}", method, path, status);

        if status.is_success() {
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED && access == Access::Authenticated {
            self.expire_session(&method, path);
            return Err(ClientError::AuthExpired);
        }

        let message = error_message(&body).unwrap_or_else(|| fallback.to_string());
        if status == StatusCode::NOT_FOUND {
            Err(ClientError::NotFound(message))
        } else {
            tracing::warn!("{} {} -> {}: {}", method, path, status, message);
            Err(ClientError::Server(message))
        }
    }

    pub async fn get(&self, path: &str, fallback: &str) -> Result<Value, ClientError> {
        self.send::<Value>(Method::GET, path, None, Access::Authenticated, fallback)
            .await
    }

    pub async fn post<B>(&self, path: &str, body: &B, fallback: &str) -> Result<Value, ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send(Method::POST, path, Some(body), Access::Authenticated, fallback)
            .await
    }

    pub async fn put<B>(&self, path: &str, body: &B, fallback: &str) -> Result<Value, ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send(Method::PUT, path, Some(body), Access::Authenticated, fallback)
            .await
    }

    pub async fn delete(&self, path: &str, fallback: &str) -> Result<Value, ClientError> {
        self.send::<Value>(Method::DELETE, path, None, Access::Authenticated, fallback)
            .await
    }

    /// 401 handling. Only the response that actually ends the session redirects,
    /// so concurrent rejections produce a single navigation.
    fn expire_session(&self, method: &Method, path: &str) {
        if self.token_store.clear() {
            tracing::info!(
                "{} {} was rejected with 401, session cleared, redirecting to login",
                method,
                path
            );
            self.navigator.navigate(Route::Login);
        } else {
            tracing::debug!("{} {} was rejected with 401 after the session ended", method, path);
        }
    }
}

/// Parse a response body, degrading empty or non-JSON text to `{}`
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(text).unwrap_or_else(|e| {
        tracing::debug!("Response body is not JSON ({}), using empty object", e);
        Value::Object(Map::new())
    })
}

/// Extract the `data` field of a successful response body
pub fn take_data<T: DeserializeOwned>(body: Value) -> Result<Option<T>, ClientError> {
    serde_json::from_value::<Envelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|e| {
            tracing::warn!("Unexpected response payload: {}", e);
            ClientError::Server(INVALID_RESPONSE.to_string())
        })
}

/// Like `take_data`, but the payload is mandatory
pub fn require_data<T: DeserializeOwned>(body: Value) -> Result<T, ClientError> {
    take_data(body)?.ok_or_else(|| ClientError::Server(INVALID_RESPONSE.to_string()))
}
