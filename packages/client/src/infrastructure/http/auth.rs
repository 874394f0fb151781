//! 認証 API の HTTP 実装

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use crate::domain::{AuthRepository, ClientError};
use crate::infrastructure::dto::http::CredentialsDto;

use super::client::{Access, ApiClient, require_data};

const SIGNUP_FALLBACK: &str = "Something went wrong";
const LOGIN_FALLBACK: &str = "Invalid credentials";

/// `/auth/*` エンドポイントを呼び出す AuthRepository 実装
pub struct HttpAuthRepository {
    api: Arc<ApiClient>,
}

impl HttpAuthRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthRepository for HttpAuthRepository {
    async fn signup(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let credentials = CredentialsDto { email, password };
        self.api
            .send(
                Method::POST,
                "/auth/signup",
                Some(&credentials),
                Access::Public,
                SIGNUP_FALLBACK,
            )
            .await
            .map_err(|e| match e {
                ClientError::Server(message) | ClientError::NotFound(message) => {
                    ClientError::Validation(message)
                }
                other => other,
            })?;
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let credentials = CredentialsDto { email, password };
        let body = self
            .api
            .send(
                Method::POST,
                "/auth/login",
                Some(&credentials),
                Access::Public,
                LOGIN_FALLBACK,
            )
            .await
            .map_err(|e| match e {
                ClientError::Server(message) | ClientError::NotFound(message) => {
                    ClientError::InvalidCredentials(message)
                }
                other => other,
            })?;

        let token: String = require_data(body)?;
        if token.trim().is_empty() {
            return Err(ClientError::InvalidCredentials(LOGIN_FALLBACK.to_string()));
        }
        Ok(token)
    }
}
