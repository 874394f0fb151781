//! プロフィール API の HTTP 実装

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ClientError, Profile, ProfileRepository, UserId};
use crate::infrastructure::dto::http::ProfileDto;

use super::client::{ApiClient, INVALID_RESPONSE, require_data};

/// `/profile` エンドポイントを呼び出す ProfileRepository 実装
pub struct HttpProfileRepository {
    api: Arc<ApiClient>,
}

impl HttpProfileRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ProfileRepository for HttpProfileRepository {
    async fn get(&self, user_id: UserId) -> Result<Profile, ClientError> {
        let body = self
            .api
            .get(&format!("/profile/{}", user_id), "Profile not found")
            .await?;
        let dto: ProfileDto = require_data(body)?;
        Profile::try_from(dto).map_err(|e| {
            tracing::warn!("Profile of user {} is invalid: {}", user_id, e);
            ClientError::Server(INVALID_RESPONSE.to_string())
        })
    }

    async fn create(&self, profile: &Profile) -> Result<(), ClientError> {
        let dto = ProfileDto::from(profile);
        self.api
            .post("/profile", &dto, "Failed to create profile")
            .await?;
        Ok(())
    }

    async fn update(&self, profile: &Profile) -> Result<(), ClientError> {
        let dto = ProfileDto::from(profile);
        self.api
            .put("/profile", &dto, "Failed to update profile")
            .await?;
        Ok(())
    }
}
