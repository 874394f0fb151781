//! UseCase: プロフィールの取得・作成・更新

use std::sync::Arc;

use crate::{
    domain::{ClientError, Navigator, Profile, ProfileRepository, Route, UserId},
    infrastructure::TokenStore,
};

pub struct ProfileService {
    repository: Arc<dyn ProfileRepository>,
    token_store: TokenStore,
    navigator: Arc<dyn Navigator>,
}

impl ProfileService {
    pub fn new(
        repository: Arc<dyn ProfileRepository>,
        token_store: TokenStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            repository,
            token_store,
            navigator,
        }
    }

    /// 指定ユーザーのプロフィール（存在しない場合は `None`）
    pub async fn get(&self, user_id: UserId) -> Result<Option<Profile>, ClientError> {
        match self.repository.get(user_id).await {
            Ok(profile) => Ok(Some(profile)),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// ログイン中のユーザーのプロフィール
    pub async fn mine(&self) -> Result<Option<Profile>, ClientError> {
        let user_id = self
            .token_store
            .get()
            .user_id()
            .ok_or(ClientError::NotAuthenticated)?;
        self.get(user_id).await
    }

    /// プロフィールを作成し、成功したらホーム画面へ遷移
    pub async fn create(&self, profile: &Profile) -> Result<(), ClientError> {
        self.repository.create(profile).await?;
        tracing::info!("Profile created for {} {}", profile.first_name, profile.last_name);
        self.navigator.navigate(Route::Home);
        Ok(())
    }

    /// プロフィールを更新（画面遷移はしない）
    pub async fn update(&self, profile: &Profile) -> Result<(), ClientError> {
        self.repository.update(profile).await?;
        tracing::info!("Profile updated");
        Ok(())
    }
}
