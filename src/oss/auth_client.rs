use async_trait::async_trait;

use crate::oss::{AuthSession, Credentials, StorageError};

/// 认证能力：用凭证换取令牌和服务目录
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthSession, StorageError>;
}
