//! 内存版 AuthClient
//!
//! 只认可配置中的用户，签发带有效期的随机令牌，并返回配置好的服务目录。

use async_trait::async_trait;
use chrono::Utc;
use garde::Validate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use smart_default::SmartDefault;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::cfg::duration::{serde_as, HumanDur};
use crate::oss::{AuthClient, AuthSession, Credentials, ServiceEntry, StorageError};
use crate::{impl_box_from, impl_try_from};

/// 允许登录的用户
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MemoryUser {
    pub username: String,
    pub password: String,
    pub project_name: String,
}

/// MemoryAuthClient 配置
#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, Validate)]
#[serde(default)]
pub struct MemoryAuthClientConfig {
    #[garde(length(min = 1))]
    pub users: Vec<MemoryUser>,

    /// 认证成功后返回的服务目录
    #[garde(skip)]
    pub catalog: Vec<ServiceEntry>,

    /// 令牌有效期，`0s` 会签发一个立即过期的令牌
    #[serde_as(as = "HumanDur")]
    #[default(Duration::from_secs(3600))]
    #[garde(skip)]
    pub token_ttl: Duration,
}

/// 内存版 AuthClient 实现
pub struct MemoryAuthClient {
    config: MemoryAuthClientConfig,
    ttl: chrono::Duration,
    issued: AtomicU64,
}

impl MemoryAuthClient {
    pub fn new(config: MemoryAuthClientConfig) -> Result<Self, StorageError> {
        if let Err(errors) = config.validate() {
            return Err(StorageError::Configuration(format!("{}", errors)));
        }

        let ttl = chrono::Duration::from_std(config.token_ttl)
            .map_err(|e| StorageError::Configuration(format!("token_ttl 超出范围: {}", e)))?;
        if Utc::now().checked_add_signed(ttl).is_none() {
            return Err(StorageError::Configuration(format!(
                "token_ttl 超出范围: {:?}",
                config.token_ttl
            )));
        }

        Ok(Self {
            config,
            ttl,
            issued: AtomicU64::new(0),
        })
    }

    fn issue_token(&self, credentials: &Credentials) -> String {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst);
        let digest = Sha256::new()
            .chain_update(credentials.username.as_bytes())
            .chain_update(credentials.project_name.as_bytes())
            .chain_update(seq.to_be_bytes())
            .chain_update(Utc::now().timestamp_nanos_opt().unwrap_or_default().to_be_bytes())
            .finalize();
        hex::encode(&digest[..16])
    }
}

#[async_trait]
impl AuthClient for MemoryAuthClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthSession, StorageError> {
        if credentials.host.trim().is_empty() {
            return Err(StorageError::InvalidInput("认证地址为空".to_string()));
        }

        let known = self.config.users.iter().any(|user| {
            user.username == credentials.username
                && user.password == credentials.password
                && user.project_name == credentials.project_name
        });
        if !known {
            log::warn!(
                "authentication rejected, username: {}, project: {}",
                credentials.username,
                credentials.project_name
            );
            return Err(StorageError::Authentication(format!(
                "用户名、密码或项目不匹配: {}@{}",
                credentials.username, credentials.project_name
            )));
        }

        let expires = Utc::now().checked_add_signed(self.ttl).ok_or_else(|| {
            StorageError::Configuration(format!("令牌过期时间超出范围: {}", self.ttl))
        })?;

        Ok(AuthSession {
            token: self.issue_token(credentials),
            expires,
            service_catalog: self.config.catalog.clone(),
        })
    }
}

impl_try_from!(MemoryAuthClientConfig => MemoryAuthClient, error: StorageError);
impl_box_from!(MemoryAuthClient => dyn AuthClient);
