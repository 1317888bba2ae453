use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::fmt;

/// 认证所需的凭证
///
/// 由外部配置解析而来，只交给 [`AuthClient`](crate::oss::AuthClient) 使用一次。
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize, SmartDefault, Validate)]
#[serde(default)]
pub struct Credentials {
    /// 认证服务地址，如 `https://identity.example.com/v2.0`
    #[garde(length(min = 1))]
    pub host: String,

    #[garde(length(min = 1))]
    pub username: String,

    #[garde(skip)]
    pub password: String,

    /// 项目（tenant）名称
    #[garde(length(min = 1))]
    pub project_name: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"******")
            .field("project_name", &self.project_name)
            .finish()
    }
}

/// 服务目录中的一项
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceEntry {
    /// 服务类型，如 `object-store`、`compute`
    #[serde(rename = "type")]
    pub service_type: String,

    /// 按优先级排列的公开访问地址
    #[serde(default)]
    pub endpoints: Vec<String>,
}

impl ServiceEntry {
    pub fn new<I, S>(service_type: impl Into<String>, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            service_type: service_type.into(),
            endpoints: endpoints.into_iter().map(Into::into).collect(),
        }
    }
}

/// 认证成功后得到的会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub expires: DateTime<Utc>,
    pub service_catalog: Vec<ServiceEntry>,
}

impl AuthSession {
    /// 令牌在 `now` 时刻是否仍然有效（过期时间必须严格晚于 `now`）
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires > now
    }
}

/// 容器列表中的一项
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContainerDescriptor {
    pub name: String,
    pub bytes: u64,
    pub count: u64,
}

/// 对象列表中的一项
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ObjectDescriptor {
    pub name: String,
    pub hash: String,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
    pub bytes: u64,
}

/// 列举选项
///
/// 结果按名称排序；`marker` 只返回名称大于它的条目，`limit` 在过滤之后截断。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub marker: Option<String>,
    pub prefix: Option<String>,
}

impl ListOptions {
    /// 判断名称是否满足 marker 和 prefix 条件（不考虑 limit）
    pub fn accepts(&self, name: &str) -> bool {
        let after_marker = self.marker.as_deref().map_or(true, |m| name > m);
        let has_prefix = self.prefix.as_deref().map_or(true, |p| name.starts_with(p));
        after_marker && has_prefix
    }
}
