use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::oss::StorageError;
use crate::workflow::Step;

/// 工作流失败原因
///
/// 每个变体都是终态：工作流在第一个错误处停止，不重试也不回滚。
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("认证失败: {0}")]
    AuthenticationFailed(#[source] StorageError),

    #[error("令牌已过期: {expires}")]
    TokenExpired { expires: DateTime<Utc> },

    #[error("服务目录中没有可用的 {service_type} 地址")]
    EndpointNotFound { service_type: String },

    #[error("步骤 [{step}] 调用失败: {source}")]
    CapabilityCallFailed {
        step: Step,
        #[source]
        source: StorageError,
    },

    #[error("步骤 [{step}] 校验失败: 期望 {expected}, 实际 {actual}")]
    InvariantViolated {
        step: Step,
        expected: String,
        actual: String,
    },

    #[error("工作流配置错误: {0}")]
    InvalidConfig(String),
}

impl WorkflowError {
    /// 失败发生在哪一步，配置错误发生在执行之前，返回 `None`
    pub fn step(&self) -> Option<Step> {
        match self {
            WorkflowError::AuthenticationFailed(_) | WorkflowError::TokenExpired { .. } => {
                Some(Step::Authenticate)
            }
            WorkflowError::EndpointNotFound { .. } => Some(Step::ResolveEndpoint),
            WorkflowError::CapabilityCallFailed { step, .. }
            | WorkflowError::InvariantViolated { step, .. } => Some(*step),
            WorkflowError::InvalidConfig(_) => None,
        }
    }

    pub(crate) fn invariant(
        step: Step,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        WorkflowError::InvariantViolated {
            step,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// 把能力调用的错误归到指定步骤，配合 `map_err` 使用
pub(crate) fn failed_at(step: Step) -> impl FnOnce(StorageError) -> WorkflowError {
    move |source| WorkflowError::CapabilityCallFailed { step, source }
}
