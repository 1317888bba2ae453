//! 工作流编排
//!
//! 按固定顺序执行 13 个步骤，每一步完成后先做校验再进入下一步，遇到第一个错误立即终止。
//! 失败时不做任何清理，容器和对象会留在存储中，方便排查。

use bytes::Bytes;
use chrono::Utc;
use garde::Validate;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::oss::{AuthClient, AuthSession, ListOptions, StorageClient};
use crate::workflow::error::failed_at;
use crate::workflow::verify::{
    ensure_listed_once, ensure_metadata, ensure_same_bytes, ensure_token_fresh,
};
use crate::workflow::{select_endpoint, Step, WorkflowConfig, WorkflowError};

/// 已完成步骤的记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: Step,
    pub elapsed: Duration,
}

/// 工作流成功执行后的报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowReport {
    /// 选中的对象存储地址（以 `/` 结尾）
    pub endpoint: String,
    pub container: String,
    pub object: String,
    pub duplicate: String,
    /// 上传的字节数
    pub bytes: u64,
    pub steps: Vec<StepRecord>,
}

impl WorkflowReport {
    pub fn total_elapsed(&self) -> Duration {
        self.steps.iter().map(|r| r.elapsed).sum()
    }
}

/// 对象存储工作流
///
/// 持有配置和两个能力，[`Workflow::run`] 可以重复调用，每次都是一次完整的执行。
pub struct Workflow {
    config: WorkflowConfig,
    auth: Arc<dyn AuthClient>,
    storage: Arc<dyn StorageClient>,
}

impl Workflow {
    pub fn new(
        config: WorkflowConfig,
        auth: Arc<dyn AuthClient>,
        storage: Arc<dyn StorageClient>,
    ) -> Result<Self, WorkflowError> {
        if let Err(errors) = config.validate() {
            return Err(WorkflowError::InvalidConfig(format!("{}", errors)));
        }

        Ok(Self {
            config,
            auth,
            storage,
        })
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// 认证并校验令牌有效期（步骤 1）
    pub async fn authenticate(&self) -> Result<AuthSession, WorkflowError> {
        let session = self
            .auth
            .authenticate(&self.config.credentials)
            .await
            .map_err(WorkflowError::AuthenticationFailed)?;
        ensure_token_fresh(&session, Utc::now())?;
        Ok(session)
    }

    /// 认证并解析对象存储地址（步骤 1、2）
    pub async fn resolve_endpoint(&self) -> Result<(AuthSession, String), WorkflowError> {
        let session = self.authenticate().await?;
        let endpoint = select_endpoint(&session.service_catalog, &self.config.service_type)?;
        Ok((session, endpoint))
    }

    /// 执行完整的工作流：上传 `content` 为 `object_name`，验证后全部删除
    pub async fn run(
        &self,
        object_name: &str,
        content: Bytes,
    ) -> Result<WorkflowReport, WorkflowError> {
        if object_name.is_empty() {
            return Err(WorkflowError::InvalidConfig("对象名为空".to_string()));
        }

        let config = &self.config;
        let storage = &self.storage;
        let mut tracker = Tracker::default();

        let session = tracker.track(Step::Authenticate, self.authenticate()).await?;
        let token = session.token.as_str();

        let endpoint = tracker
            .track(Step::ResolveEndpoint, async {
                select_endpoint(&session.service_catalog, &config.service_type)
            })
            .await?;

        let container_url = format!("{}{}", endpoint, encode_path(&config.container));
        let duplicate_name = format!("{}{}", object_name, config.copy_suffix);
        let object_url = format!("{}/{}", container_url, encode_path(object_name));
        let duplicate_url = format!("{}/{}", container_url, encode_path(&duplicate_name));

        tracker
            .track(Step::GetAccountMetadata, async {
                let metadata = storage
                    .get_account_metadata(&endpoint, token)
                    .await
                    .map_err(failed_at(Step::GetAccountMetadata))?;
                log::debug!("account metadata: {}", metadata);
                Ok::<_, WorkflowError>(())
            })
            .await?;

        tracker
            .track(Step::CreateContainer, async {
                storage
                    .create_container(&container_url, token, &config.container_headers)
                    .await
                    .map_err(failed_at(Step::CreateContainer))
            })
            .await?;

        tracker
            .track(Step::ListContainers, async {
                let containers = storage
                    .list_containers(&endpoint, token, &ListOptions::default())
                    .await
                    .map_err(failed_at(Step::ListContainers))?;
                ensure_listed_once(
                    Step::ListContainers,
                    containers.iter().map(|c| c.name.as_str()),
                    &config.container,
                )
            })
            .await?;

        tracker
            .track(Step::ContainerMetadata, async {
                let probe = &config.container_metadata;
                storage
                    .set_container_metadata(&container_url, token, &probe.key, &probe.value)
                    .await
                    .map_err(failed_at(Step::ContainerMetadata))?;
                let metadata = storage
                    .get_container_metadata(&container_url, token)
                    .await
                    .map_err(failed_at(Step::ContainerMetadata))?;
                ensure_metadata(Step::ContainerMetadata, &metadata, &probe.key, &probe.value)
            })
            .await?;

        tracker
            .track(Step::PutObject, async {
                storage
                    .put_object(&object_url, token, content.clone(), &config.object_headers)
                    .await
                    .map_err(failed_at(Step::PutObject))
            })
            .await?;

        tracker
            .track(Step::ListObjects, async {
                let objects = storage
                    .list_objects(&container_url, token, &ListOptions::default())
                    .await
                    .map_err(failed_at(Step::ListObjects))?;
                ensure_listed_once(
                    Step::ListObjects,
                    objects.iter().map(|o| o.name.as_str()),
                    object_name,
                )
            })
            .await?;

        tracker
            .track(Step::ObjectMetadata, async {
                let probe = &config.object_metadata;
                storage
                    .set_object_metadata(&object_url, token, &probe.key, &probe.value)
                    .await
                    .map_err(failed_at(Step::ObjectMetadata))?;
                let metadata = storage
                    .get_object_metadata(&object_url, token)
                    .await
                    .map_err(failed_at(Step::ObjectMetadata))?;
                ensure_metadata(Step::ObjectMetadata, &metadata, &probe.key, &probe.value)
            })
            .await?;

        tracker
            .track(Step::GetObject, async {
                let body = storage
                    .get_object(&object_url, token)
                    .await
                    .map_err(failed_at(Step::GetObject))?;
                ensure_same_bytes(Step::GetObject, &content, &body)
            })
            .await?;

        tracker
            .track(Step::CopyObject, async {
                let dest_path = format!(
                    "/{}/{}",
                    encode_path(&config.container),
                    encode_path(&duplicate_name)
                );
                storage
                    .copy_object(&object_url, &dest_path, token)
                    .await
                    .map_err(failed_at(Step::CopyObject))?;

                if config.verify_copy {
                    let body = storage
                        .get_object(&duplicate_url, token)
                        .await
                        .map_err(failed_at(Step::CopyObject))?;
                    ensure_same_bytes(Step::CopyObject, &content, &body)?;
                }
                Ok::<_, WorkflowError>(())
            })
            .await?;

        tracker
            .track(Step::DeleteObjects, async {
                for url in [&object_url, &duplicate_url] {
                    storage
                        .delete_object(url, token)
                        .await
                        .map_err(failed_at(Step::DeleteObjects))?;
                }
                Ok::<_, WorkflowError>(())
            })
            .await?;

        tracker
            .track(Step::DeleteContainer, async {
                storage
                    .delete_container(&container_url, token)
                    .await
                    .map_err(failed_at(Step::DeleteContainer))
            })
            .await?;

        Ok(WorkflowReport {
            endpoint,
            container: config.container.clone(),
            object: object_name.to_string(),
            duplicate: duplicate_name,
            bytes: content.len() as u64,
            steps: tracker.records,
        })
    }
}

/// 记录每一步的耗时，并在开始、结束、失败时打日志
#[derive(Default)]
struct Tracker {
    records: Vec<StepRecord>,
}

impl Tracker {
    async fn track<T, F>(&mut self, step: Step, fut: F) -> Result<T, WorkflowError>
    where
        F: std::future::Future<Output = Result<T, WorkflowError>>,
    {
        log::info!("step started, step: {}", step);
        let start = Instant::now();

        match fut.await {
            Ok(value) => {
                let elapsed = start.elapsed();
                log::info!("step finished, step: {}, elapsed: {:?}", step, elapsed);
                self.records.push(StepRecord { step, elapsed });
                Ok(value)
            }
            Err(e) => {
                log::error!("step failed, step: {}, error: {}", step, e);
                Err(e)
            }
        }
    }
}

/// 按路径段做 URL 编码，保留 `/` 分隔符
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
