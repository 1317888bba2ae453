//! 日志 StorageClient 装饰器
//!
//! 包装一个 StorageClient，为每次调用记录方法名、URL、耗时和结果。调用本身原样转发，不做重试。

use async_trait::async_trait;
use bytes::Bytes;
use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::cfg::{create_trait_from_type_options, TypeOptions};
use crate::oss::{
    ContainerDescriptor, ListOptions, Metadata, ObjectDescriptor, StorageClient, StorageError,
};
use crate::{impl_box_from, impl_try_from};

/// LoggingStorageClient 配置
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, Validate)]
#[serde(default)]
pub struct LoggingStorageClientConfig {
    /// 被包装的 StorageClient 配置
    #[garde(skip)]
    #[default(TypeOptions::new("MemoryStorageClient", serde_json::json!({})))]
    pub storage_client: TypeOptions,

    /// 成功调用的日志级别: "debug" / "info"
    #[default = "info"]
    #[garde(pattern("^(debug|info)$"))]
    pub level: String,
}

/// 日志 StorageClient 装饰器
pub struct LoggingStorageClient {
    inner: Arc<dyn StorageClient>,
    level: log::Level,
}

impl LoggingStorageClient {
    pub fn new(config: LoggingStorageClientConfig) -> Result<Self, StorageError> {
        if let Err(e) = config.validate() {
            return Err(StorageError::Configuration(format!("{}", e)));
        }

        let inner = create_trait_from_type_options::<dyn StorageClient>(&config.storage_client)
            .map_err(|e| StorageError::Configuration(format!("{}", e)))?;

        Ok(Self::from_parts(Arc::from(inner), level_of(&config.level)))
    }

    /// 直接包装已有的 StorageClient
    pub fn from_parts(inner: Arc<dyn StorageClient>, level: log::Level) -> Self {
        Self { inner, level }
    }

    async fn observe<T, F>(&self, method: &str, url: &str, call: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        let start = Instant::now();
        let result = call.await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => log::log!(
                self.level,
                "storage call succeeded, method: {}, url: {}, elapsed: {:?}",
                method,
                url,
                elapsed
            ),
            Err(e) => log::warn!(
                "storage call failed, method: {}, url: {}, elapsed: {:?}, error: {}",
                method,
                url,
                elapsed,
                e
            ),
        }

        result
    }
}

fn level_of(name: &str) -> log::Level {
    match name {
        "debug" => log::Level::Debug,
        _ => log::Level::Info,
    }
}

#[async_trait]
impl StorageClient for LoggingStorageClient {
    async fn get_account_metadata(
        &self,
        url: &str,
        token: &str,
    ) -> Result<Metadata, StorageError> {
        self.observe(
            "get_account_metadata",
            url,
            self.inner.get_account_metadata(url, token),
        )
        .await
    }

    async fn create_container(
        &self,
        url: &str,
        token: &str,
        headers: &Metadata,
    ) -> Result<(), StorageError> {
        self.observe(
            "create_container",
            url,
            self.inner.create_container(url, token, headers),
        )
        .await
    }

    async fn list_containers(
        &self,
        url: &str,
        token: &str,
        options: &ListOptions,
    ) -> Result<Vec<ContainerDescriptor>, StorageError> {
        self.observe(
            "list_containers",
            url,
            self.inner.list_containers(url, token, options),
        )
        .await
    }

    async fn set_container_metadata(
        &self,
        url: &str,
        token: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        self.observe(
            "set_container_metadata",
            url,
            self.inner.set_container_metadata(url, token, key, value),
        )
        .await
    }

    async fn get_container_metadata(
        &self,
        url: &str,
        token: &str,
    ) -> Result<Metadata, StorageError> {
        self.observe(
            "get_container_metadata",
            url,
            self.inner.get_container_metadata(url, token),
        )
        .await
    }

    async fn delete_container(&self, url: &str, token: &str) -> Result<(), StorageError> {
        self.observe(
            "delete_container",
            url,
            self.inner.delete_container(url, token),
        )
        .await
    }

    async fn put_object(
        &self,
        url: &str,
        token: &str,
        content: Bytes,
        headers: &Metadata,
    ) -> Result<(), StorageError> {
        self.observe(
            "put_object",
            url,
            self.inner.put_object(url, token, content, headers),
        )
        .await
    }

    async fn list_objects(
        &self,
        url: &str,
        token: &str,
        options: &ListOptions,
    ) -> Result<Vec<ObjectDescriptor>, StorageError> {
        self.observe(
            "list_objects",
            url,
            self.inner.list_objects(url, token, options),
        )
        .await
    }

    async fn set_object_metadata(
        &self,
        url: &str,
        token: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        self.observe(
            "set_object_metadata",
            url,
            self.inner.set_object_metadata(url, token, key, value),
        )
        .await
    }

    async fn get_object_metadata(
        &self,
        url: &str,
        token: &str,
    ) -> Result<Metadata, StorageError> {
        self.observe(
            "get_object_metadata",
            url,
            self.inner.get_object_metadata(url, token),
        )
        .await
    }

    async fn get_object(&self, url: &str, token: &str) -> Result<Bytes, StorageError> {
        self.observe("get_object", url, self.inner.get_object(url, token))
            .await
    }

    async fn copy_object(
        &self,
        source_url: &str,
        dest_path: &str,
        token: &str,
    ) -> Result<(), StorageError> {
        self.observe(
            "copy_object",
            source_url,
            self.inner.copy_object(source_url, dest_path, token),
        )
        .await
    }

    async fn delete_object(&self, url: &str, token: &str) -> Result<(), StorageError> {
        self.observe("delete_object", url, self.inner.delete_object(url, token))
            .await
    }
}

impl_try_from!(LoggingStorageClientConfig => LoggingStorageClient, error: StorageError);
impl_box_from!(LoggingStorageClient => dyn StorageClient);
