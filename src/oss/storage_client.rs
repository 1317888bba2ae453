use async_trait::async_trait;
use bytes::Bytes;

use crate::oss::{ContainerDescriptor, ListOptions, Metadata, ObjectDescriptor, StorageError};

/// 对象存储能力接口
///
/// 所有方法都直接接收完整 URL 和令牌：
/// - 账户：`{endpoint}`
/// - 容器：`{endpoint}{container}`
/// - 对象：`{endpoint}{container}/{object}`
///
/// 其中 `endpoint` 以 `/` 结尾。实现不做重试，错误原样返回给调用方。
#[async_trait]
pub trait StorageClient: Send + Sync {
    // === 账户 ===

    async fn get_account_metadata(&self, url: &str, token: &str)
        -> Result<Metadata, StorageError>;

    // === 容器 ===

    /// 创建容器，`headers` 作为容器的初始元数据
    async fn create_container(
        &self,
        url: &str,
        token: &str,
        headers: &Metadata,
    ) -> Result<(), StorageError>;

    /// 列举账户下的容器，`url` 为账户地址
    async fn list_containers(
        &self,
        url: &str,
        token: &str,
        options: &ListOptions,
    ) -> Result<Vec<ContainerDescriptor>, StorageError>;

    async fn set_container_metadata(
        &self,
        url: &str,
        token: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError>;

    async fn get_container_metadata(
        &self,
        url: &str,
        token: &str,
    ) -> Result<Metadata, StorageError>;

    /// 删除容器，容器非空时返回 [`StorageError::Conflict`]
    async fn delete_container(&self, url: &str, token: &str) -> Result<(), StorageError>;

    // === 对象 ===

    async fn put_object(
        &self,
        url: &str,
        token: &str,
        content: Bytes,
        headers: &Metadata,
    ) -> Result<(), StorageError>;

    /// 列举容器内的对象，`url` 为容器地址
    async fn list_objects(
        &self,
        url: &str,
        token: &str,
        options: &ListOptions,
    ) -> Result<Vec<ObjectDescriptor>, StorageError>;

    async fn set_object_metadata(
        &self,
        url: &str,
        token: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError>;

    async fn get_object_metadata(&self, url: &str, token: &str)
        -> Result<Metadata, StorageError>;

    async fn get_object(&self, url: &str, token: &str) -> Result<Bytes, StorageError>;

    /// 服务端复制，`dest_path` 为相对账户的路径，形如 `/container/object`
    async fn copy_object(
        &self,
        source_url: &str,
        dest_path: &str,
        token: &str,
    ) -> Result<(), StorageError>;

    async fn delete_object(&self, url: &str, token: &str) -> Result<(), StorageError>;
}
