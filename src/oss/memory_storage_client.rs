//! 内存版 StorageClient
//!
//! 按 OpenStack 对象存储的语义在进程内模拟一个账户，用于测试和本地自检。

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use smart_default::SmartDefault;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::oss::{
    ContainerDescriptor, ListOptions, Metadata, ObjectDescriptor, StorageClient, StorageError,
};
use crate::{impl_box_from, impl_try_from};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// MemoryStorageClient 配置
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, Validate)]
#[serde(default)]
pub struct MemoryStorageClientConfig {
    /// 账户地址，所有请求的 URL 都必须以它开头
    #[garde(length(min = 1))]
    #[default = "http://127.0.0.1:8080/v1/AUTH_demo"]
    pub endpoint: String,

    /// 账户的初始元数据
    #[garde(skip)]
    pub account_metadata: Metadata,
}

#[derive(Default)]
struct Account {
    metadata: Metadata,
    containers: BTreeMap<String, Container>,
}

#[derive(Default)]
struct Container {
    metadata: Metadata,
    objects: BTreeMap<String, StoredObject>,
}

impl Container {
    fn bytes_used(&self) -> u64 {
        self.objects.values().map(|o| o.content.len() as u64).sum()
    }
}

#[derive(Clone)]
struct StoredObject {
    content: Bytes,
    metadata: Metadata,
    content_type: String,
    hash: String,
    last_modified: DateTime<Utc>,
}

impl StoredObject {
    fn descriptor(&self, name: &str) -> ObjectDescriptor {
        ObjectDescriptor {
            name: name.to_string(),
            hash: self.hash.clone(),
            content_type: self.content_type.clone(),
            last_modified: self.last_modified,
            bytes: self.content.len() as u64,
        }
    }
}

/// URL 解析后指向的资源
#[derive(Debug, PartialEq)]
enum Target {
    Account,
    Container(String),
    Object { container: String, name: String },
}

/// 内存版 StorageClient 实现
pub struct MemoryStorageClient {
    endpoint: String,
    account: RwLock<Account>,
}

impl MemoryStorageClient {
    pub fn new(config: MemoryStorageClientConfig) -> Result<Self, StorageError> {
        if let Err(errors) = config.validate() {
            return Err(StorageError::Configuration(format!("{}", errors)));
        }

        let mut endpoint = config.endpoint;
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }

        Ok(Self {
            endpoint,
            account: RwLock::new(Account {
                metadata: config.account_metadata,
                containers: BTreeMap::new(),
            }),
        })
    }

    /// 规范化后的账户地址（以 `/` 结尾）
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn resolve(&self, url: &str) -> Result<Target, StorageError> {
        let rest = match url.strip_prefix(&self.endpoint) {
            Some(rest) => rest,
            None if url == self.endpoint.trim_end_matches('/') => "",
            None => {
                return Err(StorageError::InvalidInput(format!(
                    "URL 不在账户 {} 下: {}",
                    self.endpoint, url
                )))
            }
        };
        parse_path(rest)
    }

    fn resolve_container(&self, url: &str) -> Result<String, StorageError> {
        match self.resolve(url)? {
            Target::Container(container) => Ok(container),
            _ => Err(StorageError::InvalidInput(format!("不是容器地址: {}", url))),
        }
    }

    fn resolve_object(&self, url: &str) -> Result<(String, String), StorageError> {
        match self.resolve(url)? {
            Target::Object { container, name } => Ok((container, name)),
            _ => Err(StorageError::InvalidInput(format!("不是对象地址: {}", url))),
        }
    }
}

fn parse_path(path: &str) -> Result<Target, StorageError> {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return Ok(Target::Account);
    }

    let (container, object) = path.split_once('/').unwrap_or((path, ""));
    let container = decode(container)?;
    if object.is_empty() {
        return Ok(Target::Container(container));
    }

    Ok(Target::Object {
        container,
        name: decode(object)?,
    })
}

fn decode(segment: &str) -> Result<String, StorageError> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|e| StorageError::InvalidInput(format!("无效的 URL 编码 {}: {}", segment, e)))
}

fn check_token(token: &str) -> Result<(), StorageError> {
    if token.trim().is_empty() {
        return Err(StorageError::Authentication("缺少令牌".to_string()));
    }
    Ok(())
}

fn object_path(container: &str, name: &str) -> String {
    format!("{}/{}", container, name)
}

#[async_trait]
impl StorageClient for MemoryStorageClient {
    async fn get_account_metadata(
        &self,
        url: &str,
        token: &str,
    ) -> Result<Metadata, StorageError> {
        check_token(token)?;
        if self.resolve(url)? != Target::Account {
            return Err(StorageError::InvalidInput(format!("不是账户地址: {}", url)));
        }

        let account = self.account.read().await;
        let mut metadata = account.metadata.clone();
        let objects: usize = account.containers.values().map(|c| c.objects.len()).sum();
        let bytes: u64 = account.containers.values().map(Container::bytes_used).sum();
        metadata.insert("x-account-container-count", account.containers.len().to_string());
        metadata.insert("x-account-object-count", objects.to_string());
        metadata.insert("x-account-bytes-used", bytes.to_string());

        Ok(metadata)
    }

    async fn create_container(
        &self,
        url: &str,
        token: &str,
        headers: &Metadata,
    ) -> Result<(), StorageError> {
        check_token(token)?;
        let name = self.resolve_container(url)?;

        let mut account = self.account.write().await;
        let container = account.containers.entry(name.clone()).or_default();
        container.metadata.extend(headers.iter());
        log::debug!("container created, name: {}", name);

        Ok(())
    }

    async fn list_containers(
        &self,
        url: &str,
        token: &str,
        options: &ListOptions,
    ) -> Result<Vec<ContainerDescriptor>, StorageError> {
        check_token(token)?;
        if self.resolve(url)? != Target::Account {
            return Err(StorageError::InvalidInput(format!("不是账户地址: {}", url)));
        }

        let account = self.account.read().await;
        Ok(account
            .containers
            .iter()
            .filter(|(name, _)| options.accepts(name))
            .take(options.limit.unwrap_or(usize::MAX))
            .map(|(name, container)| ContainerDescriptor {
                name: name.clone(),
                bytes: container.bytes_used(),
                count: container.objects.len() as u64,
            })
            .collect())
    }

    async fn set_container_metadata(
        &self,
        url: &str,
        token: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        check_token(token)?;
        let name = self.resolve_container(url)?;

        let mut account = self.account.write().await;
        let container = account
            .containers
            .get_mut(&name)
            .ok_or_else(|| StorageError::not_found(&name))?;
        container.metadata.insert(key, value);

        Ok(())
    }

    async fn get_container_metadata(
        &self,
        url: &str,
        token: &str,
    ) -> Result<Metadata, StorageError> {
        check_token(token)?;
        let name = self.resolve_container(url)?;

        let account = self.account.read().await;
        let container = account
            .containers
            .get(&name)
            .ok_or_else(|| StorageError::not_found(&name))?;

        let mut metadata = container.metadata.clone();
        metadata.insert("x-container-object-count", container.objects.len().to_string());
        metadata.insert("x-container-bytes-used", container.bytes_used().to_string());

        Ok(metadata)
    }

    async fn delete_container(&self, url: &str, token: &str) -> Result<(), StorageError> {
        check_token(token)?;
        let name = self.resolve_container(url)?;

        let mut account = self.account.write().await;
        match account.containers.get(&name) {
            None => return Err(StorageError::not_found(&name)),
            Some(container) if !container.objects.is_empty() => {
                return Err(StorageError::Conflict { path: name });
            }
            Some(_) => {}
        }
        account.containers.remove(&name);
        log::debug!("container deleted, name: {}", name);

        Ok(())
    }

    async fn put_object(
        &self,
        url: &str,
        token: &str,
        content: Bytes,
        headers: &Metadata,
    ) -> Result<(), StorageError> {
        check_token(token)?;
        let (container_name, name) = self.resolve_object(url)?;

        let mut metadata = headers.clone();
        let content_type = metadata
            .remove("content-type")
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let hash = hex::encode(Sha256::digest(&content));

        let mut account = self.account.write().await;
        let container = account
            .containers
            .get_mut(&container_name)
            .ok_or_else(|| StorageError::not_found(&container_name))?;
        container.objects.insert(
            name,
            StoredObject {
                content,
                metadata,
                content_type,
                hash,
                last_modified: Utc::now(),
            },
        );

        Ok(())
    }

    async fn list_objects(
        &self,
        url: &str,
        token: &str,
        options: &ListOptions,
    ) -> Result<Vec<ObjectDescriptor>, StorageError> {
        check_token(token)?;
        let name = self.resolve_container(url)?;

        let account = self.account.read().await;
        let container = account
            .containers
            .get(&name)
            .ok_or_else(|| StorageError::not_found(&name))?;

        Ok(container
            .objects
            .iter()
            .filter(|(name, _)| options.accepts(name))
            .take(options.limit.unwrap_or(usize::MAX))
            .map(|(name, object)| object.descriptor(name))
            .collect())
    }

    async fn set_object_metadata(
        &self,
        url: &str,
        token: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        check_token(token)?;
        let (container, name) = self.resolve_object(url)?;

        let mut account = self.account.write().await;
        let object = account
            .containers
            .get_mut(&container)
            .and_then(|c| c.objects.get_mut(&name))
            .ok_or_else(|| StorageError::not_found(object_path(&container, &name)))?;
        object.metadata.insert(key, value);

        Ok(())
    }

    async fn get_object_metadata(
        &self,
        url: &str,
        token: &str,
    ) -> Result<Metadata, StorageError> {
        check_token(token)?;
        let (container, name) = self.resolve_object(url)?;

        let account = self.account.read().await;
        let object = account
            .containers
            .get(&container)
            .and_then(|c| c.objects.get(&name))
            .ok_or_else(|| StorageError::not_found(object_path(&container, &name)))?;

        let mut metadata = object.metadata.clone();
        metadata.insert("etag", object.hash.clone());
        metadata.insert("content-length", object.content.len().to_string());
        metadata.insert("content-type", object.content_type.clone());
        metadata.insert("last-modified", object.last_modified.to_rfc2822());

        Ok(metadata)
    }

    async fn get_object(&self, url: &str, token: &str) -> Result<Bytes, StorageError> {
        check_token(token)?;
        let (container, name) = self.resolve_object(url)?;

        let account = self.account.read().await;
        account
            .containers
            .get(&container)
            .and_then(|c| c.objects.get(&name))
            .map(|o| o.content.clone())
            .ok_or_else(|| StorageError::not_found(object_path(&container, &name)))
    }

    async fn copy_object(
        &self,
        source_url: &str,
        dest_path: &str,
        token: &str,
    ) -> Result<(), StorageError> {
        check_token(token)?;
        let (src_container, src_name) = self.resolve_object(source_url)?;
        let (dst_container, dst_name) = match parse_path(dest_path)? {
            Target::Object { container, name } => (container, name),
            _ => {
                return Err(StorageError::InvalidInput(format!(
                    "复制目标必须是对象路径: {}",
                    dest_path
                )))
            }
        };

        let mut account = self.account.write().await;
        let mut copy = account
            .containers
            .get(&src_container)
            .and_then(|c| c.objects.get(&src_name))
            .cloned()
            .ok_or_else(|| StorageError::not_found(object_path(&src_container, &src_name)))?;
        copy.last_modified = Utc::now();

        account
            .containers
            .get_mut(&dst_container)
            .ok_or_else(|| StorageError::not_found(&dst_container))?
            .objects
            .insert(dst_name, copy);

        Ok(())
    }

    async fn delete_object(&self, url: &str, token: &str) -> Result<(), StorageError> {
        check_token(token)?;
        let (container, name) = self.resolve_object(url)?;

        let mut account = self.account.write().await;
        account
            .containers
            .get_mut(&container)
            .and_then(|c| c.objects.remove(&name))
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(object_path(&container, &name)))
    }
}

impl_try_from!(MemoryStorageClientConfig => MemoryStorageClient, error: StorageError);
impl_box_from!(MemoryStorageClient => dyn StorageClient);
