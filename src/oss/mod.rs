//! oss 模块 - 对象存储能力接口
//!
//! 定义认证和对象存储两个能力 trait、它们交换的数据类型，以及内置的内存实现。

mod auth_client;
mod error;
mod logging_storage_client;
mod memory_auth_client;
mod memory_storage_client;
mod metadata;
mod storage_client;
mod types;

pub use auth_client::AuthClient;
pub use error::StorageError;
pub use logging_storage_client::{LoggingStorageClient, LoggingStorageClientConfig};
pub use memory_auth_client::{MemoryAuthClient, MemoryAuthClientConfig, MemoryUser};
pub use memory_storage_client::{MemoryStorageClient, MemoryStorageClientConfig};
pub use metadata::Metadata;
pub use storage_client::StorageClient;
pub use types::{
    AuthSession, ContainerDescriptor, Credentials, ListOptions, ObjectDescriptor, ServiceEntry,
};

use std::sync::Once;

use crate::cfg::register_trait;

static REGISTER_ONCE: Once = Once::new();

/// 注册所有内置的 AuthClient / StorageClient 实现
///
/// 注册后可以通过 `TypeOptions` 按类型名创建实例，重复调用只会注册一次。
///
/// # 示例
///
/// ```rust
/// use ossflow::cfg::{create_trait_from_type_options, TypeOptions};
/// use ossflow::oss::{register_clients, StorageClient};
///
/// register_clients();
///
/// let opts = TypeOptions::from_json(r#"{
///     type: "MemoryStorageClient",
///     options: { endpoint: "http://127.0.0.1:8080/v1/AUTH_demo" }
/// }"#).unwrap();
/// let storage: Box<dyn StorageClient> = create_trait_from_type_options(&opts).unwrap();
/// ```
pub fn register_clients() {
    REGISTER_ONCE.call_once(|| {
        register_trait::<MemoryAuthClient, dyn AuthClient, MemoryAuthClientConfig>(
            "MemoryAuthClient",
        )
        .expect("Failed to register MemoryAuthClient");

        register_trait::<MemoryStorageClient, dyn StorageClient, MemoryStorageClientConfig>(
            "MemoryStorageClient",
        )
        .expect("Failed to register MemoryStorageClient");

        register_trait::<LoggingStorageClient, dyn StorageClient, LoggingStorageClientConfig>(
            "LoggingStorageClient",
        )
        .expect("Failed to register LoggingStorageClient");
    });
}
