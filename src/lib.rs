//! ossflow - 对象存储验证工作流
//!
//! 面向 OpenStack 兼容对象存储的一组类型化能力接口，以及基于它们的端到端验证流程：
//! 认证、选择地址、创建容器、列举、读写元数据、上传下载、复制、删除。
//!
//! ## 模块
//!
//! - **cfg**: 配置管理（TypeOptions、按类型名创建实例的注册表、时长解析）
//! - **oss**: 认证与对象存储能力接口、数据模型、内存实现、日志装饰器
//! - **workflow**: 地址选择、步骤校验、工作流编排
//!
//! ## 设计理念
//!
//! - **能力注入**: 协议实现只通过 trait 接入，工作流本身不关心 HTTP 细节
//! - **显式配置**: 所有输入都通过配置结构体传入，没有全局可变状态
//! - **快速失败**: 每一步都返回类型化的错误，第一处失败即终止

pub mod cfg;
pub mod oss;
pub mod workflow;

// 重新导出主要的公共 API
pub use cfg::{create_trait_from_type_options, register_trait, TypeOptions};

pub use oss::{register_clients, AuthClient, AuthSession, Credentials, Metadata, ServiceEntry};
pub use oss::{StorageClient, StorageError};

pub use workflow::{select_endpoint, Step, Workflow, WorkflowConfig, WorkflowError, WorkflowReport};
