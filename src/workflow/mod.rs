//! workflow 模块 - 对象存储验证工作流
//!
//! 认证、选择地址，然后依次完成容器和对象的创建、列举、元数据读写、下载、复制和删除，
//! 每一步之后校验结果，第一处失败即终止并报告失败的步骤。
//!
//! # 示例
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use ossflow::cfg::{create_trait_from_type_options, TypeOptions};
//! use ossflow::oss::{register_clients, AuthClient, StorageClient};
//! use ossflow::workflow::{Workflow, WorkflowConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     register_clients();
//!
//!     let config: WorkflowConfig = serde_yaml::from_str(r#"
//!         credentials: { host: "http://keystone/v2.0", username: demo, password: secret, project_name: demo }
//!         container: c1
//!     "#)?;
//!     let auth: Box<dyn AuthClient> = create_trait_from_type_options(&TypeOptions::from_json(r#"{
//!         type: "MemoryAuthClient",
//!         options: {
//!             users: [{ username: "demo", password: "secret", project_name: "demo" }],
//!             catalog: [{ type: "object-store", endpoints: ["http://127.0.0.1:8080/v1/AUTH_demo"] }],
//!         }
//!     }"#)?)?;
//!     let storage: Box<dyn StorageClient> = create_trait_from_type_options(&TypeOptions::from_json(r#"{
//!         type: "MemoryStorageClient",
//!         options: { endpoint: "http://127.0.0.1:8080/v1/AUTH_demo" }
//!     }"#)?)?;
//!
//!     let workflow = Workflow::new(config, Arc::from(auth), Arc::from(storage))?;
//!     let report = workflow.run("o1", Bytes::from_static(b"hello")).await?;
//!     println!("{} steps passed", report.steps.len());
//!     Ok(())
//! }
//! ```

mod config;
mod endpoint;
mod error;
mod orchestrator;
mod step;
pub mod verify;

pub use config::{MetadataProbe, WorkflowConfig};
pub use endpoint::{select_endpoint, OBJECT_STORE};
pub use error::WorkflowError;
pub use orchestrator::{StepRecord, Workflow, WorkflowReport};
pub use step::Step;
