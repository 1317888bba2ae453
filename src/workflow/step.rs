use serde::Serialize;
use std::fmt;

/// 工作流的 13 个步骤，按执行顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Authenticate,
    ResolveEndpoint,
    GetAccountMetadata,
    CreateContainer,
    ListContainers,
    ContainerMetadata,
    PutObject,
    ListObjects,
    ObjectMetadata,
    GetObject,
    CopyObject,
    DeleteObjects,
    DeleteContainer,
}

impl Step {
    pub const ALL: [Step; 13] = [
        Step::Authenticate,
        Step::ResolveEndpoint,
        Step::GetAccountMetadata,
        Step::CreateContainer,
        Step::ListContainers,
        Step::ContainerMetadata,
        Step::PutObject,
        Step::ListObjects,
        Step::ObjectMetadata,
        Step::GetObject,
        Step::CopyObject,
        Step::DeleteObjects,
        Step::DeleteContainer,
    ];

    /// 从 1 开始的序号
    pub fn index(self) -> usize {
        self as usize + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::Authenticate => "authenticate",
            Step::ResolveEndpoint => "resolve_endpoint",
            Step::GetAccountMetadata => "get_account_metadata",
            Step::CreateContainer => "create_container",
            Step::ListContainers => "list_containers",
            Step::ContainerMetadata => "container_metadata",
            Step::PutObject => "put_object",
            Step::ListObjects => "list_objects",
            Step::ObjectMetadata => "object_metadata",
            Step::GetObject => "get_object",
            Step::CopyObject => "copy_object",
            Step::DeleteObjects => "delete_objects",
            Step::DeleteContainer => "delete_container",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.index(), Step::ALL.len(), self.name())
    }
}
