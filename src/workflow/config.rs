use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::oss::{Credentials, Metadata};
use crate::workflow::endpoint::OBJECT_STORE;

/// 一个元数据键值对，用于"写入后回读"的校验
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct MetadataProbe {
    #[garde(length(min = 1))]
    pub key: String,
    #[garde(skip)]
    pub value: String,
}

impl MetadataProbe {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 工作流配置
///
/// 所有输入都通过这个结构体显式传入，工作流不读取任何全局状态。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, SmartDefault, Validate)]
#[serde(default)]
pub struct WorkflowConfig {
    #[garde(dive)]
    pub credentials: Credentials,

    /// 工作流创建并最终删除的容器
    #[garde(length(min = 1, max = 256), pattern(r"^[^/]+$"))]
    pub container: String,

    /// 服务目录中对象存储的类型名
    #[default(OBJECT_STORE.to_string())]
    #[garde(length(min = 1))]
    pub service_type: String,

    /// 创建容器时携带的头
    #[default([("X-Log-Retention", "true")].into_iter().collect())]
    #[garde(skip)]
    pub container_headers: Metadata,

    /// 写入容器后回读校验的元数据
    #[default(MetadataProbe::new("X-Container-Meta-fubar", "false"))]
    #[garde(dive)]
    pub container_metadata: MetadataProbe,

    /// 上传对象时携带的头
    #[default([("X-Object-Meta-fubar", "false")].into_iter().collect())]
    #[garde(skip)]
    pub object_headers: Metadata,

    /// 写入对象后回读校验的元数据
    #[default(MetadataProbe::new("X-Object-Meta-fubar", "true"))]
    #[garde(dive)]
    pub object_metadata: MetadataProbe,

    /// 副本名 = 对象名 + 后缀
    #[default = ".dup"]
    #[garde(length(min = 1))]
    pub copy_suffix: String,

    /// 复制后是否再下载副本并逐字节比对
    #[garde(skip)]
    pub verify_copy: bool,
}
