// TypeOptions：带类型标签的配置块

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 类型选项
///
/// `type` 决定由哪个已注册的实现来构造实例，`options` 原样交给该实现的配置类型反序列化。
///
/// ```yaml
/// type: MemoryStorageClient
/// options:
///   endpoint: http://127.0.0.1:8080/v1/AUTH_demo
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeOptions {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub options: JsonValue,
}

impl TypeOptions {
    pub fn new(type_name: impl Into<String>, options: JsonValue) -> Self {
        Self {
            type_name: type_name.into(),
            options,
        }
    }

    /// 从 JSON 字符串创建（支持 JSON5：注释、尾随逗号、未加引号的键）
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(json5::from_str(json_str)?)
    }

    /// 从 YAML 字符串创建
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// 从 TOML 字符串创建
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json5() {
        let opts = TypeOptions::from_json(
            r#"{
                // 内存存储
                type: "MemoryStorageClient",
                options: { endpoint: "http://x/v1", },
            }"#,
        )
        .unwrap();

        assert_eq!(opts.type_name, "MemoryStorageClient");
        assert_eq!(opts.options, json!({ "endpoint": "http://x/v1" }));
    }

    #[test]
    fn test_from_yaml_and_toml_agree() {
        let yaml = TypeOptions::from_yaml(
            "type: MemoryAuthClient\noptions:\n  token_ttl: 30m\n",
        )
        .unwrap();
        let toml = TypeOptions::from_toml(
            "type = \"MemoryAuthClient\"\n[options]\ntoken_ttl = \"30m\"\n",
        )
        .unwrap();

        assert_eq!(yaml, toml);
    }

    #[test]
    fn test_missing_options_defaults_to_null() {
        let opts = TypeOptions::from_json(r#"{ "type": "LoggingStorageClient" }"#).unwrap();
        assert_eq!(opts.options, JsonValue::Null);
    }

    #[test]
    fn test_missing_type_is_error() {
        assert!(TypeOptions::from_json(r#"{ options: {} }"#).is_err());
    }
}
