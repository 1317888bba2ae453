// 按 trait 分组的类型注册表和工厂函数

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::RwLock;

use super::type_options::TypeOptions;

// 返回值实际是 Box<Box<dyn Trait>>，通过 Any 擦除类型后统一存放
type TraitConstructor =
    Box<dyn Fn(JsonValue) -> Result<Box<dyn Any + Send + Sync>> + Send + Sync>;

// 外层 key 是 trait 的 TypeId，内层 key 是类型名称
static TRAIT_REGISTRY: Lazy<RwLock<HashMap<TypeId, HashMap<String, TraitConstructor>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 为实现了 `Trait` 的类型 `T` 注册构造函数
///
/// 构造时先把 options 反序列化成 `Config`，再通过 `TryFrom<Config>` 得到 `T`，最后装箱成 `Box<Trait>`。
/// 实现了 `From<Config>` 的类型自动满足 `TryFrom<Config>`。构造失败作为错误返回。
/// 同名重复注册会覆盖之前的构造函数。
///
/// # 示例
/// ```ignore
/// register_trait::<MemoryStorageClient, dyn StorageClient, MemoryStorageClientConfig>(
///     "MemoryStorageClient",
/// )?;
/// ```
pub fn register_trait<T, Trait, Config>(type_name: &str) -> Result<()>
where
    T: Send + Sync + 'static,
    Trait: ?Sized + Send + Sync + 'static,
    Config: DeserializeOwned + Send + Sync + 'static,
    T: TryFrom<Config>,
    <T as TryFrom<Config>>::Error: std::error::Error + Send + Sync + 'static,
    Box<T>: Into<Box<Trait>>,
{
    let constructor: TraitConstructor = Box::new(|value| {
        // 省略 options 时按空对象处理，配置类型依靠 #[serde(default)] 补全
        let value = match value {
            JsonValue::Null => JsonValue::Object(Default::default()),
            other => other,
        };
        let config: Config = serde_json::from_value(value)?;
        let target = T::try_from(config)?;
        let trait_object: Box<Trait> = Box::new(target).into();
        Ok(Box::new(trait_object) as Box<dyn Any + Send + Sync>)
    });

    let mut registry = TRAIT_REGISTRY
        .write()
        .map_err(|_| anyhow!("Failed to acquire write lock"))?;
    registry
        .entry(TypeId::of::<Trait>())
        .or_default()
        .insert(type_name.to_string(), constructor);

    Ok(())
}

/// 根据 TypeOptions 创建 trait object
///
/// # 示例
/// ```ignore
/// let opts = TypeOptions::from_json(r#"{"type": "MemoryAuthClient", "options": {}}"#)?;
/// let auth: Box<dyn AuthClient> = create_trait_from_type_options(&opts)?;
/// ```
pub fn create_trait_from_type_options<Trait>(type_options: &TypeOptions) -> Result<Box<Trait>>
where
    Trait: ?Sized + Send + Sync + 'static,
{
    let registry = TRAIT_REGISTRY
        .read()
        .map_err(|_| anyhow!("Failed to acquire read lock"))?;

    let constructor = registry
        .get(&TypeId::of::<Trait>())
        .and_then(|constructors| constructors.get(&type_options.type_name))
        .ok_or_else(|| {
            anyhow!(
                "Type '{}' not registered for this trait",
                type_options.type_name
            )
        })?;

    constructor(type_options.options.clone())?
        .downcast::<Box<Trait>>()
        .map(|boxed| *boxed)
        .map_err(|_| anyhow!("Failed to downcast to target trait type"))
}
