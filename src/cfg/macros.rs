//! 配置相关的宏
//!
//! 注册表要求 `T: TryFrom<Config>` 以及 `Box<T>: Into<Box<dyn Trait>>`，这里提供它们的简写。

/// 为配置类型实现 `From<Config>`，调用 `Type::new(config)`
///
/// 用法：`impl_from!(ConfigType => Type)`
#[macro_export]
macro_rules! impl_from {
    ($config_type:ty => $target_type:ty) => {
        impl From<$config_type> for $target_type {
            fn from(config: $config_type) -> Self {
                <$target_type>::new(config)
            }
        }
    };
}

/// 为配置类型实现 `TryFrom<Config>`，调用返回 `Result` 的 `Type::new(config)`
///
/// 用法：`impl_try_from!(ConfigType => Type, error: ErrorType)`
#[macro_export]
macro_rules! impl_try_from {
    ($config_type:ty => $target_type:ty, error: $error_type:ty) => {
        impl TryFrom<$config_type> for $target_type {
            type Error = $error_type;

            fn try_from(config: $config_type) -> Result<Self, Self::Error> {
                <$target_type>::new(config)
            }
        }
    };
}

/// 为 `Box<T>` 实现到 `Box<dyn Trait>` 的转换
///
/// 用法：`impl_box_from!(Type => dyn TraitName)`
#[macro_export]
macro_rules! impl_box_from {
    ($source_type:ty => dyn $trait_name:path) => {
        impl From<Box<$source_type>> for Box<dyn $trait_name> {
            fn from(source: Box<$source_type>) -> Self {
                source as Box<dyn $trait_name>
            }
        }
    };
}
