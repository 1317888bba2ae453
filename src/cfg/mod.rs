//! cfg 模块 - 配置管理
//!
//! 提供按类型名构造 trait object 的注册表，以及配置里常用的 serde 辅助类型

pub mod duration;
pub mod macros;
pub mod registry;
pub mod type_options;

pub use duration::{format_duration, parse_duration, HumanDur};
pub use registry::{create_trait_from_type_options, register_trait};
pub use type_options::TypeOptions;
