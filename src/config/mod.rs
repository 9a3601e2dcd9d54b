//! 配置管理
//!
//! 分层加载：config.toml -> config.{APP_ENV}.toml -> GRADEBOOK_* 环境变量 -> 显式覆盖变量。

mod r#impl;
mod structs;

pub use structs::*;
