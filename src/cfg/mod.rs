//! cfg 模块 - 配置管理
//!
//! 提供键值形式的配置来源，以及从中解析出的日志通道配置

pub mod log_env_config;
pub mod source;

pub use log_env_config::{LogEnvConfig, DEFAULT_AUDIT_LOG_PATH, DEVELOPMENT_MODE};
pub use source::{ConfigSource, MapSource, ProcessEnv};
