//! chanlog - 多通道结构化日志门面
//!
//! 把进程内的日志事件路由到互相独立的命名通道（develop / trace / audit / system），
//! 每个通道有自己的输出目标、级别阈值和布局，进程启动时通过环境变量配置，运行时可以重新配置。
//!
//! ## 模块
//!
//! - **cfg**: 配置来源（进程环境变量、内存键值）与通道配置解析
//! - **log**: 级别、上下文、布局、输出器、通道注册表与日志句柄
//!
//! ## 设计理念
//!
//! - 🔒 **类型安全**: 通道种类是封闭枚举，每种通道有固定结构的上下文
//! - 🛡️ **不打断业务**: 写日志永远不会返回错误，输出失败走兜底输出
//! - ⚡ **低开销**: 被过滤的日志不格式化、不分配

pub mod cfg;
pub mod log;

// 重新导出主要的公共 API
pub use cfg::{ConfigSource, LogEnvConfig, MapSource, ProcessEnv};

pub use log::{
    configure, configure_from, configure_with, get_audit_logger, get_develop_logger,
    get_system_logger, get_trace_logger, new_trace_id, try_get_system_logger, ChannelKind,
    ChannelLogger, ChannelRegistry, LogError, LogLevel, TraceTriple,
};
