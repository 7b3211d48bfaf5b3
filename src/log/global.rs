use crate::cfg::{ConfigSource, LogEnvConfig, ProcessEnv};
use crate::log::context::TraceTriple;
use crate::log::error::LogError;
use crate::log::logger::ChannelLogger;
use crate::log::registry::ChannelRegistry;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// 全局通道注册表
///
/// 第一次使用时按进程环境变量构建，之后只能通过 `configure*` 整体替换通道
static GLOBAL_REGISTRY: Lazy<Arc<ChannelRegistry>> = Lazy::new(|| {
    Arc::new(ChannelRegistry::new(LogEnvConfig::from_source(&ProcessEnv)))
});

/// 获取全局注册表
pub fn global_registry() -> Arc<ChannelRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}

/// 按当前进程环境变量重新配置全部通道
///
/// 环境变量修改后需要再次调用才会生效，可以重复调用，以最后一次为准
pub fn configure() {
    configure_from(&ProcessEnv);
}

/// 按指定配置源重新配置全部通道
pub fn configure_from(source: &dyn ConfigSource) {
    configure_with(LogEnvConfig::from_source(source));
}

/// 按解析好的配置重新配置全部通道
pub fn configure_with(config: LogEnvConfig) {
    GLOBAL_REGISTRY.reconfigure(config);
}

/// 开发时打印日志使用，模块名默认为 default-module
pub fn get_develop_logger(module: Option<&str>) -> ChannelLogger {
    GLOBAL_REGISTRY.develop_logger(module)
}

/// 追踪日志使用
///
/// - `trace_id`: 整个行为的追踪 id
/// - `span_id`: 当前服务的追踪 id
/// - `parent_span_id`: 上一个服务的追踪 id
pub fn get_trace_logger(module: Option<&str>, trace: Option<TraceTriple>) -> ChannelLogger {
    GLOBAL_REGISTRY.trace_logger(module, trace)
}

/// 审计（操作）日志使用，模块名默认为 default-module
pub fn get_audit_logger(module: Option<&str>) -> ChannelLogger {
    GLOBAL_REGISTRY.audit_logger(module)
}

/// 系统日志使用，模块名会被转为大写
///
/// # Panics
///
/// 模块名为空时 panic
pub fn get_system_logger(module: &str) -> ChannelLogger {
    GLOBAL_REGISTRY.system_logger(module)
}

/// 系统日志使用，模块名缺失时返回错误
pub fn try_get_system_logger(module: Option<&str>) -> Result<ChannelLogger, LogError> {
    GLOBAL_REGISTRY.try_system_logger(module)
}

/// 刷新全部通道
pub async fn flush() {
    GLOBAL_REGISTRY.flush().await;
}
