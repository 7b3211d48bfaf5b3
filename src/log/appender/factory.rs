use crate::cfg::LogEnvConfig;
use crate::log::appender::{
    ConsoleAppender, DailyFileAppender, DailyFileAppenderConfig, LogAppender,
};
use crate::log::channel::ChannelKind;
use std::sync::Arc;

/// 输出器工厂
///
/// 每次重新配置时为每个通道创建输出器，替换工厂即可改变输出目标而不影响通道逻辑
pub trait AppenderFactory: Send + Sync {
    /// 为通道创建输出器，按顺序写入
    fn appenders(&self, kind: ChannelKind, config: &LogEnvConfig) -> Vec<Arc<dyn LogAppender>>;

    /// 输出器失败时使用的兜底输出器
    fn fallback(&self) -> Arc<dyn LogAppender> {
        Arc::new(ConsoleAppender::stderr())
    }

    /// 通道布局是否着色，文件类输出不着色
    fn colored(&self, kind: ChannelKind, config: &LogEnvConfig) -> bool {
        kind != ChannelKind::Audit && config.colored()
    }
}

/// 默认输出器工厂
///
/// develop / trace / system 输出到标准输出，audit 写入按天切分的文件
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAppenderFactory;

impl AppenderFactory for DefaultAppenderFactory {
    fn appenders(&self, kind: ChannelKind, config: &LogEnvConfig) -> Vec<Arc<dyn LogAppender>> {
        let appender: Arc<dyn LogAppender> = match kind {
            ChannelKind::Develop | ChannelKind::Trace | ChannelKind::System => {
                Arc::new(ConsoleAppender::stdout())
            }
            ChannelKind::Audit => Arc::new(DailyFileAppender::new(DailyFileAppenderConfig {
                file_path: config.audit_path(),
            })),
        };
        vec![appender]
    }
}
