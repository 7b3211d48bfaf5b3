use crate::cfg::LogEnvConfig;
use crate::log::appender::{AppenderFactory, DefaultAppenderFactory};
use crate::log::channel::{Channel, ChannelKind};
use crate::log::clock::{Clock, SystemClock};
use crate::log::context::{
    LogContext, ModuleContext, SystemContext, TraceContext, TraceTriple,
};
use crate::log::error::LogError;
use crate::log::formatter::{LogFormatter, PatternFormatter, PatternFormatterConfig};
use crate::log::logger::ChannelLogger;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// 一次配置构建出的全部通道
struct ChannelSet {
    channels: [Arc<Channel>; 4],
    config: LogEnvConfig,
}

/// 通道注册表
///
/// 持有全部通道。每次重新配置都会整体重建通道集合，再原子替换旧集合：
/// 读取方拿到的永远是完整的一套通道，不会看到更新到一半的状态
pub struct ChannelRegistry {
    channels: ArcSwap<ChannelSet>,
    factory: Arc<dyn AppenderFactory>,
    clock: Arc<dyn Clock>,
}

impl ChannelRegistry {
    /// 使用默认输出器和系统时钟创建注册表
    pub fn new(config: LogEnvConfig) -> Self {
        Self::with_parts(config, Arc::new(DefaultAppenderFactory), Arc::new(SystemClock))
    }

    /// 使用自定义输出器工厂和时钟创建注册表
    pub fn with_parts(
        config: LogEnvConfig,
        factory: Arc<dyn AppenderFactory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let set = build_channel_set(config, factory.as_ref(), &clock);
        Self {
            channels: ArcSwap::from_pointee(set),
            factory,
            clock,
        }
    }

    /// 重新配置
    ///
    /// 已经发出的句柄在下一次写日志时就会使用新通道，正在进行中的写入继续使用旧通道
    pub fn reconfigure(&self, config: LogEnvConfig) {
        let set = build_channel_set(config, self.factory.as_ref(), &self.clock);
        tracing::debug!(
            develop = %set.channels[ChannelKind::Develop.index()].level(),
            trace = %set.channels[ChannelKind::Trace.index()].level(),
            audit = %set.channels[ChannelKind::Audit.index()].level(),
            system = %set.channels[ChannelKind::System.index()].level(),
            "log channels reconfigured"
        );
        self.channels.store(Arc::new(set));
    }

    /// 获取通道当前快照
    pub fn channel(&self, kind: ChannelKind) -> Arc<Channel> {
        Arc::clone(&self.channels.load().channels[kind.index()])
    }

    /// 当前生效的配置
    pub fn config(&self) -> LogEnvConfig {
        self.channels.load().config.clone()
    }

    /// 刷新所有通道的输出器
    pub async fn flush(&self) {
        let set = self.channels.load_full();
        for channel in &set.channels {
            channel.flush().await;
        }
    }

    /// 开发日志句柄，模块名默认为 default-module
    pub fn develop_logger(self: &Arc<Self>, module: Option<&str>) -> ChannelLogger {
        ChannelLogger::new(
            Arc::clone(self),
            ChannelKind::Develop,
            LogContext::Module(ModuleContext::new(module)),
        )
    }

    /// 追踪日志句柄，缺失的追踪字段渲染为空字符串
    pub fn trace_logger(
        self: &Arc<Self>,
        module: Option<&str>,
        trace: Option<TraceTriple>,
    ) -> ChannelLogger {
        ChannelLogger::new(
            Arc::clone(self),
            ChannelKind::Trace,
            LogContext::Trace(TraceContext::new(module, trace)),
        )
    }

    /// 审计日志句柄，模块名默认为 default-module
    pub fn audit_logger(self: &Arc<Self>, module: Option<&str>) -> ChannelLogger {
        ChannelLogger::new(
            Arc::clone(self),
            ChannelKind::Audit,
            LogContext::Module(ModuleContext::new(module)),
        )
    }

    /// 系统日志句柄，模块名必填
    pub fn try_system_logger(
        self: &Arc<Self>,
        module: Option<&str>,
    ) -> Result<ChannelLogger, LogError> {
        Ok(ChannelLogger::new(
            Arc::clone(self),
            ChannelKind::System,
            LogContext::System(SystemContext::new(module)?),
        ))
    }

    /// 系统日志句柄
    ///
    /// # Panics
    ///
    /// 模块名为空时 panic。缺少模块名是调用方的编程错误，不应悄悄输出残缺的日志行
    pub fn system_logger(self: &Arc<Self>, module: &str) -> ChannelLogger {
        match self.try_system_logger(Some(module)) {
            Ok(logger) => logger,
            Err(e) => panic!("{}", e),
        }
    }
}

fn build_channel_set(
    config: LogEnvConfig,
    factory: &dyn AppenderFactory,
    clock: &Arc<dyn Clock>,
) -> ChannelSet {
    let fallback = factory.fallback();
    let host = config.host();

    let channels = ChannelKind::ALL.map(|kind| {
        let formatter = build_formatter(kind, &config, factory, &host);
        Arc::new(Channel::new(
            kind,
            config.level_for(kind),
            formatter,
            factory.appenders(kind, &config),
            Arc::clone(&fallback),
            Arc::clone(clock),
        ))
    });

    ChannelSet { channels, config }
}

/// 依次尝试：配置的布局、通道默认布局、最简布局
fn build_formatter(
    kind: ChannelKind,
    config: &LogEnvConfig,
    factory: &dyn AppenderFactory,
    host: &str,
) -> Arc<dyn LogFormatter> {
    let colored = factory.colored(kind, config);

    if let Some(pattern) = config.pattern_for(kind) {
        let custom = PatternFormatterConfig {
            pattern: pattern.to_string(),
            colored,
            host: host.to_string(),
        };
        match PatternFormatter::new(custom, kind) {
            Ok(formatter) => return Arc::new(formatter),
            Err(e) => tracing::warn!("{}, using default {} layout", e, kind),
        }
    }

    match PatternFormatter::for_channel(kind, colored, host.to_string()) {
        Ok(formatter) => Arc::new(formatter),
        Err(e) => {
            tracing::error!("{}, using plain {} layout", e, kind);
            Arc::new(PatternFormatter::fallback(host.to_string()))
        }
    }
}
