use crate::log::channel::{Channel, ChannelKind};
use crate::log::context::LogContext;
use crate::log::level::LogLevel;
use crate::log::registry::ChannelRegistry;
use std::future::Future;
use std::panic::Location;
use std::sync::Arc;

/// 日志句柄
///
/// 绑定一个通道和一份上下文。句柄本身不持有通道，每次写日志时从注册表读取
/// 当前通道，所以重新配置后已经发出的句柄立即使用新的阈值
///
/// # 示例
///
/// ```rust,no_run
/// use chanlog::log::{get_audit_logger, get_system_logger};
///
/// #[tokio::main]
/// async fn main() {
///     get_audit_logger(Some("pay")).error("refund failed").await;
///     get_system_logger("db").warn("slow query").await;
/// }
/// ```
#[derive(Clone)]
pub struct ChannelLogger {
    registry: Arc<ChannelRegistry>,
    kind: ChannelKind,
    context: Arc<LogContext>,
}

impl ChannelLogger {
    pub(crate) fn new(registry: Arc<ChannelRegistry>, kind: ChannelKind, context: LogContext) -> Self {
        Self {
            registry,
            kind,
            context: Arc::new(context),
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    /// 当前绑定的通道
    pub fn channel(&self) -> Arc<Channel> {
        self.registry.channel(self.kind)
    }

    /// 指定级别当前是否会被输出
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.channel().is_enabled(level)
    }

    /// 记录日志
    ///
    /// 阈值检查在调用时同步完成，被过滤的日志不会分配消息字符串
    #[track_caller]
    pub fn log<M: Into<String>>(
        &self,
        level: LogLevel,
        message: M,
    ) -> impl Future<Output = ()> + Send + '_ {
        let location = Location::caller();
        let channel = self.channel();
        let message = if channel.is_enabled(level) {
            Some(message.into())
        } else {
            None
        };

        async move {
            if let Some(message) = message {
                channel
                    .log(level, message, &self.context, Some(location))
                    .await;
            }
        }
    }

    /// 记录 TRACE 级别日志
    #[track_caller]
    pub fn trace<M: Into<String>>(&self, message: M) -> impl Future<Output = ()> + Send + '_ {
        self.log(LogLevel::Trace, message)
    }

    /// 记录 DEBUG 级别日志
    #[track_caller]
    pub fn debug<M: Into<String>>(&self, message: M) -> impl Future<Output = ()> + Send + '_ {
        self.log(LogLevel::Debug, message)
    }

    /// 记录 INFO 级别日志
    #[track_caller]
    pub fn info<M: Into<String>>(&self, message: M) -> impl Future<Output = ()> + Send + '_ {
        self.log(LogLevel::Info, message)
    }

    /// 记录 WARN 级别日志
    #[track_caller]
    pub fn warn<M: Into<String>>(&self, message: M) -> impl Future<Output = ()> + Send + '_ {
        self.log(LogLevel::Warn, message)
    }

    /// 记录 ERROR 级别日志
    #[track_caller]
    pub fn error<M: Into<String>>(&self, message: M) -> impl Future<Output = ()> + Send + '_ {
        self.log(LogLevel::Error, message)
    }

    /// 记录 FATAL 级别日志
    #[track_caller]
    pub fn fatal<M: Into<String>>(&self, message: M) -> impl Future<Output = ()> + Send + '_ {
        self.log(LogLevel::Fatal, message)
    }

    /// 刷新通道的输出器
    pub async fn flush(&self) {
        self.channel().flush().await;
    }
}

impl std::fmt::Debug for ChannelLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelLogger")
            .field("kind", &self.kind)
            .field("context", &self.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::{LogEnvConfig, MapSource};
    use crate::log::appender::{AppenderFactory, LogAppender, MemoryAppender};
    use crate::log::clock::SystemClock;
    use crate::log::context::ContextField;

    struct SharedSink(Arc<MemoryAppender>);

    impl AppenderFactory for SharedSink {
        fn appenders(&self, _: ChannelKind, _: &LogEnvConfig) -> Vec<Arc<dyn LogAppender>> {
            let sink: Arc<dyn LogAppender> = self.0.clone();
            vec![sink]
        }

        fn colored(&self, _: ChannelKind, _: &LogEnvConfig) -> bool {
            false
        }
    }

    fn registry(sink: &Arc<MemoryAppender>) -> Arc<ChannelRegistry> {
        let config = LogEnvConfig::from_source(&MapSource::from_pairs([("RUN_MODE", "development")]));
        Arc::new(ChannelRegistry::with_parts(
            config,
            Arc::new(SharedSink(sink.clone())),
            Arc::new(SystemClock),
        ))
    }

    #[tokio::test]
    async fn test_develop_logger_records_call_site() {
        let sink = Arc::new(MemoryAppender::new());
        let logger = registry(&sink).develop_logger(Some("user"));

        let line_no = line!() + 1;
        logger.info("hello").await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(
            lines[0].contains(&format!("[user {}:{}:", file!(), line_no)),
            "line = {}",
            lines[0]
        );
        assert!(lines[0].ends_with("] hello"));
    }

    #[tokio::test]
    async fn test_handle_accessors() {
        let sink = Arc::new(MemoryAppender::new());
        let logger = registry(&sink).audit_logger(None);

        assert_eq!(logger.kind(), ChannelKind::Audit);
        assert_eq!(logger.context().get(ContextField::Module), Some("default-module"));
        assert!(logger.is_enabled(LogLevel::Trace));
        assert!(!logger.is_enabled(LogLevel::Off));
        assert_eq!(logger.channel().kind(), ChannelKind::Audit);
    }

    #[tokio::test]
    async fn test_cloned_handles_share_context() {
        let sink = Arc::new(MemoryAppender::new());
        let logger = registry(&sink).system_logger("cache");
        let cloned = logger.clone();

        logger.info("a").await;
        cloned.error("b").await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.contains("SYSTEM:CACHE")));
    }

    #[tokio::test]
    async fn test_handles_across_tasks() {
        let sink = Arc::new(MemoryAppender::new());
        let registry = registry(&sink);

        let mut handles = Vec::new();
        for i in 0..4 {
            let logger = registry.audit_logger(Some("worker"));
            handles.push(tokio::spawn(async move {
                logger.info(format!("job {}", i)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(sink.len(), 4);
    }
}
