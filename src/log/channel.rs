use crate::log::appender::LogAppender;
use crate::log::clock::Clock;
use crate::log::context::{ContextField, LogContext};
use crate::log::error::LogError;
use crate::log::formatter::LogFormatter;
use crate::log::level::LogLevel;
use crate::log::log_record::LogRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;
use std::str::FromStr;
use std::sync::Arc;

/// 日志通道种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// 开发日志
    Develop,
    /// 服务间调用的追踪日志
    Trace,
    /// 审计（操作）日志
    Audit,
    /// 系统日志
    System,
}

impl ChannelKind {
    /// 所有通道，顺序与 `index()` 一致
    pub const ALL: [ChannelKind; 4] = [
        ChannelKind::Develop,
        ChannelKind::Trace,
        ChannelKind::Audit,
        ChannelKind::System,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChannelKind::Develop => "develop",
            ChannelKind::Trace => "trace",
            ChannelKind::Audit => "audit",
            ChannelKind::System => "system",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            ChannelKind::Develop => 0,
            ChannelKind::Trace => 1,
            ChannelKind::Audit => 2,
            ChannelKind::System => 3,
        }
    }

    /// 通道布局可以引用的上下文字段
    pub fn schema(&self) -> &'static [ContextField] {
        match self {
            ChannelKind::Trace => &[
                ContextField::Module,
                ContextField::TraceId,
                ContextField::SpanId,
                ContextField::ParentSpanId,
            ],
            ChannelKind::Develop | ChannelKind::Audit | ChannelKind::System => {
                &[ContextField::Module]
            }
        }
    }

    /// 通道默认布局
    pub fn default_pattern(&self) -> &'static str {
        match self {
            ChannelKind::Develop => "%[[%d] [%p] [%X{Module} %f:%l:%o]%] %m",
            ChannelKind::Trace => {
                "%[[%d{ISO8601_WITH_TZ_OFFSET}] [%p] [%h] [%X{Module}] [%X{TraceId}|%X{SpanId}|%X{ParentSpanId}]%] %m"
            }
            ChannelKind::Audit => "[%d{yyyy-MM-dd hh:mm:ss.SSS}] [%p] [%X{Module}] %m",
            ChannelKind::System => "%[[%d{yyyy-MM-dd hh:mm:ss.SSS} SYSTEM:%X{Module}]%] %m",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelKind {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "develop" => Ok(ChannelKind::Develop),
            "trace" => Ok(ChannelKind::Trace),
            "audit" => Ok(ChannelKind::Audit),
            "system" => Ok(ChannelKind::System),
            _ => Err(LogError::UnknownChannel(s.to_string())),
        }
    }
}

/// 日志通道
///
/// 绑定阈值、布局和输出器。阈值在构造时确定，只能通过重新配置（重建通道）改变
pub struct Channel {
    kind: ChannelKind,
    level: LogLevel,
    formatter: Arc<dyn LogFormatter>,
    appenders: Vec<Arc<dyn LogAppender>>,
    fallback: Arc<dyn LogAppender>,
    clock: Arc<dyn Clock>,
}

impl Channel {
    pub fn new(
        kind: ChannelKind,
        level: LogLevel,
        formatter: Arc<dyn LogFormatter>,
        appenders: Vec<Arc<dyn LogAppender>>,
        fallback: Arc<dyn LogAppender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            kind,
            level,
            formatter,
            appenders,
            fallback,
            clock,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// 当前阈值
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// 指定级别是否会被输出
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.level.permits(level)
    }

    /// 记录日志
    ///
    /// 低于阈值时直接返回，不会格式化也不会触碰输出器。
    /// 输出器失败时写入兜底输出器，错误不会传递给调用方
    pub async fn log(
        &self,
        level: LogLevel,
        message: String,
        context: &LogContext,
        location: Option<&'static Location<'static>>,
    ) {
        if !self.is_enabled(level) {
            return;
        }

        let mut record = LogRecord::new(level, message, self.clock.now());
        if let Some(location) = location {
            record = record.with_location(location);
        }

        let formatted = self.formatter.format(&record, context);

        for appender in &self.appenders {
            if let Err(e) = appender.append(&record, &formatted).await {
                self.report_sink_failure(&record, &formatted, &e).await;
            }
        }
    }

    async fn report_sink_failure(&self, record: &LogRecord, formatted: &str, error: &anyhow::Error) {
        let line = format!(
            "[SINK FAILURE] [{}] {:#} | {}",
            self.kind, error, formatted
        );
        // 兜底输出器也失败时只能放弃
        let _ = self.fallback.append(record, &line).await;
    }

    /// 刷新所有输出器
    pub async fn flush(&self) {
        for appender in &self.appenders {
            if let Err(e) = appender.flush().await {
                tracing::warn!("failed to flush {} channel appender: {:#}", self.kind, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::appender::MemoryAppender;
    use crate::log::clock::ManualClock;
    use crate::log::context::ModuleContext;
    use crate::log::formatter::PatternFormatter;
    use anyhow::Result;
    use chrono::{Local, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 统计格式化次数的布局
    struct CountingFormatter {
        calls: AtomicUsize,
    }

    impl LogFormatter for CountingFormatter {
        fn format(&self, record: &LogRecord, context: &LogContext) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            format!("{} {} {}", record.level, context.module(), record.message)
        }
    }

    struct FailingAppender;

    #[async_trait::async_trait]
    impl LogAppender for FailingAppender {
        async fn append(&self, _record: &LogRecord, _formatted: &str) -> Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }
    }

    const LEVELS: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    fn clock() -> Arc<dyn Clock> {
        Arc::new(ManualClock::new(
            Local.with_ymd_and_hms(2025, 1, 19, 12, 0, 0).unwrap(),
        ))
    }

    fn context() -> LogContext {
        LogContext::Module(ModuleContext::new(Some("user")))
    }

    #[test]
    fn test_channel_kind_from_str() {
        assert_eq!("audit".parse::<ChannelKind>(), Ok(ChannelKind::Audit));
        assert_eq!("SYSTEM".parse::<ChannelKind>(), Ok(ChannelKind::System));
        assert_eq!(
            "metrics".parse::<ChannelKind>(),
            Err(LogError::UnknownChannel("metrics".to_string()))
        );
    }

    #[test]
    fn test_channel_kind_index_matches_all() {
        for (i, kind) in ChannelKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(kind.name().parse::<ChannelKind>(), Ok(*kind));
        }
    }

    #[test]
    fn test_default_patterns_compile() {
        for kind in ChannelKind::ALL {
            assert!(PatternFormatter::for_channel(kind, true, "h".to_string()).is_ok());
        }
    }

    #[tokio::test]
    async fn test_threshold_filters_events() {
        for threshold in LEVELS {
            let first = Arc::new(MemoryAppender::new());
            let second = Arc::new(MemoryAppender::new());
            let channel = Channel::new(
                ChannelKind::Audit,
                threshold,
                Arc::new(CountingFormatter {
                    calls: AtomicUsize::new(0),
                }),
                vec![first.clone() as Arc<dyn LogAppender>, second.clone()],
                Arc::new(MemoryAppender::new()),
                clock(),
            );

            for level in LEVELS {
                first.clear();
                second.clear();
                channel.log(level, "msg".to_string(), &context(), None).await;

                let expected = if level >= threshold { 1 } else { 0 };
                assert_eq!(first.len(), expected, "threshold {} level {}", threshold, level);
                assert_eq!(second.len(), expected, "threshold {} level {}", threshold, level);
            }
        }
    }

    #[tokio::test]
    async fn test_suppressed_event_is_not_formatted() {
        let formatter = Arc::new(CountingFormatter {
            calls: AtomicUsize::new(0),
        });
        let sink = Arc::new(MemoryAppender::new());
        let channel = Channel::new(
            ChannelKind::Develop,
            LogLevel::Off,
            formatter.clone(),
            vec![sink.clone() as Arc<dyn LogAppender>],
            Arc::new(MemoryAppender::new()),
            clock(),
        );

        for level in LEVELS {
            channel.log(level, "msg".to_string(), &context(), None).await;
        }

        assert_eq!(formatter.calls.load(Ordering::SeqCst), 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_off_level_event_never_emitted() {
        let sink = Arc::new(MemoryAppender::new());
        let channel = Channel::new(
            ChannelKind::System,
            LogLevel::ALL,
            Arc::new(CountingFormatter {
                calls: AtomicUsize::new(0),
            }),
            vec![sink.clone() as Arc<dyn LogAppender>],
            Arc::new(MemoryAppender::new()),
            clock(),
        );

        channel.log(LogLevel::Off, "msg".to_string(), &context(), None).await;
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_goes_to_fallback() {
        let fallback = Arc::new(MemoryAppender::new());
        let healthy = Arc::new(MemoryAppender::new());
        let channel = Channel::new(
            ChannelKind::Audit,
            LogLevel::ALL,
            Arc::new(CountingFormatter {
                calls: AtomicUsize::new(0),
            }),
            vec![Arc::new(FailingAppender) as Arc<dyn LogAppender>, healthy.clone()],
            fallback.clone(),
            clock(),
        );

        channel.log(LogLevel::Info, "paid".to_string(), &context(), None).await;

        // 后续输出器不受前一个失败的影响
        assert_eq!(healthy.lines(), vec!["INFO user paid"]);

        let reported = fallback.lines();
        assert_eq!(reported.len(), 1);
        assert!(reported[0].starts_with("[SINK FAILURE] [audit] disk full"));
        assert!(reported[0].ends_with("INFO user paid"));
    }

    #[tokio::test]
    async fn test_record_uses_channel_clock() {
        let sink = Arc::new(MemoryAppender::new());
        let formatter = PatternFormatter::for_channel(ChannelKind::Audit, false, "h".to_string())
            .unwrap();
        let channel = Channel::new(
            ChannelKind::Audit,
            LogLevel::ALL,
            Arc::new(formatter),
            vec![sink.clone() as Arc<dyn LogAppender>],
            Arc::new(MemoryAppender::new()),
            clock(),
        );

        channel.log(LogLevel::Warn, "late".to_string(), &context(), None).await;
        assert_eq!(sink.lines(), vec!["[2025-01-19 12:00:00.000] [WARN] [user] late"]);
    }

    #[tokio::test]
    async fn test_concurrent_logging() {
        let sink = Arc::new(MemoryAppender::new());
        let channel = Arc::new(Channel::new(
            ChannelKind::System,
            LogLevel::ALL,
            Arc::new(CountingFormatter {
                calls: AtomicUsize::new(0),
            }),
            vec![sink.clone() as Arc<dyn LogAppender>],
            Arc::new(MemoryAppender::new()),
            clock(),
        ));

        let mut handles = Vec::new();
        for t in 0..8 {
            let channel = Arc::clone(&channel);
            handles.push(tokio::spawn(async move {
                for i in 0..50 {
                    channel
                        .log(LogLevel::Info, format!("t{}-{}", t, i), &context(), None)
                        .await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), 400);
        assert!(lines.iter().all(|l| l.starts_with("INFO user t")));
    }
}
