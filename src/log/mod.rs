//! 日志模块
//!
//! 把日志分到互相独立的命名通道，每个通道有自己的阈值、布局和输出目标。
//!
//! # 通道
//!
//! - **develop**: 开发日志，仅在开发模式下输出，默认输出到终端
//! - **trace**: 服务间调用的追踪日志，带 TraceId / SpanId / ParentSpanId，仅在开发模式下输出
//! - **audit**: 审计日志，写入按天切分的文件，不受运行模式影响
//! - **system**: 系统日志，始终输出所有级别
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use chanlog::log::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     std::env::set_var("RUN_MODE", "development");
//!     configure();
//!
//!     get_develop_logger(Some("user")).info("这是用户模块的开发日志").await;
//!     get_audit_logger(Some("pay")).error("这是支付模块的审计日志").await;
//!     get_trace_logger(Some("http"), Some(TraceTriple::generate()))
//!         .info("这是服务之间的 http 请求的追踪日志")
//!         .await;
//!     get_system_logger("db").warn("这是系统的数据库操作的警告日志").await;
//! }
//! ```

pub mod appender;
pub mod channel;
pub mod clock;
pub mod context;
pub mod error;
pub mod formatter;
pub mod global;
pub mod level;
pub mod log_record;
pub mod logger;
pub mod registry;
pub mod trace_id;

// 重新导出核心类型
pub use appender::{
    AppenderFactory, ConsoleAppender, ConsoleAppenderConfig, DailyFileAppender,
    DailyFileAppenderConfig, DefaultAppenderFactory, LogAppender, MemoryAppender, Target,
};
pub use channel::{Channel, ChannelKind};
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{
    ContextField, LogContext, ModuleContext, SystemContext, TraceContext, TraceTriple,
    DEFAULT_MODULE,
};
pub use error::LogError;
pub use formatter::{LogFormatter, PatternFormatter, PatternFormatterConfig};
pub use level::LogLevel;
pub use log_record::LogRecord;
pub use logger::ChannelLogger;
pub use registry::ChannelRegistry;
pub use trace_id::new_trace_id;

pub use global::{
    configure, configure_from, configure_with, flush, get_audit_logger, get_develop_logger,
    get_system_logger, get_trace_logger, global_registry, try_get_system_logger,
};
