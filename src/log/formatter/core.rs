use crate::log::context::LogContext;
use crate::log::log_record::LogRecord;

/// 日志格式化器 trait
///
/// 把日志记录和句柄上下文渲染成一行文本。渲染是纯函数，不依赖区域设置
pub trait LogFormatter: Send + Sync {
    /// 格式化日志记录
    fn format(&self, record: &LogRecord, context: &LogContext) -> String;
}
