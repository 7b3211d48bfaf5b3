use crate::log::level::LogLevel;
use chrono::{DateTime, Local};
use std::panic::Location;

/// 日志记录
///
/// 在写日志时创建，只用于渲染，不做持久化
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// 日志级别
    pub level: LogLevel,
    /// 日志消息
    pub message: String,
    /// 时间戳（由通道的时钟在写日志时赋值）
    pub timestamp: DateTime<Local>,
    /// 调用位置
    pub location: Option<&'static Location<'static>>,
}

impl LogRecord {
    /// 创建新的日志记录
    pub fn new(level: LogLevel, message: String, timestamp: DateTime<Local>) -> Self {
        Self {
            level,
            message,
            timestamp,
            location: None,
        }
    }

    /// 设置调用位置
    pub fn with_location(mut self, location: &'static Location<'static>) -> Self {
        self.location = Some(location);
        self
    }

    /// 源文件路径
    pub fn file(&self) -> Option<&'static str> {
        self.location.map(|l| l.file())
    }

    /// 行号
    pub fn line(&self) -> Option<u32> {
        self.location.map(|l| l.line())
    }

    /// 列号
    pub fn column(&self) -> Option<u32> {
        self.location.map(|l| l.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_record_new() {
        let now = Local::now();
        let record = LogRecord::new(LogLevel::Info, "test message".to_string(), now);

        assert_eq!(record.level, LogLevel::Info);
        assert_eq!(record.message, "test message");
        assert_eq!(record.timestamp, now);
        assert!(record.location.is_none());
        assert!(record.file().is_none());
    }

    #[test]
    fn test_log_record_with_location() {
        let here = Location::caller();
        let record =
            LogRecord::new(LogLevel::Debug, "message".to_string(), Local::now()).with_location(here);

        assert_eq!(record.file(), Some(file!()));
        assert_eq!(record.line(), Some(here.line()));
        assert_eq!(record.column(), Some(here.column()));
    }
}
